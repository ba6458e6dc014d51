//! Routing from settings to the builder for their type.

use crate::builders::{dns, quic, sip};
use mimic_core::{
    EntropySource, MimicResult, MimicSettings, MimicType, Result, SecureRng, SystemEntropy,
};
use tracing::trace;

/// Generate a fresh mimic from operating system entropy.
///
/// # Errors
///
/// Returns [`MimicError::DomainRequired`](mimic_core::MimicError::DomainRequired)
/// for DNS settings with a blank domain.
pub fn generate(settings: &MimicSettings) -> Result<MimicResult> {
    generate_with(settings, &SystemEntropy)
}

/// Generate a fresh mimic drawing randomness from `entropy`.
///
/// # Errors
///
/// See [`generate`].
pub fn generate_with(settings: &MimicSettings, entropy: &dyn EntropySource) -> Result<MimicResult> {
    trace!(mimic_type = %settings.mimic_type, "generating mimic");
    let mut rng = SecureRng::new(entropy);

    match settings.mimic_type {
        MimicType::Dns => dns::build(settings, &mut rng),
        MimicType::Quic => Ok(quic::build(settings, &mut rng)),
        MimicType::Sip => Ok(sip::build(settings, &mut rng)),
    }
}
