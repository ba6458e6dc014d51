//! Decoy packet generation for obfuscated WireGuard junk fields.
//!
//! The entry point is [`generate`], which routes a [`MimicSettings`] value to
//! the builder for its type and returns a fresh [`MimicResult`]:
//!
//! - **DNS**: A/AAAA queries with EDNS0, matching responses and an extra query
//! - **QUIC**: a long-header Initial packet and a short follow-up
//! - **SIP**: a full INVITE..BYE call dialog with SDP offer/answer, plus OPTIONS
//!
//! Around the builders sit the [`Regenerator`], which re-runs generation on a
//! timer, and [`JunkFields`], the tunnel-interface state that receives results.
//!
//! # Example
//!
//! ```rust,ignore
//! use mimic_gen::{generate, MimicSettings};
//!
//! let result = generate(&MimicSettings::default_quic())?;
//! println!("I1 = {}", result.i1);
//! ```

#![doc(html_root_url = "https://docs.rs/mimic-gen/0.3.0")]

pub mod builders;
mod generator;
pub mod interface;
mod regenerate;

pub use generator::{generate, generate_with};
pub use interface::JunkFields;
pub use mimic_core::{
    EntropySource, MimicError, MimicResult, MimicSettings, MimicType, Result, SeededEntropy,
    SystemEntropy,
};
pub use regenerate::Regenerator;
