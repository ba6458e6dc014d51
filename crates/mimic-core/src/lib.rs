//! Core types for the mimic junk-packet generator.
//!
//! This crate provides the foundational pieces shared by the builders and the CLI:
//!
//! - **Types**: [`MimicSettings`], [`MimicType`] and the generated [`MimicResult`]
//! - **Randomness**: the injectable [`EntropySource`] capability and [`SecureRng`]
//! - **Errors**: [`MimicError`]
//!
//! # Example
//!
//! ```rust,ignore
//! use mimic_core::{MimicSettings, MimicType};
//!
//! let settings = MimicSettings::default_for(MimicType::Sip);
//! let json = settings.to_json()?;
//! assert_eq!(MimicSettings::from_json(&json), Some(settings));
//! ```

#![doc(html_root_url = "https://docs.rs/mimic-core/0.3.0")]

mod error;
pub mod random;
pub mod types;

pub use error::{MimicError, Result};
pub use random::{EntropySource, SecureRng, SeededEntropy, SystemEntropy};
pub use types::*;
