//! Per-protocol packet builders.
//!
//! Each builder takes the caller's settings and a [`SecureRng`](mimic_core::SecureRng)
//! and fills the slots of a [`MimicResult`](mimic_core::MimicResult). Only DNS
//! can fail, on a blank domain.

pub mod dns;
pub mod quic;
pub mod sdp;
pub mod sip;
