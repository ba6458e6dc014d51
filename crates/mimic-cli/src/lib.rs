//! # mimic-cli
//!
//! Command-line front end for the `mimic-gen` packet builders.
//!
//! ## Features
//!
//! - **generate**: one DNS, QUIC or SIP mimic with per-run overrides
//! - **watch**: keep printing fresh values on the regeneration interval
//! - **settings**: persistent per-type settings under the user data directory
//! - **Multiple output formats**: colored text, JSON lines, tunnel config lines

pub mod cli;
pub mod config;
pub mod output;

pub use cli::run;
