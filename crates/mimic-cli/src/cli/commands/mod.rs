//! Command implementations.

pub mod generate;
pub mod settings;
pub mod watch;

use std::sync::Arc;

use mimic_gen::{EntropySource, SeededEntropy, SystemEntropy};

use crate::config::SettingsStore;
use crate::output::OutputFormat;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Stored per-type settings
    pub store: SettingsStore,

    /// Output format
    pub output_format: OutputFormat,
}

/// Seeded entropy when a seed is given, operating system entropy otherwise.
pub fn entropy(seed: Option<u64>) -> Arc<dyn EntropySource> {
    match seed {
        Some(seed) => Arc::new(SeededEntropy::new(seed)),
        None => Arc::new(SystemEntropy),
    }
}
