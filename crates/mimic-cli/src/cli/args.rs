//! Command-line argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use mimic_core::{MimicSettings, MimicType};
use std::path::PathBuf;

use crate::output::OutputFormat;

/// Decoy traffic generator for obfuscated WireGuard tunnels
///
/// Produces DNS, QUIC and SIP shaped packets for the I1..I5 / J1..J3
/// junk fields and the Itime interval of a tunnel interface.
#[derive(Parser, Debug)]
#[command(name = "mimicgen")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(short, long, global = true, value_enum)]
    pub output: Option<OutputFormat>,

    /// Increase verbosity
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Directory holding dns.json, quic.json and sip.json
    #[arg(long, env = "MIMICGEN_SETTINGS_DIR", global = true)]
    pub settings_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate one set of junk-field values
    Generate(GenerateArgs),

    /// Print fresh values on every regeneration interval
    Watch(WatchArgs),

    /// Manage stored generator settings
    Settings(SettingsArgs),
}

// ============================================================================
// Generate command
// ============================================================================

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Protocol to imitate (dns, quic, sip)
    #[arg(value_name = "TYPE")]
    pub mimic_type: MimicType,

    #[command(flatten)]
    pub overrides: Overrides,

    /// Seed for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,

    /// Store the effective settings for this type
    #[arg(long)]
    pub save: bool,
}

/// Per-run replacements for stored settings.
#[derive(Args, Debug, Default)]
pub struct Overrides {
    /// Domain to query (DNS)
    #[arg(long)]
    pub domain: Option<String>,

    /// Caller user part (SIP)
    #[arg(long)]
    pub from_user: Option<String>,

    /// Callee user part (SIP)
    #[arg(long)]
    pub to_user: Option<String>,

    /// Caller domain (SIP)
    #[arg(long)]
    pub from_domain: Option<String>,

    /// Callee domain (SIP)
    #[arg(long)]
    pub to_domain: Option<String>,

    /// QUIC version: 1, 2, or anything else for draft
    #[arg(long)]
    pub quic_version: Option<String>,

    /// Lower itime bound
    #[arg(long)]
    pub itime_min: Option<u32>,

    /// Upper itime bound
    #[arg(long)]
    pub itime_max: Option<u32>,
}

impl Overrides {
    /// Replace every field that was given on the command line.
    pub fn apply(self, settings: &mut MimicSettings) {
        let Self {
            domain,
            from_user,
            to_user,
            from_domain,
            to_domain,
            quic_version,
            itime_min,
            itime_max,
        } = self;

        replace(&mut settings.domain, domain);
        replace(&mut settings.sip_from_user, from_user);
        replace(&mut settings.sip_to_user, to_user);
        replace(&mut settings.sip_from_domain, from_domain);
        replace(&mut settings.sip_to_domain, to_domain);
        replace(&mut settings.quic_version, quic_version);
        replace(&mut settings.itime_min, itime_min);
        replace(&mut settings.itime_max, itime_max);
    }
}

fn replace<T>(field: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *field = value;
    }
}

// ============================================================================
// Watch command
// ============================================================================

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Protocol to imitate (dns, quic, sip)
    #[arg(value_name = "TYPE")]
    pub mimic_type: MimicType,

    /// Seconds between regenerations (defaults to the stored setting)
    #[arg(short, long)]
    pub interval: Option<u32>,

    /// Stop after this many results, including the first
    #[arg(short = 'n', long)]
    pub count: Option<usize>,

    /// Seed for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,
}

// ============================================================================
// Settings command
// ============================================================================

#[derive(Args, Debug)]
pub struct SettingsArgs {
    #[command(subcommand)]
    pub command: SettingsCommands,
}

#[derive(Subcommand, Debug)]
pub enum SettingsCommands {
    /// Show the effective settings for a type
    Show {
        /// Protocol (dns, quic, sip)
        #[arg(value_name = "TYPE")]
        mimic_type: MimicType,
    },

    /// Set one settings value
    Set {
        /// Protocol (dns, quic, sip)
        #[arg(value_name = "TYPE")]
        mimic_type: MimicType,

        /// Settings key (e.g. domain, sipToUser, quicVersion, itimeMin)
        key: String,

        /// New value
        value: String,
    },

    /// Restore the defaults for a type
    Reset {
        /// Protocol (dns, quic, sip)
        #[arg(value_name = "TYPE")]
        mimic_type: MimicType,
    },

    /// Show the settings directory
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_generate() {
        let cli = Cli::parse_from([
            "mimicgen", "-o", "json", "generate", "QUIC", "--quic-version", "2", "--seed", "7",
        ]);
        assert_eq!(cli.output, Some(OutputFormat::Json));
        let Commands::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.mimic_type, MimicType::Quic);
        assert_eq!(args.seed, Some(7));
        assert_eq!(args.overrides.quic_version.as_deref(), Some("2"));
    }

    #[test]
    fn test_overrides_apply() {
        let mut settings = MimicSettings::default_sip();
        Overrides {
            to_user: Some(String::from("carol")),
            itime_max: Some(400),
            ..Overrides::default()
        }
        .apply(&mut settings);

        assert_eq!(settings.sip_to_user, "carol");
        assert_eq!(settings.itime_max, 400);
        assert_eq!(settings.sip_from_user, "alice");
        assert_eq!(settings.itime_min, 120);
    }

    #[test]
    fn test_unknown_type_rejected() {
        assert!(Cli::try_parse_from(["mimicgen", "generate", "http"]).is_err());
    }
}
