//! `mimicgen settings` - stored settings management.

use anyhow::{Context as _, Result};
use colored::Colorize;
use mimic_core::{MimicSettings, MimicType};

use super::Context;
use crate::cli::args::{SettingsArgs, SettingsCommands};
use crate::output::{render_settings, OutputFormat};

pub fn execute(ctx: &Context, args: SettingsArgs) -> Result<()> {
    match args.command {
        SettingsCommands::Show { mimic_type } => show_settings(ctx, mimic_type),
        SettingsCommands::Set {
            mimic_type,
            key,
            value,
        } => set_settings(ctx, mimic_type, &key, &value),
        SettingsCommands::Reset { mimic_type } => reset_settings(ctx, mimic_type),
        SettingsCommands::Path => {
            println!("{}", ctx.store.dir().display());
            Ok(())
        }
    }
}

fn show_settings(ctx: &Context, mimic_type: MimicType) -> Result<()> {
    let settings = ctx.store.load(mimic_type)?;
    println!("{}", render_settings(ctx.output_format, &settings)?);
    Ok(())
}

fn set_settings(ctx: &Context, mimic_type: MimicType, key: &str, value: &str) -> Result<()> {
    let mut settings = ctx.store.load(mimic_type)?;
    set_value(&mut settings, key, value)?;
    let settings = settings.coerce_ranges();
    ctx.store.save(&settings)?;

    if ctx.output_format == OutputFormat::Text {
        println!(
            "{} {} set to {} for {}.",
            "Success:".green().bold(),
            key,
            value.cyan(),
            mimic_type
        );
    }
    Ok(())
}

fn reset_settings(ctx: &Context, mimic_type: MimicType) -> Result<()> {
    let removed = ctx.store.reset(mimic_type)?;

    if ctx.output_format == OutputFormat::Text {
        if removed {
            println!("{} {} settings reset to defaults.", "Success:".green().bold(), mimic_type);
        } else {
            println!("{} settings already at defaults.", mimic_type);
        }
    }
    Ok(())
}

/// Assign one settings key from its string form.
///
/// Keys use the names of the settings JSON. Numeric values are clamped by
/// the caller.
fn set_value(settings: &mut MimicSettings, key: &str, value: &str) -> Result<()> {
    let number = || -> Result<u32> {
        value
            .parse()
            .with_context(|| format!("{key} expects a whole number, got {value:?}"))
    };

    match key {
        "domain" => settings.domain = value.to_string(),
        "sipFromUser" => settings.sip_from_user = value.to_string(),
        "sipToUser" => settings.sip_to_user = value.to_string(),
        "sipFromDomain" => settings.sip_from_domain = value.to_string(),
        "sipToDomain" => settings.sip_to_domain = value.to_string(),
        "quicVersion" => settings.quic_version = value.to_string(),
        "itimeMin" => settings.itime_min = number()?,
        "itimeMax" => settings.itime_max = number()?,
        "regenerateIntervalSeconds" => settings.regenerate_interval_seconds = number()?,
        _ => {
            anyhow::bail!(
                "Unknown settings key: {}\n\n\
                 Available keys:\n  \
                 domain                     - Domain to query (DNS)\n  \
                 sipFromUser, sipToUser     - Caller and callee users (SIP)\n  \
                 sipFromDomain, sipToDomain - Caller and callee domains (SIP)\n  \
                 quicVersion                - 1, 2, or anything else for draft (QUIC)\n  \
                 itimeMin, itimeMax         - Itime bounds, 100..600\n  \
                 regenerateIntervalSeconds  - Seconds between refreshes, 20..60",
                key
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_text_values() {
        let mut settings = MimicSettings::default_sip();
        set_value(&mut settings, "sipToUser", "carol").unwrap();
        set_value(&mut settings, "quicVersion", "2").unwrap();
        assert_eq!(settings.sip_to_user, "carol");
        assert_eq!(settings.quic_version, "2");
    }

    #[test]
    fn test_set_numbers() {
        let mut settings = MimicSettings::default_dns();
        set_value(&mut settings, "itimeMax", "700").unwrap();
        set_value(&mut settings, "regenerateIntervalSeconds", "45").unwrap();
        let settings = settings.coerce_ranges();
        assert_eq!(settings.itime_max, 600);
        assert_eq!(settings.regenerate_interval_seconds, 45);

        let mut settings = MimicSettings::default_dns();
        let err = set_value(&mut settings, "itimeMin", "soon").unwrap_err();
        assert!(err.to_string().contains("whole number"));
    }

    #[test]
    fn test_unknown_key() {
        let mut settings = MimicSettings::default_dns();
        let err = set_value(&mut settings, "type", "SIP").unwrap_err();
        assert!(err.to_string().starts_with("Unknown settings key: type"));
        assert_eq!(settings, MimicSettings::default_dns());
    }
}
