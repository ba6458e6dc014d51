//! Output formatting for different formats.

use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use mimic_core::{MimicResult, MimicSettings, MimicType};
use mimic_gen::JunkFields;
use std::fmt::Write as _;

/// Available output formats.
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable slot listing
    #[default]
    Text,
    /// One JSON object per result
    Json,
    /// `I1 = <b 0x...>` lines for a tunnel config
    Conf,
}

/// Render one generated result.
pub fn render_result(
    format: OutputFormat,
    mimic_type: MimicType,
    result: &MimicResult,
) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string(&serde_json::json!({
            "type": mimic_type,
            "result": result,
        }))?),
        OutputFormat::Conf => Ok(JunkFields::from(result).to_config_lines().join("\n")),
        OutputFormat::Text => {
            let mut out = format!("{mimic_type} mimic").bold().to_string();
            for (name, value) in result.slots() {
                if !value.is_empty() {
                    write!(out, "\n  {:<6}{}", name.cyan(), value)?;
                }
            }
            write!(out, "\n  {:<6}{}", "itime".cyan(), result.itime)?;
            Ok(out)
        }
    }
}

/// Render stored settings.
pub fn render_settings(format: OutputFormat, settings: &MimicSettings) -> Result<String> {
    if format == OutputFormat::Json {
        return Ok(serde_json::to_string_pretty(settings)?);
    }

    let value = serde_json::to_value(settings)?;
    let mut out = String::new();
    if let Some(object) = value.as_object() {
        for (key, value) in object {
            let shown = value
                .as_str()
                .map_or_else(|| value.to_string(), ToString::to_string);
            writeln!(out, "{:<27} {}", format!("{key}:").bold(), shown)?;
        }
    }
    Ok(out.trim_end().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mimic_gen::{generate_with, SeededEntropy};

    fn quic_result() -> MimicResult {
        generate_with(&MimicSettings::default_quic(), &SeededEntropy::new(5)).unwrap()
    }

    #[test]
    fn test_json_result() {
        let result = quic_result();
        let line = render_result(OutputFormat::Json, MimicType::Quic, &result).unwrap();
        assert!(!line.contains('\n'));

        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["type"], "QUIC");
        assert_eq!(value["result"]["i1"], result.i1.as_str());
        assert_eq!(value["result"]["i3"], "");
    }

    #[test]
    fn test_conf_result() {
        let result = quic_result();
        let conf = render_result(OutputFormat::Conf, MimicType::Quic, &result).unwrap();
        let lines: Vec<&str> = conf.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("I1 = <b 0xc1"));
        assert!(lines[1].starts_with("I2 = <b 0x00"));
        assert!(lines[2].starts_with("J1 = <b 0x"));
        assert_eq!(lines[3], format!("Itime = {}", result.itime));
    }

    #[test]
    fn test_text_result() {
        colored::control::set_override(false);
        let result = quic_result();
        let text = render_result(OutputFormat::Text, MimicType::Quic, &result).unwrap();
        assert!(text.starts_with("QUIC mimic\n"));
        assert!(text.contains(&format!("  i1    {}", result.i1)));
        assert!(!text.contains("  i3"));
        assert!(text.ends_with(&format!("  itime {}", result.itime)));
    }

    #[test]
    fn test_settings_text() {
        colored::control::set_override(false);
        let text = render_settings(OutputFormat::Text, &MimicSettings::default_sip()).unwrap();
        assert!(text.contains("type:"));
        assert!(text.contains("SIP"));
        assert!(text.contains("sipToDomain:"));
        assert!(text.contains("biloxi.com"));
        assert!(!text.contains('"'));
    }

    #[test]
    fn test_format_values() {
        assert_eq!(OutputFormat::from_str("conf", false).unwrap(), OutputFormat::Conf);
        assert_eq!(OutputFormat::from_str("JSON", true).unwrap(), OutputFormat::Json);
        assert!(OutputFormat::from_str("pretty", true).is_err());
        assert_eq!(OutputFormat::default(), OutputFormat::Text);
    }
}
