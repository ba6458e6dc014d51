//! Junk-field state of a tunnel interface.

use mimic_core::{is_valid_blob, MimicResult};
use serde::{Deserialize, Serialize};

/// The `I1..I5`, `J1..J3` and `Itime` fields of an obfuscated WireGuard
/// interface, as the strings the tunnel configuration stores.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct JunkFields {
    /// `I1` signature packet, sent first on handshake
    pub i1: String,
    /// `I2` signature packet
    pub i2: String,
    /// `I3` signature packet
    pub i3: String,
    /// `I4` signature packet
    pub i4: String,
    /// `I5` signature packet
    pub i5: String,
    /// `J1` junk packet
    pub j1: String,
    /// `J2` junk packet
    pub j2: String,
    /// `J3` junk packet
    pub j3: String,
    /// `Itime` in seconds; empty leaves the interface default
    pub itime: String,
}

impl JunkFields {
    /// Overwrite every field with the values of `result`.
    ///
    /// Slots the mimic leaves empty clear the corresponding field.
    pub fn apply(&mut self, result: &MimicResult) {
        self.i1.clone_from(&result.i1);
        self.i2.clone_from(&result.i2);
        self.i3.clone_from(&result.i3);
        self.i4.clone_from(&result.i4);
        self.i5.clone_from(&result.i5);
        self.j1.clone_from(&result.j1);
        self.j2.clone_from(&result.j2);
        self.j3.clone_from(&result.j3);
        self.itime.clone_from(&result.itime);
    }

    /// `(key, value)` pairs in configuration order.
    #[must_use]
    pub fn fields(&self) -> [(&'static str, &str); 9] {
        [
            ("I1", self.i1.as_str()),
            ("I2", self.i2.as_str()),
            ("I3", self.i3.as_str()),
            ("I4", self.i4.as_str()),
            ("I5", self.i5.as_str()),
            ("J1", self.j1.as_str()),
            ("J2", self.j2.as_str()),
            ("J3", self.j3.as_str()),
            ("Itime", self.itime.as_str()),
        ]
    }

    /// Problems with the current values; empty when the fields are usable.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        for (key, value) in self.fields() {
            if value.is_empty() {
                continue;
            }
            if key == "Itime" {
                if value.parse::<u32>().is_err() {
                    errors.push(format!("{key} must be a whole number of seconds, got {value:?}"));
                }
            } else if !is_valid_blob(value) {
                errors.push(format!("{key} must be a <b 0x...> hex blob"));
            }
        }
        errors
    }

    /// `Key = value` lines for the non-empty fields.
    #[must_use]
    pub fn to_config_lines(&self) -> Vec<String> {
        self.fields()
            .into_iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(key, value)| format!("{key} = {value}"))
            .collect()
    }
}

impl From<&MimicResult> for JunkFields {
    fn from(result: &MimicResult) -> Self {
        let mut fields = Self::default();
        fields.apply(result);
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate;
    use mimic_core::MimicSettings;

    #[test]
    fn test_apply_overwrites_all() {
        let mut fields = JunkFields {
            i3: String::from("<b 0xdead>"),
            j3: String::from("<b 0xbeef>"),
            ..JunkFields::default()
        };
        let quic = generate(&MimicSettings::default_quic()).unwrap();
        fields.apply(&quic);

        assert_eq!(fields.i1, quic.i1);
        assert_eq!(fields.itime, quic.itime);
        assert!(fields.i3.is_empty());
        assert!(fields.j3.is_empty());
    }

    #[test]
    fn test_generated_fields_validate() {
        for settings in [
            MimicSettings::default_dns(),
            MimicSettings::default_quic(),
            MimicSettings::default_sip(),
        ] {
            let fields = JunkFields::from(&generate(&settings).unwrap());
            assert!(fields.validate().is_empty());
        }
    }

    #[test]
    fn test_validate_reports_bad_values() {
        let fields = JunkFields {
            i1: String::from("<b 0xabc>"),
            j2: String::from("plain text"),
            itime: String::from("soon"),
            ..JunkFields::default()
        };
        let errors = fields.validate();
        assert_eq!(errors.len(), 3);
        assert!(errors[0].starts_with("I1 "));
        assert!(errors[1].starts_with("J2 "));
        assert!(errors[2].starts_with("Itime "));
    }

    #[test]
    fn test_config_lines() {
        let fields = JunkFields {
            i1: String::from("<b 0x0102>"),
            j1: String::from("<b 0xff>"),
            itime: String::from("150"),
            ..JunkFields::default()
        };
        assert_eq!(
            fields.to_config_lines(),
            vec!["I1 = <b 0x0102>", "J1 = <b 0xff>", "Itime = 150"]
        );
    }

    #[test]
    fn test_serialized_keys() {
        let json = serde_json::to_value(JunkFields::default()).unwrap();
        let object = json.as_object().unwrap();
        for key in ["I1", "I5", "J3", "Itime"] {
            assert!(object.contains_key(key));
        }
    }
}
