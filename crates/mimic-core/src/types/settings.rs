use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Protocol a mimic imitates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MimicType {
    /// DNS query/response exchange with EDNS0
    #[default]
    Dns,
    /// QUIC long-header Initial packet
    Quic,
    /// SIP call dialog with SDP bodies
    Sip,
}

impl MimicType {
    /// Every mimic type, in declaration order
    pub const ALL: [Self; 3] = [Self::Dns, Self::Quic, Self::Sip];

    /// Lowercase name, used for file names and CLI arguments
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dns => "dns",
            Self::Quic => "quic",
            Self::Sip => "sip",
        }
    }
}

impl fmt::Display for MimicType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dns => write!(f, "DNS"),
            Self::Quic => write!(f, "QUIC"),
            Self::Sip => write!(f, "SIP"),
        }
    }
}

impl FromStr for MimicType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dns" => Ok(Self::Dns),
            "quic" => Ok(Self::Quic),
            "sip" => Ok(Self::Sip),
            other => Err(format!("unknown mimic type: {other} (expected dns, quic or sip)")),
        }
    }
}

/// Generator configuration for one mimic type.
///
/// Serialized as a flat JSON object with camelCase keys. Ranges are the
/// caller's responsibility: the generator uses the values as given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct MimicSettings {
    /// Which protocol to imitate
    #[serde(rename = "type")]
    pub mimic_type: MimicType,

    /// Target domain (required for DNS)
    pub domain: String,

    /// SIP caller user part
    pub sip_from_user: String,

    /// SIP callee user part
    pub sip_to_user: String,

    /// SIP caller domain
    pub sip_from_domain: String,

    /// SIP callee domain
    pub sip_to_domain: String,

    /// QUIC version label: `"1"`, `"2"`, anything else selects a draft version
    pub quic_version: String,

    /// Lower bound for the generated itime
    pub itime_min: u32,

    /// Upper bound for the generated itime
    pub itime_max: u32,

    /// Seconds between automatic regenerations
    pub regenerate_interval_seconds: u32,
}

impl MimicSettings {
    /// Smallest itime accepted by the settings boundary
    pub const ITIME_MIN_ALLOWED: u32 = 100;
    /// Largest itime accepted by the settings boundary
    pub const ITIME_MAX_ALLOWED: u32 = 600;
    /// Shortest regeneration interval in seconds
    pub const REGENERATE_MIN: u32 = 20;
    /// Longest regeneration interval in seconds
    pub const REGENERATE_MAX: u32 = 60;
    /// Default regeneration interval in seconds
    pub const DEFAULT_REGENERATE_INTERVAL: u32 = 20;

    /// Default settings for the given mimic type
    #[must_use]
    pub fn default_for(mimic_type: MimicType) -> Self {
        Self {
            mimic_type,
            domain: String::from("example.com"),
            sip_from_user: String::from("alice"),
            sip_to_user: String::from("bob"),
            sip_from_domain: String::from("atlanta.com"),
            sip_to_domain: String::from("biloxi.com"),
            quic_version: String::from("1"),
            itime_min: 120,
            itime_max: 180,
            regenerate_interval_seconds: Self::DEFAULT_REGENERATE_INTERVAL,
        }
    }

    /// Default DNS settings
    #[must_use]
    pub fn default_dns() -> Self {
        Self::default_for(MimicType::Dns)
    }

    /// Default QUIC settings
    #[must_use]
    pub fn default_quic() -> Self {
        Self::default_for(MimicType::Quic)
    }

    /// Default SIP settings
    #[must_use]
    pub fn default_sip() -> Self {
        Self::default_for(MimicType::Sip)
    }

    /// Clamp itime bounds and the regeneration interval into their allowed ranges
    #[must_use]
    pub fn coerce_ranges(mut self) -> Self {
        self.itime_min = self
            .itime_min
            .clamp(Self::ITIME_MIN_ALLOWED, Self::ITIME_MAX_ALLOWED);
        self.itime_max = self
            .itime_max
            .clamp(Self::ITIME_MIN_ALLOWED, Self::ITIME_MAX_ALLOWED);
        self.regenerate_interval_seconds = self
            .regenerate_interval_seconds
            .clamp(Self::REGENERATE_MIN, Self::REGENERATE_MAX);
        self
    }

    /// Serialize to the settings JSON object
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse settings JSON.
    ///
    /// Returns `None` for anything that is not a well-formed settings object,
    /// so callers can keep their previous settings.
    #[must_use]
    pub fn from_json(json: &str) -> Option<Self> {
        serde_json::from_str(json).ok()
    }
}

impl Default for MimicSettings {
    fn default() -> Self {
        Self::default_for(MimicType::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let sip = MimicSettings::default_sip();
        assert_eq!(sip.mimic_type, MimicType::Sip);
        assert_eq!(sip.domain, "example.com");
        assert_eq!(
            format!("{}@{}", sip.sip_from_user, sip.sip_from_domain),
            "alice@atlanta.com"
        );
        assert_eq!(
            format!("{}@{}", sip.sip_to_user, sip.sip_to_domain),
            "bob@biloxi.com"
        );
        assert_eq!(sip.quic_version, "1");
        assert_eq!((sip.itime_min, sip.itime_max), (120, 180));
        assert_eq!(sip.regenerate_interval_seconds, 20);
        assert_eq!(MimicSettings::default().mimic_type, MimicType::Dns);
    }

    #[test]
    fn test_json_field_names() {
        let json = MimicSettings::default_quic().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let obj = value.as_object().unwrap();

        for key in [
            "type",
            "domain",
            "sipFromUser",
            "sipToUser",
            "sipFromDomain",
            "sipToDomain",
            "quicVersion",
            "itimeMin",
            "itimeMax",
            "regenerateIntervalSeconds",
        ] {
            assert!(obj.contains_key(key), "missing key {key}");
        }
        assert_eq!(obj.len(), 10);
        assert_eq!(obj["type"], "QUIC");
    }

    #[test]
    fn test_json_roundtrip() {
        let settings = MimicSettings {
            mimic_type: MimicType::Sip,
            domain: String::from("voip.example.org"),
            sip_from_user: String::from("carol"),
            sip_to_user: String::from("dave"),
            sip_from_domain: String::from("chicago.com"),
            sip_to_domain: String::from("denver.com"),
            quic_version: String::from("draft"),
            itime_min: 300,
            itime_max: 450,
            regenerate_interval_seconds: 45,
        };
        let json = settings.to_json().unwrap();
        assert_eq!(MimicSettings::from_json(&json), Some(settings));

        for mimic_type in MimicType::ALL {
            let settings = MimicSettings::default_for(mimic_type);
            let json = settings.to_json().unwrap();
            assert_eq!(MimicSettings::from_json(&json), Some(settings));
        }
    }

    #[test]
    fn test_from_json_malformed_is_none() {
        assert_eq!(MimicSettings::from_json(""), None);
        assert_eq!(MimicSettings::from_json("not json"), None);
        assert_eq!(MimicSettings::from_json("[1, 2, 3]"), None);
        assert_eq!(MimicSettings::from_json(r#"{"type": "HTTP"}"#), None);
        assert_eq!(MimicSettings::from_json(r#"{"itimeMin": "soon"}"#), None);
        assert_eq!(MimicSettings::from_json(r#"{"itimeMin": -5}"#), None);
        assert_eq!(MimicSettings::from_json(r#"{"color": "blue"}"#), None);
    }

    #[test]
    fn test_from_json_missing_keys_take_defaults() {
        let parsed = MimicSettings::from_json(r#"{"type": "SIP", "sipToUser": "eve"}"#).unwrap();
        assert_eq!(parsed.mimic_type, MimicType::Sip);
        assert_eq!(parsed.sip_to_user, "eve");
        assert_eq!(parsed.sip_from_user, "alice");
        assert_eq!(parsed.itime_max, 180);
    }

    #[test]
    fn test_coerce_ranges() {
        let settings = MimicSettings {
            itime_min: 5,
            itime_max: 9000,
            regenerate_interval_seconds: 1,
            ..MimicSettings::default_dns()
        }
        .coerce_ranges();
        assert_eq!(settings.itime_min, 100);
        assert_eq!(settings.itime_max, 600);
        assert_eq!(settings.regenerate_interval_seconds, 20);

        let untouched = MimicSettings::default_dns().coerce_ranges();
        assert_eq!(untouched, MimicSettings::default_dns());
    }

    #[test]
    fn test_mimic_type_parse() {
        assert_eq!("DNS".parse::<MimicType>(), Ok(MimicType::Dns));
        assert_eq!("quic".parse::<MimicType>(), Ok(MimicType::Quic));
        assert_eq!("Sip".parse::<MimicType>(), Ok(MimicType::Sip));
        assert!("http".parse::<MimicType>().is_err());
        assert_eq!(MimicType::Quic.to_string(), "QUIC");
        assert_eq!(MimicType::Quic.as_str(), "quic");
    }
}
