use serde::{Deserialize, Serialize};

/// Prefix of a hex blob slot value
const BLOB_PREFIX: &str = "<b 0x";

/// Suffix of a hex blob slot value
const BLOB_SUFFIX: &str = ">";

/// Slot names in tunnel-interface order
pub const SLOT_NAMES: [&str; 8] = ["i1", "i2", "i3", "i4", "i5", "j1", "j2", "j3"];

/// Output of one generator run.
///
/// Each slot is either empty or a hex blob `<b 0xHEX>`; `itime` is a decimal
/// string. Values are produced fresh on every call and never mutated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MimicResult {
    /// First packet of the exchange (DNS A query, QUIC Initial, SIP INVITE)
    pub i1: String,
    /// Second packet
    pub i2: String,
    /// Third packet
    pub i3: String,
    /// Fourth packet
    pub i4: String,
    /// Fifth packet
    pub i5: String,
    /// First junk packet; random bytes for DNS and QUIC, the BYE for SIP
    pub j1: String,
    /// Second junk packet
    pub j2: String,
    /// Third junk packet; empty for DNS and QUIC
    pub j3: String,
    /// Seconds between I-packet bursts, within the itime bounds
    pub itime: String,
}

impl MimicResult {
    /// Slot `(name, value)` pairs in `i1..i5, j1..j3` order
    #[must_use]
    pub fn slots(&self) -> [(&'static str, &str); 8] {
        [
            (SLOT_NAMES[0], self.i1.as_str()),
            (SLOT_NAMES[1], self.i2.as_str()),
            (SLOT_NAMES[2], self.i3.as_str()),
            (SLOT_NAMES[3], self.i4.as_str()),
            (SLOT_NAMES[4], self.i5.as_str()),
            (SLOT_NAMES[5], self.j1.as_str()),
            (SLOT_NAMES[6], self.j2.as_str()),
            (SLOT_NAMES[7], self.j3.as_str()),
        ]
    }

    /// Number of non-empty slots
    #[must_use]
    pub fn filled_slots(&self) -> usize {
        self.slots().iter().filter(|(_, v)| !v.is_empty()).count()
    }
}

/// Format raw bytes as a slot value (`<b 0x...>`, lowercase hex).
#[must_use]
pub fn format_blob(bytes: &[u8]) -> String {
    format!("{BLOB_PREFIX}{}{BLOB_SUFFIX}", hex::encode(bytes))
}

/// Returns true if `value` is a non-empty hex blob with whole bytes.
#[must_use]
pub fn is_valid_blob(value: &str) -> bool {
    blob_hex(value).is_some_and(|hex| {
        !hex.is_empty() && hex.len() % 2 == 0 && hex.bytes().all(|b| b.is_ascii_hexdigit())
    })
}

/// Recover the bytes of a slot value, `None` if it is not a valid blob.
#[must_use]
pub fn decode_slot(value: &str) -> Option<Vec<u8>> {
    if !is_valid_blob(value) {
        return None;
    }
    hex::decode(blob_hex(value)?).ok()
}

fn blob_hex(value: &str) -> Option<&str> {
    value.strip_prefix(BLOB_PREFIX)?.strip_suffix(BLOB_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_blob() {
        assert_eq!(format_blob(&[0xc1, 0x00, 0xff]), "<b 0xc100ff>");
    }

    #[test]
    fn test_is_valid_blob() {
        assert!(is_valid_blob("<b 0x00>"));
        assert!(is_valid_blob("<b 0xDEADbeef>"));
        assert!(!is_valid_blob(""));
        assert!(!is_valid_blob("<b 0x>"));
        assert!(!is_valid_blob("<b 0xabc>"));
        assert!(!is_valid_blob("<b 0xzz>"));
        assert!(!is_valid_blob("0xabcd"));
        assert!(!is_valid_blob("<b 0xabcd"));
    }

    #[test]
    fn test_decode_slot() {
        assert_eq!(decode_slot("<b 0x0a0B>"), Some(vec![0x0a, 0x0b]));
        assert_eq!(decode_slot(""), None);
        assert_eq!(decode_slot("<b 0x0>"), None);
    }

    #[test]
    fn test_slots_order() {
        let result = MimicResult {
            i1: format_blob(&[1]),
            j3: format_blob(&[8]),
            itime: String::from("150"),
            ..MimicResult::default()
        };
        let slots = result.slots();
        assert_eq!(slots[0], ("i1", "<b 0x01>"));
        assert_eq!(slots[7], ("j3", "<b 0x08>"));
        assert_eq!(result.filled_slots(), 2);
    }
}
