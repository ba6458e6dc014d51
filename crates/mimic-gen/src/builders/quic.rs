//! QUIC Initial packet mimic.
//!
//! Layout of the Initial (i1):
//!
//! ```text
//! c1 | version(4) | 08 dcid(8) | 00 | token_len token | len(2, 0x4000|200..399) | pn(1)
//!    | 06 00 40 NN 0303 random(32) 20 session(32) 1301 0100 ext_len(2) ext(100..199)
//!    | 00 padding up to len + 10
//! ```

use mimic_core::{format_blob, MimicResult, MimicSettings, SecureRng};
use rand::Rng;
use tracing::debug;

/// Long header, fixed bit, Initial packet type, 2-byte packet number field.
const INITIAL_FIRST_BYTE: u8 = 0xc1;

const VERSION_1: [u8; 4] = [0x00, 0x00, 0x00, 0x01];
const VERSION_2: [u8; 4] = [0x6b, 0x33, 0x43, 0xcf];
const VERSION_DRAFT_32: [u8; 4] = [0xff, 0x00, 0x00, 0x20];

const CONNECTION_ID_LEN: usize = 8;

/// Two-byte variable-length integer prefix.
const VARINT_2: u16 = 0x4000;

/// Bytes of zero padding beyond the declared length.
const PADDING_MARGIN: usize = 10;

const FOLLOW_UP_PAYLOAD_LEN: usize = 24;

/// Wire version for a version label.
#[must_use]
pub fn version_bytes(label: &str) -> [u8; 4] {
    match label {
        "1" => VERSION_1,
        "2" => VERSION_2,
        _ => VERSION_DRAFT_32,
    }
}

/// Build the QUIC mimic. Never fails.
pub fn build(settings: &MimicSettings, rng: &mut SecureRng<'_>) -> MimicResult {
    let version = version_bytes(&settings.quic_version);
    let packet_number: u32 = rng.gen_range(0..0x00FF_FFFF);

    let initial = initial_packet(version, packet_number, rng);
    let follow_up = follow_up_packet(version, rng);
    let junk = rng.bytes(8);
    let itime = rng.itime(settings.itime_min, settings.itime_max);

    debug!(
        version = %settings.quic_version,
        initial_len = initial.len(),
        "built QUIC mimic"
    );

    MimicResult {
        i1: format_blob(&initial),
        i2: format_blob(&follow_up),
        j1: format_blob(&junk),
        itime: itime.to_string(),
        ..MimicResult::default()
    }
}

#[allow(clippy::cast_possible_truncation)]
fn initial_packet(version: [u8; 4], packet_number: u32, rng: &mut SecureRng<'_>) -> Vec<u8> {
    let mut packet = Vec::with_capacity(512);
    packet.push(INITIAL_FIRST_BYTE);
    packet.extend_from_slice(&version);

    packet.push(CONNECTION_ID_LEN as u8);
    packet.extend(rng.bytes(CONNECTION_ID_LEN));
    packet.push(0); // empty source connection id

    let token_len: u8 = rng.gen_range(0..16);
    packet.push(token_len);
    packet.extend(rng.bytes(usize::from(token_len)));

    let declared_len: u16 = rng.gen_range(200..400);
    packet.extend_from_slice(&(declared_len | VARINT_2).to_be_bytes());
    packet.push((packet_number & 0xff) as u8);

    // CRYPTO frame carrying a ClientHello-shaped body.
    packet.extend_from_slice(&[0x06, 0x00, 0x40]);
    packet.push(rng.gen_range(50..100));
    packet.extend_from_slice(&[0x03, 0x03]);
    packet.extend(rng.bytes(32));
    packet.push(0x20);
    packet.extend(rng.bytes(32));
    packet.extend_from_slice(&[0x13, 0x01]); // TLS_AES_128_GCM_SHA256
    packet.extend_from_slice(&[0x01, 0x00]);

    let extensions_len: u16 = rng.gen_range(100..200);
    packet.extend_from_slice(&extensions_len.to_be_bytes());
    packet.extend(rng.bytes(usize::from(extensions_len)));

    let target = usize::from(declared_len) + PADDING_MARGIN;
    if packet.len() < target {
        packet.resize(target, 0);
    }
    packet
}

fn follow_up_packet(version: [u8; 4], rng: &mut SecureRng<'_>) -> Vec<u8> {
    let mut packet = Vec::with_capacity(6 + FOLLOW_UP_PAYLOAD_LEN);
    packet.push(0);
    packet.extend_from_slice(&version);
    packet.push(0);
    packet.extend(rng.bytes(FOLLOW_UP_PAYLOAD_LEN));
    packet
}

#[cfg(test)]
mod tests {
    use super::*;
    use mimic_core::{decode_slot, SeededEntropy};

    fn build_with(version: &str, seed: u64) -> MimicResult {
        let settings = MimicSettings {
            quic_version: version.to_string(),
            ..MimicSettings::default_quic()
        };
        let entropy = SeededEntropy::new(seed);
        build(&settings, &mut SecureRng::new(&entropy))
    }

    #[test]
    fn test_version_selection() {
        let cases = [
            ("1", "00000001"),
            ("2", "6b3343cf"),
            ("draft-29", "ff000020"),
            ("", "ff000020"),
        ];
        for (label, expected) in cases {
            let bytes = decode_slot(&build_with(label, 1).i1).unwrap();
            assert_eq!(bytes[0], 0xc1);
            // The version follows the first byte (hex digits 2..10).
            assert_eq!(hex::encode(&bytes[1..5]), expected, "label {label:?}");
        }
    }

    #[test]
    fn test_initial_structure() {
        for seed in 0..32 {
            let bytes = decode_slot(&build_with("1", seed).i1).unwrap();
            assert_eq!(bytes[5], 8);
            assert_eq!(bytes[14], 0);

            let token_len = bytes[15] as usize;
            assert!(token_len < 16);
            let len_pos = 16 + token_len;
            let raw = u16::from_be_bytes([bytes[len_pos], bytes[len_pos + 1]]);
            assert_eq!(raw & 0xc000, 0x4000);
            let declared = usize::from(raw & 0x3fff);
            assert!((200..400).contains(&declared));
            assert!(bytes.len() >= declared + PADDING_MARGIN);

            let frame = len_pos + 3;
            assert_eq!(&bytes[frame..frame + 3], &[0x06, 0x00, 0x40]);
            assert_eq!(&bytes[frame + 4..frame + 6], &[0x03, 0x03]);
            assert_eq!(bytes[frame + 38], 0x20);
            assert_eq!(&bytes[frame + 71..frame + 75], &[0x13, 0x01, 0x01, 0x00]);
            let ext_len = u16::from_be_bytes([bytes[frame + 75], bytes[frame + 76]]) as usize;
            assert!((100..200).contains(&ext_len));
        }
    }

    #[test]
    fn test_follow_up_and_slots() {
        let result = build_with("2", 9);
        let follow_up = decode_slot(&result.i2).unwrap();
        assert_eq!(follow_up.len(), 30);
        assert_eq!(follow_up[0], 0);
        assert_eq!(&follow_up[1..5], &VERSION_2);
        assert_eq!(follow_up[5], 0);

        assert_eq!(decode_slot(&result.j1).unwrap().len(), 8);
        for empty in [&result.i3, &result.i4, &result.i5, &result.j2, &result.j3] {
            assert!(empty.is_empty());
        }
        let itime: u32 = result.itime.parse().unwrap();
        assert!((120..=180).contains(&itime));
    }
}
