//! SDP offer/answer bodies for the SIP mimic.

use mimic_core::SecureRng;
use rand::Rng;
use std::net::Ipv4Addr;

/// Static RTP payload types and their rtpmap encodings.
const CODECS: [(u8, &str); 9] = [
    (0, "PCMU/8000"),
    (8, "PCMA/8000"),
    (18, "G729/8000"),
    (4, "G723/8000"),
    (9, "G722/8000"),
    (3, "GSM/8000"),
    (101, "telephone-event/8000"),
    (96, "opus/48000/2"),
    (97, "iLBC/8000"),
];

const SESSION_NAMES: [&str; 7] = [
    "SIP Call",
    "VoIP Session",
    "Phone Call",
    "Audio Session",
    "-",
    "SIP Media",
    "Call",
];

const PTIMES: [u32; 4] = [10, 20, 30, 40];

/// One side of the media negotiation.
pub struct MediaEndpoint<'a> {
    /// Username in the `o=` line
    pub user: &'a str,
    /// Origin host when the address is not used
    pub domain: &'a str,
    /// Connection address for `o=` and `c=`
    pub ip: Ipv4Addr,
    /// Audio port in the `m=` line; RTCP uses the next one
    pub rtp_port: u16,
    /// Session id in the `o=` line, shared by offer and answer
    pub session_id: u64,
}

/// Render an SDP body for `endpoint` with a random codec selection.
pub fn body(endpoint: &MediaEndpoint<'_>, rng: &mut SecureRng<'_>) -> String {
    let mut codecs = CODECS;
    rng.shuffle(&mut codecs);
    let codecs = &codecs[..rng.gen_range(2..=5)];

    let session_version: u64 = rng.gen_range(1..9_999_999_999);
    let origin_host = if rng.coin() {
        endpoint.ip.to_string()
    } else {
        endpoint.domain.to_string()
    };
    let session_name = rng.pick(&SESSION_NAMES);
    let payload_types = codecs
        .iter()
        .map(|(pt, _)| pt.to_string())
        .collect::<Vec<_>>()
        .join(" ");

    let mut lines = vec![
        String::from("v=0"),
        format!(
            "o={} {} {session_version} IN IP4 {origin_host}",
            endpoint.user, endpoint.session_id
        ),
        format!("s={session_name}"),
        format!("c=IN IP4 {}", endpoint.ip),
        String::from("t=0 0"),
        format!("m=audio {} RTP/AVP {payload_types}", endpoint.rtp_port),
    ];
    lines.extend(
        codecs
            .iter()
            .map(|(pt, encoding)| format!("a=rtpmap:{pt} {encoding}")),
    );
    if rng.coin() {
        lines.push(String::from("a=fmtp:101 0-16"));
    }
    lines.push(String::from("a=sendrecv"));
    if rng.coin() {
        lines.push(format!("a=ptime:{}", rng.pick(&PTIMES)));
    }
    if rng.one_in(3) {
        lines.push(String::from("a=maxptime:150"));
    }
    if rng.one_in(4) {
        lines.push(format!("a=rtcp:{}", u32::from(endpoint.rtp_port) + 1));
    }

    let mut sdp = lines.join("\r\n");
    sdp.push_str("\r\n");
    sdp
}
