//! SIP call dialog mimic.
//!
//! Builds a complete UDP call between a caller (`sipFromUser@sipFromDomain`)
//! and a callee (`sipToUser@sipToDomain`):
//!
//! ```text
//! i1  INVITE + SDP offer     branch A, CSeq n INVITE
//! i2  100 Trying             branch A
//! i3  180 Ringing            branch A, To-tag introduced
//! i4  200 OK + SDP answer    branch A
//! i5  ACK                    own branch, CSeq n ACK
//! j1  BYE                    branch B, CSeq n+1 BYE
//! j2  200 OK (BYE)           branch B
//! j3  OPTIONS keep-alive     own branch, own Call-ID
//! ```
//!
//! Every message carries the dialog's From-tag and a `Content-Length` equal to
//! the byte length of its body.

use std::fmt::Display;
use std::net::Ipv4Addr;

use mimic_core::{format_blob, MimicResult, MimicSettings, SecureRng};
use rand::Rng;
use tracing::debug;

use super::sdp::{self, MediaEndpoint};

const BRANCH_MAGIC: &str = "z9hG4bK";

/// Share of calls that present the carrier's default agent string.
const PRIMARY_USER_AGENT: &str = "Ooma/1.0";
const PRIMARY_USER_AGENT_WEIGHT: u32 = 78;

const USER_AGENTS: [&str; 22] = [
    "Ooma/2.0.1",
    "Ooma/3.1.0",
    "Grandstream GXP2170 1.0.11.23",
    "Grandstream GXP1625 1.0.4.128",
    "Grandstream GXV3370 1.0.1.58",
    "Grandstream HT802 1.0.29.8",
    "Yealink SIP-T46S 66.86.0.15",
    "Yealink SIP-T54W 96.86.0.80",
    "Yealink SIP-T58A 58.86.0.20",
    "Yealink W60B 77.86.0.15",
    "Cisco-SIPGateway/IOS-12.x",
    "Cisco-SIPGateway/IOS-15.x",
    "Cisco/7841-3PCC-11.3.7",
    "Cisco/8845-3PCC-12.0.1",
    "Polycom/VVX-VVX_501-UA/6.3.1.8427",
    "Polycom/SoundPoint-IP_550-UA/3.3.5.0247",
    "Polycom/VVX-VVX_411-UA/6.4.0.9774",
    "Linphone/4.5.0 (belle-sip/4.5.0)",
    "Linphone/5.1.0 (belle-sip/5.2.0)",
    "Linphone Desktop/4.4.0",
    "Zoiper rv2.10.18.4",
    "Zoiper/5.5.14",
];

const ALLOW_METHODS: [&str; 5] = [
    "INVITE, ACK, CANCEL, BYE, OPTIONS, INFO, REFER, NOTIFY",
    "INVITE, ACK, CANCEL, BYE, OPTIONS, NOTIFY, REFER, SUBSCRIBE, INFO, MESSAGE",
    "INVITE, ACK, BYE, CANCEL, OPTIONS, NOTIFY, REFER",
    "INVITE, ACK, CANCEL, OPTIONS, BYE, REFER, SUBSCRIBE, NOTIFY, INFO, MESSAGE, PRACK, UPDATE",
    "INVITE, ACK, BYE, CANCEL, OPTIONS, INFO, SUBSCRIBE, NOTIFY, REFER, MESSAGE",
];

const SUPPORTED: [&str; 6] = [
    "replaces, timer",
    "replaces, 100rel, timer",
    "replaces, norefersub, timer",
    "100rel, replaces, timer, norefersub",
    "replaces",
    "timer, replaces, path, gruu",
];

/// 5060 three times out of four, TLS port otherwise.
const SERVER_PORTS: [u16; 4] = [5060, 5060, 5060, 5061];

/// Offset of the callee's RTP port from the caller's.
const ANSWER_RTP_OFFSET: u16 = 2;

/// Build the SIP mimic. Never fails.
pub fn build(settings: &MimicSettings, rng: &mut SecureRng<'_>) -> MimicResult {
    let dialog = Dialog::new(settings, rng);

    let messages = [
        dialog.invite(rng),
        dialog.trying(),
        dialog.ringing(rng),
        dialog.ok(rng),
        dialog.ack(rng),
        dialog.bye(rng),
        dialog.bye_ok(),
        dialog.options(rng),
    ];
    let [i1, i2, i3, i4, i5, j1, j2, j3] = messages.map(|message| format_blob(&message.encode()));

    debug!(
        call_id = %dialog.call_id,
        user_agent = dialog.user_agent,
        client = %dialog.client_ip,
        server = %dialog.server_ip,
        "built SIP mimic"
    );

    MimicResult {
        i1,
        i2,
        i3,
        i4,
        i5,
        j1,
        j2,
        j3,
        itime: rng.itime(settings.itime_min, settings.itime_max).to_string(),
    }
}

/// A SIP request or response; `Content-Length` is derived from the body.
#[derive(Debug, Clone)]
pub struct SipMessage {
    start_line: String,
    headers: Vec<String>,
    body: String,
}

impl SipMessage {
    fn new(start_line: impl Into<String>) -> Self {
        Self {
            start_line: start_line.into(),
            headers: Vec::new(),
            body: String::new(),
        }
    }

    fn header(mut self, name: &str, value: impl Display) -> Self {
        self.headers.push(format!("{name}: {value}"));
        self
    }

    fn header_if(self, include: bool, name: &str, value: impl Display) -> Self {
        if include {
            self.header(name, value)
        } else {
            self
        }
    }

    fn sdp(self, body: String) -> Self {
        let mut message = self.header("Content-Type", "application/sdp");
        message.body = body;
        message
    }

    /// Serialize with CRLF line endings.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut text = String::with_capacity(512 + self.body.len());
        text.push_str(&self.start_line);
        text.push_str("\r\n");
        for header in &self.headers {
            text.push_str(header);
            text.push_str("\r\n");
        }
        text.push_str(&format!("Content-Length: {}\r\n\r\n", self.body.len()));
        text.push_str(&self.body);
        text.into_bytes()
    }
}

/// Identifiers shared by every message of one call.
struct Dialog<'s> {
    settings: &'s MimicSettings,
    call_id: String,
    invite_branch: String,
    bye_branch: String,
    from_tag: u32,
    to_tag: u32,
    cseq: u32,
    user_agent: &'static str,
    client_ip: Ipv4Addr,
    server_ip: Ipv4Addr,
    client_port: u16,
    server_port: u16,
    rtp_port: u16,
    session_id: u64,
}

impl<'s> Dialog<'s> {
    fn new(settings: &'s MimicSettings, rng: &mut SecureRng<'_>) -> Self {
        let user_agent = if rng.gen_ratio(PRIMARY_USER_AGENT_WEIGHT, 100) {
            PRIMARY_USER_AGENT
        } else {
            *rng.pick(&USER_AGENTS)
        };

        Self {
            settings,
            call_id: rng.hex(16),
            invite_branch: branch(rng),
            bye_branch: branch(rng),
            from_tag: tag(rng),
            to_tag: tag(rng),
            cseq: rng.gen_range(1..999_999),
            user_agent,
            client_ip: private_ipv4(rng),
            server_ip: private_ipv4(rng),
            client_port: rng.gen_range(10_000..65_000),
            server_port: *rng.pick(&SERVER_PORTS),
            rtp_port: rng.gen_range(8_000..30_000) / 2 * 2,
            session_id: rng.gen_range(1_000_000_000..=9_999_999_999),
        }
    }

    fn from_header(&self) -> String {
        let s = self.settings;
        format!(
            "\"{user}\" <sip:{user}@{domain}>;tag={tag}",
            user = s.sip_from_user,
            domain = s.sip_from_domain,
            tag = self.from_tag
        )
    }

    fn to_header(&self, tagged: bool) -> String {
        let s = self.settings;
        if tagged {
            format!("<sip:{}@{}>;tag={}", s.sip_to_user, s.sip_to_domain, self.to_tag)
        } else {
            format!("<sip:{}@{}>", s.sip_to_user, s.sip_to_domain)
        }
    }

    fn call_id_header(&self) -> String {
        format!("{}@{}", self.call_id, self.settings.sip_from_domain)
    }

    fn request_uri(&self) -> String {
        format!("sip:{}@{}", self.settings.sip_to_user, self.settings.sip_to_domain)
    }

    fn contact(&self) -> String {
        format!(
            "<sip:{}@{}:{}>",
            self.settings.sip_from_user, self.client_ip, self.client_port
        )
    }

    fn request_via(&self, branch: &str) -> String {
        format!(
            "SIP/2.0/UDP {}:{};branch={branch};rport",
            self.client_ip, self.client_port
        )
    }

    fn response_via(&self, branch: &str) -> String {
        format!(
            "SIP/2.0/UDP {ip}:{port};branch={branch};received={ip};rport={port}",
            ip = self.client_ip,
            port = self.client_port
        )
    }

    fn invite(&self, rng: &mut SecureRng<'_>) -> SipMessage {
        let offer = sdp::body(
            &MediaEndpoint {
                user: &self.settings.sip_from_user,
                domain: &self.settings.sip_from_domain,
                ip: self.client_ip,
                rtp_port: self.rtp_port,
                session_id: self.session_id,
            },
            rng,
        );

        SipMessage::new(format!("INVITE {} SIP/2.0", self.request_uri()))
            .header("Via", self.request_via(&self.invite_branch))
            .header("Max-Forwards", max_forwards(rng))
            .header("From", self.from_header())
            .header("To", self.to_header(false))
            .header("Call-ID", self.call_id_header())
            .header("CSeq", format!("{} INVITE", self.cseq))
            .header("Contact", self.contact())
            .header("User-Agent", self.user_agent)
            .header("Allow", rng.pick(&ALLOW_METHODS))
            .header("Supported", rng.pick(&SUPPORTED))
            .header_if(rng.one_in(3), "Session-Expires", session_expires(rng, "uac"))
            .header_if(rng.one_in(4), "Min-SE", 90)
            .sdp(offer)
    }

    fn trying(&self) -> SipMessage {
        SipMessage::new("SIP/2.0 100 Trying")
            .header("Via", self.response_via(&self.invite_branch))
            .header("From", self.from_header())
            .header("To", self.to_header(false))
            .header("Call-ID", self.call_id_header())
            .header("CSeq", format!("{} INVITE", self.cseq))
    }

    fn ringing(&self, rng: &mut SecureRng<'_>) -> SipMessage {
        SipMessage::new("SIP/2.0 180 Ringing")
            .header("Via", self.response_via(&self.invite_branch))
            .header("From", self.from_header())
            .header("To", self.to_header(true))
            .header("Call-ID", self.call_id_header())
            .header("CSeq", format!("{} INVITE", self.cseq))
            .header(
                "Contact",
                format!("<sip:{}@{}>", self.settings.sip_to_user, self.settings.sip_to_domain),
            )
            .header_if(rng.one_in(4), "Require", "100rel")
    }

    fn ok(&self, rng: &mut SecureRng<'_>) -> SipMessage {
        let answer = sdp::body(
            &MediaEndpoint {
                user: &self.settings.sip_to_user,
                domain: &self.settings.sip_to_domain,
                ip: self.server_ip,
                rtp_port: self.rtp_port + ANSWER_RTP_OFFSET,
                session_id: self.session_id,
            },
            rng,
        );

        SipMessage::new("SIP/2.0 200 OK")
            .header("Via", self.response_via(&self.invite_branch))
            .header("From", self.from_header())
            .header("To", self.to_header(true))
            .header("Call-ID", self.call_id_header())
            .header("CSeq", format!("{} INVITE", self.cseq))
            .header(
                "Contact",
                format!(
                    "<sip:{}@{}:{}>",
                    self.settings.sip_to_user, self.server_ip, self.server_port
                ),
            )
            .header("User-Agent", self.user_agent)
            .header("Allow", rng.pick(&ALLOW_METHODS))
            .header("Supported", rng.pick(&SUPPORTED))
            .header_if(rng.one_in(3), "Session-Expires", session_expires(rng, "uas"))
            .header_if(rng.one_in(5), "Server", self.user_agent)
            .sdp(answer)
    }

    fn ack(&self, rng: &mut SecureRng<'_>) -> SipMessage {
        SipMessage::new(format!("ACK {} SIP/2.0", self.request_uri()))
            .header("Via", self.request_via(&branch(rng)))
            .header("Max-Forwards", max_forwards(rng))
            .header("From", self.from_header())
            .header("To", self.to_header(true))
            .header("Call-ID", self.call_id_header())
            .header("CSeq", format!("{} ACK", self.cseq))
            .header("User-Agent", self.user_agent)
    }

    fn bye(&self, rng: &mut SecureRng<'_>) -> SipMessage {
        SipMessage::new(format!("BYE {} SIP/2.0", self.request_uri()))
            .header("Via", self.request_via(&self.bye_branch))
            .header("Max-Forwards", max_forwards(rng))
            .header("From", self.from_header())
            .header("To", self.to_header(true))
            .header("Call-ID", self.call_id_header())
            .header("CSeq", format!("{} BYE", self.cseq + 1))
            .header("User-Agent", self.user_agent)
            .header_if(
                rng.one_in(3),
                "Reason",
                "Q.850;cause=16;text=\"Normal call clearing\"",
            )
    }

    fn bye_ok(&self) -> SipMessage {
        SipMessage::new("SIP/2.0 200 OK")
            .header("Via", self.response_via(&self.bye_branch))
            .header("From", self.from_header())
            .header("To", self.to_header(true))
            .header("Call-ID", self.call_id_header())
            .header("CSeq", format!("{} BYE", self.cseq + 1))
    }

    /// Out-of-dialog keep-alive towards the callee's domain.
    fn options(&self, rng: &mut SecureRng<'_>) -> SipMessage {
        let s = self.settings;
        let call_id = rng.hex(16);
        let cseq: u32 = rng.gen_range(1..999_999);

        SipMessage::new(format!("OPTIONS sip:{} SIP/2.0", s.sip_to_domain))
            .header("Via", self.request_via(&branch(rng)))
            .header("Max-Forwards", max_forwards(rng))
            .header(
                "From",
                format!(
                    "<sip:{}@{}>;tag={}",
                    s.sip_from_user, s.sip_from_domain, self.from_tag
                ),
            )
            .header("To", format!("<sip:{}>", s.sip_to_domain))
            .header("Call-ID", format!("{call_id}@{}", s.sip_from_domain))
            .header("CSeq", format!("{cseq} OPTIONS"))
            .header("Contact", self.contact())
            .header("User-Agent", self.user_agent)
            .header("Accept", "application/sdp")
    }
}

fn branch(rng: &mut SecureRng<'_>) -> String {
    format!("{BRANCH_MAGIC}{}", rng.hex(8))
}

/// Nine-digit numeric tag.
fn tag(rng: &mut SecureRng<'_>) -> u32 {
    rng.gen_range(100_000_000..999_999_999)
}

fn max_forwards(rng: &mut SecureRng<'_>) -> u8 {
    rng.gen_range(68..=70)
}

fn session_expires(rng: &mut SecureRng<'_>, refresher: &str) -> String {
    let seconds: u32 = rng.gen_range(1800..3600);
    format!("{seconds};refresher={refresher}")
}

/// Random host address from one of the RFC 1918 blocks.
fn private_ipv4(rng: &mut SecureRng<'_>) -> Ipv4Addr {
    match rng.gen_range(0..3) {
        0 => Ipv4Addr::new(192, 168, rng.gen(), rng.gen_range(1..255)),
        1 => Ipv4Addr::new(10, rng.gen(), rng.gen(), rng.gen_range(1..255)),
        _ => Ipv4Addr::new(
            172,
            rng.gen_range(16..32),
            rng.gen(),
            rng.gen_range(1..255),
        ),
    }
}
