//! DNS exchange mimic.
//!
//! Produces a small, internally consistent resolver conversation for one
//! domain: an A query, an AAAA query, answers to both, and one extra query
//! (HTTPS for the apex or A for `www.`). Every message carries an EDNS0 OPT
//! record with a cookie and, at random, padding and client-subnet options.
//!
//! ```text
//! i1  query A      id=X   rd
//! i2  query AAAA   id=Y   rd
//! i3  response     id=X   qr aa? rd ra   1-3 A answers
//! i4  extra query  id=Z   HTTPS domain | A www.domain
//! i5  response     id=Y
//! ```

use std::net::{IpAddr, Ipv4Addr};

use hickory_proto::op::{Edns, Message, MessageType, OpCode, Query};
use hickory_proto::rr::rdata::opt::{ClientSubnet, EdnsOption};
use hickory_proto::rr::rdata::A;
use hickory_proto::rr::domain::Label;
use hickory_proto::rr::{Name, RData, Record, RecordType};
use mimic_core::{format_blob, MimicError, MimicResult, MimicSettings, Result, SecureRng};
use rand::Rng;
use tracing::debug;

/// Advertised UDP payload size.
const EDNS_UDP_PAYLOAD: u16 = 4096;

const OPTION_COOKIE: u16 = 0x000a;
const OPTION_PADDING: u16 = 0x000c;

const SUBNET_PREFIX: u8 = 24;

const MAX_LABEL_LEN: usize = 63;

/// Query flags as (AD, CD) on top of RD. Plain RD is listed twice to weight it.
const QUERY_FLAGS: [(bool, bool); 4] = [(false, false), (true, false), (false, false), (false, true)];

/// Response AA bit on top of QR+RD+RA. Non-authoritative weighted double.
const RESPONSE_AUTHORITATIVE: [bool; 3] = [false, true, false];

/// Build the DNS mimic for `settings.domain`.
///
/// The domain is encoded as given; surrounding whitespace only counts as
/// blank when nothing else is there.
///
/// # Errors
///
/// Returns [`MimicError::DomainRequired`] if the domain is blank, or
/// [`MimicError::Dns`] if it does not fit in a DNS name.
pub fn build(settings: &MimicSettings, rng: &mut SecureRng<'_>) -> Result<MimicResult> {
    let domain = settings.domain.as_str();
    if domain.trim().is_empty() {
        return Err(MimicError::DomainRequired);
    }
    let name = domain_name(domain)?;

    let id_a = transaction_id(rng);
    let id_aaaa = transaction_id(rng);
    let id_extra = transaction_id(rng);

    let query_a = query(&name, id_a, RecordType::A, rng)?;
    let query_aaaa = query(&name, id_aaaa, RecordType::AAAA, rng)?;
    let response_a = response(&name, id_a, rng)?;

    let extra = if rng.coin() {
        query(&name, id_extra, RecordType::HTTPS, rng)?
    } else {
        let www = domain_name(&format!("www.{domain}"))?;
        query(&www, id_extra, RecordType::A, rng)?
    };

    let response_aaaa = response(&name, id_aaaa, rng)?;

    let j1_len = rng.gen_range(8..24);
    let j2_len = rng.gen_range(4..16);
    let itime = rng.itime(settings.itime_min, settings.itime_max);

    debug!(
        domain,
        id_a,
        id_aaaa,
        id_extra,
        query_len = query_a.len(),
        response_len = response_a.len(),
        "built DNS mimic"
    );

    Ok(MimicResult {
        i1: format_blob(&query_a),
        i2: format_blob(&query_aaaa),
        i3: format_blob(&response_a),
        i4: format_blob(&extra),
        i5: format_blob(&response_aaaa),
        j1: format_blob(&rng.bytes(j1_len)),
        j2: format_blob(&rng.bytes(j2_len)),
        j3: String::new(),
        itime: itime.to_string(),
    })
}

fn transaction_id(rng: &mut SecureRng<'_>) -> u16 {
    rng.gen_range(0x0001..0xFFFF)
}

/// Fully qualified name from dot-separated labels, each cut to 63 bytes.
fn domain_name(domain: &str) -> Result<Name> {
    let labels = domain
        .split('.')
        .filter(|label| !label.is_empty())
        .map(|label| Label::from_raw_bytes(&label.as_bytes()[..label.len().min(MAX_LABEL_LEN)]))
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| MimicError::Dns(format!("invalid label in {domain:?}: {e}")))?;

    Name::from_labels(labels).map_err(|e| MimicError::Dns(format!("invalid name {domain:?}: {e}")))
}

/// A recursive query with an EDNS0 OPT record in the additional section.
fn query(name: &Name, id: u16, qtype: RecordType, rng: &mut SecureRng<'_>) -> Result<Vec<u8>> {
    let (authentic_data, checking_disabled) = *rng.pick(&QUERY_FLAGS);

    let mut message = Message::new();
    message
        .set_id(id)
        .set_message_type(MessageType::Query)
        .set_op_code(OpCode::Query)
        .set_recursion_desired(true)
        .set_authentic_data(authentic_data)
        .set_checking_disabled(checking_disabled)
        .add_query(Query::query(name.clone(), qtype));

    let mut options = vec![EdnsOption::Unknown(OPTION_COOKIE, rng.bytes(8))];
    if rng.coin() {
        let len = rng.gen_range(12..64);
        options.push(EdnsOption::Unknown(OPTION_PADDING, vec![0u8; len]));
    }
    if rng.coin() {
        options.push(client_subnet(rng));
    }
    rng.shuffle(&mut options);

    message.set_edns(edns(options));
    encode(&message)
}

/// An answer for `name` with 1-3 A records and a server cookie.
fn response(name: &Name, id: u16, rng: &mut SecureRng<'_>) -> Result<Vec<u8>> {
    let answers: u8 = rng.gen_range(1..=3);

    let mut message = Message::new();
    message
        .set_id(id)
        .set_message_type(MessageType::Response)
        .set_op_code(OpCode::Query)
        .set_authoritative(*rng.pick(&RESPONSE_AUTHORITATIVE))
        .set_recursion_desired(true)
        .set_recursion_available(true)
        .add_query(Query::query(name.clone(), RecordType::A));

    for _ in 0..answers {
        let ttl: u32 = rng.gen_range(60..7200);
        let address = Ipv4Addr::new(
            rng.gen_range(1..255),
            rng.gen_range(0..255),
            rng.gen_range(0..255),
            rng.gen_range(1..255),
        );
        message.add_answer(Record::from_rdata(name.clone(), ttl, RData::A(A::from(address))));
    }

    // Server cookie echoes an 8-byte client part followed by 8-15 server bytes.
    let server_len = rng.gen_range(8..16);
    let mut cookie = rng.bytes(8);
    cookie.extend(rng.bytes(server_len));

    let mut options = vec![EdnsOption::Unknown(OPTION_COOKIE, cookie)];
    if rng.coin() {
        let len = rng.gen_range(8..32);
        options.push(EdnsOption::Unknown(OPTION_PADDING, vec![0u8; len]));
    }

    message.set_edns(edns(options));
    encode(&message)
}

/// EDNS client-subnet option for a random IPv4 /24.
fn client_subnet(rng: &mut SecureRng<'_>) -> EdnsOption {
    let [a, b, c]: [u8; 3] = rng.gen();
    let network = IpAddr::V4(Ipv4Addr::new(a, b, c, 0));
    EdnsOption::Subnet(ClientSubnet::new(network, SUBNET_PREFIX, 0))
}

/// EDNS0 with the DO bit and a 4096-byte payload, options in the given order.
fn edns(options: Vec<EdnsOption>) -> Edns {
    let mut edns = Edns::new();
    edns.set_max_payload(EDNS_UDP_PAYLOAD);
    edns.set_dnssec_ok(true);
    for option in options {
        edns.options_mut().insert(option);
    }
    edns
}

fn encode(message: &Message) -> Result<Vec<u8>> {
    message
        .to_vec()
        .map_err(|e| MimicError::Dns(format!("failed to encode message {}: {e}", message.id())))
}
