use super::query_parser::{ParsedQuery, ReplyHeader, HEADER_LEN};
use geodns_domain::{AnswerRecord, DnsOutcome};
use std::net::IpAddr;

/// Reply size every DNS client accepts over UDP.
pub const MIN_UDP_PAYLOAD: usize = 512;

const FLAG_QR: u8 = 0x80;
const FLAG_TC: u8 = 0x02;
const FLAG_RD: u8 = 0x01;
const TYPE_OPT: u16 = 41;
const OPT_RECORD_LEN: usize = 11;
/// Compression pointer to the question name, right after the header.
const QUESTION_NAME_POINTER: [u8; 2] = [0xC0, 0x0C];

/// Largest UDP reply the client can receive: 512 without EDNS, otherwise
/// the client's advertised size capped by our own limit.
pub fn udp_reply_limit(query: &ParsedQuery, udp_max_payload: u16) -> usize {
    match query.edns {
        Some(edns) => (edns.udp_payload.min(udp_max_payload) as usize).max(MIN_UDP_PAYLOAD),
        None => MIN_UDP_PAYLOAD,
    }
}

/// Builds the wire reply for a parsed query.
///
/// The question bytes are copied from `query_buf` so the name is echoed with
/// the client's spelling. Answers reference the question name by pointer.
/// When the query carried an OPT record an OPT record advertising
/// `udp_max_payload` is appended. If `size_limit` is set and the reply would
/// exceed it, the answers are dropped and TC is set instead.
pub fn build_response(
    query: &ParsedQuery,
    query_buf: &[u8],
    outcome: DnsOutcome,
    answers: &[AnswerRecord],
    udp_max_payload: u16,
    size_limit: Option<usize>,
) -> Vec<u8> {
    let question = query
        .question
        .as_ref()
        .filter(|_| query.question_count == 1)
        .and_then(|q| query_buf.get(HEADER_LEN..q.question_end));

    // answers need the question name for their pointer
    let answers = if question.is_some() { answers } else { &answers[..0] };

    let full_len = HEADER_LEN
        + question.map_or(0, <[u8]>::len)
        + answers.iter().map(answer_len).sum::<usize>()
        + if query.has_edns() { OPT_RECORD_LEN } else { 0 };

    let truncated = size_limit.is_some_and(|limit| full_len > limit);
    let answers = if truncated { &answers[..0] } else { answers };

    let mut buf = Vec::with_capacity(full_len);
    write_header(
        &mut buf,
        &query.header,
        outcome,
        truncated,
        question.is_some(),
        answers.len() as u16,
        query.has_edns(),
    );

    if let Some(question) = question {
        buf.extend_from_slice(question);
    }

    for answer in answers {
        write_answer(&mut buf, answer);
    }

    if query.has_edns() {
        write_opt(&mut buf, udp_max_payload);
    }

    buf
}

/// Header-only FORMERR reply for a query whose question could not be read.
pub fn build_format_error(header: &ReplyHeader) -> Vec<u8> {
    let mut buf = Vec::with_capacity(HEADER_LEN);
    write_header(&mut buf, header, DnsOutcome::FormatError, false, false, 0, false);
    buf
}

fn answer_len(answer: &AnswerRecord) -> usize {
    // pointer + type + class + ttl + rdlength + rdata
    2 + 2 + 2 + 4 + 2
        + match answer.address {
            IpAddr::V4(_) => 4,
            IpAddr::V6(_) => 16,
        }
}

fn write_header(
    buf: &mut Vec<u8>,
    header: &ReplyHeader,
    outcome: DnsOutcome,
    truncated: bool,
    has_question: bool,
    ancount: u16,
    has_edns: bool,
) {
    let mut flags_hi = FLAG_QR | ((header.opcode & 0x0F) << 3);
    if truncated {
        flags_hi |= FLAG_TC;
    }
    if header.recursion_desired {
        flags_hi |= FLAG_RD;
    }

    buf.extend_from_slice(&header.id.to_be_bytes());
    buf.push(flags_hi);
    buf.push((outcome.rcode() & 0x0F) as u8);
    buf.extend_from_slice(&u16::from(has_question).to_be_bytes());
    buf.extend_from_slice(&ancount.to_be_bytes());
    buf.extend_from_slice(&0u16.to_be_bytes());
    buf.extend_from_slice(&u16::from(has_edns).to_be_bytes());
}

fn write_answer(buf: &mut Vec<u8>, answer: &AnswerRecord) {
    buf.extend_from_slice(&QUESTION_NAME_POINTER);
    buf.extend_from_slice(&answer.header.record_type.to_u16().to_be_bytes());
    buf.extend_from_slice(&answer.header.class.to_u16().to_be_bytes());
    buf.extend_from_slice(&answer.ttl().to_be_bytes());

    match answer.address {
        IpAddr::V4(ip) => {
            buf.extend_from_slice(&4u16.to_be_bytes());
            buf.extend_from_slice(&ip.octets());
        }
        IpAddr::V6(ip) => {
            buf.extend_from_slice(&16u16.to_be_bytes());
            buf.extend_from_slice(&ip.octets());
        }
    }
}

fn write_opt(buf: &mut Vec<u8>, udp_max_payload: u16) {
    buf.push(0x00);
    buf.extend_from_slice(&TYPE_OPT.to_be_bytes());
    buf.extend_from_slice(&udp_max_payload.to_be_bytes());
    // extended rcode, version 0, no flags, no options
    buf.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);
    buf.extend_from_slice(&0u16.to_be_bytes());
}
