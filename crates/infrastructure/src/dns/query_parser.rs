use super::client_subnet::find_client_subnet;
use geodns_domain::SubnetHint;
use hickory_proto::rr::Name;

pub const HEADER_LEN: usize = 12;

const TYPE_OPT: u16 = 41;
const MAX_LABEL_LEN: usize = 63;
const MAX_NAME_WIRE_LEN: usize = 255;
const MAX_POINTER_HOPS: usize = 16;

/// Header fields echoed on every reply, including FORMERR ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplyHeader {
    pub id: u16,
    pub opcode: u8,
    pub recursion_desired: bool,
}

/// The first question of a query, decoded.
#[derive(Debug, Clone)]
pub struct ParsedQuestion {
    pub name: Name,
    pub qtype: u16,
    pub qclass: u16,
    /// Byte offset in the original buffer where the question ends.
    pub question_end: usize,
}

impl ParsedQuestion {
    /// Name exactly as the client spelled it, with a trailing root label.
    pub fn name_text(&self) -> String {
        self.name.to_ascii()
    }
}

/// EDNS0 data carried by the query's OPT pseudo-record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdnsInfo {
    /// Payload size the client can receive over UDP.
    pub udp_payload: u16,
    pub client_subnet: Option<SubnetHint>,
}

#[derive(Debug, Clone)]
pub struct ParsedQuery {
    pub header: ReplyHeader,
    pub question_count: u16,
    /// `None` when the query carries no question.
    pub question: Option<ParsedQuestion>,
    pub edns: Option<EdnsInfo>,
}

impl ParsedQuery {
    pub fn subnet_hint(&self) -> Option<SubnetHint> {
        self.edns.and_then(|e| e.client_subnet)
    }

    pub fn has_edns(&self) -> bool {
        self.edns.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// Too short for a header, or a response: no reply is sent.
    Ignored,
    /// Header readable but question undecodable: answered with FORMERR.
    Malformed(ReplyHeader),
}

/// Parses a raw DNS query.
///
/// Only the header and the first question are required to be well formed.
/// The answer, authority and additional sections are walked on a best-effort
/// basis to find the OPT record; if they cannot be walked the query is
/// treated as carrying no EDNS data rather than rejected.
pub fn parse_query(buf: &[u8]) -> Result<ParsedQuery, ParseError> {
    if buf.len() < HEADER_LEN {
        return Err(ParseError::Ignored);
    }

    let id = u16::from_be_bytes([buf[0], buf[1]]);
    let flags = u16::from_be_bytes([buf[2], buf[3]]);

    if flags & 0x8000 != 0 {
        return Err(ParseError::Ignored);
    }

    let header = ReplyHeader {
        id,
        opcode: ((flags >> 11) & 0x0F) as u8,
        recursion_desired: flags & 0x0100 != 0,
    };

    let qdcount = u16::from_be_bytes([buf[4], buf[5]]);
    let ancount = u16::from_be_bytes([buf[6], buf[7]]);
    let nscount = u16::from_be_bytes([buf[8], buf[9]]);
    let arcount = u16::from_be_bytes([buf[10], buf[11]]);

    if qdcount == 0 {
        return Ok(ParsedQuery {
            header,
            question_count: 0,
            question: None,
            edns: None,
        });
    }

    let question = parse_question(buf, HEADER_LEN).ok_or(ParseError::Malformed(header))?;

    let edns = if qdcount == 1 {
        find_edns(buf, question.question_end, ancount, nscount, arcount)
    } else {
        None
    };

    Ok(ParsedQuery {
        header,
        question_count: qdcount,
        question: Some(question),
        edns,
    })
}

fn parse_question(buf: &[u8], start: usize) -> Option<ParsedQuestion> {
    let mut pos = start;
    let mut labels: Vec<&[u8]> = Vec::new();
    let mut wire_len = 1usize;

    loop {
        let label_len = *buf.get(pos)? as usize;
        if label_len == 0 {
            pos += 1;
            break;
        }
        // compression in the question can only point into the header
        if label_len > MAX_LABEL_LEN {
            return None;
        }
        pos += 1;
        let label = buf.get(pos..pos + label_len)?;
        wire_len += label_len + 1;
        if wire_len > MAX_NAME_WIRE_LEN {
            return None;
        }
        labels.push(label);
        pos += label_len;
    }

    let fixed = buf.get(pos..pos + 4)?;
    let qtype = u16::from_be_bytes([fixed[0], fixed[1]]);
    let qclass = u16::from_be_bytes([fixed[2], fixed[3]]);
    pos += 4;

    let name = Name::from_labels(labels).ok()?;

    Some(ParsedQuestion {
        name,
        qtype,
        qclass,
        question_end: pos,
    })
}

fn find_edns(
    buf: &[u8],
    question_end: usize,
    ancount: u16,
    nscount: u16,
    arcount: u16,
) -> Option<EdnsInfo> {
    let mut pos = question_end;

    for _ in 0..(ancount as usize + nscount as usize) {
        pos = skip_record(buf, pos)?;
    }

    for _ in 0..arcount {
        let name_end = skip_name(buf, pos)?;
        let fixed = buf.get(name_end..name_end + 10)?;
        let rr_type = u16::from_be_bytes([fixed[0], fixed[1]]);
        let rdlen = u16::from_be_bytes([fixed[8], fixed[9]]) as usize;
        let rdata_start = name_end + 10;
        let rdata = buf.get(rdata_start..rdata_start + rdlen)?;

        if rr_type == TYPE_OPT {
            return Some(EdnsInfo {
                udp_payload: u16::from_be_bytes([fixed[2], fixed[3]]),
                client_subnet: find_client_subnet(rdata),
            });
        }
        pos = rdata_start + rdlen;
    }

    None
}

fn skip_record(buf: &[u8], pos: usize) -> Option<usize> {
    let name_end = skip_name(buf, pos)?;
    let fixed = buf.get(name_end..name_end + 10)?;
    let rdlen = u16::from_be_bytes([fixed[8], fixed[9]]) as usize;
    let end = name_end + 10 + rdlen;
    if end > buf.len() {
        return None;
    }
    Some(end)
}

/// Returns the offset just past the name starting at `pos`. A compression
/// pointer ends the name in place, but its target is still checked.
fn skip_name(buf: &[u8], mut pos: usize) -> Option<usize> {
    let mut end = None;
    let mut hops = 0;

    loop {
        let len = *buf.get(pos)? as usize;
        match len & 0xC0 {
            0x00 if len == 0 => return Some(end.unwrap_or(pos + 1)),
            0x00 => pos += 1 + len,
            0xC0 => {
                let low = *buf.get(pos + 1)? as usize;
                if end.is_none() {
                    end = Some(pos + 2);
                }
                hops += 1;
                if hops > MAX_POINTER_HOPS {
                    return None;
                }
                pos = ((len & 0x3F) << 8) | low;
            }
            _ => return None,
        }
    }
}
