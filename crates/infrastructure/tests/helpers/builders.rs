#![allow(dead_code)]
use geodns_application::ports::{GeoResolver, RRsetPolicy};
use geodns_application::use_cases::HandleDnsQueryUseCase;
use geodns_infrastructure::dns::DnsServerHandler;
use hickory_proto::op::Message;
use std::net::IpAddr;
use std::sync::Arc;

pub const UDP_MAX_PAYLOAD: u16 = 1232;

/// Raw query writer; lets tests produce messages a well-behaved client
/// library would refuse to build.
pub struct QueryBuilder {
    id: u16,
    flags: u16,
    qdcount: Option<u16>,
    name: String,
    qtype: u16,
    qclass: u16,
    edns_payload: Option<u16>,
    options: Vec<(u16, Vec<u8>)>,
}

impl QueryBuilder {
    pub fn new(name: &str, qtype: u16) -> Self {
        Self {
            id: 0x1234,
            flags: 0x0100,
            qdcount: None,
            name: name.to_string(),
            qtype,
            qclass: 1,
            edns_payload: None,
            options: Vec::new(),
        }
    }

    pub fn a(name: &str) -> Self {
        Self::new(name, 1)
    }

    pub fn aaaa(name: &str) -> Self {
        Self::new(name, 28)
    }

    pub fn id(mut self, id: u16) -> Self {
        self.id = id;
        self
    }

    pub fn class(mut self, qclass: u16) -> Self {
        self.qclass = qclass;
        self
    }

    pub fn opcode(mut self, opcode: u8) -> Self {
        self.flags = (self.flags & !0x7800) | ((opcode as u16 & 0x0F) << 11);
        self
    }

    pub fn no_recursion(mut self) -> Self {
        self.flags &= !0x0100;
        self
    }

    pub fn response_bit(mut self) -> Self {
        self.flags |= 0x8000;
        self
    }

    pub fn question_count(mut self, qdcount: u16) -> Self {
        self.qdcount = Some(qdcount);
        self
    }

    pub fn edns(mut self, payload: u16) -> Self {
        self.edns_payload = Some(payload);
        self
    }

    pub fn option(mut self, code: u16, data: Vec<u8>) -> Self {
        if self.edns_payload.is_none() {
            self.edns_payload = Some(4096);
        }
        self.options.push((code, data));
        self
    }

    pub fn client_subnet(self, ip: IpAddr, prefix: u8) -> Self {
        self.option(8, ecs_option(ip, prefix))
    }

    pub fn build(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&self.id.to_be_bytes());
        buf.extend_from_slice(&self.flags.to_be_bytes());
        buf.extend_from_slice(&self.qdcount.unwrap_or(1).to_be_bytes());
        buf.extend_from_slice(&[0, 0, 0, 0]);
        let arcount: u16 = if self.edns_payload.is_some() { 1 } else { 0 };
        buf.extend_from_slice(&arcount.to_be_bytes());

        for label in self.name.trim_end_matches('.').split('.') {
            if label.is_empty() {
                continue;
            }
            buf.push(label.len() as u8);
            buf.extend_from_slice(label.as_bytes());
        }
        buf.push(0);
        buf.extend_from_slice(&self.qtype.to_be_bytes());
        buf.extend_from_slice(&self.qclass.to_be_bytes());

        if let Some(payload) = self.edns_payload {
            let rdata: Vec<u8> = self
                .options
                .iter()
                .flat_map(|(code, data)| {
                    let mut opt = code.to_be_bytes().to_vec();
                    opt.extend_from_slice(&(data.len() as u16).to_be_bytes());
                    opt.extend_from_slice(data);
                    opt
                })
                .collect();

            buf.push(0);
            buf.extend_from_slice(&41u16.to_be_bytes());
            buf.extend_from_slice(&payload.to_be_bytes());
            buf.extend_from_slice(&[0, 0, 0, 0]);
            buf.extend_from_slice(&(rdata.len() as u16).to_be_bytes());
            buf.extend_from_slice(&rdata);
        }

        buf
    }
}

/// Client-subnet option payload with the address cut to its prefix.
pub fn ecs_option(ip: IpAddr, prefix: u8) -> Vec<u8> {
    let (family, octets): (u16, Vec<u8>) = match ip {
        IpAddr::V4(v4) => (1, v4.octets().to_vec()),
        IpAddr::V6(v6) => (2, v6.octets().to_vec()),
    };
    let len = (prefix as usize).div_ceil(8);
    let mut data = family.to_be_bytes().to_vec();
    data.push(prefix);
    data.push(0);
    data.extend_from_slice(&octets[..len]);
    data
}

pub fn decode(reply: &[u8]) -> Message {
    Message::from_vec(reply).expect("reply should decode")
}

pub fn handler(geo: Arc<dyn GeoResolver>, policy: Arc<dyn RRsetPolicy>) -> DnsServerHandler {
    let use_case = Arc::new(HandleDnsQueryUseCase::new(geo, policy));
    DnsServerHandler::new(use_case, UDP_MAX_PAYLOAD)
}

pub fn rcode(reply: &[u8]) -> u8 {
    reply[3] & 0x0F
}

pub fn reply_id(reply: &[u8]) -> u16 {
    u16::from_be_bytes([reply[0], reply[1]])
}

pub fn is_truncated(reply: &[u8]) -> bool {
    reply[2] & 0x02 != 0
}

pub fn arcount(reply: &[u8]) -> u16 {
    u16::from_be_bytes([reply[10], reply[11]])
}
