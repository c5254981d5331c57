use super::query_parser::{parse_query, ParseError, ParsedQuery};
use super::wire_response::{build_format_error, build_response, udp_reply_limit};
use geodns_application::use_cases::HandleDnsQueryUseCase;
use geodns_domain::{
    AnswerRecord, ClientLocation, DnsOutcome, DnsQuery, DnsRequest, DomainError, QueryClass,
    RecordType, Transport,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, info, warn};

const OPCODE_QUERY: u8 = 0;

/// Turns one raw inbound message into the raw reply, for either transport.
#[derive(Clone)]
pub struct DnsServerHandler {
    use_case: Arc<HandleDnsQueryUseCase>,
    udp_max_payload: u16,
}

impl DnsServerHandler {
    pub fn new(use_case: Arc<HandleDnsQueryUseCase>, udp_max_payload: u16) -> Self {
        Self {
            use_case,
            udp_max_payload,
        }
    }

    /// Returns `None` when the message must be dropped without a reply.
    pub async fn handle_raw(
        &self,
        buf: &[u8],
        peer: SocketAddr,
        transport: Transport,
    ) -> Option<Vec<u8>> {
        let query = match parse_query(buf) {
            Ok(query) => query,
            Err(ParseError::Ignored) => {
                debug!(client = %peer, transport = %transport, "Dropping non-query message");
                return None;
            }
            Err(ParseError::Malformed(header)) => {
                debug!(client = %peer, transport = %transport, id = header.id, "Undecodable question");
                return Some(build_format_error(&header));
            }
        };

        let location = ClientLocation::from_peer(transport, peer, query.subnet_hint());
        let (outcome, answers) = self.resolve(&query, &location).await;

        let size_limit = match transport {
            Transport::Udp => Some(udp_reply_limit(&query, self.udp_max_payload)),
            Transport::Tcp => None,
        };

        Some(build_response(
            &query,
            buf,
            outcome,
            &answers,
            self.udp_max_payload,
            size_limit,
        ))
    }

    async fn resolve(
        &self,
        query: &ParsedQuery,
        location: &ClientLocation,
    ) -> (DnsOutcome, Vec<AnswerRecord>) {
        let question = match &query.question {
            Some(question) if query.question_count == 1 => question,
            _ => {
                debug!(
                    client = %location.direct_address,
                    questions = query.question_count,
                    "Rejecting query without exactly one question"
                );
                return (DnsOutcome::NotImplemented, vec![]);
            }
        };

        let dns_query = DnsQuery::new(
            question.name_text(),
            RecordType::from_u16(question.qtype),
            QueryClass::from_u16(question.qclass),
        );

        info!(
            transport = %location.transport,
            client = %location.direct_address,
            edge_client = ?location.hinted_address(),
            domain = %dns_query.name,
            record_type = %dns_query.record_type,
            class = %dns_query.class,
            "DNS query received"
        );

        if query.header.opcode != OPCODE_QUERY {
            debug!(opcode = query.header.opcode, "Unsupported opcode");
            return (DnsOutcome::NotImplemented, vec![]);
        }

        let request = DnsRequest::new(dns_query, *location);

        match self.use_case.execute(&request).await {
            Ok(answer) => (DnsOutcome::Success, answer.answers),
            Err(e) => {
                log_failure(&request, &e);
                (e.outcome(), vec![])
            }
        }
    }
}

fn log_failure(request: &DnsRequest, error: &DomainError) {
    let query = &request.query;
    let client = request.location.effective_address();

    match error.outcome() {
        DnsOutcome::ServerFailure => warn!(
            domain = %query.name,
            record_type = %query.record_type,
            client = %client,
            error = %error,
            "Query resolution failed"
        ),
        outcome => debug!(
            domain = %query.name,
            record_type = %query.record_type,
            client = %client,
            outcome = %outcome,
            "Query rejected"
        ),
    }
}
