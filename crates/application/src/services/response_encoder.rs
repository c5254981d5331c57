use geodns_domain::{AnswerRecord, DomainError, RRset, RecordHeader, RecordType};
use std::net::IpAddr;
use tracing::debug;

/// Turns an RRset into answer records sharing one header.
pub struct ResponseEncoder;

impl ResponseEncoder {
    /// Encodes every literal of `rrset` that parses as an address of the
    /// family `record_type` carries, in input order.
    ///
    /// Unparsable or wrong-family literals are skipped, so an RRset with no
    /// usable entry encodes to an empty answer list. Only a non-address
    /// `record_type`, or a header of a different type, is an error.
    pub fn encode(
        record_type: RecordType,
        header: &RecordHeader,
        rrset: &RRset,
    ) -> Result<Vec<AnswerRecord>, DomainError> {
        if !record_type.is_address() {
            return Err(DomainError::UnsupportedQuery(format!(
                "cannot encode {} records",
                record_type
            )));
        }
        if header.record_type != record_type {
            return Err(DomainError::UnsupportedQuery(format!(
                "header type {} does not match {}",
                header.record_type, record_type
            )));
        }

        let answers = rrset
            .addresses
            .iter()
            .filter_map(|literal| match parse_literal(literal, record_type) {
                Ok(address) => Some(AnswerRecord::new(header.clone(), address)),
                Err(e) => {
                    debug!(name = %header.name, error = %e, "Dropping RRset entry");
                    None
                }
            })
            .collect();

        Ok(answers)
    }
}

fn parse_literal(literal: &str, record_type: RecordType) -> Result<IpAddr, DomainError> {
    let address: IpAddr = literal
        .trim()
        .parse()
        .map_err(|_| DomainError::InvalidIpAddress(literal.to_string()))?;

    if !record_type.matches_family(&address) {
        return Err(DomainError::InvalidIpAddress(format!(
            "{} is not a {} address",
            literal, record_type
        )));
    }

    Ok(address)
}
