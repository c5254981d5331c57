mod helpers;

use geodns_domain::{DomainError, GeoInfo, RRset, Transport};
use geodns_infrastructure::geo::StaticGeoResolver;
use geodns_infrastructure::policy::{PolicyTable, StaticRRsetPolicy, TableRRsetPolicy};
use geodns_domain::config::PolicyRecordEntry;
use helpers::builders::{decode, handler, is_truncated, rcode, reply_id, QueryBuilder};
use helpers::{CountingPolicy, RecordingGeoResolver};
use hickory_proto::rr::RData;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

const PEER: &str = "10.0.0.1:40000";

fn peer() -> SocketAddr {
    PEER.parse().unwrap()
}

fn shanghai() -> GeoInfo {
    GeoInfo::new("dx", "CN", "Shanghai", "Shanghai")
}

fn default_static_handler() -> geodns_infrastructure::dns::DnsServerHandler {
    handler(
        Arc::new(StaticGeoResolver::new(shanghai())),
        Arc::new(StaticRRsetPolicy::new(
            RRset::new(["1.1.1.1", "1.1.2.2"], 3600),
            RRset::new(["2001:db8::68"], 300),
        )),
    )
}

fn addresses(reply: &[u8]) -> Vec<IpAddr> {
    decode(reply)
        .answers
        .iter()
        .filter_map(|r| match &r.data {
            RData::A(a) => Some(IpAddr::V4(a.0)),
            RData::AAAA(aaaa) => Some(IpAddr::V6(aaaa.0)),
            _ => None,
        })
        .collect()
}

// ── end to end through the handler ────────────────────────────────────────

#[tokio::test]
async fn test_a_query_answered_in_order() {
    let handler = default_static_handler();
    let query = QueryBuilder::a("example.test.").id(99).build();

    let reply = handler.handle_raw(&query, peer(), Transport::Udp).await.unwrap();

    assert_eq!(reply_id(&reply), 99);
    assert_eq!(rcode(&reply), 0);
    assert_eq!(
        addresses(&reply),
        vec![
            "1.1.1.1".parse::<IpAddr>().unwrap(),
            "1.1.2.2".parse::<IpAddr>().unwrap()
        ]
    );
    assert!(decode(&reply).answers.iter().all(|r| r.ttl == 3600));
}

#[tokio::test]
async fn test_aaaa_query_answered() {
    let handler = default_static_handler();
    let query = QueryBuilder::aaaa("example.test.").build();

    let reply = handler.handle_raw(&query, peer(), Transport::Tcp).await.unwrap();

    assert_eq!(rcode(&reply), 0);
    assert_eq!(addresses(&reply), vec!["2001:db8::68".parse::<IpAddr>().unwrap()]);
    assert_eq!(decode(&reply).answers[0].ttl, 300);
}

// ── rejections ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_non_internet_class_not_implemented() {
    let handler = default_static_handler();

    for qtype in [1u16, 28] {
        for qclass in [3u16, 4, 255] {
            let query = QueryBuilder::new("example.test.", qtype).class(qclass).build();
            let reply = handler.handle_raw(&query, peer(), Transport::Udp).await.unwrap();
            assert_eq!(rcode(&reply), 4, "type {} class {}", qtype, qclass);
            assert!(decode(&reply).answers.is_empty());
        }
    }
}

#[tokio::test]
async fn test_non_address_type_not_implemented() {
    let handler = default_static_handler();
    for qtype in [15u16, 16, 5, 255] {
        let query = QueryBuilder::new("example.test.", qtype).build();
        let reply = handler.handle_raw(&query, peer(), Transport::Udp).await.unwrap();
        assert_eq!(rcode(&reply), 4, "type {}", qtype);
    }
}

#[tokio::test]
async fn test_non_query_opcode_not_implemented() {
    let handler = default_static_handler();
    let query = QueryBuilder::a("example.test.").opcode(2).build();
    let reply = handler.handle_raw(&query, peer(), Transport::Udp).await.unwrap();
    assert_eq!(rcode(&reply), 4);
    assert_eq!((reply[2] >> 3) & 0x0F, 2);
}

#[tokio::test]
async fn test_multiple_questions_not_implemented() {
    let handler = default_static_handler();
    let query = QueryBuilder::a("example.test.").question_count(2).build();
    let reply = handler.handle_raw(&query, peer(), Transport::Udp).await.unwrap();
    assert_eq!(rcode(&reply), 4);
}

#[tokio::test]
async fn test_undecodable_question_format_error() {
    let handler = default_static_handler();
    let mut query = QueryBuilder::a("example.test.").id(5).build();
    query.truncate(20);

    let reply = handler.handle_raw(&query, peer(), Transport::Udp).await.unwrap();
    assert_eq!(reply_id(&reply), 5);
    assert_eq!(rcode(&reply), 1);
}

#[tokio::test]
async fn test_responses_and_runts_dropped() {
    let handler = default_static_handler();
    let response = QueryBuilder::a("example.test.").response_bit().build();

    assert!(handler.handle_raw(&response, peer(), Transport::Udp).await.is_none());
    assert!(handler.handle_raw(&[0u8; 5], peer(), Transport::Udp).await.is_none());
}

// ── client location ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_subnet_hint_drives_geo_lookup() {
    let geo = Arc::new(RecordingGeoResolver::shanghai_dx());
    let handler = handler(
        geo.clone(),
        Arc::new(CountingPolicy::answering(RRset::new(["1.1.1.1"], 60))),
    );
    let query = QueryBuilder::a("example.test.")
        .client_subnet("203.0.113.5".parse().unwrap(), 32)
        .build();

    handler.handle_raw(&query, peer(), Transport::Udp).await.unwrap();

    assert_eq!(geo.seen(), vec!["203.0.113.5".parse::<IpAddr>().unwrap()]);
}

#[tokio::test]
async fn test_malformed_hint_falls_back_to_peer() {
    let geo = Arc::new(RecordingGeoResolver::shanghai_dx());
    let handler = handler(
        geo.clone(),
        Arc::new(CountingPolicy::answering(RRset::new(["1.1.1.1"], 60))),
    );
    let query = QueryBuilder::a("example.test.")
        .option(8, vec![0, 1, 24, 0, 203, 0, 113, 5])
        .build();

    let reply = handler.handle_raw(&query, peer(), Transport::Udp).await.unwrap();

    assert_eq!(rcode(&reply), 0);
    assert_eq!(geo.seen(), vec!["10.0.0.1".parse::<IpAddr>().unwrap()]);
}

#[tokio::test]
async fn test_mapped_v4_peer_canonicalised() {
    let geo = Arc::new(RecordingGeoResolver::shanghai_dx());
    let handler = handler(
        geo.clone(),
        Arc::new(CountingPolicy::answering(RRset::new(["1.1.1.1"], 60))),
    );
    let mapped: SocketAddr = "[::ffff:198.51.100.7]:5353".parse().unwrap();

    handler
        .handle_raw(&QueryBuilder::a("example.test.").build(), mapped, Transport::Udp)
        .await
        .unwrap();

    assert_eq!(geo.seen(), vec!["198.51.100.7".parse::<IpAddr>().unwrap()]);
}

// ── policy outcomes ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_no_data_is_name_error() {
    let table = PolicyTable::from_records(&[PolicyRecordEntry {
        name: "example.test.".to_string(),
        record_type: "A".to_string(),
        ttl: 60,
        addresses: vec!["192.0.2.1".to_string()],
        network: None,
        country_code: None,
        region: None,
        city: None,
    }])
    .unwrap();
    let handler = handler(
        Arc::new(StaticGeoResolver::new(shanghai())),
        Arc::new(TableRRsetPolicy::new(table)),
    );

    let reply = handler
        .handle_raw(&QueryBuilder::a("nosuch.example.").build(), peer(), Transport::Udp)
        .await
        .unwrap();

    assert_eq!(rcode(&reply), 3);
    assert!(decode(&reply).answers.is_empty());
}

#[tokio::test]
async fn test_backend_failure_is_server_failure() {
    let handler = handler(
        Arc::new(StaticGeoResolver::new(shanghai())),
        Arc::new(CountingPolicy::failing(DomainError::PolicyBackend(
            "store unreachable at 10.9.9.9".into(),
        ))),
    );

    let reply = handler
        .handle_raw(&QueryBuilder::a("example.test.").build(), peer(), Transport::Udp)
        .await
        .unwrap();

    assert_eq!(rcode(&reply), 2);
    // error detail stays off the wire
    assert!(!reply.windows(8).any(|w| w == b"10.9.9.9"));
}

#[tokio::test]
async fn test_invalid_literals_dropped() {
    let handler = handler(
        Arc::new(StaticGeoResolver::new(shanghai())),
        Arc::new(CountingPolicy::answering(RRset::new(
            ["1.1.1.1", "not-an-ip", "1.1.2.2"],
            3600,
        ))),
    );

    let reply = handler
        .handle_raw(&QueryBuilder::a("example.test.").build(), peer(), Transport::Udp)
        .await
        .unwrap();

    assert_eq!(rcode(&reply), 0);
    assert_eq!(addresses(&reply).len(), 2);
}

#[tokio::test]
async fn test_all_invalid_literals_success_with_no_answers() {
    let handler = handler(
        Arc::new(StaticGeoResolver::new(shanghai())),
        Arc::new(CountingPolicy::answering(RRset::new(["bogus", "::1"], 3600))),
    );

    let reply = handler
        .handle_raw(&QueryBuilder::a("example.test.").build(), peer(), Transport::Udp)
        .await
        .unwrap();

    assert_eq!(rcode(&reply), 0);
    assert!(decode(&reply).answers.is_empty());
}

#[tokio::test]
async fn test_repeated_query_identical_reply() {
    let handler = default_static_handler();
    let query = QueryBuilder::a("example.test.").build();

    let first = handler.handle_raw(&query, peer(), Transport::Udp).await.unwrap();
    let second = handler.handle_raw(&query, peer(), Transport::Udp).await.unwrap();

    assert_eq!(first, second);
}

// ── transport differences ─────────────────────────────────────────────────

#[tokio::test]
async fn test_udp_truncates_but_tcp_does_not() {
    let addrs: Vec<String> = (1..=40).map(|i| format!("2001:db8::{:x}", i)).collect();
    let handler = handler(
        Arc::new(StaticGeoResolver::new(shanghai())),
        Arc::new(CountingPolicy::answering(RRset::new(addrs, 60))),
    );
    let query = QueryBuilder::aaaa("example.test.").build();

    let udp = handler.handle_raw(&query, peer(), Transport::Udp).await.unwrap();
    assert!(is_truncated(&udp));
    assert!(decode(&udp).answers.is_empty());

    let tcp = handler.handle_raw(&query, peer(), Transport::Tcp).await.unwrap();
    assert!(!is_truncated(&tcp));
    assert_eq!(decode(&tcp).answers.len(), 40);
}
