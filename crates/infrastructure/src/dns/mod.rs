pub mod cache;
pub mod client_subnet;
pub mod listener;
pub mod query_parser;
pub mod server;
pub mod wire_response;

pub use cache::{CacheKey, CachedRRsetPolicy, ResponseCache};
pub use listener::DnsListener;
pub use server::DnsServerHandler;
