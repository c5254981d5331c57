pub mod cache;
pub mod errors;
pub mod geo;
pub mod logging;
pub mod policy;
pub mod root;
pub mod server;

pub use cache::CacheConfig;
pub use errors::ConfigError;
pub use geo::{GeoConfig, GeoEntry, GeoNetworkEntry};
pub use logging::LoggingConfig;
pub use policy::{PolicyConfig, PolicyRecordEntry, StaticRRsetEntry};
pub use root::{BackendKind, CliOverrides, Config};
pub use server::ServerConfig;
