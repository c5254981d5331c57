pub mod cached_policy;
pub mod key;
pub mod storage;

pub use cached_policy::CachedRRsetPolicy;
pub use key::CacheKey;
pub use storage::ResponseCache;
