pub mod static_policy;
pub mod table_policy;

pub use static_policy::StaticRRsetPolicy;
pub use table_policy::{GeoSelector, PolicyTable, TableRRsetPolicy};
