pub mod reserved;
pub mod static_resolver;
pub mod table_resolver;

pub use static_resolver::StaticGeoResolver;
pub use table_resolver::{GeoTable, TableGeoResolver};
