pub mod dns;
pub mod geo;
pub mod policy;
