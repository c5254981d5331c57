#![allow(dead_code)]

mod mock_backends;

pub use mock_backends::{MockGeoResolver, MockRRsetPolicy};
