#![allow(dead_code)]

pub mod backends;
pub mod builders;

pub use backends::{CountingPolicy, RecordingGeoResolver, SwitchablePolicy};
pub use builders::{decode, ecs_option, handler, QueryBuilder};
