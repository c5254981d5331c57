pub mod response_encoder;

pub use response_encoder::ResponseEncoder;
