pub mod answer;
pub mod record_type;

pub use answer::{AnswerRecord, RecordHeader};
pub use record_type::RecordType;
