pub mod chat_config;
pub mod chat_record;

pub use chat_config::{ChatConfig, IntervalUnit, TimeInterval, PERCENT_BOUNDS};
pub use chat_record::{AwaitingInput, ChatRecord};
