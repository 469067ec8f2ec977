// ── Async notification pipeline ──

mod message;
mod pipeline;

pub use message::{
    Message, MessageContent, MessageId, MessageKind, MessageScope, MessageTag,
    SERVER_NOT_REACHABLE_TEXT,
};
pub use pipeline::{react, spawn};
