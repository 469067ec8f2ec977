// ── Application messages ──

use std::fmt;

use serde::Serialize;

/// Text of the deduplicated connectivity warning.
pub const SERVER_NOT_REACHABLE_TEXT: &str = "It seems like server is not reachable";

/// Process-unique message identifier, allocated by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct MessageId(pub(crate) u64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for MessageId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Danger,
    Success,
}

/// Marks messages that belong to a deduplicated class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageTag {
    ServerNotReachable,
}

/// Where the request that produced a message was issued from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageScope {
    #[default]
    Global,
    ClusterPage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageContent {
    pub kind: MessageKind,
    pub text: String,
}

/// One entry of the application message queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub id: MessageId,
    pub content: MessageContent,
    pub tag: Option<MessageTag>,
    pub scope: MessageScope,
    pub done: bool,
}

impl Message {
    pub fn success(id: MessageId, text: impl Into<String>, scope: MessageScope) -> Self {
        Self::new(id, MessageKind::Success, text.into(), None, scope)
    }

    pub fn danger(id: MessageId, text: impl Into<String>, scope: MessageScope) -> Self {
        Self::new(id, MessageKind::Danger, text.into(), None, scope)
    }

    /// The connectivity warning. Always global: it outlives page teardown.
    pub fn server_not_reachable(id: MessageId) -> Self {
        Self::new(
            id,
            MessageKind::Danger,
            SERVER_NOT_REACHABLE_TEXT.to_owned(),
            Some(MessageTag::ServerNotReachable),
            MessageScope::Global,
        )
    }

    fn new(
        id: MessageId,
        kind: MessageKind,
        text: String,
        tag: Option<MessageTag>,
        scope: MessageScope,
    ) -> Self {
        Self {
            id,
            content: MessageContent { kind, text },
            tag,
            scope,
            done: false,
        }
    }

    pub fn is_success(&self) -> bool {
        self.content.kind == MessageKind::Success
    }

    pub fn is_server_not_reachable(&self) -> bool {
        self.tag == Some(MessageTag::ServerNotReachable)
    }
}
