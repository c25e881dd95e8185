use async_trait::async_trait;
use thiserror::Error;

/// Callback data carried by the menu buttons
pub const CALLBACK_NEW_ANALYSIS: &str = "new_analysis";
pub const CALLBACK_SAVE_ANALYSIS: &str = "save_analysis";
pub const CALLBACK_LIST_HISTORY: &str = "list_history";

/// Chat delivery failures; logged, never retried by the bot
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Message delivery failed: {0}")]
    Delivery(String),
}

/// A message previously sent by the bot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageRef {
    pub chat_id: i64,
    pub message_id: i32,
}

/// Buttons attached to an outgoing message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Menu {
    /// New analysis / save analysis / my analyses
    Main,
}

/// What the user did, independent of the chat platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// A slash command, name without the slash
    Command {
        user_id: i64,
        chat_id: i64,
        command: String,
    },
    /// Plain text, including reply-keyboard button labels
    Text {
        user_id: i64,
        chat_id: i64,
        text: String,
    },
    /// An inline button press
    Callback {
        user_id: i64,
        chat_id: i64,
        callback_id: String,
        data: String,
    },
}

impl InboundEvent {
    pub fn user_id(&self) -> i64 {
        match self {
            InboundEvent::Command { user_id, .. }
            | InboundEvent::Text { user_id, .. }
            | InboundEvent::Callback { user_id, .. } => *user_id,
        }
    }

    pub fn chat_id(&self) -> i64 {
        match self {
            InboundEvent::Command { chat_id, .. }
            | InboundEvent::Text { chat_id, .. }
            | InboundEvent::Callback { chat_id, .. } => *chat_id,
        }
    }
}

/// Outbound chat operations the bot needs
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        menu: Option<Menu>,
    ) -> Result<MessageRef, TransportError>;

    async fn edit_message(
        &self,
        message: MessageRef,
        text: &str,
        menu: Option<Menu>,
    ) -> Result<(), TransportError>;

    async fn delete_message(&self, message: MessageRef) -> Result<(), TransportError>;

    /// Dismiss the loading indicator of a pressed button
    async fn answer_callback(&self, callback_id: &str) -> Result<(), TransportError>;
}
