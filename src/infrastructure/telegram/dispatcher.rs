use std::future::Future;
use std::time::Duration;

use teloxide::dispatching::{ShutdownToken, UpdateHandler};
use teloxide::prelude::*;

use crate::bot::handler::RequestHandler;
use crate::bot::transport::InboundEvent;

const SHUTDOWN_ATTEMPTS: u32 = 50;
const SHUTDOWN_RETRY_DELAY: Duration = Duration::from_millis(100);

/// Command name of a `/command@bot args` message, lowercased
pub fn parse_command(text: &str) -> Option<String> {
    let rest = text.trim_start().strip_prefix('/')?;
    let word = rest.split_whitespace().next()?;
    let name = word.split('@').next().unwrap_or(word);

    if name.is_empty() {
        None
    } else {
        Some(name.to_lowercase())
    }
}

/// Convert a text message into an inbound event. Non-text messages and
/// messages without a sender are skipped.
pub fn message_event(msg: &Message) -> Option<InboundEvent> {
    let user = msg.from.as_ref()?;
    let text = msg.text()?;
    let user_id = user.id.0 as i64;
    let chat_id = msg.chat.id.0;

    Some(match parse_command(text) {
        Some(command) => InboundEvent::Command {
            user_id,
            chat_id,
            command,
        },
        None => InboundEvent::Text {
            user_id,
            chat_id,
            text: text.to_string(),
        },
    })
}

/// Convert a button press into an inbound event
pub fn callback_event(query: &CallbackQuery) -> InboundEvent {
    let user_id = query.from.id.0 as i64;
    // Private chats share the user's id.
    let chat_id = query
        .message
        .as_ref()
        .map(|message| message.chat().id.0)
        .unwrap_or(user_id);

    InboundEvent::Callback {
        user_id,
        chat_id,
        callback_id: query.id.clone(),
        data: query.data.clone().unwrap_or_default(),
    }
}

async fn on_message(msg: Message, handler: RequestHandler) -> ResponseResult<()> {
    if let Some(event) = message_event(&msg) {
        handler.handle(event).await;
    }
    Ok(())
}

async fn on_callback(query: CallbackQuery, handler: RequestHandler) -> ResponseResult<()> {
    handler.handle(callback_event(&query)).await;
    Ok(())
}

fn schema() -> UpdateHandler<teloxide::RequestError> {
    dptree::entry()
        .branch(Update::filter_message().endpoint(on_message))
        .branch(Update::filter_callback_query().endpoint(on_callback))
}

/// Poll Telegram for updates and route them to `handler` until `shutdown`
/// resolves.
pub async fn run<S>(bot: Bot, handler: RequestHandler, shutdown: S)
where
    S: Future<Output = ()> + Send + 'static,
{
    let mut dispatcher = Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![handler])
        .build();

    let token = dispatcher.shutdown_token();
    tokio::spawn(async move {
        shutdown.await;
        tracing::info!("Stopping update polling");
        stop_dispatcher(&token).await;
    });

    tracing::info!("Polling Telegram for updates");
    dispatcher.dispatch().await;
}

/// Request a dispatcher stop, retrying while it is not yet running
async fn stop_dispatcher(token: &ShutdownToken) {
    for _ in 0..SHUTDOWN_ATTEMPTS {
        match token.shutdown() {
            Ok(stopped) => {
                stopped.await;
                return;
            }
            Err(e) => {
                tracing::debug!(error = ?e, "Dispatcher idle, retrying shutdown");
                tokio::time::sleep(SHUTDOWN_RETRY_DELAY).await;
            }
        }
    }
    tracing::warn!("Dispatcher never started, giving up on shutdown");
}
