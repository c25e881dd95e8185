use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, MessageId};

use crate::bot::texts;
use crate::bot::transport::{
    ChatTransport, Menu, MessageRef, TransportError, CALLBACK_LIST_HISTORY,
    CALLBACK_NEW_ANALYSIS, CALLBACK_SAVE_ANALYSIS,
};

/// Telegram Bot API implementation of ChatTransport
#[derive(Clone)]
pub struct TelegramTransport {
    bot: Bot,
}

impl TelegramTransport {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

/// Inline keyboard for `menu`
pub fn keyboard(menu: Menu) -> InlineKeyboardMarkup {
    match menu {
        Menu::Main => InlineKeyboardMarkup::new(vec![
            vec![InlineKeyboardButton::callback(
                texts::BUTTON_NEW_ANALYSIS,
                CALLBACK_NEW_ANALYSIS,
            )],
            vec![
                InlineKeyboardButton::callback(texts::BUTTON_SAVE_ANALYSIS, CALLBACK_SAVE_ANALYSIS),
                InlineKeyboardButton::callback(texts::BUTTON_LIST_HISTORY, CALLBACK_LIST_HISTORY),
            ],
        ]),
    }
}

fn delivery_error(err: teloxide::RequestError) -> TransportError {
    TransportError::Delivery(err.to_string())
}

#[async_trait]
impl ChatTransport for TelegramTransport {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        menu: Option<Menu>,
    ) -> Result<MessageRef, TransportError> {
        let mut request = self.bot.send_message(ChatId(chat_id), text);
        if let Some(menu) = menu {
            request = request.reply_markup(keyboard(menu));
        }

        let sent = request.await.map_err(delivery_error)?;
        Ok(MessageRef {
            chat_id: sent.chat.id.0,
            message_id: sent.id.0,
        })
    }

    async fn edit_message(
        &self,
        message: MessageRef,
        text: &str,
        menu: Option<Menu>,
    ) -> Result<(), TransportError> {
        let mut request = self.bot.edit_message_text(
            ChatId(message.chat_id),
            MessageId(message.message_id),
            text,
        );
        if let Some(menu) = menu {
            request = request.reply_markup(keyboard(menu));
        }

        request.await.map_err(delivery_error)?;
        Ok(())
    }

    async fn delete_message(&self, message: MessageRef) -> Result<(), TransportError> {
        self.bot
            .delete_message(ChatId(message.chat_id), MessageId(message.message_id))
            .await
            .map_err(delivery_error)?;
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str) -> Result<(), TransportError> {
        self.bot
            .answer_callback_query(callback_id.to_string())
            .await
            .map_err(delivery_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use teloxide::types::InlineKeyboardButtonKind;

    #[test]
    fn main_menu_has_three_callback_buttons() {
        let markup = keyboard(Menu::Main);

        let data: Vec<Vec<String>> = markup
            .inline_keyboard
            .iter()
            .map(|row| {
                row.iter()
                    .map(|button| match &button.kind {
                        InlineKeyboardButtonKind::CallbackData(data) => data.clone(),
                        other => panic!("unexpected button kind {other:?}"),
                    })
                    .collect()
            })
            .collect();

        assert_eq!(
            data,
            vec![
                vec![CALLBACK_NEW_ANALYSIS.to_string()],
                vec![
                    CALLBACK_SAVE_ANALYSIS.to_string(),
                    CALLBACK_LIST_HISTORY.to_string()
                ],
            ]
        );
    }
}
