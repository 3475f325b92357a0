use thiserror::Error;

mod api;
mod types;

pub use types::{Chat, KeyboardButton, Message, ReplyKeyboardMarkup, Update, User};

#[derive(Debug, Error)]
pub enum TelegramError {
    #[error("request to telegram failed: {0}")]
    Fetch(#[source] reqwest::Error),
    #[error("could not decode telegram response: {0}")]
    Deserialize(#[source] reqwest::Error),
    #[error("telegram API error: {0}")]
    Api(String),
}

/// Minimal Telegram Bot API client: long polling plus the few send methods
/// the bot needs.
pub struct Bot {
    client: reqwest::Client,
    base_url: String,
}

impl Bot {
    pub fn new(token: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: format!("https://api.telegram.org/bot{token}"),
        }
    }

    /// Long-polls for new updates. `offset` should be one past the last
    /// update id already handled.
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout_secs: u64,
    ) -> Result<Vec<Update>, TelegramError> {
        api::get_updates(&self.client, &self.base_url, offset, timeout_secs).await
    }

    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), TelegramError> {
        api::send_message(&self.client, &self.base_url, chat_id, text, None).await
    }

    /// Sends a message with a one-time reply keyboard, one button per option
    /// on a single row.
    pub async fn send_choice_keyboard(
        &self,
        chat_id: i64,
        text: &str,
        options: &[String],
    ) -> Result<(), TelegramError> {
        let markup = ReplyKeyboardMarkup {
            keyboard: vec![options
                .iter()
                .map(|option| KeyboardButton {
                    text: option.clone(),
                })
                .collect()],
            one_time_keyboard: true,
            resize_keyboard: true,
        };
        api::send_message(&self.client, &self.base_url, chat_id, text, Some(markup)).await
    }

    pub async fn send_document(
        &self,
        chat_id: i64,
        file_name: &str,
        data: Vec<u8>,
    ) -> Result<(), TelegramError> {
        api::send_document(&self.client, &self.base_url, chat_id, file_name, data).await
    }
}
