use std::env;
use std::time::Duration;

use anyhow::Context;
use telegram::Bot;
use tracing_subscriber::EnvFilter;

use crate::handlers::Reply;
use crate::phrases::Phrases;
use crate::session::Sessions;
use crate::storage::Storage;

mod error;
mod export;
mod handlers;
mod phrases;
mod selection;
mod session;
mod storage;

const POLL_TIMEOUT_SECS: u64 = 30;
const POLL_RETRY_DELAY: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("vocab_bot=info".parse()?),
        )
        .init();

    let token = env::var("API_KEY").context("API_KEY is not set")?;
    let phrases_path =
        env::var("BOT_PHRASES").unwrap_or_else(|_| "bot_phrases.json".to_owned());
    let phrases = Phrases::load(&phrases_path)?;
    let database_url =
        env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://words.db".to_owned());
    let storage = Storage::initialize(&database_url)
        .await
        .context("initializing the word store")?;

    let bot = Bot::new(&token);
    let mut sessions = Sessions::new();
    let mut offset = None;

    tracing::info!("bot started");
    loop {
        let updates = match bot.get_updates(offset, POLL_TIMEOUT_SECS).await {
            Ok(updates) => updates,
            Err(error) => {
                tracing::warn!("polling failed: {error}");
                tokio::time::sleep(POLL_RETRY_DELAY).await;
                continue;
            }
        };
        for update in updates {
            offset = Some(update.update_id + 1);
            let Some(message) = update.message else {
                continue;
            };
            let Some(text) = message.text.as_deref() else {
                continue;
            };
            let chat_id = message.chat.id;
            tracing::debug!(chat_id, "handling message");
            let session = sessions.entry(chat_id).or_default();
            let replies = handlers::handle_message(&storage, &phrases, session, text).await;
            for reply in replies {
                if let Err(error) = deliver(&bot, chat_id, reply).await {
                    tracing::error!(chat_id, "failed to deliver reply: {error}");
                }
            }
        }
    }
}

async fn deliver(bot: &Bot, chat_id: i64, reply: Reply) -> Result<(), telegram::TelegramError> {
    match reply {
        Reply::Text(text) => bot.send_message(chat_id, &text).await,
        Reply::Choice { text, options } => {
            bot.send_choice_keyboard(chat_id, &text, &options).await
        }
        Reply::Document { file_name, data } => {
            bot.send_document(chat_id, &file_name, data).await
        }
    }
}
