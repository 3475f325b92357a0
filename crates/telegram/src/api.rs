use serde::{Deserialize, Serialize};

use crate::types::{Message, ReplyKeyboardMarkup, Update};
use crate::TelegramError;

/// Envelope every Bot API method responds with.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

impl<T> ApiResponse<T> {
    fn into_result(self) -> Result<T, TelegramError> {
        if self.ok {
            self.result
                .ok_or_else(|| TelegramError::Api("response had no result".to_owned()))
        } else {
            Err(TelegramError::Api(
                self.description
                    .unwrap_or_else(|| "unknown error".to_owned()),
            ))
        }
    }
}

#[derive(Serialize)]
struct GetUpdates {
    timeout: u64,
    allowed_updates: [&'static str; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<i64>,
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: i64,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_markup: Option<ReplyKeyboardMarkup>,
}

pub(crate) async fn get_updates(
    client: &reqwest::Client,
    base_url: &str,
    offset: Option<i64>,
    timeout_secs: u64,
) -> Result<Vec<Update>, TelegramError> {
    let res = client
        .post(format!("{base_url}/getUpdates"))
        .json(&GetUpdates {
            timeout: timeout_secs,
            allowed_updates: ["message"],
            offset,
        })
        .send()
        .await
        .map_err(TelegramError::Fetch)?;
    res.json::<ApiResponse<Vec<Update>>>()
        .await
        .map_err(TelegramError::Deserialize)?
        .into_result()
}

pub(crate) async fn send_message(
    client: &reqwest::Client,
    base_url: &str,
    chat_id: i64,
    text: &str,
    reply_markup: Option<ReplyKeyboardMarkup>,
) -> Result<(), TelegramError> {
    let res = client
        .post(format!("{base_url}/sendMessage"))
        .json(&SendMessage {
            chat_id,
            text,
            reply_markup,
        })
        .send()
        .await
        .map_err(TelegramError::Fetch)?;
    res.json::<ApiResponse<Message>>()
        .await
        .map_err(TelegramError::Deserialize)?
        .into_result()
        .map(|_| ())
}

pub(crate) async fn send_document(
    client: &reqwest::Client,
    base_url: &str,
    chat_id: i64,
    file_name: &str,
    data: Vec<u8>,
) -> Result<(), TelegramError> {
    let form = reqwest::multipart::Form::new()
        .text("chat_id", chat_id.to_string())
        .part(
            "document",
            reqwest::multipart::Part::bytes(data).file_name(file_name.to_owned()),
        );
    let res = client
        .post(format!("{base_url}/sendDocument"))
        .multipart(form)
        .send()
        .await
        .map_err(TelegramError::Fetch)?;
    res.json::<ApiResponse<Message>>()
        .await
        .map_err(TelegramError::Deserialize)?
        .into_result()
        .map(|_| ())
}
