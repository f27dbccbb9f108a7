use anyhow::{bail, Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};

const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Client for sending messages via Telegram Bot API.
///
/// One bot token, any number of destination chats.
pub struct TelegramBot {
    client: Client,
    api_key: String,
}

#[derive(Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct SendMessageResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

impl TelegramBot {
    /// Creates a new `TelegramBot` with the given HTTP client and bot API key.
    pub fn new(client: Client, api_key: String) -> Self {
        Self { client, api_key }
    }

    /// Sends a text message to `chat_id`.
    ///
    /// The request URL embeds the bot token, so it is stripped from transport
    /// errors before they are returned.
    ///
    /// Telegram answers with `{"ok": false, "description": ...}` on rejection,
    /// usually with a 4xx status; the description becomes the error message.
    pub async fn send_message(&self, chat_id: &str, text: &str) -> Result<()> {
        let url = format!("{}/bot{}/sendMessage", TELEGRAM_API_BASE, self.api_key);
        let body = SendMessageRequest { chat_id, text };
        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(reqwest::Error::without_url)
            .context("telegram: request failed")?;
        let status = resp.status();
        let raw = resp
            .text()
            .await
            .map_err(reqwest::Error::without_url)
            .context("telegram: read body failed")?;
        check_response(status.as_u16(), &raw)
    }
}

fn check_response(status: u16, body: &str) -> Result<()> {
    let parsed: SendMessageResponse = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(_) => bail!("telegram: unexpected response (HTTP {})", status),
    };
    if !parsed.ok {
        bail!(
            "telegram: {} (HTTP {})",
            parsed.description.as_deref().unwrap_or("request rejected"),
            status
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_response_is_accepted() {
        let body = r#"{"ok":true,"result":{"message_id":42}}"#;
        assert!(check_response(200, body).is_ok());
    }

    #[test]
    fn rejection_carries_description() {
        let body = r#"{"ok":false,"error_code":400,"description":"Bad Request: chat not found"}"#;
        let err = check_response(400, body).unwrap_err();
        assert_eq!(
            err.to_string(),
            "telegram: Bad Request: chat not found (HTTP 400)"
        );
    }

    #[tokio::test]
    async fn transport_error_does_not_expose_token() {
        let client = Client::builder()
            .proxy(reqwest::Proxy::all("http://127.0.0.1:1").unwrap())
            .build()
            .unwrap();
        let bot = TelegramBot::new(client, "123456:SECRET-TOKEN".to_string());

        let err = bot.send_message("42", "hi").await.unwrap_err();
        let rendered = format!("{err:#}");
        assert!(rendered.starts_with("telegram: request failed"));
        assert!(!rendered.contains("SECRET-TOKEN"), "{rendered}");
    }

    #[test]
    fn non_json_body_is_an_error() {
        let err = check_response(502, "<html>Bad Gateway</html>").unwrap_err();
        assert!(err.to_string().contains("502"));
    }
}
