//! Webhook notification delivery.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde_json::json;
use thiserror::Error;

/// Webhooks answer fast or not at all.
const NOTIFY_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors surfaced while delivering a notification.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("webhook request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("webhook answered {status}")]
    Status { status: StatusCode },
}

/// Notification body for a detected change (Discord markdown, JST time).
pub fn change_message(url: &str, detected_at: &str) -> String {
    format!(
        "**【サイト変更検知】**\n\
         以下のサイトに変更がありました。\n\
         URL: {url}\n\
         検知日時: {detected_at} (JST)"
    )
}

/// POST `{"content": message}` to the webhook. Single attempt, no retries.
pub fn send(webhook_url: &str, message: &str) -> Result<StatusCode, NotifyError> {
    let client = Client::builder().timeout(NOTIFY_TIMEOUT).build()?;
    let response = client
        .post(webhook_url)
        .json(&json!({ "content": message }))
        .send()?;

    let status = response.status();
    if status.is_client_error() || status.is_server_error() {
        return Err(NotifyError::Status { status });
    }

    Ok(status)
}
