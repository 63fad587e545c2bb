//! HTTP messaging gateway client.
//!
//! Implements [`MessengerClient`] against a REST gateway that fronts the
//! messaging platform:
//!
//! - `POST {base}/channels/{target}/attachments` — multipart upload of one
//!   attachment, responds with `{"message_id": ..., "date": ...}`.
//! - `GET {base}/channels/{target}/attachments/{message_id}` — raw bytes of
//!   a previously uploaded attachment.
//!
//! Authentication is a bearer token passed through from configuration.
//! Gateway and transport failures are surfaced unmodified as
//! [`UplinkError::Messenger`].

use std::future::Future;
use std::path::Path;
use std::pin::Pin;

use chatvault_uplink::{MessengerClient, ProgressFn, SentMessage, UplinkError};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

/// Gateway response for a successful attachment upload.
#[derive(Debug, Deserialize)]
struct SendResponse {
    message_id: i64,
    date: DateTime<Utc>,
}

/// Client for one messaging gateway instance.
pub struct GatewayClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl GatewayClient {
    /// Creates a client for the gateway at `base_url` using `token` for
    /// bearer authentication.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            token: token.into(),
        }
    }
}

impl MessengerClient for GatewayClient {
    fn send_file<'a>(
        &'a self,
        target: &'a str,
        path: &'a Path,
        caption: &'a str,
        progress: ProgressFn<'a>,
    ) -> Pin<Box<dyn Future<Output = Result<SentMessage, UplinkError>> + Send + 'a>> {
        Box::pin(async move {
            let data = tokio::fs::read(path).await?;
            let total = data.len() as u64;
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();

            // The request body is sent in one piece, so progress has a
            // begin and an end tick only.
            progress(0, total);

            let form = reqwest::multipart::Form::new()
                .text("caption", caption.to_string())
                .part(
                    "file",
                    reqwest::multipart::Part::bytes(data).file_name(file_name.clone()),
                );

            let url = attachments_url(&self.base_url, target);
            let response = self
                .http
                .post(&url)
                .bearer_auth(&self.token)
                .multipart(form)
                .send()
                .await
                .map_err(|e| UplinkError::Messenger(format!("send to {url} failed: {e}")))?;

            if !response.status().is_success() {
                return Err(UplinkError::Messenger(format!(
                    "send to {url} returned status {}",
                    response.status()
                )));
            }

            let sent: SendResponse = response
                .json()
                .await
                .map_err(|e| UplinkError::Messenger(format!("invalid send response: {e}")))?;

            progress(total, total);
            debug!(file = %file_name, message_id = sent.message_id, "attachment accepted");

            Ok(SentMessage {
                id: sent.message_id,
                date: sent.date,
            })
        })
    }

    fn fetch_attachment<'a>(
        &'a self,
        target: &'a str,
        message_id: i64,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>, UplinkError>> + Send + 'a>> {
        Box::pin(async move {
            let url = attachment_url(&self.base_url, target, message_id);
            let response = self
                .http
                .get(&url)
                .bearer_auth(&self.token)
                .send()
                .await
                .map_err(|e| UplinkError::Messenger(format!("fetch from {url} failed: {e}")))?;

            if !response.status().is_success() {
                return Err(UplinkError::Messenger(format!(
                    "fetch from {url} returned status {}",
                    response.status()
                )));
            }

            let bytes = response
                .bytes()
                .await
                .map_err(|e| UplinkError::Messenger(format!("failed to read attachment: {e}")))?
                .to_vec();

            debug!(message_id, bytes = bytes.len(), "attachment fetched");
            Ok(bytes)
        })
    }
}

fn attachments_url(base: &str, target: &str) -> String {
    format!("{}/channels/{target}/attachments", base.trim_end_matches('/'))
}

fn attachment_url(base: &str, target: &str, message_id: i64) -> String {
    format!("{}/{message_id}", attachments_url(base, target))
}
