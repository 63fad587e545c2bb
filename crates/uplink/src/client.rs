//! Abstract messaging client seam.
//!
//! The CLI wires in a concrete HTTP implementation; tests use mocks.
//! Using a trait keeps the pipelines decoupled from the transport.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;

use chrono::{DateTime, Utc};

use crate::error::UplinkError;

/// Handle returned by the messaging platform for one sent attachment.
#[derive(Debug, Clone)]
pub struct SentMessage {
    /// Opaque message identifier, unique within the target channel.
    pub id: i64,
    /// Server-side timestamp of the send.
    pub date: DateTime<Utc>,
}

/// Byte-level progress callback: `(bytes transferred, total bytes)`.
pub type ProgressFn<'a> = &'a (dyn Fn(u64, u64) + Send + Sync);

/// Connection to the messaging platform.
///
/// Both operations are awaited one at a time by the orchestrator; an
/// implementation never sees concurrent calls from a single pipeline run.
pub trait MessengerClient: Send + Sync {
    /// Sends the file at `path` as an attachment to `target` and returns
    /// the message handle issued by the platform.
    fn send_file<'a>(
        &'a self,
        target: &'a str,
        path: &'a Path,
        caption: &'a str,
        progress: ProgressFn<'a>,
    ) -> Pin<Box<dyn Future<Output = Result<SentMessage, UplinkError>> + Send + 'a>>;

    /// Fetches the attachment bytes of a previously sent message.
    fn fetch_attachment<'a>(
        &'a self,
        target: &'a str,
        message_id: i64,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>, UplinkError>> + Send + 'a>>;
}
