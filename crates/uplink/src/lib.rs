//! Transfer orchestration.
//!
//! Drives the upload and download pipelines through an abstract
//! [`MessengerClient`]: stage local files (splitting any that exceed the
//! chunk limit), send them one at a time, record the batch in the manifest,
//! and fetch previously uploaded attachments back by message id.

mod client;
mod download;
mod error;
mod upload;

pub use client::{MessengerClient, ProgressFn, SentMessage};
pub use download::Downloader;
pub use error::UplinkError;
pub use upload::{TransferEvent, Uploader};
