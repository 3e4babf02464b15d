//! Telegram adapters for the pipeline's collaborator traits.
//!
//! - [`TelegramSource`] downloads attachments through the Bot API
//! - [`ChannelStorage`] posts files as documents to a private channel
//! - [`TelegramStatusSink`] sends and edits the per-request status message
//!
//! Bot API failures are mapped onto the crate's own error types here, so
//! nothing outside this module depends on teloxide's error shapes.

mod channel;
mod errors;
mod message;
mod source;
mod status;

pub use channel::ChannelStorage;
pub use errors::{classify_api_text, classify_request_error, classify_upload_error};
pub use message::{media_request, unsupported_kind};
pub use source::TelegramSource;
pub use status::TelegramStatusSink;
