//! Progress module for the per-request status message.
//!
//! Each request gets exactly one status message, created on receipt and
//! edited in place as the pipeline advances. The `StatusSink` trait hides
//! the chat transport.

mod error;
mod reporter;
mod traits;
mod types;

pub use error::StatusError;
pub use reporter::ProgressReporter;
pub use traits::StatusSink;
pub use types::{Stage, StatusHandle};
