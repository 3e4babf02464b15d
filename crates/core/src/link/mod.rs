//! Link module for turning an uploaded reference into a URL.
//!
//! Two strategies are supported:
//!
//! - **Direct file**: `<base>/<remote file path>`, where the path comes from
//!   the storage backend (the Bot API file path, or the object key)
//! - **Deep link**: `<base>/<destination>/<locator>`, pointing at the
//!   channel post or object
//!
//! A link failure after a successful upload never fails the request; the
//! pipeline reports it as a caveat instead.

mod error;
mod resolver;
mod types;

pub use error::LinkError;
pub use resolver::{
    create_link_resolver, DeepLinks, DirectFileLinks, LinkResolver, TELEGRAM_DEEP_LINK_BASE,
    TELEGRAM_FILE_BASE,
};
pub use types::{LinkConfig, LinkStrategy, ResultLink};
