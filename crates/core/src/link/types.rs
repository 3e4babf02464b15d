//! Types for the link module.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How the final link is built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkStrategy {
    /// Direct URL to the stored file bytes.
    #[default]
    DirectFile,
    /// URL pointing at the stored message or object.
    DeepLink,
}

impl LinkStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DirectFile => "direct_file",
            Self::DeepLink => "deep_link",
        }
    }
}

impl fmt::Display for LinkStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Link configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinkConfig {
    #[serde(default)]
    pub strategy: LinkStrategy,

    /// Overrides the strategy's default base URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// A link the user can open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultLink {
    pub url: String,
    pub strategy: LinkStrategy,
}

impl fmt::Display for ResultLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}
