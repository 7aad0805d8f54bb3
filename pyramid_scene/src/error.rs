use std::time::Duration;

/// A rejected environment setting. The default is used in its place.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum SiteConfigError {
    #[error("farm config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("expected {expected} sections, found {found}")]
    SectionCount { expected: usize, found: usize },

    #[error("farm config {path} failed to load: {reason}")]
    Load { path: String, reason: String },

    #[error("farm config {path} did not load within {timeout:?}")]
    Timeout { path: String, timeout: Duration },
}

#[derive(Debug, thiserror::Error)]
pub enum NavigationError {
    #[error("no browsing context available")]
    NoContext,

    #[error("navigation to {url} rejected: {reason}")]
    Rejected { url: String, reason: String },
}
