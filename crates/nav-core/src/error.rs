//! Framework error type.
//!
//! Sub-crates define their own error enums and either convert them into
//! `NavError` or wrap it as one variant; prefer whichever keeps error sites
//! clean.

use thiserror::Error;

/// The top-level error type for `nav-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum NavError {
    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for all `nav-*` crates.
pub type NavResult<T> = Result<T, NavError>;
