//! Common types and utilities shared across Sift crates.
//!
//! This crate holds the error types every other crate returns and the
//! observability helpers binaries and tests use to set up `tracing`. It stays
//! small so the pipeline and driver crates can depend on it without pulling in
//! the browser stack.
//!
//! # Overview
//!
//! - [`SiftError`] and [`Result`]: errors raised by the text pipeline
//! - [`RetrievalError`]: failures reported by the page retrieval collaborator
//! - [`observability`]: centralised tracing/logging initialisation
//!
//! # Examples
//!
//! Retrieval failures convert into [`SiftError`] without losing their payload:
//!
//! ```rust
//! use sift_common::{RetrievalError, SiftError};
//!
//! let err: SiftError = RetrievalError::Timeout {
//!     url: "https://example.com/".into(),
//!     secs: 30,
//! }
//! .into();
//! assert!(matches!(err, SiftError::Retrieval(RetrievalError::Timeout { secs: 30, .. })));
//! ```

pub mod observability;

/// Default maximum number of characters per chunk.
pub const DEFAULT_MAX_LENGTH: usize = 6000;

/// Error types used across the Sift pipeline.
#[derive(thiserror::Error, Debug)]
pub enum SiftError {
    /// A caller passed a value outside a function's contract.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The page retrieval collaborator failed; the inner error is passed
    /// through untouched.
    #[error("Retrieval error: {0}")]
    Retrieval(#[from] RetrievalError),

    /// Configuration was incomplete or invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Failures raised while acquiring a browser session or reading a page from it.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RetrievalError {
    /// The WebDriver endpoint refused or could not start a session.
    #[error("failed to start browser session at {endpoint}: {message}")]
    Launch { endpoint: String, message: String },

    /// Navigating to the page failed.
    #[error("navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    /// The page loaded but its source could not be read back.
    #[error("could not read page source from {url}: {message}")]
    Source { url: String, message: String },

    /// The page did not finish loading in time.
    #[error("loading {url} exceeded {secs}s")]
    Timeout { url: String, secs: u64 },

    /// The session could not be closed cleanly.
    #[error("failed to close browser session: {message}")]
    Shutdown { message: String },
}

/// Convenient alias for results that use [`SiftError`].
pub type Result<T> = std::result::Result<T, SiftError>;
