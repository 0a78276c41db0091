//! Driver layer for browser automation.
//!
//! This crate owns the WebDriver session used to retrieve a rendered page.
//! It knows nothing about the text pipeline; it hands back one markup string
//! per fetch and reports failures as [`sift_common::RetrievalError`].
//!
//! - [`sift_browser::options::BrowserOptions`]: endpoint, headless mode, timeouts
//! - [`sift_browser::session::BrowserSession`]: WebDriver client wrapper
//! - [`sift_browser::session::fetch_page_source`]: scoped open → load → close
pub mod sift_browser;
