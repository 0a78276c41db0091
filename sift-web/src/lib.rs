//! Page text pipeline and page acquisition.
//!
//! - Body extraction and content cleaning over a markup string (`extract`)
//! - Fixed-size chunking of the cleaned text (`chunk`)
//! - The page retrieval capability and its Fantoccini-backed implementation (`browser`)
//! - Composition of the stages into one call (`pipeline`)
//!
//! The three text stages are pure functions; only `browser` touches the
//! outside world.

pub mod browser;
pub mod chunk;
pub mod extract;
pub mod pipeline;
