//! Read-only analytics over the canonical dataset.
//!
//! [`MovieAnalytics`] is an immutable snapshot: it deduplicates the
//! genre-exploded rows into distinct movies once, then answers each query
//! from that snapshot alone.

pub mod engine;
pub mod types;
pub mod utility;
pub mod weighted;

pub use engine::{Movie, MovieAnalytics};
