//! Review platform API smoke tests
//!
//! This library provides the request executor, reporter, and suites used by
//! the `review-smoke` binary.

pub mod cli;
pub mod common;
pub mod http;
pub mod testing;

// Re-export commonly used types for tests
pub use common::{Error, Result};
pub use http::{Executor, Outcome, Request};
pub use testing::{Reporter, RunSummary, Suite};
