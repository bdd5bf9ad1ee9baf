//! HTTP plumbing: request descriptors, outcomes, and the executor

mod client;
mod types;

pub use client::Executor;
pub use types::*;
