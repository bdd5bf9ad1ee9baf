//! Smoke-test harness
//!
//! Suites exercise one API surface each, report through a shared
//! `Reporter`, and are sequenced by the runner. Assertions are made on
//! status codes and a few body keys, never on full payloads.

mod report;
mod runner;
mod suites;

pub use report::{render, Reporter, RunSummary, TestRecord};
pub use runner::{plan, run};
pub use suites::*;
