//! Test runner implementation
//!
//! Runs the selected suites one after another against a single executor
//! and hands back the tally. Only configuration faults abort the sequence;
//! failed assertions are reported and the run carries on.

use colored::Colorize;

use crate::common::Result;
use crate::http::Executor;

use super::report::{Reporter, RunSummary};
use super::suites::Suite;

/// Suites to run, in canonical order without duplicates
///
/// An empty selection means every suite.
pub fn plan(selected: &[Suite]) -> Vec<Suite> {
    if selected.is_empty() {
        return Suite::ALL.to_vec();
    }
    let mut plan = selected.to_vec();
    plan.sort();
    plan.dedup();
    plan
}

/// Run `selected` suites and return the summary
pub async fn run(
    executor: &Executor,
    reporter: &mut Reporter,
    selected: &[Suite],
) -> Result<RunSummary> {
    let plan = plan(selected);
    tracing::info!(suites = plan.len(), api_base = executor.api_base(), "starting run");

    reporter.line(&"🚀 Starting Comprehensive Backend API Testing".bold().to_string());
    reporter.line(&format!("Base URL: {}", executor.base_url()));
    reporter.line(&format!("API Base: {}", executor.api_base()));
    reporter.rule();

    for suite in plan {
        tracing::debug!(suite = ?suite, "running suite");
        suite.run(executor, reporter).await?;
    }

    let summary = reporter.summary().clone();

    reporter.rule();
    reporter.line(&"✅ Backend API Testing Complete!".green().bold().to_string());
    reporter.line(&format!(
        "{} checks: {} passed, {} failed",
        summary.total(),
        summary.passed.len().to_string().green(),
        summary.failed.len().to_string().red()
    ));
    for name in &summary.failed {
        reporter.line(&format!("  {} {}", "✗".red(), name));
    }
    reporter.line("");
    reporter.line("NOTE: Authentication-required endpoints were tested without auth tokens.");
    reporter.line("This is expected behavior - they should return 401 Unauthorized.");
    reporter.line("The APIs are properly protecting authenticated routes.");

    tracing::info!(
        passed = summary.passed.len(),
        failed = summary.failed.len(),
        "run complete"
    );
    Ok(summary)
}
