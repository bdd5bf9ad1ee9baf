//! review-smoke - smoke tests for the review platform API
//!
//! Sends a fixed sequence of requests to a deployed instance and prints a
//! pass/fail line per check.

use clap::Parser;
use review_smoke::cli::{self, Cli};
use review_smoke::common::logging;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init_cli(cli.verbose);

    match cli::run(&cli).await {
        Ok(summary) => std::process::exit(summary.exit_code(cli.strict)),
        Err(e) => {
            tracing::error!("run aborted: {e}");
            println!("❌ Testing failed with exception: {e}");
            std::process::exit(1);
        }
    }
}
