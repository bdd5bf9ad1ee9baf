//! CLI argument handling
//!
//! Resolves configuration from file, environment, and flags, then drives
//! the runner.

use std::path::PathBuf;

use clap::Parser;

use crate::common::config::{ApiConfig, Config};
use crate::common::Result;
use crate::http::Executor;
use crate::testing::{self, Reporter, RunSummary, Suite};

#[derive(Parser, Debug)]
#[command(name = "review-smoke", about = "Smoke tests for the review platform API")]
#[command(version, long_about = None)]
pub struct Cli {
    /// Service root URL (overrides the config file and NEXT_PUBLIC_BASE_URL)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Path to a TOML config file (default: platform config dir)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Run only these suites; can be given multiple times
    #[arg(long = "suite", short = 's', value_enum)]
    pub suites: Vec<Suite>,

    /// Exit non-zero when any check fails
    #[arg(long)]
    pub strict: bool,

    /// Attach response bodies to failed checks and log requests
    #[arg(long, short)]
    pub verbose: bool,
}

impl Cli {
    /// Layer flags over environment over config file over defaults
    pub fn resolve_config(&self) -> Result<ApiConfig> {
        let mut config = Config::load(self.config.as_deref())?;
        config.apply_env();
        config.apply_base_url_override(self.base_url.clone());
        if let Some(timeout) = self.timeout {
            config.api.timeout_secs = timeout;
        }
        config.api.validate()?;
        Ok(config.api)
    }
}

/// Run the selected suites with settings from `cli`
pub async fn run(cli: &Cli) -> Result<RunSummary> {
    let api = cli.resolve_config()?;
    let executor = Executor::new(&api)?;
    let mut reporter = Reporter::new(cli.verbose);
    testing::run(&executor, &mut reporter, &cli.suites).await
}
