//! CLI module for sitecheck
//!
//! Parses command-line arguments and drives a single check run.

use crate::checker::{CheckRunner, NoopObserver, RunnerSettings};
use crate::inspect::summarize;
use crate::report::{render_json, ConsoleReporter, RunReport};
use anyhow::Context;
use chrono::Utc;
use clap::{Parser, ValueEnum};
use sitecheck_common::{EndpointCheck, RunSummary, SiteCheckConfig};
use std::io::{self, Write};
use std::path::PathBuf;
use std::future::Future;
use tracing::{error, info};

/// sitecheck - Sequential HTTP smoke checks against a website
#[derive(Parser, Debug, Clone)]
#[command(name = "sitecheck")]
#[command(version, about, long_about = None)]
#[command(after_help = r#"ENVIRONMENT VARIABLES:
    SITECHECK_CONFIG        Path to a TOML config file
    SITECHECK_BASE_URL      Base URL for relative check URLs
    SITECHECK_USER_AGENT    User-Agent header (default: DOXA-Test-Agent/1.0)
    SITECHECK_TIMEOUT_SECS  Request timeout in seconds (default: 10)
    SITECHECK_DELAY_MS      Pause between checks in milliseconds (default: 1000)
    SITECHECK_LOG_LEVEL     Log level (default: warn)
"#)]
pub struct Cli {
    /// Config file with settings and [[checks]]
    #[arg(short, long, env = "SITECHECK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Base URL that relative check URLs are resolved against
    #[arg(long)]
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Pause between checks in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Exit with status 1 unless every check counted as successful
    #[arg(long)]
    pub strict: bool,
}

/// Report format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text, written as each check completes
    #[default]
    Text,
    /// JSON document written after the run
    Json,
}

/// A validated run ready to execute
#[derive(Debug, Clone)]
pub struct RunPlan {
    /// Effective configuration
    pub config: SiteCheckConfig,
    /// Checks in execution order
    pub checks: Vec<EndpointCheck>,
    /// Report format
    pub format: OutputFormat,
}

impl Cli {
    /// Load the configuration and apply command-line overrides
    pub fn plan(&self) -> anyhow::Result<RunPlan> {
        let mut config = SiteCheckConfig::load(self.config.as_deref())
            .context("failed to load configuration")?;

        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(timeout_secs) = self.timeout_secs {
            config.timeout_secs = timeout_secs;
        }
        if let Some(delay_ms) = self.delay_ms {
            config.delay_ms = delay_ms;
        }
        config.validate().context("invalid configuration")?;

        let checks = config
            .endpoint_checks()
            .context("invalid check definition")?;

        Ok(RunPlan {
            config,
            checks,
            format: self.format,
        })
    }
}

/// Whether the summary satisfies `--strict`
pub fn all_counted_successful(summary: &RunSummary) -> bool {
    summary.success_count == summary.total
}

/// Execute a planned run, writing the report to `out`
pub async fn execute<W>(plan: &RunPlan, out: W) -> anyhow::Result<RunSummary>
where
    W: Write + Send,
{
    let runner = CheckRunner::new(RunnerSettings::from_config(&plan.config))?;
    let started_at = Utc::now();

    info!(
        base_url = %plan.config.base_url,
        checks = plan.checks.len(),
        "Running site checks"
    );

    let summary = match plan.format {
        OutputFormat::Text => {
            let mut reporter = ConsoleReporter::new(out);
            reporter.begin(&plan.config.base_url, plan.checks.len());
            let results = runner.run_all(&plan.checks, &mut reporter).await;
            let summary = summarize(&results);
            reporter
                .finish(&summary)
                .context("failed to write report")?;
            summary
        }
        OutputFormat::Json => {
            let results = runner.run_all(&plan.checks, &mut NoopObserver).await;
            let summary = summarize(&results);
            let report = RunReport {
                started_at,
                finished_at: Utc::now(),
                base_url: plan.config.base_url.clone(),
                results,
                summary: summary.clone(),
            };
            render_json(&report, out).context("failed to write report")?;
            summary
        }
    };

    Ok(summary)
}

/// Execute a planned run against stdout
pub async fn execute_to_stdout(plan: &RunPlan) -> anyhow::Result<RunSummary> {
    execute(plan, io::stdout()).await
}

/// Run `fut` on its own task so that a panic is reported as an error
///
/// Both a returned error and a panic are logged here; the caller only decides
/// what to print and how to exit.
pub async fn run_guarded<F, T>(fut: F) -> anyhow::Result<T>
where
    F: Future<Output = anyhow::Result<T>> + Send + 'static,
    T: Send + 'static,
{
    match tokio::spawn(fut).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => {
            error!(error = %format!("{:#}", e), "Check run failed");
            Err(e)
        }
        Err(e) => {
            error!(error = %e, "Unhandled failure during check run");
            Err(anyhow::anyhow!("unhandled failure during check run: {}", e))
        }
    }
}
