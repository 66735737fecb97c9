use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use sift_common::observability::{LogConfig, init_logging};
use sift_common::MatchMode;
use sift_config::{SiftConfig, SiftConfigLoader};
use sift_drivers::sift_browser::driver::FantocciniLauncher;
use sift_drivers::sift_browser::page::SiftPage;
use sift_jobs::{Campaign, CsvSink};
use tracing::{info, warn};

mod cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_path = init_logging(LogConfig {
        emit_stderr: cli.verbose,
        format: cli.log_format.into(),
        ..LogConfig::default()
    })?;

    // 1) Load config (env wins over file, flags win over both)
    let mut cfg: SiftConfig = SiftConfigLoader::new()
        .with_optional_file(&cli.config)
        .load()
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    cli.apply(&mut cfg);
    cfg.validate().context("invalid configuration")?;

    info!(
        log = %log_path.display(),
        searches = cfg.campaign.searches.len(),
        output = %cfg.output.path.display(),
        "jobsift starting"
    );
    if cfg.campaign.policy.required.is_empty() && cfg.campaign.policy.mode == MatchMode::Any {
        warn!("no required keywords configured; every posting will be rejected");
    }

    // 2) Run
    let launcher = FantocciniLauncher::new(cfg.browser.clone());
    let campaign = Campaign::<SiftPage>::new(cfg.campaign, cfg.timings, &cfg.selectors);
    let mut sink = CsvSink::new(cfg.output.path);

    let report = campaign.run(&launcher, &mut sink).await?;
    info!(
        searches = report.searches_run,
        matched = report.matched,
        written = report.written,
        "jobsift finished"
    );
    Ok(())
}
