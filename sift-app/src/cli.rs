use clap::{Parser, ValueEnum};
use sift_common::observability::LogFormat;
use sift_config::SiftConfig;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Text,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Text => LogFormat::Text,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "jobsift", about = "Search job boards and keep postings matching a keyword policy")]
pub struct Cli {
    /// YAML configuration file; missing files fall back to defaults
    #[arg(short, long, default_value = "jobsift.yaml")]
    pub config: PathBuf,

    /// CSV destination, overriding `output.path`
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Run the browser without a window
    #[arg(long, default_value_t = false)]
    pub headless: bool,

    /// Stop each search after this many matches
    #[arg(long)]
    pub max_matches: Option<usize>,

    #[arg(long, value_enum, default_value_t = LogFormatArg::Text, env = "JOBSIFT_LOG_FORMAT")]
    pub log_format: LogFormatArg,

    /// Mirror logs to stderr
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl Cli {
    /// Flags win over file and environment values.
    pub fn apply(&self, cfg: &mut SiftConfig) {
        if let Some(path) = &self.output {
            cfg.output.path = path.clone();
        }
        if self.headless {
            cfg.browser.headless = true;
        }
        if self.max_matches.is_some() {
            cfg.campaign.max_matches_per_search = self.max_matches;
        }
    }
}
