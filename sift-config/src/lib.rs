//! Loader for jobsift configuration with YAML + environment overlays.
//!
//! Sources are merged in order: an optional YAML file, any inline YAML
//! snippets, then `JOBSIFT_`-prefixed environment variables (`__` separates
//! nesting, so `JOBSIFT_BROWSER__HEADLESS=true` sets `browser.headless`).
//! Every string value then goes through bounded `${VAR}` expansion before the
//! merged tree is deserialized into [`SiftConfig`]. Missing sections fall back
//! to the defaults in `sift-common`.
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_json::Value;
use sift_common::observability::expand_home;
use sift_common::{BrowserSettings, CampaignSettings, Selectors, SiftError, Timings};
use std::path::{Path, PathBuf};

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SiftConfig {
    pub version: Option<String>,
    pub browser: BrowserSettings,
    pub campaign: CampaignSettings,
    pub timings: Timings,
    pub selectors: Selectors,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("linkedin_filtered_jobs.csv"),
        }
    }
}

impl SiftConfig {
    /// Reject configurations the pipeline cannot run with.
    pub fn validate(&self) -> sift_common::Result<()> {
        if self.campaign.searches.is_empty() {
            return Err(SiftError::Config(
                "campaign.searches must list at least one search".into(),
            ));
        }
        if let Some(blank) = self
            .campaign
            .searches
            .iter()
            .position(|s| s.location.trim().is_empty())
        {
            return Err(SiftError::Config(format!(
                "campaign.searches[{blank}] has an empty location"
            )));
        }
        if !self.campaign.site.starts_with("http://") && !self.campaign.site.starts_with("https://")
        {
            return Err(SiftError::Config(format!(
                "campaign.site must be an http(s) origin, got `{}`",
                self.campaign.site
            )));
        }
        if self.selectors.entry_anchor.trim().is_empty() {
            return Err(SiftError::Config(
                "selectors.entry_anchor must not be empty".into(),
            ));
        }
        if self.selectors.body_text_cap == 0 {
            return Err(SiftError::Config(
                "selectors.body_text_cap must be positive".into(),
            ));
        }
        Ok(())
    }
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hides the `config` crate wiring (YAML + env overrides).
pub struct SiftConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for SiftConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl SiftConfigLoader {
    /// Start from defaults with `JOBSIFT_` environment overrides.
    ///
    /// ```
    /// use sift_config::SiftConfigLoader;
    ///
    /// let config = SiftConfigLoader::new().load().expect("defaults load");
    ///
    /// assert_eq!(config.campaign.recency_secs, 86_400);
    /// assert_eq!(config.campaign.searches.len(), 4);
    /// assert_eq!(config.selectors.body_text_cap, 10_000);
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
        }
    }

    /// Attach a required YAML/TOML/JSON file; the `config` crate infers format
    /// by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that may be absent, so a run can rely purely on
    /// defaults and environment variables.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Merge an inline YAML snippet.
    ///
    /// ```
    /// use sift_common::{MatchMode, WorkType};
    /// use sift_config::SiftConfigLoader;
    ///
    /// let cfg = SiftConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// campaign:
    ///   searches:
    ///     - location: "Canada"
    ///       work_type: "remote"
    ///   policy:
    ///     required: ["rust"]
    ///     mode: "all"
    ///     excluded: ["senior"]
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(cfg.campaign.searches.len(), 1);
    /// assert_eq!(cfg.campaign.searches[0].work_type, WorkType::Remote);
    /// assert_eq!(cfg.campaign.policy.mode, MatchMode::All);
    /// assert!(cfg.campaign.policy.case_insensitive);
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources.
    ///
    /// `${VAR}` placeholders are expanded and `~/` prefixes on the profile
    /// directory and output path are resolved against `$HOME`.
    pub fn load(self) -> Result<SiftConfig, ConfigError> {
        // added last so the environment wins over every file source
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix("JOBSIFT")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let mut typed: SiftConfig =
            serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))?;

        typed.browser.profile_dir = typed.browser.profile_dir.as_deref().map(expand_home);
        typed.output.path = expand_home(&typed.output.path);

        Ok(typed)
    }
}
