//! Configuration management for cineharvest.
//!
//! All paths are explicit configuration. There is no OS-conditional path
//! detection: the output directory comes from the config file or CLI flags.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "cineharvest.toml";

/// Default per-request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Default flat delay between listing pages in seconds.
pub const DEFAULT_PAGE_DELAY_SECS: f64 = 1.0;

#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level settings: one harvester plus the pipeline phases.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub harvest: HarvestConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

impl Settings {
    /// Load settings from an explicit path, or from `cineharvest.toml` in
    /// the working directory when present. Missing files yield defaults so
    /// CLI flags alone can drive a run.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let candidate = match path {
            Some(p) => {
                if !p.exists() {
                    anyhow::bail!("config file not found: {}", p.display());
                }
                Some(p.to_path_buf())
            }
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                default.exists().then_some(default)
            }
        };

        match candidate {
            Some(p) => {
                let raw = fs::read_to_string(&p)?;
                let settings: Settings = toml::from_str(&raw)?;
                Ok(settings)
            }
            None => Ok(Settings::default()),
        }
    }
}

/// Paginated list harvester settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarvestConfig {
    /// Directory where the output CSV and the run log are written.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Basename (without extension) of the output CSV.
    #[serde(default = "default_list_name")]
    pub list_name: String,
    /// Listing URL; page `n` is fetched at `{base}page/{n}/`.
    #[serde(default)]
    pub base_list_url: String,
    /// Stop after this many accepted films.
    #[serde(default = "default_max_items")]
    pub max_items: usize,
    /// Minimum rating count a film needs to be admitted.
    #[serde(default)]
    pub min_popularity_count: u64,
    /// Flat delay between listing pages, in seconds. Not adaptive.
    #[serde(default = "default_page_delay")]
    pub page_delay_seconds: f64,
    /// Per-request timeout, in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    /// User agent override. None uses the browser-like default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            list_name: default_list_name(),
            base_list_url: String::new(),
            max_items: default_max_items(),
            min_popularity_count: 0,
            page_delay_seconds: default_page_delay(),
            request_timeout_seconds: default_request_timeout(),
            user_agent: None,
        }
    }
}

impl HarvestConfig {
    /// Check the invariants the harvester relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_list_url.is_empty() {
            return Err(ConfigError::Invalid(
                "base_list_url must be set (config file or --base-url)".into(),
            ));
        }
        if url::Url::parse(&self.base_list_url).is_err() {
            return Err(ConfigError::Invalid(format!(
                "base_list_url is not a valid URL: {}",
                self.base_list_url
            )));
        }
        if self.max_items == 0 {
            return Err(ConfigError::Invalid("max_items must be > 0".into()));
        }
        if self.page_delay_seconds < 0.0 {
            return Err(ConfigError::Invalid(
                "page_delay_seconds must be >= 0".into(),
            ));
        }
        Ok(())
    }

    /// Per-request timeout as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    /// Inter-page delay as a [`Duration`].
    pub fn page_delay(&self) -> Duration {
        Duration::from_secs_f64(self.page_delay_seconds)
    }

    /// Path of the output CSV for this list.
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}.csv", self.list_name))
    }

    /// Path of the mirrored run log.
    pub fn run_log_path(&self) -> PathBuf {
        self.output_dir.join("all_outputs.csv")
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("outputs")
}

fn default_list_name() -> String {
    "harvested_films".to_string()
}

fn default_max_items() -> usize {
    100
}

fn default_page_delay() -> f64 {
    DEFAULT_PAGE_DELAY_SECS
}

fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

/// Pipeline phase configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Scraper invocations, run first.
    #[serde(default)]
    pub scrape: Vec<StepConfig>,
    /// Processing/update invocations, run after scraping.
    #[serde(default)]
    pub process: Vec<StepConfig>,
    /// External build tool invocation.
    #[serde(default)]
    pub build: Option<BuildConfig>,
    /// Packaging of build artifacts into a dated folder.
    #[serde(default)]
    pub package: Option<PackageConfig>,
}

/// One external command invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepConfig {
    /// Human-readable step name for banners and the run log.
    pub description: String,
    /// Program to execute.
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
}

/// Build phase: a step plus a preflight availability check.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildConfig {
    #[serde(flatten)]
    pub step: StepConfig,
    /// Arguments for the preflight check (e.g. `["--version"]`). The build
    /// phase fails before running the step if the check does not succeed.
    #[serde(default = "default_check_args")]
    pub check_args: Vec<String>,
}

fn default_check_args() -> Vec<String> {
    vec!["--version".to_string()]
}

/// Package phase: copy a directory tree into a timestamped folder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageConfig {
    /// Directory whose contents are packaged.
    pub source_dir: PathBuf,
    /// Directory receiving the timestamped package folders.
    pub versions_dir: PathBuf,
    /// Folder name prefix, e.g. `Betterboxd-Extension`.
    pub prefix: String,
}

/// Starter config written by `cine init`.
pub fn starter_toml() -> &'static str {
    r#"[harvest]
output_dir = "outputs"
list_name = "stand_up_comedy"
base_list_url = "https://letterboxd.com/asset/list/stand-up-comedy-a-comprehensive-list/by/rating/"
max_items = 100
min_popularity_count = 1000
page_delay_seconds = 1.0
request_timeout_seconds = 10

[[pipeline.scrape]]
description = "Comedy List Scraper"
command = "cine"
args = ["harvest"]

[[pipeline.process]]
description = "Update Lists"
command = "python"
args = ["update_lists.py"]

[pipeline.build]
description = "Extension Build Process"
command = "node"
args = ["build.js"]
check_args = ["--version"]

[pipeline.package]
source_dir = "MyExtension"
versions_dir = "Extension Versions"
prefix = "Extension"
"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_harvest_defaults() {
        let config: HarvestConfig = toml::from_str("").unwrap();
        assert_eq!(config.max_items, 100);
        assert_eq!(config.min_popularity_count, 0);
        assert_eq!(config.page_delay_seconds, 1.0);
        assert_eq!(config.request_timeout_seconds, 10);
        assert_eq!(config.output_dir, PathBuf::from("outputs"));
    }

    #[test]
    fn test_validate_rejects_empty_url() {
        let config = HarvestConfig::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_max_items() {
        let config = HarvestConfig {
            base_list_url: "https://example.com/list/".to_string(),
            max_items: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_sane_config() {
        let config = HarvestConfig {
            base_list_url: "https://example.com/list/".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_output_paths() {
        let config = HarvestConfig {
            list_name: "comedy".to_string(),
            ..Default::default()
        };
        assert_eq!(config.output_path(), PathBuf::from("outputs/comedy.csv"));
        assert_eq!(
            config.run_log_path(),
            PathBuf::from("outputs/all_outputs.csv")
        );
    }

    #[test]
    fn test_starter_toml_parses() {
        let settings: Settings = toml::from_str(starter_toml()).unwrap();
        assert_eq!(settings.harvest.max_items, 100);
        assert_eq!(settings.harvest.min_popularity_count, 1000);
        assert_eq!(settings.pipeline.scrape.len(), 1);
        assert!(settings.pipeline.build.is_some());
        let build = settings.pipeline.build.unwrap();
        assert_eq!(build.step.command, "node");
        assert_eq!(build.check_args, vec!["--version"]);
    }

    #[test]
    fn test_pipeline_toml_deserialization() {
        let toml_src = r#"
            [[pipeline.scrape]]
            description = "List Scraper"
            command = "cine"
            args = ["harvest", "--max-items", "50"]
        "#;
        let settings: Settings = toml::from_str(toml_src).unwrap();
        assert_eq!(settings.pipeline.scrape[0].description, "List Scraper");
        assert_eq!(settings.pipeline.scrape[0].args.len(), 3);
        assert!(settings.pipeline.build.is_none());
        assert!(settings.pipeline.package.is_none());
    }
}
