//! Report settings
//!
//! Settings are layered, lowest precedence first:
//! 1. Built-in defaults
//! 2. `~/.config/pod-resources/config.toml`, when present
//! 3. An explicitly requested settings file
//! 4. `PODRES_*` environment variables
//!
//! Command line flags are applied on top by the binary.

use crate::observability::RunLogger;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable prefix for settings overrides
pub const ENV_PREFIX: &str = "PODRES";

/// Where pod specifications are read from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Run `kubectl get pods -o json`
    #[default]
    Kubectl,
    /// Query the Kubernetes API directly
    Api,
}

/// Report settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSettings {
    /// Base name of the CSV report
    #[serde(default = "default_output_file")]
    pub output_file: String,

    /// kubectl program to run
    #[serde(default = "default_kubectl")]
    pub kubectl: String,

    /// Pod source
    #[serde(default)]
    pub source: SourceKind,

    /// Restrict the query to one namespace
    #[serde(default)]
    pub namespace: Option<String>,

    /// Upper bound for the cluster query in seconds
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,
}

fn default_output_file() -> String {
    "pod_resources.csv".to_string()
}

fn default_kubectl() -> String {
    "kubectl".to_string()
}

fn default_fetch_timeout() -> u64 {
    60
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            output_file: default_output_file(),
            kubectl: default_kubectl(),
            source: SourceKind::default(),
            namespace: None,
            fetch_timeout_secs: default_fetch_timeout(),
        }
    }
}

impl ReportSettings {
    /// Load settings from the user settings file, `explicit_file` and the
    /// environment
    pub fn load(explicit_file: Option<&Path>) -> Result<Self, config::ConfigError> {
        Self::load_from(
            default_settings_path(),
            explicit_file,
            config::Environment::with_prefix(ENV_PREFIX),
        )
    }

    /// Load settings with a caller-chosen default settings file and
    /// environment layer
    pub fn load_from(
        default_file: Option<PathBuf>,
        explicit_file: Option<&Path>,
        environment: config::Environment,
    ) -> Result<Self, config::ConfigError> {
        let logger = RunLogger::new();
        let mut builder = config::Config::builder();

        if let Some(path) = default_file {
            if path.exists() {
                logger.log_settings_file(&path);
            }
            builder = builder.add_source(config::File::from(path).required(false));
        }

        if let Some(path) = explicit_file {
            logger.log_settings_file(path);
            builder = builder.add_source(config::File::from(path).required(true));
        }

        builder
            .add_source(environment)
            .build()?
            .try_deserialize()
    }

    /// Query timeout as a `Duration`
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Resolve the report path.
    ///
    /// An explicit path wins. Otherwise a non-empty kubeconfig path is used
    /// as a prefix, `<kubeconfig>_<output_file>`, so reports of different
    /// clusters do not overwrite each other.
    pub fn output_path(&self, explicit: Option<&Path>, kubeconfig: Option<&str>) -> PathBuf {
        if let Some(path) = explicit {
            return path.to_path_buf();
        }

        match kubeconfig {
            Some(kubeconfig) if !kubeconfig.is_empty() => {
                PathBuf::from(format!("{}_{}", kubeconfig, self.output_file))
            }
            _ => PathBuf::from(&self.output_file),
        }
    }
}

/// Default location of the user settings file
pub fn default_settings_path() -> Option<PathBuf> {
    dirs_next::home_dir().map(|home| {
        home.join(".config")
            .join("pod-resources")
            .join("config.toml")
    })
}
