use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "config/console.json";

/// What `Console::submit` does when a handler returns an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultPolicy {
    /// Append an error line to the console and carry on.
    #[default]
    Report,
    /// Hand the fault back to the caller of `submit`.
    Propagate,
}

impl FaultPolicy {
    pub fn label(self) -> &'static str {
        match self {
            FaultPolicy::Report => "report",
            FaultPolicy::Propagate => "propagate",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConsoleConfig {
    #[serde(default = "ConsoleConfig::default_prefs_path")]
    pub prefs_path: PathBuf,
    #[serde(default = "ConsoleConfig::default_history_capacity")]
    pub history_capacity: usize,
    #[serde(default)]
    pub fault_policy: FaultPolicy,
    #[serde(default = "ConsoleConfig::default_echo_stderr")]
    pub echo_stderr: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ConsoleConfigOverrides {
    pub prefs_path: Option<PathBuf>,
    pub fault_policy: Option<FaultPolicy>,
    pub echo_stderr: Option<bool>,
}

impl ConsoleConfig {
    fn default_prefs_path() -> PathBuf {
        PathBuf::from("config/console_prefs.json")
    }

    const fn default_history_capacity() -> usize {
        64
    }

    const fn default_echo_stderr() -> bool {
        false
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents =
            fs::read_to_string(path).with_context(|| format!("reading console config '{}'", path.display()))?;
        serde_json::from_str(&contents).with_context(|| format!("parsing console config '{}'", path.display()))
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!("[console] {err:#}. Falling back to default console config.");
                Self::default()
            }
        }
    }

    pub fn apply_overrides(&mut self, overrides: &ConsoleConfigOverrides) {
        if let Some(path) = &overrides.prefs_path {
            self.prefs_path = path.clone();
        }
        if let Some(policy) = overrides.fault_policy {
            self.fault_policy = policy;
        }
        if let Some(echo) = overrides.echo_stderr {
            self.echo_stderr = echo;
        }
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            prefs_path: Self::default_prefs_path(),
            history_capacity: Self::default_history_capacity(),
            fault_policy: FaultPolicy::default(),
            echo_stderr: Self::default_echo_stderr(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_use_defaults() {
        let config: ConsoleConfig = serde_json::from_str(r#"{"fault_policy":"propagate"}"#).expect("parse");
        assert_eq!(config.fault_policy, FaultPolicy::Propagate);
        assert_eq!(config.history_capacity, 64);
        assert_eq!(config.prefs_path, PathBuf::from("config/console_prefs.json"));
        assert!(!config.echo_stderr);
    }

    #[test]
    fn overrides_replace_only_given_fields() {
        let mut config = ConsoleConfig::default();
        config.apply_overrides(&ConsoleConfigOverrides {
            prefs_path: None,
            fault_policy: Some(FaultPolicy::Propagate),
            echo_stderr: Some(true),
        });
        assert_eq!(config.fault_policy, FaultPolicy::Propagate);
        assert!(config.echo_stderr);
        assert_eq!(config.prefs_path, PathBuf::from("config/console_prefs.json"));
    }
}
