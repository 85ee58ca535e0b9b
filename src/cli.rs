use crate::config::{ConsoleConfigOverrides, FaultPolicy};
use anyhow::{anyhow, bail, Result};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CliOverrides {
    config: Option<PathBuf>,
    prefs: Option<PathBuf>,
    fault_policy: Option<FaultPolicy>,
    echo: Option<bool>,
}

impl CliOverrides {
    pub fn parse_from_env() -> Result<Self> {
        Self::parse(env::args())
    }

    pub fn parse<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut overrides = CliOverrides::default();
        let mut iter = args.into_iter();
        let _ = iter.next(); // skip program name if present
        while let Some(raw_flag) = iter.next() {
            let flag = raw_flag.as_ref();
            let Some(key) = flag.strip_prefix("--") else {
                bail!("Unexpected argument '{flag}'. Use --config/--prefs/--fault-policy/--echo with values.");
            };
            let value =
                iter.next().ok_or_else(|| anyhow!("Expected a value after '{flag}'"))?.as_ref().to_string();
            match key {
                "config" => overrides.config = Some(PathBuf::from(value)),
                "prefs" => overrides.prefs = Some(PathBuf::from(value)),
                "fault-policy" => overrides.fault_policy = Some(parse_fault_policy(&value)?),
                "echo" => overrides.echo = Some(parse_bool_flag("echo", &value)?),
                _ => bail!("Unknown flag '{flag}'. Supported flags: --config, --prefs, --fault-policy, --echo."),
            }
        }
        Ok(overrides)
    }

    pub fn config_path(&self) -> Option<&PathBuf> {
        self.config.as_ref()
    }

    pub fn into_config_overrides(self) -> ConsoleConfigOverrides {
        ConsoleConfigOverrides { prefs_path: self.prefs, fault_policy: self.fault_policy, echo_stderr: self.echo }
    }
}

fn parse_fault_policy(value: &str) -> Result<FaultPolicy> {
    match value.to_ascii_lowercase().as_str() {
        "report" => Ok(FaultPolicy::Report),
        "propagate" => Ok(FaultPolicy::Propagate),
        other => bail!("Invalid fault policy '{other}'. Use report or propagate."),
    }
}

fn parse_bool_flag(flag: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Ok(true),
        "0" | "false" | "off" | "no" => Ok(false),
        other => bail!("Invalid {flag} value '{other}'. Use on/off or true/false."),
    }
}
