//! # Runtime Configuration
//!
//! Defaults, optionally replaced by a JSON file named in `IX_CONFIG`, then
//! overridden field by field from the environment.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{ensure, Context, Result};
use ix_01_validation::ValidatorConfig;
use ix_03_sequencing::SequencerConfig;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub const ENV_INPUT: &str = "IX_INPUT";
pub const ENV_CONFIG: &str = "IX_CONFIG";
pub const ENV_ENFORCE_WITHDRAW_BALANCE: &str = "IX_ENFORCE_WITHDRAW_BALANCE";
pub const ENV_MAX_BATCH_SIZE: &str = "IX_MAX_BATCH_SIZE";
pub const ENV_PARALLEL_LANES: &str = "IX_PARALLEL_LANES";

/// Complete runtime configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Newline-delimited envelope file. Stdin when unset.
    pub input: Option<PathBuf>,
    pub validator: ValidatorConfig,
    pub sequencer: SequencerConfig,
}

impl RuntimeConfig {
    /// Load from the process environment.
    pub fn load() -> Result<Self> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` in place of the process environment.
    pub fn load_with(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = match lookup(ENV_CONFIG) {
            Some(path) => {
                info!(path = %path, "Loading configuration file");
                Self::from_file(Path::new(&path))?
            }
            None => Self::default(),
        };

        if let Some(path) = lookup(ENV_INPUT) {
            config.input = Some(PathBuf::from(path));
        }
        if let Some(flag) = parse_var(&lookup, ENV_ENFORCE_WITHDRAW_BALANCE) {
            config.validator.enforce_withdraw_balance = flag;
        }
        if let Some(size) = parse_var(&lookup, ENV_MAX_BATCH_SIZE) {
            config.sequencer.max_batch_size = size;
        }
        if let Some(flag) = parse_var(&lookup, ENV_PARALLEL_LANES) {
            config.sequencer.parallel_lanes = flag;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.sequencer.max_batch_size > 0,
            "sequencer.max_batch_size must be positive"
        );
        Ok(())
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "Ignoring unparsable environment override");
            None
        }
    }
}
