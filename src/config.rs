//! Protocol parameters, with an optional file-based loader built on the `config` crate.
//!
//! `Node::new` still takes its parameters directly; `Config` is convenience sugar for
//! an embedding driver that wants to describe a whole simulation run (including the
//! sampling seed) in one place.

use config::{Config as RawConfig, ConfigError, File};
use serde::Deserialize;

use crate::error::{Error, Result};

/// Protocol parameters for one [`Node`](crate::node::Node), plus the sampling seed for
/// the simulation as a whole.
///
/// Defaults: `k = 10`, `alpha = 0.75`, `beta1 = beta2 = 10`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Number of peers sampled per query round.
    pub k: usize,
    /// Fraction of the sample that must respond positively to set a chit.
    pub alpha: f64,
    /// Confidence threshold for early commit.
    pub beta1: u64,
    /// Consecutive-round threshold for counted commit.
    pub beta2: u64,
    /// Seed for the peer-sampling PRNG. `None` means entropy-seeded.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config { k: 10, alpha: 0.75, beta1: 10, beta2: 10, seed: None }
    }
}

impl Config {
    /// Load configuration from a single file source. Any field absent from the file
    /// keeps its [`Default`] value.
    pub fn from_file(path: &str) -> Result<Config> {
        let raw = RawConfig::builder()
            .add_source(File::with_name(path))
            .build()
            .map_err(config_err)?;
        raw.try_deserialize().map_err(config_err)
    }
}

fn config_err(_e: ConfigError) -> Error {
    Error::InvalidConfig
}
