//! Run configuration.
//!
//! `TrainConfig` bundles every knob of a training run. It is validated once, before any
//! parameter is initialized or any sample generated.

#[cfg(feature = "serde")]
use std::path::Path;

use crate::{Dims, Error, Result, Tolerance};

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct TrainConfig {
    pub input_dim: usize,
    pub hidden_dim: usize,
    pub output_dim: usize,
    pub learning_rate: f64,
    pub epochs: usize,
    /// Size of the generated dataset. Independent of `epochs`.
    pub samples: usize,
    /// Seeds weight initialization, then data generation.
    pub seed: u64,
    pub test_input: Vec<f64>,
    pub tolerance: Tolerance,
    /// Log the mean epoch loss every `report_every` epochs.
    pub report_every: usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            input_dim: 2,
            hidden_dim: 9,
            output_dim: 1,
            learning_rate: 0.01,
            epochs: 3696,
            samples: 3696,
            seed: 0,
            test_input: vec![7.0, 3.5],
            tolerance: Tolerance::default(),
            report_every: 1000,
        }
    }
}

impl TrainConfig {
    #[inline]
    pub fn dims(&self) -> Dims {
        Dims::new(self.input_dim, self.hidden_dim, self.output_dim)
    }

    /// Check every field; the first violation is returned as `Error::InvalidConfig`.
    pub fn validate(&self) -> Result<()> {
        self.dims().validate()?;
        if self.output_dim != 1 {
            return Err(Error::InvalidConfig(format!(
                "addition data has one target, output width must be 1, got {}",
                self.output_dim
            )));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "learning rate must be finite and > 0, got {}",
                self.learning_rate
            )));
        }
        if self.epochs == 0 {
            return Err(Error::InvalidConfig("epochs must be > 0".to_owned()));
        }
        if self.samples == 0 {
            return Err(Error::InvalidConfig("samples must be > 0".to_owned()));
        }
        if self.test_input.len() != self.input_dim {
            return Err(Error::InvalidConfig(format!(
                "test input has len {}, expected input width {}",
                self.test_input.len(),
                self.input_dim
            )));
        }
        if !self.test_input.iter().all(|v| v.is_finite()) {
            return Err(Error::InvalidConfig("test input must be finite".to_owned()));
        }
        self.tolerance.validate()?;
        if self.report_every == 0 {
            return Err(Error::InvalidConfig("report_every must be > 0".to_owned()));
        }
        Ok(())
    }
}

#[cfg(feature = "serde")]
impl TrainConfig {
    /// Parse and validate a config from JSON. Missing fields take their defaults.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let cfg: TrainConfig = serde_json::from_str(s)
            .map_err(|e| Error::InvalidConfig(format!("failed to parse config json: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let p = path.as_ref();
        let s = std::fs::read_to_string(p)
            .map_err(|e| Error::InvalidConfig(format!("failed to read {}: {e}", p.display())))?;
        Self::from_json_str(&s)
    }
}
