//! Network serialization/deserialization (feature: `serde`).
//!
//! A versioned on-disk format for trained parameters. The internal `Network`/`Layer`
//! structs are not serialized directly; loading validates dimensions, buffer lengths and
//! that every parameter is finite.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Dims, Error, Network, Result};

pub const MODEL_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedNetwork {
    pub format_version: u32,
    pub input_dim: usize,
    pub hidden_dim: usize,
    pub output_dim: usize,
    /// Row-major (input_dim, hidden_dim).
    pub w1: Vec<f64>,
    pub b1: Vec<f64>,
    /// Row-major (hidden_dim, output_dim).
    pub w2: Vec<f64>,
    pub b2: Vec<f64>,
}

impl From<&Network> for SerializedNetwork {
    fn from(network: &Network) -> Self {
        let dims = network.dims();
        Self {
            format_version: MODEL_FORMAT_VERSION,
            input_dim: dims.input,
            hidden_dim: dims.hidden,
            output_dim: dims.output,
            w1: network.w1().to_vec(),
            b1: network.b1().to_vec(),
            w2: network.w2().to_vec(),
            b2: network.b2().to_vec(),
        }
    }
}

impl TryFrom<SerializedNetwork> for Network {
    type Error = Error;

    fn try_from(ser: SerializedNetwork) -> Result<Self> {
        if ser.format_version != MODEL_FORMAT_VERSION {
            return Err(Error::InvalidData(format!(
                "unsupported model format_version {}; expected {}",
                ser.format_version, MODEL_FORMAT_VERSION
            )));
        }
        let dims = Dims::new(ser.input_dim, ser.hidden_dim, ser.output_dim);
        Network::from_parts(dims, ser.w1, ser.b1, ser.w2, ser.b2)
    }
}

impl Network {
    /// Serialize the network to a pretty-printed JSON string.
    pub fn to_json_string_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(&SerializedNetwork::from(self))
            .map_err(|e| Error::InvalidData(format!("failed to serialize network: {e}")))
    }

    /// Serialize the network to a compact JSON string.
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string(&SerializedNetwork::from(self))
            .map_err(|e| Error::InvalidData(format!("failed to serialize network: {e}")))
    }

    /// Parse a network from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let ser: SerializedNetwork = serde_json::from_str(s)
            .map_err(|e| Error::InvalidData(format!("failed to parse network json: {e}")))?;
        ser.try_into()
    }

    /// Save the network to a JSON file (pretty-printed).
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let s = self.to_json_string_pretty()?;
        let p = path.as_ref();
        std::fs::write(p, s)
            .map_err(|e| Error::InvalidData(format!("failed to write {}: {e}", p.display())))
    }

    /// Load a network from a JSON file.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let p = path.as_ref();
        let s = std::fs::read_to_string(p)
            .map_err(|e| Error::InvalidData(format!("failed to read {}: {e}", p.display())))?;
        Self::from_json_str(&s)
    }
}
