//! Checkpoints from the earlier fixed two-layer engine.
//!
//! That engine stored one input→hidden and one hidden→output matrix, indexed
//! `[from][to]`, with separate bias vectors. Converting transposes each
//! matrix into per-node incoming weight vectors.

use std::io::Read;

use bincode::Options;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::layers::{Layer, Node};
use crate::network::config::NetworkConfig;
use crate::network::network::Network;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyNetwork {
    pub input_size: usize,
    /// `[input][hidden]`
    pub input_weights: Vec<Vec<f64>>,
    pub input_biases: Vec<f64>,
    pub hidden_size: usize,
    /// `[hidden][output]`
    pub hidden_weights: Vec<Vec<f64>>,
    pub hidden_biases: Vec<f64>,
    pub output_size: usize,
}

impl LegacyNetwork {
    /// Decodes a legacy record written with the same codec as current
    /// checkpoints.
    pub fn load<R: Read>(mut reader: R) -> Result<LegacyNetwork> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        let legacy = bincode::DefaultOptions::new()
            .with_fixint_encoding()
            .with_little_endian()
            .with_limit(bytes.len() as u64)
            .deserialize(&bytes)?;
        Ok(legacy)
    }

    /// Builds an `[input_size, hidden_size, output_size]` network with the
    /// same outputs, taking hyperparameters from `config` (its `shapes` are
    /// ignored).
    pub fn into_network(self, config: &NetworkConfig) -> Result<Network> {
        let hidden = transpose(&self.input_weights, &self.input_biases, self.input_size, self.hidden_size)?;
        let output = transpose(&self.hidden_weights, &self.hidden_biases, self.hidden_size, self.output_size)?;
        Network::from_layers(
            vec![hidden, output],
            config.learning_rate,
            config.activation,
            config.bias_update,
        )
    }
}

/// `matrix[from][to]` + `biases[to]` → one node per `to`.
fn transpose(matrix: &[Vec<f64>], biases: &[f64], from: usize, to: usize) -> Result<Layer> {
    let ragged = matrix.len() != from
        || biases.len() != to
        || matrix.iter().any(|row| row.len() != to);
    if ragged {
        return Err(Error::ShapeMismatch {
            expected: vec![from, to],
            found: vec![matrix.len(), matrix.first().map_or(0, |r| r.len())],
        });
    }

    let nodes = biases.iter().enumerate()
        .map(|(i, &bias)| Node {
            weights: matrix.iter().map(|row| row[i]).collect(),
            bias,
        })
        .collect();
    Ok(Layer { nodes })
}
