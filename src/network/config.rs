use std::fs::File;
use std::io::{BufReader, BufWriter, Read};
use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::activation::ActivationFunction;
use crate::error::{Error, Result};
use crate::network::network::Network;
use crate::network::persist;

/// How the backward pass updates node biases.
///
/// Weights are always accumulated (`w += lr·a·δ`). The reference engine
/// overwrites biases with `lr·δ` instead of accumulating them, and numeric
/// setups tuned against it depend on that, so `Overwrite` stays the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BiasUpdate {
    /// `bias = lr·δ`
    #[default]
    Overwrite,
    /// `bias += lr·δ`
    Accumulate,
}

/// Everything needed to construct a [`Network`].
///
/// # Fields
/// - `shapes`       : layer widths; first entry is the input dimension,
///                     last the output dimension. Required for `build`,
///                     optional (empty) for `load`.
/// - `learning_rate`: SGD step size, default `0.1`.
/// - `activation`   : nonlinearity and its output-space derivative,
///                     default sigmoid.
/// - `bias_update`  : see [`BiasUpdate`], default `Overwrite`.
///
/// Only `learning_rate`, `activation` and `bias_update` are kept by the
/// network; they are not persisted with the weights and must be supplied
/// again on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub shapes: Vec<usize>,
    pub learning_rate: f64,
    pub activation: ActivationFunction,
    pub bias_update: BiasUpdate,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        NetworkConfig {
            shapes: Vec::new(),
            learning_rate: 0.1,
            activation: ActivationFunction::Sigmoid,
            bias_update: BiasUpdate::Overwrite,
        }
    }
}

impl NetworkConfig {
    pub fn new(shapes: impl Into<Vec<usize>>) -> Self {
        NetworkConfig { shapes: shapes.into(), ..Default::default() }
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_activation(mut self, activation: ActivationFunction) -> Self {
        self.activation = activation;
        self
    }

    pub fn with_bias_update(mut self, bias_update: BiasUpdate) -> Self {
        self.bias_update = bias_update;
        self
    }

    /// Checks the shape sequence and hyperparameters.
    pub fn validate(&self) -> Result<()> {
        if self.shapes.len() < 2 {
            return Err(Error::config(format!(
                "need at least an input and an output width, got shapes {:?}",
                self.shapes
            )));
        }
        if let Some(i) = self.shapes.iter().position(|&s| s == 0) {
            return Err(Error::config(format!(
                "shapes[{i}] is zero in {:?}; every width must be positive",
                self.shapes
            )));
        }
        self.validate_hyperparams()
    }

    fn validate_hyperparams(&self) -> Result<()> {
        if !self.learning_rate.is_finite() {
            return Err(Error::config(format!(
                "learning rate must be finite, got {}",
                self.learning_rate
            )));
        }
        Ok(())
    }

    /// Fresh network with weights and biases drawn from U(-0.5, 0.5).
    pub fn build(&self) -> Result<Network> {
        self.build_with_rng(&mut rand::thread_rng())
    }

    pub fn build_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Network> {
        self.validate()?;
        Ok(Network::random(&self.shapes, self.learning_rate, self.activation, self.bias_update, rng))
    }

    /// Decodes weights written by [`Network::save`] and attaches this
    /// config's hyperparameters.
    ///
    /// The shape table is reconstructed from the weights. If `shapes` is
    /// non-empty it must match, otherwise `ShapeMismatch` is returned.
    /// Whether `activation` matches the one used for training is not
    /// checked.
    pub fn load<R: Read>(&self, reader: R) -> Result<Network> {
        self.validate_hyperparams()?;
        let layers = persist::decode(reader)?;
        let network = Network::from_layers(layers, self.learning_rate, self.activation, self.bias_update)?;
        if !self.shapes.is_empty() && self.shapes != network.shapes() {
            return Err(Error::ShapeMismatch {
                expected: self.shapes.clone(),
                found: network.shapes().to_vec(),
            });
        }
        tracing::debug!(shapes = ?network.shapes(), "loaded network weights");
        Ok(network)
    }

    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<Network> {
        let file = File::open(path)?;
        self.load(BufReader::new(file))
    }

    /// Serializes the config to a pretty-printed JSON file.
    ///
    /// Fails for `ActivationFunction::Custom`, which has no JSON form.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Reads a config from JSON. Missing fields take their defaults.
    pub fn load_json(path: impl AsRef<Path>) -> Result<NetworkConfig> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}
