use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};

use rand::Rng;

use crate::activation::ActivationFunction;
use crate::error::{Error, Result};
use crate::layers::Layer;
use crate::network::config::BiasUpdate;
use crate::network::persist;
use crate::train::epoch_stats::{EpochStats, TrainingStats};

/// A fully-connected multilayer perceptron trained by per-sample SGD.
///
/// The architecture (`shapes`, layer count, weights per node) is fixed for
/// the lifetime of the network; training only mutates weights and biases in
/// place. `learning_rate`, `activation` and `bias_update` are hyperparameters
/// the caller may change between runs.
///
/// Invariants: `shapes.len() == layers.len() + 1`, `layers[i]` has
/// `shapes[i + 1]` nodes, and each of those nodes has `shapes[i]` weights.
#[derive(Debug, Clone)]
pub struct Network {
    shapes: Vec<usize>,
    layers: Vec<Layer>,
    learning_rate: f64,
    activation: ActivationFunction,
    bias_update: BiasUpdate,
    stats: Option<Arc<TrainingStats>>,
}

impl Network {
    /// Random init for an already validated shape sequence.
    pub(crate) fn random<R: Rng + ?Sized>(
        shapes: &[usize],
        learning_rate: f64,
        activation: ActivationFunction,
        bias_update: BiasUpdate,
        rng: &mut R,
    ) -> Network {
        let layers = shapes.windows(2)
            .map(|pair| Layer::random(pair[1], pair[0], rng))
            .collect();
        tracing::debug!(?shapes, activation = activation.name(), learning_rate, "initialized network");
        Network {
            shapes: shapes.to_vec(),
            layers,
            learning_rate,
            activation,
            bias_update,
            stats: None,
        }
    }

    /// Adopts an existing layer stack, deriving the shape table from it.
    ///
    /// `shapes[0]` is the first layer's per-node weight count and
    /// `shapes[i + 1]` is layer i's node count. Fails if the stack is empty,
    /// has an empty layer, or its widths do not chain.
    pub fn from_layers(
        layers: Vec<Layer>,
        learning_rate: f64,
        activation: ActivationFunction,
        bias_update: BiasUpdate,
    ) -> Result<Network> {
        let shapes = shapes_of(&layers)?;
        Ok(Network {
            shapes,
            layers,
            learning_rate,
            activation,
            bias_update,
            stats: None,
        })
    }

    pub fn shapes(&self) -> &[usize] {
        &self.shapes
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn input_size(&self) -> usize {
        self.shapes[0]
    }

    pub fn output_size(&self) -> usize {
        self.shapes[self.shapes.len() - 1]
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn set_learning_rate(&mut self, learning_rate: f64) {
        self.learning_rate = learning_rate;
    }

    pub fn activation(&self) -> ActivationFunction {
        self.activation
    }

    pub fn set_activation(&mut self, activation: ActivationFunction) {
        self.activation = activation;
    }

    pub fn bias_update(&self) -> BiasUpdate {
        self.bias_update
    }

    pub fn set_bias_update(&mut self, bias_update: BiasUpdate) {
        self.bias_update = bias_update;
    }

    /// Output-layer activations for `input`.
    pub fn forward(&self, input: &[f64]) -> Result<Vec<f64>> {
        self.check_input(input)?;
        let mut activations = self.activations(input);
        Ok(activations.pop().unwrap_or_default())
    }

    /// Inference. Same as [`forward`](Self::forward); never mutates.
    pub fn predict(&self, input: &[f64]) -> Result<Vec<f64>> {
        self.forward(input)
    }

    /// One SGD step on a single `(input, target)` pair.
    pub fn backward(&mut self, input: &[f64], target: &[f64]) -> Result<()> {
        self.check_input(input)?;
        self.check_target(target)?;
        self.step(input, target);
        Ok(())
    }

    /// Trains for up to `epochs` passes over the data, in the given sample
    /// order, recording statistics into a fresh [`TrainingStats`].
    ///
    /// `on_epoch` runs after every epoch with its index and the network's
    /// current state; returning `false` stops training. Returns the number of
    /// epochs completed.
    pub fn train<F>(
        &mut self,
        epochs: usize,
        inputs: &[Vec<f64>],
        targets: &[Vec<f64>],
        on_epoch: F,
    ) -> Result<usize>
    where
        F: FnMut(usize, &Network) -> bool,
    {
        self.train_recorded(Arc::new(TrainingStats::new()), epochs, inputs, targets, on_epoch)
    }

    /// Like [`train`](Self::train) but publishes into `stats`, which the
    /// caller may read concurrently.
    pub fn train_recorded<F>(
        &mut self,
        stats: Arc<TrainingStats>,
        epochs: usize,
        inputs: &[Vec<f64>],
        targets: &[Vec<f64>],
        mut on_epoch: F,
    ) -> Result<usize>
    where
        F: FnMut(usize, &Network) -> bool,
    {
        self.check_dataset(inputs, targets)?;
        self.stats = Some(Arc::clone(&stats));

        let mut completed = 0;
        for epoch in 0..epochs {
            let started_at = SystemTime::now();
            let t_start = Instant::now();

            for (input, target) in inputs.iter().zip(targets.iter()) {
                self.step(input, target);
            }

            stats.record(EpochStats {
                id: epoch,
                started_at,
                elapsed: t_start.elapsed(),
                inputs: inputs.len(),
            });
            completed = epoch + 1;

            if !on_epoch(epoch, self) {
                break;
            }
        }

        stats.finish();
        Ok(completed)
    }

    /// Statistics of a completed epoch of the most recent training run.
    pub fn epoch_stats(&self, epoch: usize) -> Option<EpochStats> {
        self.stats.as_ref().and_then(|s| s.epoch(epoch))
    }

    /// Length of the most recent training run (still growing while it runs);
    /// `None` if the network was never trained.
    pub fn training_duration(&self) -> Option<Duration> {
        self.stats.as_ref().map(|s| s.duration())
    }

    /// Handle on the most recent run's statistics.
    pub fn training_stats(&self) -> Option<Arc<TrainingStats>> {
        self.stats.clone()
    }

    /// Writes the weights and biases (no hyperparameters) to `writer`.
    pub fn save<W: Write>(&self, writer: W) -> Result<()> {
        persist::encode(&self.layers, writer)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        persist::encode_to_vec(&self.layers)
    }

    pub fn save_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.save(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Engine
    // -----------------------------------------------------------------------

    /// Activations of every layer, input layer excluded. Caller guarantees
    /// `input.len() == shapes[0]`.
    fn activations(&self, input: &[f64]) -> Vec<Vec<f64>> {
        let mut activations: Vec<Vec<f64>> = Vec::with_capacity(self.layers.len());
        for layer in &self.layers {
            let previous = activations.last().map_or(input, |a| a.as_slice());
            let current = layer.feed_from(previous, &self.activation);
            activations.push(current);
        }
        activations
    }

    /// Unchecked single-sample update: forward, deltas from the output back,
    /// then weight/bias updates using the pre-update weights' deltas.
    fn step(&mut self, input: &[f64], target: &[f64]) {
        let activations = self.activations(input);
        let depth = self.layers.len();

        // δ[l][i] = err[l][i] · f'(a[l][i]), where err is (target − output)
        // at the output layer and Σ_j δ[l+1][j]·w[l+1][j][i] below it.
        let mut deltas: Vec<Vec<f64>> = vec![Vec::new(); depth];
        for l in (0..depth).rev() {
            let current = &activations[l];
            let delta: Vec<f64> = current.iter().enumerate()
                .map(|(i, &a)| {
                    let err = if l + 1 == depth {
                        target[i] - a
                    } else {
                        self.layers[l + 1].nodes.iter().zip(deltas[l + 1].iter())
                            .map(|(node, d)| d * node.weights[i])
                            .sum()
                    };
                    err * self.activation.derivative(a)
                })
                .collect();
            deltas[l] = delta;
        }

        let lr = self.learning_rate;
        let bias_update = self.bias_update;
        for l in (0..depth).rev() {
            let previous: &[f64] = if l == 0 { input } else { &activations[l - 1] };
            for (node, &delta) in self.layers[l].nodes.iter_mut().zip(deltas[l].iter()) {
                match bias_update {
                    BiasUpdate::Overwrite  => node.bias = lr * delta,
                    BiasUpdate::Accumulate => node.bias += lr * delta,
                }
                for (w, &a) in node.weights.iter_mut().zip(previous.iter()) {
                    *w += lr * a * delta;
                }
            }
        }
    }

    fn check_input(&self, input: &[f64]) -> Result<()> {
        if input.len() != self.input_size() {
            return Err(Error::InputMismatch { expected: self.input_size(), got: input.len() });
        }
        Ok(())
    }

    fn check_target(&self, target: &[f64]) -> Result<()> {
        if target.len() != self.output_size() {
            return Err(Error::TargetMismatch { expected: self.output_size(), got: target.len() });
        }
        Ok(())
    }

    /// Validates the whole dataset up front so a bad sample can't leave the
    /// network half-trained.
    fn check_dataset(&self, inputs: &[Vec<f64>], targets: &[Vec<f64>]) -> Result<()> {
        if inputs.is_empty() {
            return Err(Error::Dataset("no training samples".into()));
        }
        if inputs.len() != targets.len() {
            return Err(Error::Dataset(format!(
                "{} inputs but {} targets",
                inputs.len(),
                targets.len()
            )));
        }
        for (input, target) in inputs.iter().zip(targets.iter()) {
            self.check_input(input)?;
            self.check_target(target)?;
        }
        Ok(())
    }
}

/// Derives the shape table of a layer stack, checking that it chains.
fn shapes_of(layers: &[Layer]) -> Result<Vec<usize>> {
    let first = layers.first()
        .ok_or_else(|| Error::config("network has no layers"))?;

    let mut shapes = Vec::with_capacity(layers.len() + 1);
    shapes.push(first.input_size());
    for layer in layers {
        shapes.push(layer.size());
    }

    if shapes.iter().any(|&s| s == 0) {
        return Err(Error::ShapeMismatch { expected: Vec::new(), found: shapes });
    }

    // Per layer: the input width it should consume vs. the first offending
    // node's weight count.
    let expected = &shapes[..layers.len()];
    let found: Vec<usize> = layers.iter().zip(expected.iter())
        .map(|(layer, &want)| {
            layer.nodes.iter()
                .map(|n| n.weights.len())
                .find(|&got| got != want)
                .unwrap_or(want)
        })
        .collect();
    if found != expected {
        return Err(Error::ShapeMismatch { expected: expected.to_vec(), found });
    }
    Ok(shapes)
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Shapes: {:?}", self.shapes)?;
        writeln!(f, "Hidden Layers: {}", self.layers.len() - 1)
    }
}
