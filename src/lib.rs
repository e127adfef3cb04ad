//! A from-scratch multilayer perceptron: fully-connected layers, per-sample
//! SGD backpropagation, supervised multi-threaded training and binary
//! checkpoints of the learned weights.

pub mod error;
pub mod math;
pub mod activation;
pub mod layers;
pub mod network;
pub mod loss;
pub mod train;

// Convenience re-exports
pub use error::{Error, Result};
pub use activation::ActivationFunction;
pub use layers::{Layer, Node};
pub use network::{BiasUpdate, LegacyNetwork, Model, Network, NetworkConfig};
pub use loss::{LossFunction, log_loss, binary_log_loss, mean_squared_error};
pub use train::{train, CancellationToken, EpochStats, TrainConfig, TrainReport, TrainingStats};
