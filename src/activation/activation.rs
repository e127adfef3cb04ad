use serde::{Deserialize, Serialize};
use std::f64::consts::E;

/// sigmoid(x) = 1 / (1 + e^-x)
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + E.powf(-x))
}

/// Derivative of sigmoid, taken over its output: y = sigmoid(x) → y·(1 − y).
pub fn sigmoid_derivative(y: f64) -> f64 {
    y * (1.0 - y)
}

pub fn tanh(x: f64) -> f64 {
    x.tanh()
}

/// Derivative of tanh over its output: y = tanh(x) → 1 − y².
pub fn tanh_derivative(y: f64) -> f64 {
    1.0 - y * y
}

pub fn relu(x: f64) -> f64 {
    if x > 0.0 { x } else { 0.0 }
}

/// Step derivative of ReLU. relu(x) > 0 exactly when x > 0, so the same
/// function is valid over the activated value and over the pre-activation.
pub fn relu_derivative(y: f64) -> f64 {
    if y > 0.0 { 1.0 } else { 0.0 }
}

/// Nonlinearity applied to every node's weighted sum.
///
/// Every derivative is expressed over the *output* of the activation:
/// the backward pass calls `derivative(activation(x))`, never
/// `derivative(x)`. A `Custom` pair must follow the same convention.
///
/// Activations are not persisted with the weights; callers re-supply the
/// one the weights were trained with when loading.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActivationFunction {
    #[default]
    Sigmoid,
    Tanh,
    #[serde(rename = "relu")]
    ReLU,
    Identity,
    /// Caller-supplied pair. Not representable in JSON configs.
    #[serde(skip)]
    Custom {
        function: fn(f64) -> f64,
        derivative: fn(f64) -> f64,
    },
}

impl ActivationFunction {
    pub fn function(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Sigmoid => sigmoid(x),
            ActivationFunction::Tanh => tanh(x),
            ActivationFunction::ReLU => relu(x),
            ActivationFunction::Identity => x,
            ActivationFunction::Custom { function, .. } => function(x),
        }
    }

    /// Derivative evaluated at `y`, the value returned by `function`.
    pub fn derivative(&self, y: f64) -> f64 {
        match self {
            ActivationFunction::Sigmoid => sigmoid_derivative(y),
            ActivationFunction::Tanh => tanh_derivative(y),
            ActivationFunction::ReLU => relu_derivative(y),
            ActivationFunction::Identity => 1.0,
            ActivationFunction::Custom { derivative, .. } => derivative(y),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ActivationFunction::Sigmoid => "sigmoid",
            ActivationFunction::Tanh => "tanh",
            ActivationFunction::ReLU => "relu",
            ActivationFunction::Identity => "identity",
            ActivationFunction::Custom { .. } => "custom",
        }
    }
}
