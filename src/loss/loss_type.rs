use serde::{Deserialize, Serialize};

use crate::loss::log_loss::{binary_log_loss, log_loss};
use crate::loss::mse::mean_squared_error;

/// Batch loss signature: `(predictions, targets) -> scalar`.
pub type LossFn = fn(&[Vec<f64>], &[Vec<f64>]) -> f64;

/// Selects the loss the orchestrator reports during training.
///
/// Loss is observability only; the backward pass always uses
/// squared-error deltas regardless of this choice.
///
/// - `MeanSquaredError`: default; any output activation.
/// - `LogLoss`         : sigmoid outputs, summed over units.
/// - `BinaryLogLoss`   : sigmoid output, first unit only.
/// - `Custom`          : caller-supplied reduction (not representable in JSON).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LossFunction {
    #[default]
    MeanSquaredError,
    LogLoss,
    BinaryLogLoss,
    #[serde(skip)]
    Custom(LossFn),
}

impl LossFunction {
    pub fn evaluate(&self, predictions: &[Vec<f64>], targets: &[Vec<f64>]) -> f64 {
        match self {
            LossFunction::MeanSquaredError => mean_squared_error(predictions, targets),
            LossFunction::LogLoss          => log_loss(predictions, targets),
            LossFunction::BinaryLogLoss    => binary_log_loss(predictions, targets),
            LossFunction::Custom(f)        => f(predictions, targets),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LossFunction::MeanSquaredError => "mse",
            LossFunction::LogLoss          => "log_loss",
            LossFunction::BinaryLogLoss    => "binary_log_loss",
            LossFunction::Custom(_)        => "custom",
        }
    }
}
