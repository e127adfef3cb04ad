use std::time::Duration;

use crate::loss::LossFunction;

/// Options for a supervised training run.
///
/// # Fields
/// - `report_every`: how often the reporter thread logs the latest finished
///                    epoch; default 5 seconds.
/// - `loss`        : loss evaluated over the full dataset for reporting;
///                    default mean-squared error. Does not affect gradients.
/// - `loss_every`  : report loss every this many epochs; `None` means
///                    `epochs / 10` (at least 1).
#[derive(Debug, Clone, Copy)]
pub struct TrainConfig {
    pub report_every: Duration,
    pub loss: LossFunction,
    pub loss_every: Option<usize>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig {
            report_every: Duration::from_secs(5),
            loss: LossFunction::MeanSquaredError,
            loss_every: None,
        }
    }
}

impl TrainConfig {
    pub fn with_report_every(mut self, report_every: Duration) -> Self {
        self.report_every = report_every;
        self
    }

    pub fn with_loss(mut self, loss: LossFunction) -> Self {
        self.loss = loss;
        self
    }

    pub fn with_loss_every(mut self, loss_every: usize) -> Self {
        self.loss_every = Some(loss_every);
        self
    }

    /// Epoch interval between loss reports for a run of `epochs` epochs.
    pub fn loss_interval(&self, epochs: usize) -> usize {
        self.loss_every.unwrap_or(epochs / 10).max(1)
    }
}
