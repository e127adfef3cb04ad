use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use crate::error::Result;
use crate::network::network::Network;
use crate::train::epoch_stats::{EpochStats, TrainingStats};

/// Called after each epoch with its index and a read-only view of the model.
/// Returning `false` stops training.
pub type EpochCallback<'a> = dyn FnMut(usize, &dyn Model) -> bool + 'a;

/// The capability set the training orchestrator drives.
///
/// [`Network`] is the production implementation; the trait exists so the
/// orchestrator does not depend on a concrete network type.
pub trait Model: Send {
    /// Runs up to `epochs` epochs, publishing finished epochs to `stats`.
    /// Returns the number of epochs completed.
    fn train(
        &mut self,
        stats: Arc<TrainingStats>,
        epochs: usize,
        inputs: &[Vec<f64>],
        targets: &[Vec<f64>],
        on_epoch: &mut EpochCallback<'_>,
    ) -> Result<usize>;

    fn predict(&self, input: &[f64]) -> Result<Vec<f64>>;

    fn save(&self, writer: &mut dyn Write) -> Result<()>;

    fn epoch_stats(&self, epoch: usize) -> Option<EpochStats>;

    fn training_duration(&self) -> Option<Duration>;
}

impl Model for Network {
    fn train(
        &mut self,
        stats: Arc<TrainingStats>,
        epochs: usize,
        inputs: &[Vec<f64>],
        targets: &[Vec<f64>],
        on_epoch: &mut EpochCallback<'_>,
    ) -> Result<usize> {
        self.train_recorded(stats, epochs, inputs, targets, |epoch, net| on_epoch(epoch, net))
    }

    fn predict(&self, input: &[f64]) -> Result<Vec<f64>> {
        Network::predict(self, input)
    }

    fn save(&self, writer: &mut dyn Write) -> Result<()> {
        Network::save(self, writer)
    }

    fn epoch_stats(&self, epoch: usize) -> Option<EpochStats> {
        Network::epoch_stats(self, epoch)
    }

    fn training_duration(&self) -> Option<Duration> {
        Network::training_duration(self)
    }
}
