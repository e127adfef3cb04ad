use std::any::Any;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::loss::LossFunction;
use crate::network::model::Model;
use crate::train::cancel::CancellationToken;
use crate::train::epoch_stats::TrainingStats;
use crate::train::train_config::TrainConfig;

/// Outcome of a supervised training run.
#[derive(Debug, Clone)]
pub struct TrainReport {
    /// Epochs fully processed.
    pub epochs_completed: usize,
    /// True when the run stopped early because of the cancellation token.
    pub cancelled: bool,
    /// Wall-clock length of the run.
    pub duration: Duration,
    /// Most recent loss reported, if any report happened.
    pub last_loss: Option<f64>,
    /// Per-epoch statistics of this run.
    pub stats: Arc<TrainingStats>,
}

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Trains `model` for up to `epochs` epochs under supervision.
///
/// Two threads run for the duration of the call:
/// - the trainer, which owns `model`, processes samples strictly in order and
///   after every epoch reports loss (every `config.loss_interval(epochs)`
///   epochs) and checks `cancel`;
/// - the reporter, which wakes every `config.report_every` and logs the most
///   recently *finished* epoch. It never touches the model.
///
/// Both threads are joined before returning. Cancellation is epoch-granular:
/// the epoch in flight completes, then training stops. A panic on either
/// thread fails the whole call with [`Error::TaskFailed`].
pub fn train<M: Model>(
    cancel: &CancellationToken,
    model: &mut M,
    epochs: usize,
    inputs: &[Vec<f64>],
    targets: &[Vec<f64>],
    config: &TrainConfig,
) -> Result<TrainReport> {
    let stats = Arc::new(TrainingStats::new());
    let loss_every = config.loss_interval(epochs);
    let (done_tx, done_rx) = mpsc::channel::<()>();

    info!(epochs, samples = inputs.len(), loss_every, "training started");

    let (trained, reported) = thread::scope(|scope| {
        let trainer = {
            let stats = Arc::clone(&stats);
            scope.spawn(move || {
                let mut last_loss = None;
                let mut on_epoch = |epoch: usize, model: &dyn Model| -> bool {
                    if epoch % loss_every == 0 {
                        match dataset_loss(model, inputs, targets, config.loss) {
                            Ok(loss) => {
                                info!(epoch, loss, loss_fn = config.loss.name(), "loss");
                                last_loss = Some(loss);
                            }
                            Err(err) => warn!(epoch, %err, "could not evaluate loss"),
                        }
                    }
                    if cancel.is_cancelled() {
                        warn!(epoch, "training cancelled");
                        return false;
                    }
                    true
                };
                let result = model.train(stats, epochs, inputs, targets, &mut on_epoch);
                // Dropping the sender would do too; sending wakes the reporter
                // without waiting for its next tick.
                let _ = done_tx.send(());
                result.map(|completed| (completed, last_loss))
            })
        };

        let reporter = {
            let stats = Arc::clone(&stats);
            let every = config.report_every;
            scope.spawn(move || report_progress(&stats, &done_rx, every))
        };

        (trainer.join(), reporter.join())
    });

    reported.map_err(|p| Error::TaskFailed(format!("reporter: {}", panic_message(p))))?;
    let (epochs_completed, last_loss) = trained
        .map_err(|p| Error::TaskFailed(format!("trainer: {}", panic_message(p))))??;

    // The model marks its own run finished; this covers models that don't.
    stats.finish();
    let report = TrainReport {
        epochs_completed,
        cancelled: cancel.is_cancelled() && epochs_completed < epochs,
        duration: stats.duration(),
        last_loss,
        stats,
    };
    info!(
        epochs = report.epochs_completed,
        duration_ms = report.duration.as_millis() as u64,
        cancelled = report.cancelled,
        "training finished"
    );
    Ok(report)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

/// Logs the latest finished epoch every `every` until the trainer signals
/// completion or goes away.
fn report_progress(stats: &TrainingStats, done: &mpsc::Receiver<()>, every: Duration) {
    loop {
        match done.recv_timeout(every) {
            Err(RecvTimeoutError::Timeout) => match stats.latest() {
                Some(epoch) => info!(
                    epoch = epoch.id,
                    inputs = epoch.inputs,
                    elapsed_ms = epoch.elapsed.as_millis() as u64,
                    samples_per_sec = epoch.samples_per_sec(),
                    in_progress = stats.completed(),
                    "epoch stats"
                ),
                None => debug!("first epoch still running"),
            },
            Ok(()) | Err(RecvTimeoutError::Disconnected) => return,
        }
    }
}

/// Loss of `model`'s current predictions over the whole dataset.
fn dataset_loss(
    model: &dyn Model,
    inputs: &[Vec<f64>],
    targets: &[Vec<f64>],
    loss: LossFunction,
) -> Result<f64> {
    let predictions = inputs.iter()
        .map(|input| model.predict(input))
        .collect::<Result<Vec<_>>>()?;
    Ok(loss.evaluate(&predictions, targets))
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".into()
    }
}
