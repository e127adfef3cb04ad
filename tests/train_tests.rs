// Orchestrator tests: supervised training, cancellation and task failure

use std::io::Write;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use perceptron::network::EpochCallback;
use perceptron::{
    train, ActivationFunction, CancellationToken, EpochStats, Error, LossFunction, Model,
    NetworkConfig, Result, TrainConfig, TrainingStats,
};

fn or_data() -> (Vec<Vec<f64>>, Vec<Vec<f64>>) {
    let inputs = vec![
        vec![0.0, 0.0],
        vec![0.0, 1.0],
        vec![1.0, 0.0],
        vec![1.0, 1.0],
    ];
    let targets = vec![vec![0.0], vec![1.0], vec![1.0], vec![1.0]];
    (inputs, targets)
}

fn fast_reporting() -> TrainConfig {
    TrainConfig::default().with_report_every(Duration::from_millis(1))
}

/// Stand-in model that fires the cancellation token while a given epoch is
/// in progress, the way a caller on another thread would.
struct CancellingModel {
    token: CancellationToken,
    cancel_during: usize,
    epochs_run: usize,
}

impl Model for CancellingModel {
    fn train(
        &mut self,
        stats: Arc<TrainingStats>,
        epochs: usize,
        inputs: &[Vec<f64>],
        _targets: &[Vec<f64>],
        on_epoch: &mut EpochCallback<'_>,
    ) -> Result<usize> {
        for epoch in 0..epochs {
            if epoch == self.cancel_during {
                self.token.cancel();
            }
            stats.record(EpochStats {
                id: epoch,
                started_at: SystemTime::now(),
                elapsed: Duration::from_micros(10),
                inputs: inputs.len(),
            });
            self.epochs_run = epoch + 1;
            if !on_epoch(epoch, &*self) {
                break;
            }
        }
        Ok(self.epochs_run)
    }

    fn predict(&self, _input: &[f64]) -> Result<Vec<f64>> {
        Ok(vec![0.5])
    }

    fn save(&self, _writer: &mut dyn Write) -> Result<()> {
        Ok(())
    }

    fn epoch_stats(&self, _epoch: usize) -> Option<EpochStats> {
        None
    }

    fn training_duration(&self) -> Option<Duration> {
        None
    }
}

/// Stand-in model whose training thread dies.
struct PanickingModel;

impl Model for PanickingModel {
    fn train(
        &mut self,
        _stats: Arc<TrainingStats>,
        _epochs: usize,
        _inputs: &[Vec<f64>],
        _targets: &[Vec<f64>],
        _on_epoch: &mut EpochCallback<'_>,
    ) -> Result<usize> {
        panic!("weights exploded");
    }

    fn predict(&self, _input: &[f64]) -> Result<Vec<f64>> {
        Ok(vec![])
    }

    fn save(&self, _writer: &mut dyn Write) -> Result<()> {
        Ok(())
    }

    fn epoch_stats(&self, _epoch: usize) -> Option<EpochStats> {
        None
    }

    fn training_duration(&self) -> Option<Duration> {
        None
    }
}

// Full runs

#[test]
fn test_supervised_or_converges() {
    let (inputs, targets) = or_data();
    let mut net = NetworkConfig::new(vec![2, 4, 1])
        .with_activation(ActivationFunction::Sigmoid)
        .with_learning_rate(1.0)
        .build()
        .unwrap();

    let report = train(&CancellationToken::new(), &mut net, 10_000, &inputs, &targets, &fast_reporting())
        .unwrap();

    assert_eq!(report.epochs_completed, 10_000);
    assert!(!report.cancelled);
    assert_eq!(report.stats.completed(), 10_000);
    assert!(report.last_loss.is_some_and(|loss| loss < 0.05));

    assert!(net.predict(&inputs[0]).unwrap()[0] < 0.1);
    for input in &inputs[1..] {
        assert!(net.predict(input).unwrap()[0] > 0.9, "{input:?}");
    }
}

#[test]
fn test_epoch_stats_visible_after_training() {
    let (inputs, targets) = or_data();
    let mut net = NetworkConfig::new(vec![2, 3, 1]).build().unwrap();

    let report = train(&CancellationToken::new(), &mut net, 20, &inputs, &targets, &fast_reporting())
        .unwrap();

    let epochs = report.stats.snapshot();
    assert_eq!(epochs.len(), 20);
    assert!(epochs.iter().enumerate().all(|(i, e)| e.id == i && e.inputs == 4));
    assert_eq!(net.epoch_stats(19).map(|e| e.inputs), Some(4));
    assert!(net.training_duration().is_some());
    assert!(report.stats.is_finished());
}

#[test]
fn test_custom_loss_is_reported() {
    fn constant(_: &[Vec<f64>], _: &[Vec<f64>]) -> f64 {
        42.0
    }
    let (inputs, targets) = or_data();
    let mut net = NetworkConfig::new(vec![2, 2, 1]).build().unwrap();
    let config = fast_reporting()
        .with_loss(LossFunction::Custom(constant))
        .with_loss_every(3);

    let report = train(&CancellationToken::new(), &mut net, 10, &inputs, &targets, &config).unwrap();
    assert_eq!(report.last_loss, Some(42.0));
}

// Cancellation

#[test]
fn test_cancelled_before_start_runs_one_epoch() {
    let (inputs, targets) = or_data();
    let mut net = NetworkConfig::new(vec![2, 4, 1]).build().unwrap();
    let token = CancellationToken::new();
    token.cancel();

    let report = train(&token, &mut net, 100, &inputs, &targets, &fast_reporting()).unwrap();
    assert_eq!(report.epochs_completed, 1);
    assert!(report.cancelled);
}

#[test]
fn test_cancel_mid_epoch_finishes_that_epoch_only() {
    let (inputs, targets) = or_data();
    let token = CancellationToken::new();
    let mut model = CancellingModel { token: token.clone(), cancel_during: 3, epochs_run: 0 };

    let report = train(&token, &mut model, 100, &inputs, &targets, &fast_reporting()).unwrap();

    // epoch 3 was in flight when cancelled; it completes, nothing after it
    assert_eq!(report.epochs_completed, 4);
    assert_eq!(model.epochs_run, 4);
    assert!(report.cancelled);
    assert_eq!(report.stats.completed(), 4);
}

#[test]
fn test_cancel_after_last_epoch_is_not_reported_as_cancelled() {
    let (inputs, targets) = or_data();
    let token = CancellationToken::new();
    let mut model = CancellingModel { token: token.clone(), cancel_during: 9, epochs_run: 0 };

    let report = train(&token, &mut model, 10, &inputs, &targets, &fast_reporting()).unwrap();
    assert_eq!(report.epochs_completed, 10);
    assert!(!report.cancelled);
}

// Failures

#[test]
fn test_trainer_panic_fails_the_call() {
    let (inputs, targets) = or_data();
    let err = train(&CancellationToken::new(), &mut PanickingModel, 5, &inputs, &targets, &fast_reporting())
        .unwrap_err();
    match err {
        Error::TaskFailed(msg) => assert!(msg.contains("weights exploded"), "{msg}"),
        other => panic!("unexpected error {other}"),
    }
}

#[test]
fn test_bad_dataset_is_returned_not_panicked() {
    let mut net = NetworkConfig::new(vec![2, 2, 1]).build().unwrap();
    let inputs = vec![vec![0.0, 0.0], vec![1.0]];
    let targets = vec![vec![0.0], vec![1.0]];

    let err = train(&CancellationToken::new(), &mut net, 5, &inputs, &targets, &TrainConfig::default())
        .unwrap_err();
    assert!(matches!(err, Error::InputMismatch { expected: 2, got: 1 }), "{err}");
}
