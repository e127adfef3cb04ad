use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{OnceLock, RwLock};
use std::time::{Duration, Instant, SystemTime};

use serde::{Deserialize, Serialize};

/// Timing for one completed epoch.
///
/// Records are created once, when their epoch finishes, and never modified
/// afterwards; readers only ever see finished epochs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpochStats {
    /// 0-based epoch index.
    pub id: usize,
    /// Wall-clock time the epoch started.
    pub started_at: SystemTime,
    /// Time spent on the epoch's forward/backward steps.
    pub elapsed: Duration,
    /// Number of samples processed.
    pub inputs: usize,
}

impl EpochStats {
    pub fn ended_at(&self) -> SystemTime {
        self.started_at + self.elapsed
    }

    pub fn samples_per_sec(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 { self.inputs as f64 / secs } else { 0.0 }
    }
}

/// Statistics for a single training invocation.
///
/// One writer (the trainer) appends a record per finished epoch; any number
/// of readers (the reporter thread, the caller) may query concurrently.
/// A fresh instance is created for every training run.
#[derive(Debug)]
pub struct TrainingStats {
    started: Instant,
    finished: OnceLock<Instant>,
    epochs: RwLock<Vec<EpochStats>>,
    completed: AtomicUsize,
}

impl TrainingStats {
    pub fn new() -> TrainingStats {
        TrainingStats {
            started: Instant::now(),
            finished: OnceLock::new(),
            epochs: RwLock::new(Vec::new()),
            completed: AtomicUsize::new(0),
        }
    }

    /// Publishes a finished epoch. Epochs must be recorded in increasing
    /// index order.
    pub fn record(&self, stats: EpochStats) {
        // A poisoned lock only means a reader panicked; the data is still valid.
        let mut epochs = self.epochs.write().unwrap_or_else(|e| e.into_inner());
        debug_assert_eq!(stats.id, epochs.len());
        epochs.push(stats);
        self.completed.store(epochs.len(), Ordering::Release);
    }

    /// Marks the run as over. Later calls are ignored.
    pub fn finish(&self) {
        let _ = self.finished.set(Instant::now());
    }

    pub fn is_finished(&self) -> bool {
        self.finished.get().is_some()
    }

    /// Number of epochs fully completed so far. Also the index of the epoch
    /// currently in progress, if any.
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Acquire)
    }

    pub fn epoch(&self, id: usize) -> Option<EpochStats> {
        self.epochs.read().unwrap_or_else(|e| e.into_inner()).get(id).copied()
    }

    /// Most recently completed epoch.
    pub fn latest(&self) -> Option<EpochStats> {
        self.epochs.read().unwrap_or_else(|e| e.into_inner()).last().copied()
    }

    /// Copy of every completed epoch, in order.
    pub fn snapshot(&self) -> Vec<EpochStats> {
        self.epochs.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Wall-clock length of the run; still growing while training is active.
    pub fn duration(&self) -> Duration {
        match self.finished.get() {
            Some(end) => end.duration_since(self.started),
            None => self.started.elapsed(),
        }
    }
}

impl Default for TrainingStats {
    fn default() -> Self {
        TrainingStats::new()
    }
}
