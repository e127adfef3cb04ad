pub mod cancel;
pub mod epoch_stats;
pub mod train_config;
pub mod trainer;

pub use cancel::CancellationToken;
pub use epoch_stats::{EpochStats, TrainingStats};
pub use train_config::TrainConfig;
pub use trainer::{train, TrainReport};
