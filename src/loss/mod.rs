pub mod mse;
pub mod log_loss;
pub mod loss_type;

pub use mse::mean_squared_error;
pub use log_loss::{log_loss, binary_log_loss};
pub use loss_type::{LossFn, LossFunction};
