pub mod config;
pub mod legacy;
pub mod model;
pub mod network;
pub(crate) mod persist;

pub use config::{BiasUpdate, NetworkConfig};
pub use legacy::LegacyNetwork;
pub use model::{EpochCallback, Model};
pub use network::Network;
