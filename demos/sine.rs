//! Regresses sin(x) on [0, 2π] with a 1-32-1 tanh network, checkpointing the
//! weights. A second run loads the checkpoint instead of retraining; an
//! unreadable checkpoint falls back to fresh weights.
//!
//! Run with:
//!   cargo run --example sine --release

use std::f64::consts::PI;
use std::path::Path;
use std::time::Duration;

use perceptron::{train, ActivationFunction, CancellationToken, Network, NetworkConfig, TrainConfig};
use rand::Rng;
use tracing::warn;
use tracing_subscriber::EnvFilter;

const MODEL_PATH: &str = "target/sine.bin";

fn training_data(samples: usize) -> (Vec<Vec<f64>>, Vec<Vec<f64>>) {
    let mut rng = rand::thread_rng();
    (0..samples)
        .map(|_| {
            let x = rng.gen::<f64>() * 2.0 * PI;
            (vec![x], vec![x.sin()])
        })
        .unzip()
}

fn get_model(config: &NetworkConfig) -> anyhow::Result<(Network, bool)> {
    if Path::new(MODEL_PATH).exists() {
        match config.load_file(MODEL_PATH) {
            Ok(network) => return Ok((network, true)),
            Err(err) => warn!(%err, "ignoring unreadable checkpoint"),
        }
    }
    Ok((config.build()?, false))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = NetworkConfig::new(vec![1, 32, 1])
        .with_activation(ActivationFunction::Tanh)
        .with_learning_rate(0.01);

    let (mut network, loaded) = get_model(&config)?;
    print!("{network}");

    if !loaded {
        let (inputs, targets) = training_data(2_000);
        let train_config = TrainConfig::default().with_report_every(Duration::from_secs(2));
        train(&CancellationToken::new(), &mut network, 500, &inputs, &targets, &train_config)?;
        std::fs::create_dir_all("target")?;
        network.save_file(MODEL_PATH)?;
    }

    let mut rng = rand::thread_rng();
    for _ in 0..10 {
        let x = rng.gen::<f64>() * 2.0 * PI;
        let predicted = network.predict(&[x])?[0];
        println!("Input: {x:.6}, Predicted Sine: {predicted:.6}, True Sine: {:.6}", x.sin());
    }
    Ok(())
}
