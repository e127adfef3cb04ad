//! Learns logical OR with a 2-4-1 sigmoid network under the supervised
//! trainer (progress reporter + cancellation token).
//!
//! Run with:
//!   cargo run --example or

use perceptron::{train, ActivationFunction, CancellationToken, NetworkConfig, TrainConfig};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut network = NetworkConfig::new(vec![2, 4, 1])
        .with_activation(ActivationFunction::Sigmoid)
        .with_learning_rate(1.0)
        .build()?;
    print!("{network}");

    let inputs = vec![
        vec![0.0, 0.0],
        vec![0.0, 1.0],
        vec![1.0, 0.0],
        vec![1.0, 1.0],
    ];
    let targets = vec![vec![0.0], vec![1.0], vec![1.0], vec![1.0]];

    let report = train(
        &CancellationToken::new(),
        &mut network,
        10_000,
        &inputs,
        &targets,
        &TrainConfig::default(),
    )?;
    println!("Training Duration {:?}", report.duration);

    for input in &inputs {
        println!("{:?} -> {:.4?}", input, network.predict(input)?);
    }
    Ok(())
}
