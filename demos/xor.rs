//! XOR without the supervisor: drives `Network::train` directly and prints
//! loss from the epoch callback.
//!
//! Run with:
//!   cargo run --example xor

use perceptron::{mean_squared_error, ActivationFunction, BiasUpdate, NetworkConfig};

fn main() -> perceptron::Result<()> {
    let mut network = NetworkConfig::new(vec![2, 4, 1])
        .with_activation(ActivationFunction::Sigmoid)
        .with_learning_rate(0.5)
        .with_bias_update(BiasUpdate::Accumulate)
        .build()?;

    let inputs = vec![
        vec![1.0, 0.0],
        vec![1.0, 1.0],
        vec![0.0, 1.0],
        vec![0.0, 0.0],
    ];
    let expected_outputs = vec![vec![1.0], vec![0.0], vec![1.0], vec![0.0]];

    let epochs = 10_000;
    network.train(epochs, &inputs, &expected_outputs, |epoch, net| {
        if epoch % 1000 == 0 {
            let predictions: Vec<Vec<f64>> = inputs.iter()
                .filter_map(|input| net.predict(input).ok())
                .collect();
            println!("Epoch {epoch}: loss = {:.6}", mean_squared_error(&predictions, &expected_outputs));
        }
        true
    })?;

    for input in &inputs {
        println!("Input: {:?} -> Output: {:.4}", input, network.predict(input)?[0]);
    }
    Ok(())
}
