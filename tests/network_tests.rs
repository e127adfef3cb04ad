// Network tests: construction, inference, persistence and convergence

use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use perceptron::{ActivationFunction, BiasUpdate, Error, Network, NetworkConfig};

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

fn random_inputs(rng: &mut StdRng, count: usize, width: usize) -> Vec<Vec<f64>> {
    (0..count)
        .map(|_| (0..width).map(|_| rng.gen_range(-2.0..2.0)).collect())
        .collect()
}

fn assert_shape_invariant(net: &Network) {
    assert_eq!(net.layers().len() + 1, net.shapes().len());
    for (i, layer) in net.layers().iter().enumerate() {
        assert_eq!(layer.nodes.len(), net.shapes()[i + 1]);
        for node in &layer.nodes {
            assert_eq!(node.weights.len(), net.shapes()[i]);
        }
    }
}

// Inference

#[test]
fn test_predict_is_deterministic() {
    let mut rng = StdRng::seed_from_u64(11);
    let net = NetworkConfig::new(vec![3, 6, 2]).build_with_rng(&mut rng).unwrap();
    for input in random_inputs(&mut rng, 20, 3) {
        assert_eq!(net.predict(&input).unwrap(), net.predict(&input).unwrap());
    }
}

#[test]
fn test_predict_output_width() {
    let net = NetworkConfig::new(vec![4, 3, 5]).build().unwrap();
    assert_eq!(net.predict(&[0.1, 0.2, 0.3, 0.4]).unwrap().len(), 5);
    assert_shape_invariant(&net);
}

#[test]
fn test_predict_rejects_wrong_width() {
    let net = NetworkConfig::new(vec![2, 2, 1]).build().unwrap();
    let err = net.predict(&[1.0]).unwrap_err();
    assert!(matches!(err, Error::InputMismatch { expected: 2, got: 1 }));
}

// Persistence

#[test]
fn test_round_trip_is_bit_identical() {
    let activations = [
        ActivationFunction::Sigmoid,
        ActivationFunction::Tanh,
        ActivationFunction::ReLU,
        ActivationFunction::Identity,
    ];
    let mut rng = StdRng::seed_from_u64(5);
    for activation in activations {
        let config = NetworkConfig::new(vec![3, 7, 4, 2])
            .with_activation(activation)
            .with_learning_rate(0.3);
        let net = config.build_with_rng(&mut rng).unwrap();

        let bytes = net.to_bytes().unwrap();
        let loaded = config.load(bytes.as_slice()).unwrap();

        assert_eq!(loaded.shapes(), net.shapes());
        assert_eq!(loaded.learning_rate(), 0.3);
        assert_shape_invariant(&loaded);
        for input in random_inputs(&mut rng, 25, 3) {
            let a = net.predict(&input).unwrap();
            let b = loaded.predict(&input).unwrap();
            assert_eq!(
                a.iter().map(|v| v.to_bits()).collect::<Vec<_>>(),
                b.iter().map(|v| v.to_bits()).collect::<Vec<_>>(),
                "{} differs for {input:?}",
                activation.name()
            );
        }
    }
}

#[test]
fn test_encoding_is_stable() {
    let mut rng = StdRng::seed_from_u64(9);
    let net = NetworkConfig::new(vec![5, 4, 3]).build_with_rng(&mut rng).unwrap();

    let first = net.to_bytes().unwrap();
    let second = net.to_bytes().unwrap();
    assert_eq!(first, second);

    let mut written = Vec::new();
    net.save(&mut written).unwrap();
    assert_eq!(written, first);

    let reloaded = NetworkConfig::default().load(first.as_slice()).unwrap();
    assert_eq!(reloaded.to_bytes().unwrap(), first);
}

#[test]
fn test_hyperparameters_are_not_persisted() {
    let net = NetworkConfig::new(vec![2, 2])
        .with_learning_rate(0.9)
        .with_activation(ActivationFunction::Tanh)
        .build()
        .unwrap();
    let bytes = net.to_bytes().unwrap();

    let loaded = NetworkConfig::default().load(bytes.as_slice()).unwrap();
    assert_eq!(loaded.learning_rate(), 0.1);
    assert!(matches!(loaded.activation(), ActivationFunction::Sigmoid));
    assert_eq!(loaded.bias_update(), BiasUpdate::Overwrite);
}

#[test]
fn test_load_truncated_bytes_fails() {
    let net = NetworkConfig::new(vec![2, 3, 1]).build().unwrap();
    let bytes = net.to_bytes().unwrap();
    let err = NetworkConfig::default().load(&bytes[..bytes.len() - 3]).unwrap_err();
    assert!(matches!(err, Error::Decode(_)), "got {err}");
    assert!(NetworkConfig::default().load(std::io::empty()).is_err());
}

#[test]
fn test_load_checks_requested_shapes() {
    let net = NetworkConfig::new(vec![2, 3, 1]).build().unwrap();
    let bytes = net.to_bytes().unwrap();

    assert!(NetworkConfig::new(vec![2, 3, 1]).load(bytes.as_slice()).is_ok());
    let err = NetworkConfig::new(vec![2, 4, 1]).load(bytes.as_slice()).unwrap_err();
    match err {
        Error::ShapeMismatch { expected, found } => {
            assert_eq!(expected, vec![2, 4, 1]);
            assert_eq!(found, vec![2, 3, 1]);
        }
        other => panic!("unexpected error {other}"),
    }
}

#[test]
fn test_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.bin");
    let config = NetworkConfig::new(vec![2, 4, 1]);
    let net = config.build().unwrap();
    net.save_file(&path).unwrap();

    let loaded = config.load_file(&path).unwrap();
    assert_eq!(loaded.layers(), net.layers());
    assert!(matches!(config.load_file(dir.path().join("missing.bin")), Err(Error::Io(_))));
}

// Training

#[test]
fn test_learns_logical_or() {
    let (inputs, targets) = or_data();
    let mut net = NetworkConfig::new(vec![2, 4, 1])
        .with_activation(ActivationFunction::Sigmoid)
        .with_learning_rate(1.0)
        .build()
        .unwrap();

    let completed = net.train(10_000, &inputs, &targets, |_, _| true).unwrap();
    assert_eq!(completed, 10_000);

    assert!(net.predict(&inputs[0]).unwrap()[0] < 0.1);
    for input in &inputs[1..] {
        assert!(net.predict(input).unwrap()[0] > 0.9, "{input:?}");
    }
}

#[test]
fn test_training_keeps_architecture() {
    let (inputs, targets) = or_data();
    let mut net = NetworkConfig::new(vec![2, 3, 3, 1]).build().unwrap();
    let shapes = net.shapes().to_vec();
    net.train(50, &inputs, &targets, |_, _| true).unwrap();
    assert_eq!(net.shapes(), shapes.as_slice());
    assert_shape_invariant(&net);
}

#[test]
fn test_training_reduces_error() {
    let (inputs, targets) = or_data();
    let mut rng = StdRng::seed_from_u64(21);
    let mut net = NetworkConfig::new(vec![2, 4, 1])
        .with_learning_rate(1.0)
        .build_with_rng(&mut rng)
        .unwrap();

    let error = |net: &Network| -> f64 {
        let predictions: Vec<Vec<f64>> = inputs.iter().map(|i| net.predict(i).unwrap()).collect();
        perceptron::mean_squared_error(&predictions, &targets)
    };
    let before = error(&net);
    net.train(2_000, &inputs, &targets, |_, _| true).unwrap();
    let after = error(&net);
    assert!(after < before, "before {before}, after {after}");
    assert_relative_eq!(after, 0.0, epsilon = 0.05);
}
