use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::activation::ActivationFunction;
use crate::math::{random_vector, random_weight};

/// One unit: an incoming weight per value of the previous layer, plus a bias.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub weights: Vec<f64>,
    pub bias: f64,
}

impl Node {
    pub fn random<R: Rng + ?Sized>(input_size: usize, rng: &mut R) -> Node {
        Node {
            weights: random_vector(input_size, rng),
            bias: random_weight(rng),
        }
    }

    /// Pre-activation: `bias + Σ input[j]·weights[j]`.
    pub fn weighted_sum(&self, input: &[f64]) -> f64 {
        self.weights.iter().zip(input.iter())
            .fold(self.bias, |sum, (w, x)| sum + x * w)
    }
}

/// A fully-connected layer. Every node has the same incoming-weight count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub nodes: Vec<Node>,
}

impl Layer {
    pub fn random<R: Rng + ?Sized>(size: usize, input_size: usize, rng: &mut R) -> Layer {
        let nodes = (0..size).map(|_| Node::random(input_size, rng)).collect();
        Layer { nodes }
    }

    /// Number of nodes, i.e. the width this layer outputs.
    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    /// Width this layer consumes. 0 for a layer with no nodes.
    pub fn input_size(&self) -> usize {
        self.nodes.first().map_or(0, |n| n.weights.len())
    }

    /// Activations of every node for the given input.
    pub fn feed_from(&self, input: &[f64], activation: &ActivationFunction) -> Vec<f64> {
        self.nodes.iter()
            .map(|node| activation.function(node.weighted_sum(input)))
            .collect()
    }
}
