pub mod activation;

pub use activation::{
    relu, relu_derivative, sigmoid, sigmoid_derivative, tanh, tanh_derivative, ActivationFunction,
};
