pub mod vector;

pub use vector::{argmax, one_hot, random_vector, random_weight};
