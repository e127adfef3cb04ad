/// Mean-squared error over a batch: the squared error of every output unit,
/// summed per sample, averaged over the number of samples.
///
/// `predictions[i]` and `targets[i]` must have equal length. An empty batch
/// yields 0.
pub fn mean_squared_error(predictions: &[Vec<f64>], targets: &[Vec<f64>]) -> f64 {
    if predictions.is_empty() {
        return 0.0;
    }
    let total: f64 = predictions.iter().zip(targets.iter())
        .map(|(p, t)| {
            p.iter().zip(t.iter())
                .map(|(p, t)| (t - p).powi(2))
                .sum::<f64>()
        })
        .sum();
    total / predictions.len() as f64
}
