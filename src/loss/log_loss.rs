/// Log-loss (cross-entropy over independent sigmoid units) for a batch,
/// summed across output units and averaged over samples.
///
/// Predictions must lie strictly inside (0, 1). No epsilon is added: a
/// prediction of exactly 0 or 1 against a disagreeing target yields
/// infinity, and against a matching one NaN.
pub fn log_loss(predictions: &[Vec<f64>], targets: &[Vec<f64>]) -> f64 {
    if predictions.is_empty() {
        return 0.0;
    }
    let total: f64 = predictions.iter().zip(targets.iter())
        .map(|(p, t)| {
            p.iter().zip(t.iter())
                .map(|(p, t)| unit_loss(*p, *t))
                .sum::<f64>()
        })
        .sum();
    total / predictions.len() as f64
}

/// Log-loss over the first output unit only, for single-output classifiers.
pub fn binary_log_loss(predictions: &[Vec<f64>], targets: &[Vec<f64>]) -> f64 {
    if predictions.is_empty() {
        return 0.0;
    }
    let total: f64 = predictions.iter().zip(targets.iter())
        .map(|(p, t)| unit_loss(p[0], t[0]))
        .sum();
    total / predictions.len() as f64
}

fn unit_loss(p: f64, t: f64) -> f64 {
    -(t * p.ln() + (1.0 - t) * (1.0 - p).ln())
}
