use rand::Rng;

/// Draws one weight from U(-0.5, 0.5).
pub fn random_weight<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.gen::<f64>() - 0.5
}

/// `n` weights drawn independently from U(-0.5, 0.5).
pub fn random_vector<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<f64> {
    (0..n).map(|_| random_weight(rng)).collect()
}

/// Index of the largest element; `None` for an empty slice. NaN entries
/// never win.
pub fn argmax(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        if v.is_nan() {
            continue;
        }
        if best.map_or(true, |(_, b)| v > b) {
            best = Some((i, v));
        }
    }
    best.map(|(i, _)| i)
}

/// One-hot vector of length `classes` with a 1 at `label`.
///
/// # Panics
/// Panics if `label >= classes`.
pub fn one_hot(label: usize, classes: usize) -> Vec<f64> {
    assert!(label < classes, "label {label} out of range for {classes} classes");
    let mut v = vec![0.0; classes];
    v[label] = 1.0;
    v
}
