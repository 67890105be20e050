use ndarray::Array2;

/// Mean negative log-likelihood of the true class.
///
/// Probabilities are clamped away from 0 and 1 before the log so the loss
/// stays finite even for collapsed (sentinel) probability matrices.
pub fn cross_entropy(probs: &Array2<f32>, labels: &[u8]) -> f32 {
    let epsilon = 1e-12;
    let total: f32 = labels
        .iter()
        .enumerate()
        .map(|(i, &y)| {
            let p = probs[[i, y as usize]].max(epsilon).min(1.0 - epsilon);
            -p.ln()
        })
        .sum();
    total / labels.len() as f32
}
