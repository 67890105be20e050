use ndarray::Array2;

/// Hidden-layer activation: elementwise tanh.
pub fn tanh(z: &Array2<f32>) -> Array2<f32> {
    z.mapv(f32::tanh)
}

/// Derivative of tanh expressed through the cached activation: 1 - a^2.
pub fn tanh_derivative_from_activation(a: &Array2<f32>) -> Array2<f32> {
    a.mapv(|x| 1.0 - x * x)
}

/// Row-wise softmax over output logits.
///
/// The exponentials are taken as-is, without subtracting the row maximum, so
/// large logits can overflow to infinity. Returns `None` whenever any
/// resulting probability is non-finite; callers substitute the collapse
/// sentinel instead of propagating NaN/Inf.
pub fn softmax_rows(z: &Array2<f32>) -> Option<Array2<f32>> {
    let exp = z.mapv(f32::exp);
    let mut probs = exp.clone();
    for (mut row, exp_row) in probs.rows_mut().into_iter().zip(exp.rows()) {
        let sum: f32 = exp_row.sum();
        row.mapv_inplace(|x| x / sum);
    }
    if probs.iter().all(|p| p.is_finite()) {
        Some(probs)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_softmax_rows_sum_to_one() {
        let z = array![[1.0_f32, 2.0], [0.0, 0.0], [-3.0, 3.0]];
        let probs = softmax_rows(&z).unwrap();
        for row in probs.rows() {
            assert!((row.sum() - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_softmax_overflow_is_detected() {
        // exp(1e30) overflows f32 and the row normalizes to inf/inf = NaN.
        let z = ndarray::array![[1e30_f32, 1e30]];
        assert!(softmax_rows(&z).is_none());
    }

    #[test]
    fn test_tanh_derivative_matches_analytic_form() {
        let z = array![[0.0_f32, 0.5, -2.0]];
        let a = tanh(&z);
        let d = tanh_derivative_from_activation(&a);
        assert!((d[[0, 0]] - 1.0).abs() < 1e-6);
        assert!((d[[0, 1]] - (1.0 - 0.5_f32.tanh().powi(2))).abs() < 1e-6);
    }
}
