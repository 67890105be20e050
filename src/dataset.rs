use ndarray::{Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::error::{Error, Result};

/// In-memory labelled dataset.
///
/// Features arrive already shuffled, bounded and scaled by the upstream
/// loader; this type only enforces the structural invariants the core relies
/// on: uniform feature width and labels drawn from {0, 1}.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub features: Array2<f32>,
    pub labels: Vec<u8>,
}

impl Dataset {
    pub fn new(features: Array2<f32>, labels: Vec<u8>) -> Result<Self> {
        if features.nrows() == 0 {
            return Err(Error::EmptyDataset);
        }
        if labels.len() != features.nrows() {
            return Err(Error::LabelCountMismatch {
                rows: features.nrows(),
                labels: labels.len(),
            });
        }
        if let Some(&bad) = labels.iter().find(|&&y| y > 1) {
            return Err(Error::InvalidLabel(bad));
        }
        Ok(Dataset { features, labels })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn feature_width(&self) -> usize {
        self.features.ncols()
    }

    /// Warns when one class outnumbers the other more than 3:1; predictions
    /// on very unbalanced data tend to be unreliable.
    pub fn balance_warning(&self) -> Option<String> {
        let positives = self.labels.iter().filter(|&&y| y == 1).count();
        let negatives = self.len() - positives;
        if positives > negatives * 3 || negatives > positives * 3 {
            Some(format!(
                "provided classes are very unbalanced ({} positive / {} negative), \
                 predictions may not be accurate",
                positives, negatives
            ))
        } else {
            None
        }
    }
}

/// Randomly partitions a feature matrix and its labels into a held-out part
/// of `fraction` examples and a kept part with the rest.
///
/// Returns `(kept_x, kept_y, held_x, held_y)`. The shuffle comes from the
/// caller's RNG so splits are reproducible under a fixed seed. Fails when
/// either side of the split would be empty.
pub fn train_test_split(
    x: &Array2<f32>,
    y: &[u8],
    fraction: f32,
    rng: &mut StdRng,
) -> Result<(Array2<f32>, Vec<u8>, Array2<f32>, Vec<u8>)> {
    let len = y.len();
    let held = ((len as f32) * fraction).round() as usize;
    if held == 0 || held >= len {
        return Err(Error::DegenerateSplit { len, fraction });
    }

    let mut indices: Vec<usize> = (0..len).collect();
    indices.shuffle(rng);
    let (held_idx, kept_idx) = indices.split_at(held);

    let kept_x = x.select(Axis(0), kept_idx);
    let kept_y = kept_idx.iter().map(|&i| y[i]).collect();
    let held_x = x.select(Axis(0), held_idx);
    let held_y = held_idx.iter().map(|&i| y[i]).collect();

    Ok((kept_x, kept_y, held_x, held_y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;
    use rand::SeedableRng;

    fn toy_features(rows: usize) -> Array2<f32> {
        Array2::from_shape_fn((rows, 2), |(i, j)| (i * 2 + j) as f32)
    }

    #[test]
    fn test_rejects_bad_labels() {
        let err = Dataset::new(toy_features(3), vec![0, 1, 2]).unwrap_err();
        assert_eq!(err, crate::error::Error::InvalidLabel(2));
    }

    #[test]
    fn test_rejects_label_count_mismatch() {
        let err = Dataset::new(toy_features(3), vec![0, 1]).unwrap_err();
        assert_eq!(
            err,
            crate::error::Error::LabelCountMismatch { rows: 3, labels: 2 }
        );
    }

    #[test]
    fn test_balance_warning_triggers_past_three_to_one() {
        let balanced = Dataset::new(toy_features(4), vec![0, 0, 1, 1]).unwrap();
        assert!(balanced.balance_warning().is_none());

        let skewed = Dataset::new(toy_features(5), vec![1, 1, 1, 1, 0]).unwrap();
        assert!(skewed.balance_warning().is_some());
    }

    #[test]
    fn test_split_sizes_and_row_integrity() {
        let x = toy_features(10);
        let y: Vec<u8> = (0..10).map(|i| (i % 2) as u8).collect();
        let mut rng = StdRng::seed_from_u64(3);

        let (kept_x, kept_y, held_x, held_y) = train_test_split(&x, &y, 0.3, &mut rng).unwrap();
        assert_eq!(held_x.nrows(), 3);
        assert_eq!(kept_x.nrows(), 7);
        assert_eq!(kept_y.len(), 7);
        assert_eq!(held_y.len(), 3);

        // Rows travel with their labels: feature col 0 is 2*i, so the label
        // parity must match i's parity.
        for (row, &label) in kept_x.rows().into_iter().zip(&kept_y) {
            let original_index = (row[0] / 2.0) as usize;
            assert_eq!((original_index % 2) as u8, label);
        }
    }

    #[test]
    fn test_split_rejects_degenerate_fractions() {
        let x = toy_features(4);
        let y = vec![0, 1, 0, 1];
        let mut rng = StdRng::seed_from_u64(0);
        assert!(train_test_split(&x, &y, 0.0, &mut rng).is_err());
        assert!(train_test_split(&x, &y, 1.0, &mut rng).is_err());
    }
}
