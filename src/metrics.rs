/// Classification quality metrics for one evaluation run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreRecord {
    pub accuracy: f32,
    pub precision: f32,
    pub recall: f32,
    /// Matthews correlation coefficient, range [-1, 1].
    pub phi: f32,
}

impl ScoreRecord {
    /// Scores predicted positive-class membership against the truth.
    ///
    /// Both slices must be the same length and non-empty; that is a caller
    /// contract, not a runtime branch. Degenerate confusion matrices (a class
    /// entirely absent from the batch) resolve to `0` for the affected
    /// metric rather than dividing by zero.
    pub fn compute(actual: &[bool], predicted: &[bool]) -> Self {
        assert_eq!(
            actual.len(),
            predicted.len(),
            "actual and predicted label sequences differ in length"
        );
        assert!(!actual.is_empty(), "cannot score an empty label sequence");

        let mut tp = 0u64;
        let mut tn = 0u64;
        let mut fp = 0u64;
        let mut fn_ = 0u64;
        for (&a, &p) in actual.iter().zip(predicted) {
            match (a, p) {
                (true, true) => tp += 1,
                (false, false) => tn += 1,
                (false, true) => fp += 1,
                (true, false) => fn_ += 1,
            }
        }

        Self::from_counts(tp, tn, fp, fn_)
    }

    /// Builds the record straight from confusion-matrix counts.
    ///
    /// At least one count must be nonzero: batches are non-empty by
    /// invariant, so the all-zero case is a caller contract violation, not a
    /// zero-fallback branch.
    pub fn from_counts(tp: u64, tn: u64, fp: u64, fn_: u64) -> Self {
        debug_assert!(
            tp + tn + fp + fn_ > 0,
            "cannot score an empty confusion matrix"
        );
        let total = (tp + tn + fp + fn_) as f64;
        let accuracy = (tp + tn) as f64 / total;

        let precision = if tp + fp > 0 {
            tp as f64 / (tp + fp) as f64
        } else {
            0.0
        };

        let recall = if tp + fn_ > 0 {
            tp as f64 / (tp + fn_) as f64
        } else {
            0.0
        };

        // Each factor converts to f64 before multiplying: the product of
        // four marginals overflows u64 once each reaches ~66k.
        let denominator = (tp + fp) as f64
            * (tp + fn_) as f64
            * (tn + fp) as f64
            * (tn + fn_) as f64;
        let phi = if denominator != 0.0 {
            (tp as f64 * tn as f64 - fp as f64 * fn_ as f64) / denominator.sqrt()
        } else {
            0.0
        };

        ScoreRecord {
            accuracy: accuracy as f32,
            precision: precision as f32,
            recall: recall as f32,
            phi: phi as f32,
        }
    }

    /// Field-wise mean over accumulated records; `None` for an empty slice.
    pub fn mean(records: &[ScoreRecord]) -> Option<ScoreRecord> {
        if records.is_empty() {
            return None;
        }
        let n = records.len() as f32;
        Some(ScoreRecord {
            accuracy: records.iter().map(|r| r.accuracy).sum::<f32>() / n,
            precision: records.iter().map(|r| r.precision).sum::<f32>() / n,
            recall: records.iter().map(|r| r.recall).sum::<f32>() / n,
            phi: records.iter().map(|r| r.phi).sum::<f32>() / n,
        })
    }
}
