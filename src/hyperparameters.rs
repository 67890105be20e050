use std::time::Duration;

/// Training hyperparameters for one network.
///
/// `epsilon` is the gradient-descent learning rate and the only value the
/// cross-validation search varies; the rest are fixed per experiment.
#[derive(Debug, Clone)]
pub struct Hyperparameters {
    /// Number of full-batch gradient-descent iterations; the sole stopping
    /// criterion.
    pub iterations: usize,

    /// Learning rate.
    pub epsilon: f32,

    /// L2 regularization strength applied to weight gradients.
    pub reg_lambda: f32,

    /// Optional wall-clock budget for a single fit; checked between
    /// iterations so a non-converging trial cannot block a search forever.
    pub deadline: Option<Duration>,
}

impl Default for Hyperparameters {
    fn default() -> Self {
        Hyperparameters {
            iterations: 10_000,
            epsilon: 0.01,
            reg_lambda: 0.01,
            deadline: None,
        }
    }
}
