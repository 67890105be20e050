use ndarray::Array2;

use crate::error::Result;
use crate::network::{FitSummary, Network, Probabilities};

/// Capability interface for binary classifiers.
///
/// The hand-rolled [`Network`] is the one concrete implementation in this
/// crate; the seam exists so alternative backends can plug into the same
/// experiment driver.
pub trait Classifier {
    fn fit(&mut self, x: &Array2<f32>, y: &[u8]) -> Result<FitSummary>;

    fn predict(&self, x: &Array2<f32>) -> Result<Vec<u8>>;

    fn predict_probabilities(&self, x: &Array2<f32>) -> Result<Probabilities>;
}

impl Classifier for Network {
    fn fit(&mut self, x: &Array2<f32>, y: &[u8]) -> Result<FitSummary> {
        Network::fit(self, x, y)
    }

    fn predict(&self, x: &Array2<f32>) -> Result<Vec<u8>> {
        Network::predict(self, x)
    }

    fn predict_probabilities(&self, x: &Array2<f32>) -> Result<Probabilities> {
        Network::predict_probabilities(self, x)
    }
}
