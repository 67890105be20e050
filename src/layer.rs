use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

/// Parameters for one layer transition of the network.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    /// Weight matrix, `inputs x outputs`.
    pub weights: Array2<f32>,
    /// Bias row, broadcast over every example.
    pub bias: Array1<f32>,
}

impl Layer {
    /// Constructs a layer with variance-preserving random weights.
    ///
    /// Weights are drawn from Normal(0, 1/sqrt(inputs)); biases start at
    /// zero. The caller owns the RNG so the whole network initializes from a
    /// single seeded stream.
    pub fn init(inputs: usize, outputs: usize, rng: &mut StdRng) -> Self {
        let std_dev = 1.0 / (inputs as f32).sqrt();
        let normal_dist = Normal::new(0.0, std_dev)
            .unwrap_or_else(|_| Normal::new(0.0, 1.0).unwrap());

        let weights = Array2::from_shape_fn((inputs, outputs), |_| normal_dist.sample(rng));
        let bias = Array1::zeros(outputs);

        Layer { weights, bias }
    }

    /// Affine part of the forward pass: `a_prev . W + b`.
    pub fn linear(&self, a_prev: &Array2<f32>) -> Array2<f32> {
        a_prev.dot(&self.weights) + &self.bias
    }

    pub fn inputs(&self) -> usize {
        self.weights.nrows()
    }

    pub fn outputs(&self) -> usize {
        self.weights.ncols()
    }
}
