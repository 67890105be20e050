use std::time::Instant;

use ndarray::{Array2, Axis};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, warn};

use crate::activation::{softmax_rows, tanh, tanh_derivative_from_activation};
use crate::error::{Error, Result};
use crate::hyperparameters::Hyperparameters;
use crate::layer::Layer;
use crate::loss::cross_entropy;

/// Value every probability is driven to when softmax produces NaN/Inf.
pub const COLLAPSE_SENTINEL: f32 = -1.0;

/// Output width is fixed: one-hot binary classification.
pub const OUTPUT_CLASSES: usize = 2;

/// Tagged forward-propagation output.
///
/// `Collapsed` carries the sentinel matrix (every entry [`COLLAPSE_SENTINEL`])
/// substituted when exponentiation overflowed or normalization produced an
/// invalid value. Callers are expected to discard or flag collapsed results,
/// not keep training on them.
#[derive(Debug, Clone)]
pub enum Probabilities {
    Valid(Array2<f32>),
    Collapsed(Array2<f32>),
}

impl Probabilities {
    pub fn is_collapsed(&self) -> bool {
        matches!(self, Probabilities::Collapsed(_))
    }

    /// The probability matrix regardless of tag.
    pub fn matrix(&self) -> &Array2<f32> {
        match self {
            Probabilities::Valid(m) | Probabilities::Collapsed(m) => m,
        }
    }
}

/// What happened during a `fit` call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitSummary {
    /// Iterations actually executed; equals the configured budget unless the
    /// run collapsed or hit its deadline.
    pub iterations_run: usize,
    /// Forward propagation collapsed mid-training; the parameters are
    /// garbage and the trial should be discarded.
    pub collapsed: bool,
    /// The optional per-fit deadline expired before the budget ran out.
    pub timed_out: bool,
}

/// Hand-rolled tanh-hidden / softmax-output binary classifier trained with
/// full-batch gradient descent.
#[derive(Debug, Clone)]
pub struct Network {
    hidden: Vec<usize>,
    hyper: Hyperparameters,
    seed: u64,
    /// One entry per layer transition; empty until the first fit or an
    /// explicit `initialize`.
    pub layers: Vec<Layer>,
}

struct ForwardState {
    /// Input plus every hidden activation, indexed so that
    /// `activations[i]` feeds `layers[i]`.
    activations: Vec<Array2<f32>>,
    probs: Probabilities,
}

impl Network {
    pub fn new(hidden: Vec<usize>, hyper: Hyperparameters, seed: u64) -> Self {
        Network {
            hidden,
            hyper,
            seed,
            layers: Vec::new(),
        }
    }

    pub fn hyperparameters(&self) -> &Hyperparameters {
        &self.hyper
    }

    /// Regenerates all layer parameters for the topology
    /// `[input_dim, hidden.., 2]` from the configured seed.
    ///
    /// Same seed and topology always yield bit-identical weights. Once the
    /// network has been initialized its input width is fixed; re-initializing
    /// with a different one is a contract violation.
    pub fn initialize(&mut self, input_dim: usize) -> Result<()> {
        if let Some(existing) = self.input_dim() {
            if existing != input_dim {
                return Err(Error::DimensionMismatch {
                    expected: existing,
                    found: input_dim,
                });
            }
        }

        let mut dims = Vec::with_capacity(self.hidden.len() + 2);
        dims.push(input_dim);
        dims.extend_from_slice(&self.hidden);
        dims.push(OUTPUT_CLASSES);

        let mut rng = StdRng::seed_from_u64(self.seed);
        self.layers = dims
            .windows(2)
            .map(|pair| Layer::init(pair[0], pair[1], &mut rng))
            .collect();
        Ok(())
    }

    pub fn input_dim(&self) -> Option<usize> {
        self.layers.first().map(|layer| layer.inputs())
    }

    /// Trains for the configured iteration budget; the budget is the sole
    /// stopping criterion apart from the optional deadline and numeric
    /// collapse.
    pub fn fit(&mut self, x: &Array2<f32>, y: &[u8]) -> Result<FitSummary> {
        if y.len() != x.nrows() {
            return Err(Error::LabelCountMismatch {
                rows: x.nrows(),
                labels: y.len(),
            });
        }
        if let Some(&bad) = y.iter().find(|&&label| label > 1) {
            return Err(Error::InvalidLabel(bad));
        }

        self.initialize(x.ncols())?;

        let started = Instant::now();
        let mut summary = FitSummary {
            iterations_run: 0,
            collapsed: false,
            timed_out: false,
        };

        for iteration in 0..self.hyper.iterations {
            if let Some(deadline) = self.hyper.deadline {
                if started.elapsed() >= deadline {
                    warn!(iteration, "fit deadline expired, stopping early");
                    summary.timed_out = true;
                    break;
                }
            }

            let state = self.forward(x);
            let probs = match state.probs {
                Probabilities::Valid(p) => p,
                Probabilities::Collapsed(_) => {
                    warn!(iteration, "forward propagation collapsed, aborting fit");
                    summary.collapsed = true;
                    break;
                }
            };

            if iteration % 1000 == 0 {
                let loss = cross_entropy(&probs, y) + self.l2_penalty();
                debug!(iteration, loss, "training progress");
            }

            self.descend(&state.activations, &probs, y);
            summary.iterations_run = iteration + 1;
        }

        Ok(summary)
    }

    /// Per-example index of the higher-probability class.
    ///
    /// A collapsed forward pass decays every prediction to class 0; it is
    /// logged here, and observable through `predict_probabilities`.
    pub fn predict(&self, x: &Array2<f32>) -> Result<Vec<u8>> {
        let probs = self.predict_probabilities(x)?;
        if probs.is_collapsed() {
            warn!("predicting from collapsed probabilities");
        }
        let matrix = probs.matrix();
        Ok((0..matrix.nrows())
            .map(|i| u8::from(matrix[[i, 1]] > matrix[[i, 0]]))
            .collect())
    }

    /// Raw class probabilities, tagged with the collapse state.
    pub fn predict_probabilities(&self, x: &Array2<f32>) -> Result<Probabilities> {
        self.check_input(x)?;
        Ok(self.forward(x).probs)
    }

    /// Mean cross-entropy of the true class plus the L2 penalty. Diagnostic
    /// only; finite even for collapsed outputs.
    pub fn compute_loss(&self, x: &Array2<f32>, y: &[u8]) -> Result<f32> {
        self.check_input(x)?;
        if y.len() != x.nrows() {
            return Err(Error::LabelCountMismatch {
                rows: x.nrows(),
                labels: y.len(),
            });
        }
        let state = self.forward(x);
        Ok(cross_entropy(state.probs.matrix(), y) + self.l2_penalty())
    }

    fn check_input(&self, x: &Array2<f32>) -> Result<()> {
        match self.input_dim() {
            None => Err(Error::NotInitialized),
            Some(expected) if expected != x.ncols() => Err(Error::DimensionMismatch {
                expected,
                found: x.ncols(),
            }),
            Some(_) => Ok(()),
        }
    }

    fn forward(&self, x: &Array2<f32>) -> ForwardState {
        let mut activations = Vec::with_capacity(self.layers.len());
        activations.push(x.clone());

        let (output_layer, hidden_layers) = self
            .layers
            .split_last()
            .expect("forward called before initialization");
        for layer in hidden_layers {
            let a = tanh(&layer.linear(activations.last().expect("non-empty")));
            activations.push(a);
        }

        let z_out = output_layer.linear(activations.last().expect("non-empty"));
        let probs = match softmax_rows(&z_out) {
            Some(p) => Probabilities::Valid(p),
            None => Probabilities::Collapsed(Array2::from_elem(
                z_out.raw_dim(),
                COLLAPSE_SENTINEL,
            )),
        };

        ForwardState {
            activations,
            probs,
        }
    }

    /// One backpropagation step followed by the in-place parameter update.
    fn descend(&mut self, activations: &[Array2<f32>], probs: &Array2<f32>, y: &[u8]) {
        // Copy before subtracting so the caller's probability matrix is
        // never aliased by the output delta.
        let mut delta = probs.clone();
        for (i, &label) in y.iter().enumerate() {
            delta[[i, label as usize]] -= 1.0;
        }

        for idx in (0..self.layers.len()).rev() {
            let a_prev = &activations[idx];
            let dw = a_prev.t().dot(&delta) + self.hyper.reg_lambda * &self.layers[idx].weights;
            let db = delta.sum_axis(Axis(0));

            if idx > 0 {
                let propagated = delta.dot(&self.layers[idx].weights.t());
                let deriv = tanh_derivative_from_activation(&activations[idx]);
                // A non-finite product saturates to the largest finite value
                // instead of failing the iteration.
                delta = (&propagated * &deriv)
                    .mapv(|v| if v.is_finite() { v } else { f32::MAX });
            }

            let layer = &mut self.layers[idx];
            layer.weights = &layer.weights - self.hyper.epsilon * &dw;
            layer.bias = &layer.bias - self.hyper.epsilon * &db;
        }
    }

    fn l2_penalty(&self) -> f32 {
        let sum_of_squares: f32 = self
            .layers
            .iter()
            .map(|layer| layer.weights.mapv(|w| w * w).sum())
            .sum();
        self.hyper.reg_lambda / 2.0 * sum_of_squares
    }
}
