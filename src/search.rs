use std::time::Duration;

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::{info, warn};

use crate::dataset::train_test_split;
use crate::error::{Error, Result};
use crate::hyperparameters::Hyperparameters;
use crate::metrics::ScoreRecord;
use crate::network::Network;

/// Mean phi recorded for a candidate whose every trial collapsed or timed
/// out; the lower bound of the phi range, so such a candidate can never win
/// against one with a surviving trial.
const NO_SURVIVING_TRIAL_PHI: f32 = -1.0;

/// Insertion-ordered `(epsilon, mean phi)` results of one search.
#[derive(Debug, Clone, Default)]
pub struct EpsilonRateTable {
    entries: Vec<(f32, f32)>,
}

impl EpsilonRateTable {
    pub fn insert(&mut self, epsilon: f32, mean_phi: f32) {
        self.entries.push((epsilon, mean_phi));
    }

    pub fn entries(&self) -> &[(f32, f32)] {
        &self.entries
    }

    /// The epsilon with the maximum mean phi.
    ///
    /// Ties break toward the first-seen maximum: a later candidate replaces
    /// the current best only with a strictly greater phi.
    pub fn best_epsilon(&self) -> Result<f32> {
        let mut best: Option<(f32, f32)> = None;
        for &(epsilon, phi) in &self.entries {
            match best {
                Some((_, best_phi)) if phi <= best_phi => {}
                _ => best = Some((epsilon, phi)),
            }
        }
        let (epsilon, phi) = best.ok_or(Error::EmptyCandidateSet)?;
        info!(epsilon, phi, "best epsilon selected");
        Ok(epsilon)
    }
}

/// Repeated cross-validation over a set of candidate learning rates.
///
/// Every (candidate, trial) pair trains a brand-new [`Network`] on a fresh
/// 70/30 train/validation split, so no weights or RNG state leak between
/// candidates. Trials run on the rayon pool; per-trial seeds derive from the
/// base seed and the job index, so parallel and serial runs agree.
#[derive(Debug, Clone)]
pub struct EpsilonSearch {
    pub candidates: Vec<f32>,
    pub hidden: Vec<usize>,
    pub reg_lambda: f32,
    /// Independent trials per candidate.
    pub trials: usize,
    /// Iteration budget for each trial network.
    pub trial_iterations: usize,
    pub validation_fraction: f32,
    /// Optional wall-clock budget per trial.
    pub trial_deadline: Option<Duration>,
}

impl EpsilonSearch {
    pub fn new(candidates: Vec<f32>, reg_lambda: f32, hidden: Vec<usize>) -> Self {
        EpsilonSearch {
            candidates,
            hidden,
            reg_lambda,
            trials: 3,
            trial_iterations: 10_000,
            validation_fraction: 0.3,
            trial_deadline: None,
        }
    }

    /// Cross-validates every candidate against the provided training data
    /// and returns the filled rate table.
    pub fn run(&self, x: &Array2<f32>, y: &[u8], seed: u64) -> Result<EpsilonRateTable> {
        if self.candidates.is_empty() {
            return Err(Error::EmptyCandidateSet);
        }

        let jobs: Vec<(usize, usize)> = (0..self.candidates.len())
            .flat_map(|c| (0..self.trials).map(move |t| (c, t)))
            .collect();

        let outcomes: Vec<(usize, Option<ScoreRecord>)> = jobs
            .into_par_iter()
            .map(|(candidate, trial)| {
                let job_index = (candidate * self.trials + trial) as u64;
                let trial_seed = seed ^ job_index.wrapping_mul(0x9E37_79B9_7F4A_7C15);
                let record =
                    self.run_trial(x, y, self.candidates[candidate], trial_seed)?;
                Ok((candidate, record))
            })
            .collect::<Result<_>>()?;

        let mut table = EpsilonRateTable::default();
        for (candidate, &epsilon) in self.candidates.iter().enumerate() {
            let records: Vec<ScoreRecord> = outcomes
                .iter()
                .filter(|(c, _)| *c == candidate)
                .filter_map(|(_, record)| *record)
                .collect();

            let mean_phi = match ScoreRecord::mean(&records) {
                Some(mean) => mean.phi,
                None => {
                    warn!(epsilon, "no trial survived for candidate");
                    NO_SURVIVING_TRIAL_PHI
                }
            };
            info!(epsilon, mean_phi, surviving_trials = records.len(), "candidate scored");
            table.insert(epsilon, mean_phi);
        }

        Ok(table)
    }

    /// One trial: split, train a fresh network, score validation predictions.
    /// Collapsed or expired runs are discarded (`None`), not retried.
    fn run_trial(
        &self,
        x: &Array2<f32>,
        y: &[u8],
        epsilon: f32,
        seed: u64,
    ) -> Result<Option<ScoreRecord>> {
        let mut rng = StdRng::seed_from_u64(seed);
        let (train_x, train_y, val_x, val_y) =
            train_test_split(x, y, self.validation_fraction, &mut rng)?;

        let hyper = Hyperparameters {
            iterations: self.trial_iterations,
            epsilon,
            reg_lambda: self.reg_lambda,
            deadline: self.trial_deadline,
        };
        let mut network = Network::new(self.hidden.clone(), hyper, rng.random());
        let summary = network.fit(&train_x, &train_y)?;
        if summary.collapsed || summary.timed_out {
            warn!(
                epsilon,
                collapsed = summary.collapsed,
                timed_out = summary.timed_out,
                "discarding trial"
            );
            return Ok(None);
        }

        let predicted: Vec<bool> = network
            .predict(&val_x)?
            .into_iter()
            .map(|label| label == 1)
            .collect();
        let actual: Vec<bool> = val_y.iter().map(|&label| label == 1).collect();
        Ok(Some(ScoreRecord::compute(&actual, &predicted)))
    }
}
