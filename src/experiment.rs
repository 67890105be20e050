use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};

use crate::dataset::{train_test_split, Dataset};
use crate::error::Result;
use crate::hyperparameters::Hyperparameters;
use crate::metrics::ScoreRecord;
use crate::network::Network;
use crate::search::{EpsilonRateTable, EpsilonSearch};

/// Everything one experiment run needs, passed in explicitly rather than
/// read from shared mutable state.
#[derive(Debug, Clone)]
pub struct ExperimentConfig {
    pub hidden: Vec<usize>,
    pub epsilon_candidates: Vec<f32>,
    pub reg_lambda: f32,
    pub trials_per_candidate: usize,
    /// Iteration budget for each search trial.
    pub search_iterations: usize,
    /// Larger budget for the final production network.
    pub final_iterations: usize,
    pub validation_fraction: f32,
    pub test_fraction: f32,
    pub seed: u64,
    pub trial_deadline: Option<Duration>,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        ExperimentConfig {
            hidden: vec![10],
            epsilon_candidates: vec![0.0001, 0.001, 0.01, 0.1],
            reg_lambda: 0.01,
            trials_per_candidate: 3,
            search_iterations: 10_000,
            final_iterations: 50_000,
            validation_fraction: 0.3,
            test_fraction: 0.3,
            seed: 1,
            trial_deadline: None,
        }
    }
}

/// In-memory result bundle handed to the external reporter, which owns
/// persistence, plotting and acceptance decisions.
#[derive(Debug, Clone)]
pub struct ExperimentReport {
    pub best_epsilon: f32,
    /// Test-set scores of the final network.
    pub scores: ScoreRecord,
    /// The final network's forward pass collapsed; the scores are not
    /// trustworthy and the reporter should flag the run.
    pub collapsed: bool,
    /// The final fit hit its deadline before the configured iteration
    /// budget, so the network is undertrained and the reporter should flag
    /// the run.
    pub timed_out: bool,
    pub rate_table: EpsilonRateTable,
}

/// Full experiment: test split, epsilon search, final training, scoring.
pub fn run_experiment(dataset: &Dataset, config: &ExperimentConfig) -> Result<ExperimentReport> {
    if let Some(message) = dataset.balance_warning() {
        warn!("{message}");
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let (train_x, train_y, test_x, test_y) = train_test_split(
        &dataset.features,
        &dataset.labels,
        config.test_fraction,
        &mut rng,
    )?;
    info!(
        train = train_y.len(),
        test = test_y.len(),
        features = dataset.feature_width(),
        "dataset split"
    );

    let search = EpsilonSearch {
        candidates: config.epsilon_candidates.clone(),
        hidden: config.hidden.clone(),
        reg_lambda: config.reg_lambda,
        trials: config.trials_per_candidate,
        trial_iterations: config.search_iterations,
        validation_fraction: config.validation_fraction,
        trial_deadline: config.trial_deadline,
    };
    let rate_table = search.run(&train_x, &train_y, rng.random())?;
    let best_epsilon = rate_table.best_epsilon()?;

    // Retrain from scratch on the full training split with the winning rate
    // and the larger budget.
    let hyper = Hyperparameters {
        iterations: config.final_iterations,
        epsilon: best_epsilon,
        reg_lambda: config.reg_lambda,
        deadline: config.trial_deadline,
    };
    let mut network = Network::new(config.hidden.clone(), hyper, rng.random());
    let summary = network.fit(&train_x, &train_y)?;
    if summary.collapsed {
        warn!("final network collapsed during training");
    }
    if summary.timed_out {
        warn!(
            iterations_run = summary.iterations_run,
            "final network hit its deadline before the iteration budget"
        );
    }

    let predicted: Vec<bool> = network
        .predict(&test_x)?
        .into_iter()
        .map(|label| label == 1)
        .collect();
    let actual: Vec<bool> = test_y.iter().map(|&label| label == 1).collect();
    let scores = ScoreRecord::compute(&actual, &predicted);

    info!(
        best_epsilon,
        accuracy = scores.accuracy,
        phi = scores.phi,
        "experiment finished"
    );

    Ok(ExperimentReport {
        best_epsilon,
        scores,
        collapsed: summary.collapsed,
        timed_out: summary.timed_out,
        rate_table,
    })
}
