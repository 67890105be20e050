mod activation;
mod classifier;
mod dataset;
mod error;
mod experiment;
mod hyperparameters;
mod layer;
mod loss;
mod metrics;
mod network;
mod search;

pub use classifier::Classifier;
pub use dataset::train_test_split;
pub use dataset::Dataset;
pub use error::Error;
pub use error::Result;
pub use experiment::run_experiment;
pub use experiment::ExperimentConfig;
pub use experiment::ExperimentReport;
pub use hyperparameters::Hyperparameters;
pub use layer::Layer;
pub use metrics::ScoreRecord;
pub use network::FitSummary;
pub use network::Network;
pub use network::Probabilities;
pub use network::COLLAPSE_SENTINEL;
pub use search::EpsilonRateTable;
pub use search::EpsilonSearch;
