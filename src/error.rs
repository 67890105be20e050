use thiserror::Error;

/// Structural and contract errors surfaced to callers.
///
/// Numeric edge cases (softmax overflow, degenerate confusion matrices) are
/// absorbed where they occur and never show up here.
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    #[error("input has {found} features but the network was initialized for {expected}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("network has not been fitted yet")]
    NotInitialized,

    #[error("dataset contains no examples")]
    EmptyDataset,

    #[error("label {0} is outside the binary set {{0, 1}}")]
    InvalidLabel(u8),

    #[error("{labels} labels provided for {rows} feature rows")]
    LabelCountMismatch { rows: usize, labels: usize },

    #[error("epsilon search requires at least one candidate value")]
    EmptyCandidateSet,

    #[error("splitting {len} examples at fraction {fraction} would leave one side empty")]
    DegenerateSplit { len: usize, fraction: f32 },
}

pub type Result<T> = std::result::Result<T, Error>;
