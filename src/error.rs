//! Errors
//!
//! Custom error types used throughout the `minitrees` crate.
use polars::prelude::PolarsError;
use thiserror::Error;

/// A specialized `Result` type for tree induction and prediction.
pub type Result<T> = std::result::Result<T, TreeError>;

/// Errors that can occur while fitting or querying a decision tree.
#[derive(Debug, Error)]
pub enum TreeError {
    /// First value is the name of the parameter,
    /// second is what is expected, third is what was passed.
    #[error("Invalid parameter value passed for {0}, expected {1} but {2} provided.")]
    InvalidParameter(String, String, String),
    /// `predict` was called before `fit`.
    #[error("The model is not fitted yet. Call `fit` before `predict`.")]
    NotFitted,
    /// An impurity was requested for an empty label collection.
    #[error("Cannot compute an impurity over an empty label collection.")]
    EmptyLabels,
    /// The training frame has no rows.
    #[error("The training sample has no records.")]
    EmptySample,
    /// The training frame has no feature columns.
    #[error("The training sample has no feature columns.")]
    NoFeatures,
    /// A column was requested but does not exist.
    #[error("The column `{0}` does not exist.")]
    MissingColumn(String),
    /// A null value was found where none is allowed.
    #[error("The column `{0}` contains null values at row {1}.")]
    NullValue(String, usize),
    /// A NaN value was found in a continuous column.
    #[error("The continuous column `{0}` contains a NaN value at row {1}.")]
    NanValue(String, usize),
    /// Target and features disagree on the number of records.
    #[error("The target has {1} records, but the features have {0}.")]
    LengthMismatch(usize, usize),
    /// A tree node expects a column kind that the input does not have.
    #[error("The column `{0}` is expected to be {1}, but it is {2}.")]
    KindMismatch(String, String, String),
    /// The tree violates a construction invariant.
    #[error("Malformed tree: {0}")]
    MalformedTree(String),
    /// Error raised by polars while reading a column.
    #[error(transparent)]
    Polars(#[from] PolarsError),
    /// Unable to read or write a file.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Unable to (de)serialize a tree.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
