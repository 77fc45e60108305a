//! Defines the `Classifier` trait implemented by every algorithm.
use polars::prelude::*;

use crate::error::{Result, TreeError};
use crate::sample::{Sample, Value};
use crate::tree::Tree;


/// A decision tree classifier.
///
/// `fit` builds a tree from a feature table and a target column,
/// `predict` walks the fitted tree for every record.
pub trait Classifier {
    /// Fits the classifier on an already ingested sample.
    fn fit_sample(&mut self, sample: &Sample) -> Result<()>;


    /// Returns the fitted tree, or `None` before `fit`.
    fn tree(&self) -> Option<&Tree>;


    /// Fits the classifier on `data` with the labels `target`.
    /// The given frame and series are copied, not modified.
    fn fit(&mut self, data: &DataFrame, target: &Series) -> Result<()> {
        let sample = Sample::from_dataframe(data, target)?;
        self.fit_sample(&sample)
    }


    /// Fits the classifier on `frame`,
    /// using the column named `target` as the labels
    /// and every other column as a feature.
    fn fit_column<S>(&mut self, frame: &DataFrame, target: S) -> Result<()>
        where S: AsRef<str>,
              Self: Sized,
    {
        let sample = Sample::split_target(frame, target)?;
        self.fit_sample(&sample)
    }


    /// Predicts a label for every record of `data`, in record order.
    /// Only the columns the tree reads are converted;
    /// null and NaN cells in them are treated as missing values.
    fn predict(&self, data: &DataFrame) -> Result<Vec<Value>> {
        let tree = self.tree().ok_or(TreeError::NotFitted)?;
        let sample = Sample::from_columns(data, &tree.feature_names())?;
        tree.predict_all(&sample)
    }


    /// Predicts a label for every record of `sample`, in record order.
    fn predict_sample(&self, sample: &Sample) -> Result<Vec<Value>> {
        let tree = self.tree().ok_or(TreeError::NotFitted)?;
        tree.predict_all(sample)
    }
}


/// Returns the fraction of `predictions` that equal `truth`.
/// Returns `0` for empty inputs.
pub fn accuracy(predictions: &[Value], truth: &[Value]) -> Result<f64> {
    if predictions.len() != truth.len() {
        return Err(TreeError::LengthMismatch(predictions.len(), truth.len()));
    }
    if predictions.is_empty() { return Ok(0f64); }

    let hits = predictions.iter()
        .zip(truth)
        .filter(|(p, y)| p == y)
        .count();
    Ok(hits as f64 / predictions.len() as f64)
}
