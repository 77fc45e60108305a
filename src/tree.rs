//! The fitted tree, its nodes and the induction procedure.
use rayon::prelude::*;
use serde::{Serialize, Deserialize};

use std::fmt;
use std::fs::File;
use std::io::prelude::*;
use std::path::Path;

use crate::error::Result;
use crate::sample::{Sample, Value};

/// Defines the inner representation of a fitted tree.
pub mod node;
pub(crate) mod split_rule;
pub(crate) mod grow;

pub use node::{Node, UnseenValue};


/// A fitted decision tree.
/// This struct is a wrapper of the root `Node`
/// together with the policy for categorical values
/// that were not seen during training.
/// Trees that cannot hold multi-way nodes carry no policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    root: Node,
    unseen: Option<UnseenValue>,
}


impl Tree {
    #[inline]
    pub(crate) fn new(root: Node, unseen: Option<UnseenValue>) -> Self {
        Self { root, unseen }
    }


    /// Returns the root node.
    pub fn root(&self) -> &Node {
        &self.root
    }


    /// Returns the policy applied to unseen categorical values,
    /// or `None` if the tree has no multi-way nodes by construction.
    pub fn unseen_value(&self) -> Option<UnseenValue> {
        self.unseen
    }


    /// The features read by the tree, in depth-first order.
    pub fn feature_names(&self) -> Vec<&str> {
        self.root.feature_names()
    }


    /// Predicts the class of the record at `row` of `sample`.
    #[inline]
    pub fn predict(&self, sample: &Sample, row: usize) -> Result<Value> {
        self.root.predict(sample, row, self.unseen)
    }


    /// Predicts the class of every record of `sample`, in record order.
    pub fn predict_all(&self, sample: &Sample) -> Result<Vec<Value>> {
        let n_sample = sample.shape().0;
        (0..n_sample).into_par_iter()
            .map(|row| self.predict(sample, row))
            .collect()
    }


    /// The number of edges on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        self.root.depth()
    }


    /// The number of leaves.
    pub fn n_leaves(&self) -> usize {
        self.root.n_leaves()
    }


    /// Write the current decision tree to dot file.
    pub fn to_dot_file<P>(&self, path: P) -> Result<()>
        where P: AsRef<Path>
    {
        let mut f = File::create(path)?;
        f.write_all(b"graph DecisionTree {\n")?;

        let info = self.root.to_dot_info(0).0;
        for row in info {
            f.write_all(row.as_bytes())?;
        }

        f.write_all(b"}\n")?;
        Ok(())
    }


    /// Serializes the tree into a JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }


    /// Deserializes a tree from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}


impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)
    }
}
