//! A node struct used in the decision tree algorithms.
use serde::{Serialize, Deserialize};

use std::fmt;

use crate::error::{Result, TreeError};
use crate::sample::{Sample, Value};
use super::split_rule::value_set;


/// What to predict when a record carries a categorical value
/// that has no branch at a multi-branch node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnseenValue {
    /// The most frequent leaf value under the node.
    /// Ties go to the leaf met first in a depth-first walk.
    MajorityLeaf,
    /// The leaf reached by always following the first branch.
    /// This is a weaker heuristic than `MajorityLeaf`.
    FirstLeaf,
}


/// A node of a fitted decision tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    /// A node that predicts a single class.
    Leaf {
        /// The predicted class.
        prediction: Value,
    },
    /// A node with one child per observed value of `feature`,
    /// kept in the order the values were first observed.
    Multiway {
        /// The feature name.
        feature: String,
        /// Pairs of a feature value and its subtree.
        branches: Vec<(Value, Node)>,
    },
    /// A node that sends `feature <= threshold` to `left`
    /// and everything else to `right`.
    /// A missing value goes to `right`.
    Threshold {
        /// The feature name.
        feature: String,
        /// The split point.
        threshold: f64,
        /// Subtree for `feature <= threshold`.
        left: Box<Node>,
        /// Subtree for the rest.
        right: Box<Node>,
    },
    /// A node that sends a value in `values` to `left`
    /// and everything else to `right`.
    Subset {
        /// The feature name.
        feature: String,
        /// The values sent to `left`.
        values: Vec<Value>,
        /// Subtree for the values in `values`.
        left: Box<Node>,
        /// Subtree for the rest.
        right: Box<Node>,
    },
}


impl Node {
    pub(crate) fn leaf(prediction: Value) -> Self {
        Self::Leaf { prediction }
    }


    /// Predicts the class of the record at `row`.
    ///
    /// A missing or unseen value at a multi-way node is labeled by `unseen`.
    /// Trees without multi-way nodes pass `None`.
    pub fn predict(
        &self,
        sample: &Sample,
        row: usize,
        unseen: Option<UnseenValue>,
    ) -> Result<Value>
    {
        match self {
            Self::Leaf { prediction } => Ok(prediction.clone()),
            Self::Multiway { feature, branches } => {
                let column = sample.feature(feature)?;
                let child = branches.iter()
                    .find(|(value, _)| column.value_eq(row, value));
                match child {
                    Some((_, child)) => child.predict(sample, row, unseen),
                    None => {
                        let policy = unseen.ok_or_else(|| {
                            TreeError::MalformedTree(format!(
                                "multi-way node on `{feature}` \
                                 without an unseen-value policy"
                            ))
                        })?;
                        self.unseen_value_label(policy)
                    },
                }
            },
            Self::Threshold { feature, threshold, left, right } => {
                let column = sample.feature(feature)?;
                if column.is_missing(row) {
                    return right.predict(sample, row, unseen);
                }
                let x = column.numeric_at(row)
                    .ok_or_else(|| TreeError::KindMismatch(
                        feature.clone(),
                        "continuous".to_string(),
                        column.kind().to_string(),
                    ))?;
                if x <= *threshold {
                    left.predict(sample, row, unseen)
                } else {
                    right.predict(sample, row, unseen)
                }
            },
            Self::Subset { feature, values, left, right } => {
                let column = sample.feature(feature)?;
                if values.iter().any(|v| column.value_eq(row, v)) {
                    left.predict(sample, row, unseen)
                } else {
                    right.predict(sample, row, unseen)
                }
            },
        }
    }


    fn unseen_value_label(&self, unseen: UnseenValue) -> Result<Value> {
        let label = match unseen {
            UnseenValue::MajorityLeaf => self.majority_leaf(),
            UnseenValue::FirstLeaf => self.first_leaf(),
        };
        label.cloned()
            .ok_or_else(|| TreeError::MalformedTree(
                "a branch node has no leaf below it".to_string()
            ))
    }


    /// The features read by this subtree,
    /// without duplicates, in depth-first order.
    pub fn feature_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_features(&mut names);
        names
    }


    fn collect_features<'a>(&'a self, names: &mut Vec<&'a str>) {
        let (feature, children) = match self {
            Self::Leaf { .. } => return,
            Self::Multiway { feature, branches } => {
                let children = branches.iter()
                    .map(|(_, child)| child)
                    .collect::<Vec<_>>();
                (feature, children)
            },
            Self::Threshold { feature, left, right, .. }
            | Self::Subset { feature, left, right, .. } => {
                (feature, vec![&**left, &**right])
            },
        };
        if !names.contains(&feature.as_str()) {
            names.push(feature);
        }
        children.into_iter()
            .for_each(|child| child.collect_features(names));
    }


    /// Collects every leaf value below this node in depth-first order.
    pub fn leaves(&self) -> Vec<&Value> {
        let mut leaves = Vec::new();
        self.collect_leaves(&mut leaves);
        leaves
    }


    fn collect_leaves<'a>(&'a self, leaves: &mut Vec<&'a Value>) {
        match self {
            Self::Leaf { prediction } => leaves.push(prediction),
            Self::Multiway { branches, .. } => {
                branches.iter()
                    .for_each(|(_, child)| child.collect_leaves(leaves));
            },
            Self::Threshold { left, right, .. }
            | Self::Subset { left, right, .. } => {
                left.collect_leaves(leaves);
                right.collect_leaves(leaves);
            },
        }
    }


    /// The most frequent leaf value below this node.
    pub(crate) fn majority_leaf(&self) -> Option<&Value> {
        let leaves = self.leaves();
        let mut counts: Vec<(&Value, usize)> = Vec::new();
        for leaf in leaves {
            match counts.iter_mut().find(|(v, _)| *v == leaf) {
                Some((_, c)) => { *c += 1; },
                None => { counts.push((leaf, 1)); },
            }
        }

        // Keep the first one among the most frequent.
        let mut best: Option<(&Value, usize)> = None;
        for (value, count) in counts {
            if best.map_or(true, |(_, c)| count > c) {
                best = Some((value, count));
            }
        }
        best.map(|(value, _)| value)
    }


    /// The leaf reached by following the first branch at every node.
    pub(crate) fn first_leaf(&self) -> Option<&Value> {
        match self {
            Self::Leaf { prediction } => Some(prediction),
            Self::Multiway { branches, .. } => {
                branches.first()
                    .and_then(|(_, child)| child.first_leaf())
            },
            Self::Threshold { left, .. }
            | Self::Subset { left, .. } => left.first_leaf(),
        }
    }


    /// The number of edges on the longest path to a leaf.
    pub fn depth(&self) -> usize {
        match self {
            Self::Leaf { .. } => 0,
            Self::Multiway { branches, .. } => {
                1 + branches.iter()
                    .map(|(_, child)| child.depth())
                    .max()
                    .unwrap_or(0)
            },
            Self::Threshold { left, right, .. }
            | Self::Subset { left, right, .. } => {
                1 + left.depth().max(right.depth())
            },
        }
    }


    /// The number of leaves below this node.
    pub fn n_leaves(&self) -> usize {
        match self {
            Self::Leaf { .. } => 1,
            Self::Multiway { branches, .. } => {
                branches.iter().map(|(_, child)| child.n_leaves()).sum()
            },
            Self::Threshold { left, right, .. }
            | Self::Subset { left, right, .. } => {
                left.n_leaves() + right.n_leaves()
            },
        }
    }


    pub(crate) fn to_dot_info(&self, id: usize) -> (Vec<String>, usize) {
        match self {
            Self::Leaf { prediction } => {
                let info = format!(
                    "\tnode_{id} [ label = \"{prediction}\", shape = box ];\n",
                );
                (vec![info], id + 1)
            },
            Self::Multiway { feature, branches } => {
                let mut info = vec![
                    format!("\tnode_{id} [ label = \"{feature} ?\" ];\n"),
                ];
                let mut next_id = id + 1;
                for (value, child) in branches {
                    let child_id = next_id;
                    let (mut child_info, ret_id) = child.to_dot_info(child_id);
                    info.append(&mut child_info);
                    info.push(format!(
                        "\tnode_{id} -- node_{child_id} [ label = \"{value}\" ];\n",
                    ));
                    next_id = ret_id;
                }
                (info, next_id)
            },
            Self::Threshold { feature, threshold, left, right } => {
                let question = format!("{feature} <= {threshold} ?");
                binary_dot_info(id, question, left, right)
            },
            Self::Subset { feature, values, left, right } => {
                let question = format!(
                    "{feature} in {} ?", value_set(values)
                );
                binary_dot_info(id, question, left, right)
            },
        }
    }


    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, indent: usize)
        -> fmt::Result
    {
        let pad = "|   ".repeat(indent);
        match self {
            Self::Leaf { prediction } => writeln!(f, "{pad}-> {prediction}"),
            Self::Multiway { feature, branches } => {
                for (value, child) in branches {
                    writeln!(f, "{pad}{feature} = {value}")?;
                    child.fmt_indented(f, indent + 1)?;
                }
                Ok(())
            },
            Self::Threshold { feature, threshold, left, right } => {
                writeln!(f, "{pad}{feature} <= {threshold}")?;
                left.fmt_indented(f, indent + 1)?;
                writeln!(f, "{pad}{feature} > {threshold}")?;
                right.fmt_indented(f, indent + 1)
            },
            Self::Subset { feature, values, left, right } => {
                let set = value_set(values);
                writeln!(f, "{pad}{feature} in {set}")?;
                left.fmt_indented(f, indent + 1)?;
                writeln!(f, "{pad}{feature} not in {set}")?;
                right.fmt_indented(f, indent + 1)
            },
        }
    }
}


fn binary_dot_info(id: usize, question: String, left: &Node, right: &Node)
    -> (Vec<String>, usize)
{
    let left_id = id + 1;
    let (mut info, right_id) = left.to_dot_info(left_id);
    let (mut right, return_id) = right.to_dot_info(right_id);

    info.push(format!("\tnode_{id} [ label = \"{question}\" ];\n"));
    info.append(&mut right);
    info.push(format!(
        "\tnode_{id} -- node_{left_id} [ label = \"Yes\" ];\n",
    ));
    info.push(format!(
        "\tnode_{id} -- node_{right_id} [ label = \"No\" ];\n",
    ));

    (info, return_id)
}


impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}
