//! The recursive partitioning procedure shared by every algorithm.
use log::{debug, warn};

use crate::criterion::{label_counts, group_by_value};
use crate::error::{Result, TreeError};
use crate::sample::{Sample, Value};
use super::node::Node;
use super::split_rule::{Split, LeftRight};


/// The algorithm-specific parts of tree induction.
pub(crate) trait Induction {
    /// The algorithm name used in logs.
    fn name(&self) -> &'static str;


    /// Returns the best split of `indices` among `features` and its score,
    /// or `None` if no feature yields a usable split.
    fn best_split(
        &self,
        sample: &Sample,
        target: &[Value],
        indices: &[usize],
        features: &[&str],
    ) -> Result<Option<(Split, f64)>>;


    /// A subset with fewer records than this becomes a leaf.
    fn min_samples_split(&self) -> usize;


    /// A node at this depth becomes a leaf.
    fn max_depth(&self) -> Option<usize>;


    /// Whether the depth limit is a safety ceiling
    /// rather than a user request.
    fn depth_is_ceiling(&self) -> bool { false }
}


/// Grows a tree over the records `indices`.
///
/// `parent` holds the records of the caller,
/// whose majority class labels an empty subset.
/// At the root, `parent` is `indices` itself.
pub(crate) fn grow<I>(
    inducer: &I,
    sample: &Sample,
    target: &[Value],
    indices: &[usize],
    parent: &[usize],
    features: &[&str],
    depth: usize,
) -> Result<Node>
    where I: Induction + ?Sized
{
    let counts = label_counts(target, indices);

    // Pure node.
    if counts.len() == 1 {
        let prediction = target[indices[0]].clone();
        return Ok(Node::leaf(prediction));
    }

    // Nothing to split on.
    if indices.is_empty() {
        return Ok(Node::leaf(majority_label(target, parent)?));
    }
    if features.is_empty() || indices.len() < inducer.min_samples_split() {
        return Ok(Node::leaf(majority_label(target, indices)?));
    }
    if inducer.max_depth().is_some_and(|max_depth| depth >= max_depth) {
        if inducer.depth_is_ceiling() {
            warn!(
                "{} reached the depth ceiling {depth} with {} records; \
                 emitting a majority leaf",
                inducer.name(), indices.len(),
            );
        }
        return Ok(Node::leaf(majority_label(target, indices)?));
    }

    let Some((split, score)) = inducer.best_split(
        sample, target, indices, features
    )? else {
        debug!("{}: no usable split on {} records", inducer.name(), indices.len());
        return Ok(Node::leaf(majority_label(target, indices)?));
    };
    debug!(
        "{}: depth {depth}, {} records, split on `{split}` (score {score:.6})",
        inducer.name(), indices.len(),
    );

    let column = sample.feature(split.feature())?;
    let node = match &split {
        Split::Multiway { feature } => {
            let remaining = features.iter()
                .copied()
                .filter(|&name| name != feature.as_str())
                .collect::<Vec<_>>();

            let branches = group_by_value(column, indices)
                .into_iter()
                .map(|(value, group)| {
                    let child = grow(
                        inducer, sample, target,
                        &group, indices, &remaining, depth + 1,
                    )?;
                    Ok((value, child))
                })
                .collect::<Result<Vec<_>>>()?;

            Node::Multiway { feature: feature.clone(), branches, }
        },
        Split::Threshold { feature, threshold } => {
            let (left, right) = grow_binary(
                inducer, sample, target, &split, indices, features, depth,
            )?;
            Node::Threshold {
                feature: feature.clone(),
                threshold: *threshold,
                left,
                right,
            }
        },
        Split::Subset { feature, values } => {
            let (left, right) = grow_binary(
                inducer, sample, target, &split, indices, features, depth,
            )?;
            Node::Subset {
                feature: feature.clone(),
                values: values.clone(),
                left,
                right,
            }
        },
    };
    Ok(node)
}


/// Partitions `indices` by a binary rule and grows both sides.
/// The feature stays eligible below a binary split.
fn grow_binary<I>(
    inducer: &I,
    sample: &Sample,
    target: &[Value],
    split: &Split,
    indices: &[usize],
    features: &[&str],
    depth: usize,
) -> Result<(Box<Node>, Box<Node>)>
    where I: Induction + ?Sized
{
    let column = sample.feature(split.feature())?;
    let mut lindices = Vec::new();
    let mut rindices = Vec::new();
    for &i in indices {
        match split.split(column, i) {
            LeftRight::Left  => { lindices.push(i); },
            LeftRight::Right => { rindices.push(i); },
        }
    }

    let left = grow(
        inducer, sample, target, &lindices, indices, features, depth + 1
    )?;
    let right = grow(
        inducer, sample, target, &rindices, indices, features, depth + 1
    )?;

    Ok((Box::new(left), Box::new(right)))
}


/// Returns the most frequent label of `target` over `indices`.
/// Ties go to the smallest label.
pub(crate) fn majority_label(target: &[Value], indices: &[usize])
    -> Result<Value>
{
    label_counts(target, indices)
        .into_iter()
        .max_by(|(y1, c1), (y2, c2)| c1.cmp(c2).then_with(|| y2.cmp(y1)))
        .map(|(y, _)| y.clone())
        .ok_or(TreeError::EmptySample)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn majority_ties_go_to_the_smallest_label() {
        let target = vec![
            Value::from("b"), Value::from("a"), Value::from("b"), Value::from("a"),
            Value::from("c"),
        ];
        assert_eq!(
            majority_label(&target, &[0, 1, 2, 3, 4]).unwrap(),
            Value::from("a"),
        );
        assert_eq!(
            majority_label(&target, &[0, 2, 3]).unwrap(),
            Value::from("b"),
        );
        assert!(majority_label(&target, &[]).is_err());
    }
}
