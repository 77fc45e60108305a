use log::trace;
use rayon::prelude::*;
use serde::{Serialize, Deserialize};

use crate::classifier::Classifier;
use crate::criterion::{
    ContinuousSplit,
    best_continuous_split_by_gain,
    gain_ratio,
};
use crate::error::Result;
use crate::sample::{Sample, Value, Feature, ContinuousFeature};
use crate::tree::{Tree, UnseenValue};
use crate::tree::grow::Induction;
use crate::tree::split_rule::Split;
use super::{fit_tree, check_max_depth, DEFAULT_MAX_DEPTH, NO_SPLIT};


/// A subset with fewer records than this becomes a leaf.
const C45_MIN_SAMPLES_SPLIT: usize = 2;


/// The C4.5 algorithm by Quinlan.
///
/// Features are ranked by gain ratio.
/// A categorical feature is split multi-way and is not used again below;
/// a continuous feature is split at the best midpoint threshold
/// and may be split again deeper with another threshold.
///
/// A record whose categorical value has no branch is labeled with
/// the leaf reached by always taking the first branch.
/// This is cheaper and coarser than the majority rule of [`Id3`](super::Id3).
///
/// [`C45`] is constructed by [`C45::new`] or [`C45Builder`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct C45 {
    max_depth: usize,
    tree: Option<Tree>,
}


impl C45 {
    /// Construct an unfitted `C45` with the default depth ceiling.
    pub fn new() -> Self {
        Self { max_depth: DEFAULT_MAX_DEPTH, tree: None }
    }


    /// Scores a continuous feature: the best threshold by information gain,
    /// normalized by the split information of the two sides.
    /// Returns `None` if no threshold is usable.
    fn score_continuous(
        target: &[Value],
        feature: &ContinuousFeature,
        indices: &[usize],
    ) -> Option<(Split, f64)>
    {
        let ContinuousSplit { threshold, score } =
            best_continuous_split_by_gain(target, feature, indices)?;

        let n_sample = indices.len() as f64;
        let n_left = indices.iter()
            .filter(|&&i| feature.sample[i] <= threshold)
            .count() as f64;
        let p_le = n_left / n_sample;
        let p_gt = 1f64 - p_le;

        let split_info = if p_le == 0f64 || p_gt == 0f64 {
            0f64
        } else {
            -(p_le * p_le.log2() + p_gt * p_gt.log2())
        };
        let ratio = if split_info == 0f64 { 0f64 } else { score / split_info };

        let rule = Split::Threshold {
            feature: feature.name.clone(),
            threshold,
        };
        Some((rule, ratio))
    }
}


impl Default for C45 {
    fn default() -> Self {
        Self::new()
    }
}


impl Induction for C45 {
    fn name(&self) -> &'static str {
        "C4.5"
    }


    fn best_split(
        &self,
        sample: &Sample,
        target: &[Value],
        indices: &[usize],
        features: &[&str],
    ) -> Result<Option<(Split, f64)>>
    {
        let columns = features.iter()
            .map(|name| sample.feature(name))
            .collect::<Result<Vec<_>>>()?;

        let candidates = columns.par_iter()
            .map(|column| match column {
                Feature::Continuous(feature) => {
                    Self::score_continuous(target, feature, indices)
                },
                Feature::Categorical(_) => {
                    let rule = Split::Multiway {
                        feature: column.name().to_string(),
                    };
                    Some((rule, gain_ratio(target, column, indices)))
                },
            })
            .collect::<Vec<_>>();

        // Continuous features without a usable threshold are skipped.
        // The first feature with the maximal gain ratio wins.
        let mut best = None;
        let mut best_ratio = NO_SPLIT;
        for (rule, ratio) in candidates.into_iter().flatten() {
            trace!("C4.5: gain ratio of `{rule}` is {ratio:.6}");
            if ratio > best_ratio {
                best_ratio = ratio;
                best = Some(rule);
            }
        }
        Ok(best.map(|rule| (rule, best_ratio)))
    }


    fn min_samples_split(&self) -> usize {
        C45_MIN_SAMPLES_SPLIT
    }


    fn max_depth(&self) -> Option<usize> {
        Some(self.max_depth)
    }


    fn depth_is_ceiling(&self) -> bool {
        true
    }
}


impl Classifier for C45 {
    fn fit_sample(&mut self, sample: &Sample) -> Result<()> {
        let tree = fit_tree(&*self, sample, Some(UnseenValue::FirstLeaf))?;
        self.tree = Some(tree);
        Ok(())
    }


    fn tree(&self) -> Option<&Tree> {
        self.tree.as_ref()
    }
}


/// A struct that builds [`C45`].
///
/// # Example
///
/// ```no_run
/// use minitrees::prelude::*;
///
/// let c45 = C45Builder::new()
///     .max_depth(8)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct C45Builder {
    max_depth: usize,
}


impl C45Builder {
    /// Construct a new instance of [`C45Builder`].
    /// The depth ceiling defaults to
    /// [`DEFAULT_MAX_DEPTH`](super::DEFAULT_MAX_DEPTH).
    pub fn new() -> Self {
        Self { max_depth: DEFAULT_MAX_DEPTH }
    }


    /// Specify the maximal depth of the tree.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }


    /// Build a [`C45`].
    /// Fails if the maximal depth is zero.
    pub fn build(self) -> Result<C45> {
        check_max_depth(self.max_depth)?;
        Ok(C45 { max_depth: self.max_depth, tree: None })
    }
}


impl Default for C45Builder {
    fn default() -> Self {
        Self::new()
    }
}
