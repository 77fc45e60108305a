use log::trace;
use rayon::prelude::*;
use serde::{Serialize, Deserialize};

use crate::classifier::Classifier;
use crate::criterion::information_gain;
use crate::error::Result;
use crate::sample::{Sample, Value};
use crate::tree::{Tree, UnseenValue};
use crate::tree::grow::Induction;
use crate::tree::split_rule::Split;
use super::{fit_tree, DEFAULT_MAX_DEPTH, NO_SPLIT};


/// The ID3 algorithm by Quinlan.
///
/// Every split is a multi-way split on the feature with the largest
/// information gain, and a feature is never split on twice along a path.
/// Each distinct value, continuous or not, gets its own branch,
/// so continuous columns should be discretized beforehand.
///
/// A record whose value has no branch is labeled with
/// the most frequent leaf below that node.
///
/// # Example
/// ```no_run
/// use minitrees::prelude::*;
/// use polars::prelude::*;
///
/// let data = df!(
///     "outlook" => &["sunny", "overcast", "rainy"],
///     "windy"   => &["false", "true", "true"],
/// ).unwrap();
/// let play = Series::new("play", &["no", "yes", "no"]);
///
/// let mut id3 = Id3::new();
/// id3.fit(&data, &play).unwrap();
/// let predictions = id3.predict(&data).unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Id3 {
    tree: Option<Tree>,
}


impl Id3 {
    /// Construct an unfitted `Id3`.
    pub fn new() -> Self {
        Self { tree: None }
    }
}


impl Induction for Id3 {
    fn name(&self) -> &'static str {
        "ID3"
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

        let gains = columns.par_iter()
            .map(|feature| information_gain(target, feature, indices))
            .collect::<Vec<_>>();

        // The first feature with the maximal gain wins.
        let mut best = None;
        let mut best_gain = NO_SPLIT;
        for (&name, gain) in features.iter().zip(gains) {
            trace!("ID3: information gain of `{name}` is {gain:.6}");
            if gain > best_gain {
                best_gain = gain;
                best = Some(name);
            }
        }

        let split = best.map(|name| {
            let rule = Split::Multiway { feature: name.to_string() };
            (rule, best_gain)
        });
        Ok(split)
    }


    fn min_samples_split(&self) -> usize {
        1
    }


    fn max_depth(&self) -> Option<usize> {
        Some(DEFAULT_MAX_DEPTH)
    }


    fn depth_is_ceiling(&self) -> bool {
        true
    }
}


impl Classifier for Id3 {
    fn fit_sample(&mut self, sample: &Sample) -> Result<()> {
        let tree = fit_tree(&*self, sample, Some(UnseenValue::MajorityLeaf))?;
        self.tree = Some(tree);
        Ok(())
    }


    fn tree(&self) -> Option<&Tree> {
        self.tree.as_ref()
    }
}
