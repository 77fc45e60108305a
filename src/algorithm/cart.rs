use fixedbitset::FixedBitSet;
use itertools::Itertools;
use log::trace;
use rayon::prelude::*;
use serde::{Serialize, Deserialize};

use crate::classifier::Classifier;
use crate::criterion::{best_continuous_split_by_gini, gini_gain};
use crate::error::{Result, TreeError};
use crate::sample::{Sample, Value, Feature};
use crate::tree::Tree;
use crate::tree::grow::Induction;
use crate::tree::split_rule::Split;
use super::{
    fit_tree,
    check_max_depth,
    DEFAULT_MIN_SAMPLES_SPLIT,
    NO_SPLIT,
};


/// The CART algorithm for classification,
/// based on the book:
/// [Classification and Regression Trees](https://www.amazon.com/Classification-Regression-Wadsworth-Statistics-Probability/dp/0412048418)
/// by Leo Breiman, Jerome H. Friedman, Richard A. Olshen, and Charles J. Stone.
///
/// Every split is binary and maximizes the Gini gain.
/// A continuous feature is split at a midpoint threshold.
/// A categorical feature is split into a value subset and its complement.
/// Features stay eligible at every depth.
///
/// **Note that** the categorical search enumerates every subset
/// of at most `k / 2` of the `k` distinct values of a feature,
/// about `2^(k-1)` candidates per feature and node.
/// Keep the cardinality of categorical features low.
///
/// [`Cart`] is constructed by [`Cart::new`] or [`CartBuilder`].
///
/// # Example
/// ```no_run
/// use minitrees::prelude::*;
/// use polars::prelude::*;
///
/// let data = df!(
///     "age"   => &[22.0, 38.0, 26.0, 35.0],
///     "class" => &["third", "first", "third", "first"],
/// ).unwrap();
/// let survived = Series::new("survived", &[0_i64, 1, 1, 1]);
///
/// let mut cart = CartBuilder::new()
///     .max_depth(3)
///     .min_samples_split(2)
///     .build()
///     .unwrap();
/// cart.fit(&data, &survived).unwrap();
/// let predictions = cart.predict(&data).unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    max_depth: Option<usize>,
    min_samples_split: usize,
    tree: Option<Tree>,
}


impl Cart {
    /// Construct an unfitted `Cart` with an unbounded depth
    /// and `min_samples_split == 2`.
    pub fn new() -> Self {
        Self {
            max_depth: None,
            min_samples_split: DEFAULT_MIN_SAMPLES_SPLIT,
            tree: None,
        }
    }


    /// Returns the best subset split of a categorical feature, if any.
    fn score_categorical(
        target: &[Value],
        feature: &Feature,
        indices: &[usize],
    ) -> Option<(Split, f64)>
    {
        let values = feature.distinct_values(indices);
        let k = values.len();
        if k < 2 { return None; }

        // Position of each record's value in `values`.
        let codes = indices.iter()
            .map(|&i| {
                values.iter()
                    .position(|v| feature.value_eq(i, v))
                    .unwrap_or(k)
            })
            .collect::<Vec<_>>();

        let mut best: Option<(FixedBitSet, f64)> = None;
        let mut best_gain = NO_SPLIT;
        for size in 1..=k / 2 {
            for combination in (0..k).combinations(size) {
                let mut subset = FixedBitSet::with_capacity(k);
                subset.extend(combination);

                let mut lindices = Vec::new();
                let mut rindices = Vec::new();
                for (&i, &code) in indices.iter().zip(&codes) {
                    if subset.contains(code) {
                        lindices.push(i);
                    } else {
                        rindices.push(i);
                    }
                }

                let gain = gini_gain(target, &lindices, &rindices);
                if gain > best_gain {
                    best_gain = gain;
                    best = Some((subset, gain));
                }
            }
        }

        best.map(|(subset, gain)| {
            let left = subset.ones()
                .map(|j| values[j].clone())
                .collect::<Vec<_>>();
            let rule = Split::Subset {
                feature: feature.name().to_string(),
                values: left,
            };
            (rule, gain)
        })
    }
}


impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}


impl Induction for Cart {
    fn name(&self) -> &'static str {
        "CART"
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
                    best_continuous_split_by_gini(target, feature, indices)
                        .map(|split| {
                            let rule = Split::Threshold {
                                feature: feature.name.clone(),
                                threshold: split.threshold,
                            };
                            (rule, split.score)
                        })
                },
                Feature::Categorical(_) => {
                    Self::score_categorical(target, column, indices)
                },
            })
            .collect::<Vec<_>>();

        // The first feature with the maximal Gini gain wins.
        let mut best = None;
        let mut best_gain = NO_SPLIT;
        for (rule, gain) in candidates.into_iter().flatten() {
            trace!("CART: Gini gain of `{rule}` is {gain:.6}");
            if gain > best_gain {
                best_gain = gain;
                best = Some(rule);
            }
        }
        Ok(best.map(|rule| (rule, best_gain)))
    }


    fn min_samples_split(&self) -> usize {
        self.min_samples_split
    }


    fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }
}


impl Classifier for Cart {
    fn fit_sample(&mut self, sample: &Sample) -> Result<()> {
        // No multi-way nodes, so no unseen-value policy.
        let tree = fit_tree(&*self, sample, None)?;
        self.tree = Some(tree);
        Ok(())
    }


    fn tree(&self) -> Option<&Tree> {
        self.tree.as_ref()
    }
}


/// A struct that builds [`Cart`].
///
/// # Example
///
/// ```no_run
/// use minitrees::prelude::*;
///
/// let cart = CartBuilder::new()
///     .max_depth(5)
///     .min_samples_split(10)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct CartBuilder {
    max_depth: Option<usize>,
    min_samples_split: usize,
}


impl CartBuilder {
    /// Construct a new instance of [`CartBuilder`].
    /// By default, [`CartBuilder`] sets the parameters as follows;
    /// ```text
    /// max_depth: None (unbounded),
    /// min_samples_split: DEFAULT_MIN_SAMPLES_SPLIT == 2,
    /// ```
    pub fn new() -> Self {
        Self {
            max_depth: None,
            min_samples_split: DEFAULT_MIN_SAMPLES_SPLIT,
        }
    }


    /// Specify the maximal depth of the tree.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }


    /// Specify the minimal number of records a node needs to be split.
    pub fn min_samples_split(mut self, n_sample: usize) -> Self {
        self.min_samples_split = n_sample;
        self
    }


    /// Build a [`Cart`].
    /// Fails if `max_depth == 0` or `min_samples_split < 2`.
    pub fn build(self) -> Result<Cart> {
        if let Some(depth) = self.max_depth {
            check_max_depth(depth)?;
        }
        if self.min_samples_split < 2 {
            return Err(TreeError::InvalidParameter(
                "min_samples_split".to_string(),
                "an integer >= 2".to_string(),
                self.min_samples_split.to_string(),
            ));
        }

        Ok(Cart {
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            tree: None,
        })
    }
}


impl Default for CartBuilder {
    fn default() -> Self {
        Self::new()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::CategoricalFeature;

    fn categorical(name: &str, xs: &[&str]) -> Feature {
        Feature::Categorical(CategoricalFeature {
            name: name.to_string(),
            sample: xs.iter().map(|&x| Value::from(x)).collect(),
        })
    }

    #[test]
    fn subset_search_finds_a_non_contiguous_pair() {
        let feature = categorical("c", &["a", "b", "c", "d", "e", "a", "c"]);
        let y = ["X", "Y", "X", "Y", "Y", "X", "X"].iter()
            .map(|&y| Value::from(y))
            .collect::<Vec<_>>();
        let indices = (0..y.len()).collect::<Vec<_>>();

        let (rule, gain) = Cart::score_categorical(&y, &feature, &indices)
            .unwrap();
        assert_eq!(
            rule,
            Split::Subset {
                feature: "c".to_string(),
                values: vec![Value::from("a"), Value::from("c")],
            }
        );
        // Both sides are pure.
        let parent = 1f64 - (4f64 / 7f64).powi(2) - (3f64 / 7f64).powi(2);
        assert!((gain - parent).abs() < 1e-12);
    }

    #[test]
    fn mirrored_halves_keep_the_first_value() {
        let feature = categorical("c", &["p", "q", "r", "s"]);
        let y = ["B", "A", "A", "B"].iter()
            .map(|&y| Value::from(y))
            .collect::<Vec<_>>();

        let (rule, _) = Cart::score_categorical(&y, &feature, &[0, 1, 2, 3])
            .unwrap();
        assert_eq!(
            rule,
            Split::Subset {
                feature: "c".to_string(),
                values: vec![Value::from("p"), Value::from("s")],
            }
        );
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        assert!(matches!(
            CartBuilder::new().min_samples_split(1).build(),
            Err(TreeError::InvalidParameter(..))
        ));
        assert!(matches!(
            CartBuilder::new().max_depth(0).build(),
            Err(TreeError::InvalidParameter(..))
        ));
        assert!(CartBuilder::new().max_depth(1).min_samples_split(2).build().is_ok());
    }
}
