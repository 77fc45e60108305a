//! Impurity measures and the gains built on them.
//!
//! Every function here works on a record subset given as row indices
//! into a target column and a feature column.
//! Logarithms are base 2.
use serde::{Serialize, Deserialize};

use std::collections::HashMap;

use crate::error::{Result, TreeError};
use crate::sample::{Value, Feature, ContinuousFeature};


/// Number of records per class label.
pub(crate) type LabelToCount<'a> = HashMap<&'a Value, usize>;


/// The best threshold found by a continuous split search
/// and the gain it achieves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContinuousSplit {
    /// Records with value `<= threshold` go to the left.
    pub threshold: f64,
    /// Information gain or Gini gain of the split.
    pub score: f64,
}


/// Returns the entropy `-Σ p_i log2(p_i)` of the given labels.
/// Returns [`TreeError::EmptyLabels`] for an empty collection.
pub fn entropy<'a, I>(labels: I) -> Result<f64>
    where I: IntoIterator<Item = &'a Value>
{
    let (counts, total) = count_labels(labels);
    if total == 0 { return Err(TreeError::EmptyLabels); }
    Ok(entropic_impurity(&counts, total))
}


/// Returns the Gini index `1 - Σ p_i^2` of the given labels.
/// Returns [`TreeError::EmptyLabels`] for an empty collection.
pub fn gini<'a, I>(labels: I) -> Result<f64>
    where I: IntoIterator<Item = &'a Value>
{
    let (counts, total) = count_labels(labels);
    if total == 0 { return Err(TreeError::EmptyLabels); }
    Ok(gini_impurity(&counts, total))
}


/// Returns the information gain of partitioning `indices`
/// by the distinct values of `feature`.
/// Values are grouped by exact equality, whatever the feature kind is.
pub fn information_gain(
    target: &[Value],
    feature: &Feature,
    indices: &[usize],
) -> f64
{
    let n_sample = indices.len();
    if n_sample == 0 { return 0f64; }

    let parent = label_counts(target, indices);
    let parent = entropic_impurity(&parent, n_sample);

    let weighted = group_by_value(feature, indices)
        .into_iter()
        .map(|(_, group)| {
            let counts = label_counts(target, &group);
            let weight = group.len() as f64 / n_sample as f64;
            weight * entropic_impurity(&counts, group.len())
        })
        .sum::<f64>();

    (parent - weighted).max(0f64)
}


/// Returns the split information, the entropy of the distribution
/// of `indices` over the distinct values of `feature`.
pub fn split_information(feature: &Feature, indices: &[usize]) -> f64 {
    let n_sample = indices.len();
    if n_sample == 0 { return 0f64; }

    let sizes = group_by_value(feature, indices)
        .into_iter()
        .map(|(_, group)| group.len());
    entropy_of_sizes(sizes, n_sample)
}


/// Returns the gain ratio `information_gain / split_information`.
/// If the split information is zero
/// (a single distinct value), returns `0`.
pub fn gain_ratio(
    target: &[Value],
    feature: &Feature,
    indices: &[usize],
) -> f64
{
    let split_info = split_information(feature, indices);
    if split_info == 0f64 { return 0f64; }

    information_gain(target, feature, indices) / split_info
}


/// Returns the Gini gain of the binary partition `(left, right)`,
/// that is, the Gini index of the union minus
/// the size-weighted Gini index of each side.
/// A partition with an empty side has zero gain.
pub fn gini_gain(target: &[Value], left: &[usize], right: &[usize]) -> f64 {
    if left.is_empty() || right.is_empty() { return 0f64; }

    let n_left = left.len();
    let n_right = right.len();
    let n_sample = n_left + n_right;

    let left = label_counts(target, left);
    let right = label_counts(target, right);
    let mut parent = left.clone();
    for (y, c) in right.iter() {
        *parent.entry(*y).or_insert(0) += c;
    }

    let lp = n_left as f64 / n_sample as f64;
    let rp = n_right as f64 / n_sample as f64;
    let weighted = lp * gini_impurity(&left, n_left)
        + rp * gini_impurity(&right, n_right);

    (gini_impurity(&parent, n_sample) - weighted).max(0f64)
}


/// Searches the threshold of `feature` that maximizes the information gain.
/// Candidates are the midpoints of consecutive distinct sorted values.
///
/// Returns `None` if there are fewer than two distinct values,
/// in which case the feature is not usable on this subset.
pub fn best_continuous_split_by_gain(
    target: &[Value],
    feature: &ContinuousFeature,
    indices: &[usize],
) -> Option<ContinuousSplit>
{
    sweep_thresholds(target, feature, indices, entropic_impurity)
}


/// Searches the threshold of `feature` that maximizes the Gini gain.
/// Candidates are the midpoints of consecutive distinct sorted values.
///
/// Returns `None` if there are fewer than two distinct values,
/// in which case the feature is not usable on this subset.
pub fn best_continuous_split_by_gini(
    target: &[Value],
    feature: &ContinuousFeature,
    indices: &[usize],
) -> Option<ContinuousSplit>
{
    sweep_thresholds(target, feature, indices, gini_impurity)
}


/// Moves the records from right to left in ascending order of value
/// and scores every midpoint threshold with `impurity`.
/// The first threshold with the strictly greatest gain wins.
fn sweep_thresholds<F>(
    target: &[Value],
    feature: &ContinuousFeature,
    indices: &[usize],
    impurity: F,
) -> Option<ContinuousSplit>
    where F: Fn(&LabelToCount<'_>, usize) -> f64
{
    let mut pairs = indices.iter()
        .map(|&i| (feature.sample[i], &target[i]))
        .collect::<Vec<_>>();
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut distinct = pairs.iter()
        .map(|(x, _)| *x)
        .collect::<Vec<_>>();
    distinct.dedup();
    if distinct.len() < 2 { return None; }

    let n_sample = pairs.len();
    let mut right = LabelToCount::new();
    for (_, y) in pairs.iter() {
        *right.entry(*y).or_insert(0) += 1;
    }
    let mut left = LabelToCount::new();
    let parent = impurity(&right, n_sample);

    let mut best: Option<ContinuousSplit> = None;
    let mut n_left = 0_usize;
    for window in distinct.windows(2) {
        let threshold = window[0] + (window[1] - window[0]) / 2f64;
        while n_left < n_sample && pairs[n_left].0 <= threshold {
            let y = pairs[n_left].1;
            *left.entry(y).or_insert(0) += 1;
            if let Some(c) = right.get_mut(y) {
                *c -= 1;
                if *c == 0 { right.remove(y); }
            }
            n_left += 1;
        }

        let n_right = n_sample - n_left;
        if n_left == 0 || n_right == 0 { continue; }

        let lp = n_left as f64 / n_sample as f64;
        let rp = n_right as f64 / n_sample as f64;
        let weighted = lp * impurity(&left, n_left)
            + rp * impurity(&right, n_right);
        let score = (parent - weighted).max(0f64);

        log::trace!(
            "{name} <= {threshold}: gain {score:.6}",
            name = feature.name,
        );
        if best.map_or(true, |b| score > b.score) {
            best = Some(ContinuousSplit { threshold, score, });
        }
    }
    best
}


/// Groups `indices` by the value of `feature`,
/// in the order of first appearance.
pub(crate) fn group_by_value(feature: &Feature, indices: &[usize])
    -> Vec<(Value, Vec<usize>)>
{
    let mut position = HashMap::<Value, usize>::new();
    let mut groups = Vec::<(Value, Vec<usize>)>::new();
    for &i in indices {
        let value = feature.value_at(i);
        match position.get(&value) {
            Some(&k) => { groups[k].1.push(i); },
            None => {
                position.insert(value.clone(), groups.len());
                groups.push((value, vec![i]));
            },
        }
    }
    groups
}


/// Counts the labels of `target` over `indices`.
#[inline]
pub(crate) fn label_counts<'a>(target: &'a [Value], indices: &[usize])
    -> LabelToCount<'a>
{
    let mut counts = LabelToCount::new();
    for &i in indices {
        *counts.entry(&target[i]).or_insert(0) += 1;
    }
    counts
}


#[inline]
fn count_labels<'a, I>(labels: I) -> (LabelToCount<'a>, usize)
    where I: IntoIterator<Item = &'a Value>
{
    let mut counts = LabelToCount::new();
    let mut total = 0_usize;
    for y in labels {
        *counts.entry(y).or_insert(0) += 1;
        total += 1;
    }
    (counts, total)
}


/// Returns the entropic-impurity of the given map.
#[inline(always)]
pub(crate) fn entropic_impurity(map: &LabelToCount<'_>, total: usize) -> f64 {
    if total == 0 { return 0f64; }
    entropy_of_sizes(map.values().copied(), total)
}


#[inline]
fn entropy_of_sizes<I>(sizes: I, total: usize) -> f64
    where I: IntoIterator<Item = usize>
{
    let total = total as f64;
    sizes.into_iter()
        .filter(|&c| c > 0)
        .map(|c| {
            let p = c as f64 / total;
            -p * p.log2()
        })
        .sum::<f64>()
        .max(0f64)
}


/// Returns the gini-impurity of the given map.
#[inline(always)]
pub(crate) fn gini_impurity(map: &LabelToCount<'_>, total: usize) -> f64 {
    if total == 0 { return 0f64; }
    let total = total as f64;

    let correct = map.values()
        .map(|&c| (c as f64 / total).powi(2))
        .sum::<f64>();

    (1f64 - correct).max(0f64)
}


#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::prelude::*;
    use crate::sample::CategoricalFeature;

    fn categorical(name: &str, values: &[&str]) -> Feature {
        Feature::Categorical(CategoricalFeature {
            name: name.to_string(),
            sample: values.iter().map(|&v| Value::from(v)).collect(),
        })
    }

    fn continuous(name: &str, values: &[f64]) -> ContinuousFeature {
        ContinuousFeature {
            name: name.to_string(),
            sample: values.to_vec(),
        }
    }

    fn labels(values: &[&str]) -> Vec<Value> {
        values.iter().map(|&v| Value::from(v)).collect()
    }

    // The classic 14-day weather data.
    fn weather() -> (Vec<Feature>, Vec<Value>) {
        let outlook = categorical("outlook", &[
            "sunny", "sunny", "overcast", "rainy", "rainy", "rainy", "overcast",
            "sunny", "sunny", "rainy", "sunny", "overcast", "overcast", "rainy",
        ]);
        let temperature = categorical("temperature", &[
            "hot", "hot", "hot", "mild", "cool", "cool", "cool",
            "mild", "cool", "mild", "mild", "mild", "hot", "mild",
        ]);
        let humidity = categorical("humidity", &[
            "high", "high", "high", "high", "normal", "normal", "normal",
            "high", "normal", "normal", "normal", "high", "normal", "high",
        ]);
        let windy = categorical("windy", &[
            "false", "true", "false", "false", "false", "true", "true",
            "false", "false", "false", "true", "true", "false", "true",
        ]);
        let play = labels(&[
            "no", "no", "yes", "yes", "yes", "no", "yes",
            "no", "yes", "yes", "yes", "yes", "yes", "no",
        ]);
        (vec![outlook, temperature, humidity, windy], play)
    }

    #[test]
    fn impurity_of_weather_target() {
        let (_, play) = weather();
        assert_abs_diff_eq!(entropy(&play).unwrap(), 0.940286, epsilon = 1e-5);
        assert_abs_diff_eq!(gini(&play).unwrap(), 0.459184, epsilon = 1e-5);
    }

    #[test]
    fn pure_labels_have_zero_impurity() {
        let y = labels(&["a", "a", "a"]);
        assert_eq!(entropy(&y).unwrap(), 0f64);
        assert_eq!(gini(&y).unwrap(), 0f64);
    }

    #[test]
    fn empty_labels_are_rejected() {
        let y: Vec<Value> = Vec::new();
        assert!(matches!(entropy(&y), Err(TreeError::EmptyLabels)));
        assert!(matches!(gini(&y), Err(TreeError::EmptyLabels)));
    }

    #[test]
    fn outlook_has_the_highest_information_gain() {
        let (features, play) = weather();
        let indices = (0..play.len()).collect::<Vec<_>>();
        let gains = features.iter()
            .map(|f| information_gain(&play, f, &indices))
            .collect::<Vec<_>>();

        assert_abs_diff_eq!(gains[0], 0.246750, epsilon = 1e-5);
        assert_abs_diff_eq!(gains[1], 0.029223, epsilon = 1e-5);
        assert_abs_diff_eq!(gains[2], 0.151836, epsilon = 1e-5);
        assert_abs_diff_eq!(gains[3], 0.048127, epsilon = 1e-5);
    }

    #[test]
    fn gain_ratio_of_outlook() {
        let (features, play) = weather();
        let indices = (0..play.len()).collect::<Vec<_>>();
        let outlook = &features[0];

        assert_abs_diff_eq!(
            split_information(outlook, &indices), 1.577406, epsilon = 1e-5
        );
        assert_abs_diff_eq!(
            gain_ratio(&play, outlook, &indices), 0.156428, epsilon = 1e-5
        );
    }

    #[test]
    fn gain_ratio_of_a_constant_feature_is_zero() {
        let feature = categorical("c", &["x", "x", "x", "x"]);
        let y = labels(&["a", "b", "a", "b"]);
        let indices = [0, 1, 2, 3];
        assert_eq!(split_information(&feature, &indices), 0f64);
        assert_eq!(gain_ratio(&y, &feature, &indices), 0f64);
    }

    #[test]
    fn continuous_search_picks_the_class_boundary() {
        let age = continuous("age", &[5.0, 15.0, 25.0, 70.0]);
        let y = labels(&["young", "young", "old", "old"]);
        let indices = [0, 1, 2, 3];

        let split = best_continuous_split_by_gain(&y, &age, &indices).unwrap();
        assert_eq!(split.threshold, 20.0);
        assert_abs_diff_eq!(split.score, 1.0, epsilon = 1e-12);

        let split = best_continuous_split_by_gini(&y, &age, &indices).unwrap();
        assert_eq!(split.threshold, 20.0);
        assert_abs_diff_eq!(split.score, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn continuous_search_collapses_ties() {
        // Only one distinct value: no candidate threshold.
        let x = continuous("x", &[3.0, 3.0, 3.0]);
        let y = labels(&["a", "b", "a"]);
        assert!(best_continuous_split_by_gain(&y, &x, &[0, 1, 2]).is_none());
        assert!(best_continuous_split_by_gini(&y, &x, &[0, 1, 2]).is_none());

        // Two distinct values: exactly one candidate at the midpoint.
        let x = continuous("x", &[1.0, 1.0, 2.0, 2.0]);
        let y = labels(&["a", "a", "b", "a"]);
        let split = best_continuous_split_by_gain(&y, &x, &[0, 1, 2, 3])
            .unwrap();
        assert_eq!(split.threshold, 1.5);
    }

    #[test]
    fn midpoint_of_huge_values_is_finite() {
        let x = continuous("x", &[1.5e308, 1.5e308, 1.7e308, 1.7e308]);
        let y = labels(&["a", "a", "b", "b"]);
        let indices = [0, 1, 2, 3];

        let split = best_continuous_split_by_gini(&y, &x, &indices).unwrap();
        assert!(split.threshold.is_finite());
        assert!(1.5e308 < split.threshold && split.threshold < 1.7e308);
        assert_abs_diff_eq!(split.score, 0.5, epsilon = 1e-12);

        let split = best_continuous_split_by_gain(&y, &x, &indices).unwrap();
        assert_abs_diff_eq!(split.score, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn continuous_search_respects_the_subset() {
        let x = continuous("x", &[1.0, 2.0, 3.0, 4.0]);
        let y = labels(&["a", "b", "a", "b"]);
        // Rows 1 and 2 only: one threshold at 2.5.
        let split = best_continuous_split_by_gini(&y, &x, &[1, 2]).unwrap();
        assert_eq!(split.threshold, 2.5);
        assert_abs_diff_eq!(split.score, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn gini_gain_of_an_empty_side_is_zero() {
        let y = labels(&["a", "b"]);
        assert_eq!(gini_gain(&y, &[0, 1], &[]), 0f64);
        assert_abs_diff_eq!(gini_gain(&y, &[0], &[1]), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn randomized_impurity_bounds() {
        let mut rng = StdRng::seed_from_u64(1234);
        let classes = ["a", "b", "c"];
        let values = ["p", "q", "r", "s"];

        for _ in 0..200 {
            let n = rng.gen_range(1..40);
            let y = (0..n)
                .map(|_| Value::from(*classes.choose(&mut rng).unwrap()))
                .collect::<Vec<_>>();
            let x = (0..n)
                .map(|_| *values.choose(&mut rng).unwrap())
                .collect::<Vec<_>>();
            let feature = categorical("x", &x);
            let numeric = continuous(
                "z",
                &(0..n).map(|_| rng.gen_range(0..10) as f64).collect::<Vec<_>>(),
            );
            let indices = (0..n).collect::<Vec<_>>();

            let single_class = y.iter().all(|v| *v == y[0]);
            let h = entropy(&y).unwrap();
            let g = gini(&y).unwrap();
            assert!(h >= 0f64 && g >= 0f64);
            assert_eq!(single_class, h == 0f64);
            assert_eq!(single_class, g == 0f64);

            let ig = information_gain(&y, &feature, &indices);
            assert!(ig >= 0f64);
            assert!(ig <= h + 1e-12);

            let si = split_information(&feature, &indices);
            let gr = gain_ratio(&y, &feature, &indices);
            if si == 0f64 {
                assert_eq!(gr, 0f64);
            } else {
                assert!((0f64..=1f64 + 1e-12).contains(&gr));
                if si >= 1f64 { assert!(gr <= ig + 1e-12); }
            }

            if let Some(split) = best_continuous_split_by_gini(&y, &numeric, &indices) {
                assert!(split.score >= 0f64);
            }
            if let Some(split) = best_continuous_split_by_gain(&y, &numeric, &indices) {
                assert!(split.score >= 0f64);
            }
        }
    }
}
