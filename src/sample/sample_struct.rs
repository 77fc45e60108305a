use std::collections::HashMap;

use polars::prelude::*;
use rayon::prelude::*;

use crate::error::{Result, TreeError};
use super::feature_struct::{Feature, series_to_values};
use super::value::Value;


/// Struct `Sample` holds a batch of records with typed feature columns
/// and, for training, a target column.
///
/// A `Sample` owns copies of the columns it was built from,
/// so the `polars` objects given by the caller are never modified.
#[derive(Debug, Clone)]
pub struct Sample {
    pub(super) name_to_index: HashMap<String, usize>,
    pub(super) features: Vec<Feature>,
    pub(super) target: Option<Vec<Value>>,
    pub(super) n_sample: usize,
    pub(super) n_feature: usize,
}


impl Sample {
    /// Convert `polars::DataFrame` and `polars::Series` into `Sample`.
    /// A column of `data` that has the same name as `target`
    /// is not used as a feature.
    pub fn from_dataframe(data: &DataFrame, target: &Series) -> Result<Self> {
        let n_sample = data.height();
        if target.len() != n_sample {
            return Err(TreeError::LengthMismatch(n_sample, target.len()));
        }
        if n_sample == 0 {
            return Err(TreeError::EmptySample);
        }

        let target_name = target.name();
        let features = data.get_columns()
            .par_iter()
            .filter(|series| series.name() != target_name)
            .map(Feature::from_series)
            .collect::<Result<Vec<_>>>()?;
        if features.is_empty() {
            return Err(TreeError::NoFeatures);
        }

        let target = series_to_values(target, false)?;

        Ok(Self::from_components(features, Some(target), n_sample))
    }


    /// Convert `polars::DataFrame` into `Sample` without a target.
    /// This is the input form of prediction,
    /// so null and NaN cells are kept as missing values.
    pub fn from_features(data: &DataFrame) -> Result<Self> {
        let n_sample = data.height();
        let features = data.get_columns()
            .par_iter()
            .map(Feature::from_query_series)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::from_components(features, None, n_sample))
    }


    /// Same as [`Sample::from_features`],
    /// but reads only the columns named in `names`.
    /// Other columns of `data` are never inspected.
    /// A missing column is reported in the order of `names`.
    pub fn from_columns<S>(data: &DataFrame, names: &[S]) -> Result<Self>
        where S: AsRef<str>
    {
        let n_sample = data.height();
        let features = names.iter()
            .map(|name| {
                let name = name.as_ref();
                let series = data.column(name)
                    .map_err(|_| TreeError::MissingColumn(name.to_string()))?;
                Feature::from_query_series(series)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::from_components(features, None, n_sample))
    }


    /// Build a `Sample` from `frame`,
    /// using the column named `target` as the target.
    pub fn split_target<S: AsRef<str>>(frame: &DataFrame, target: S)
        -> Result<Self>
    {
        let target = target.as_ref();
        let series = frame.column(target)
            .map_err(|_| TreeError::MissingColumn(target.to_string()))?;
        Self::from_dataframe(frame, series)
    }


    fn from_components(
        features: Vec<Feature>,
        target: Option<Vec<Value>>,
        n_sample: usize,
    ) -> Self
    {
        let name_to_index = features.iter()
            .enumerate()
            .map(|(i, f)| (f.name().to_string(), i))
            .collect::<HashMap<_, _>>();
        let n_feature = features.len();

        Self { name_to_index, features, target, n_sample, n_feature, }
    }


    /// Returns the target labels.
    pub fn target(&self) -> Result<&[Value]> {
        self.target.as_deref()
            .ok_or_else(|| TreeError::MissingColumn("<target>".to_string()))
    }


    /// Returns a slice of type `Feature`.
    pub fn features(&self) -> &[Feature] {
        &self.features[..]
    }


    /// Returns the feature named `name`.
    pub fn feature<S: AsRef<str>>(&self, name: S) -> Result<&Feature> {
        let name = name.as_ref();
        self.name_to_index.get(name)
            .map(|&i| &self.features[i])
            .ok_or_else(|| TreeError::MissingColumn(name.to_string()))
    }


    /// Returns the feature names in column order.
    pub fn feature_names(&self) -> Vec<&str> {
        self.features.iter()
            .map(|feat| feat.name())
            .collect()
    }


    /// Returns the pair of the number of records and
    /// the number of features.
    pub fn shape(&self) -> (usize, usize) {
        (self.n_sample, self.n_feature)
    }
}
