use log::warn;
use polars::prelude::*;
use serde::{Serialize, Deserialize};

use std::fmt;
use std::collections::HashSet;

use crate::error::{Result, TreeError};
use super::value::Value;


/// Integers of this magnitude and beyond may share an `f64`.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992f64;


/// The kind of a feature column.
/// The kind is fixed at ingestion and never re-inspected afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureKind {
    /// Ordered numeric values. Integer and float columns.
    Continuous,
    /// Unordered discrete values. Boolean, string and other columns.
    Categorical,
}


impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Continuous => "continuous",
            Self::Categorical => "categorical",
        };
        write!(f, "{name}")
    }
}


/// A numeric feature column.
#[derive(Debug, Clone)]
pub struct ContinuousFeature {
    /// Feature name
    pub name: String,
    /// Feature values.
    pub sample: Vec<f64>,
}


/// A discrete feature column.
#[derive(Debug, Clone)]
pub struct CategoricalFeature {
    /// Feature name
    pub name: String,
    /// Feature values.
    pub sample: Vec<Value>,
}


/// An enumeration of continuous/categorical feature.
#[derive(Debug, Clone)]
pub enum Feature {
    /// Continuous feature.
    Continuous(ContinuousFeature),
    /// Categorical feature.
    Categorical(CategoricalFeature),
}


impl Feature {
    /// Convert `polars::Series` into `Feature`.
    /// Integer and float columns become continuous features,
    /// every other column becomes a categorical one.
    /// Null and NaN cells are rejected.
    ///
    /// Integer columns are held as `f64`,
    /// so integers beyond `±2^53` may collapse onto the same value.
    pub fn from_series(series: &Series) -> Result<Self> {
        Self::read_series(series, false)
    }


    /// Convert `polars::Series` into `Feature` for prediction.
    /// Same as [`Feature::from_series`],
    /// but a null or NaN cell is kept as a missing value.
    pub fn from_query_series(series: &Series) -> Result<Self> {
        Self::read_series(series, true)
    }


    fn read_series(series: &Series, allow_missing: bool) -> Result<Self> {
        let name = series.name().to_string();
        let feature = if is_numeric(series.dtype()) {
            let integer = is_integer(series.dtype());
            let series = series.cast(&DataType::Float64)?;
            let sample = series.f64()?
                .into_iter()
                .enumerate()
                .map(|(row, x)| match x {
                    None if allow_missing => Ok(f64::NAN),
                    None => Err(TreeError::NullValue(name.clone(), row)),
                    Some(x) if x.is_nan() && !allow_missing => {
                        Err(TreeError::NanValue(name.clone(), row))
                    },
                    Some(x) => Ok(x),
                })
                .collect::<Result<Vec<_>>>()?;

            if integer && sample.iter().any(|x| x.abs() >= MAX_EXACT_INTEGER) {
                warn!(
                    "integer column `{name}` holds values beyond 2^53; \
                     neighboring values may be merged"
                );
            }
            Self::Continuous(ContinuousFeature { name, sample, })
        } else {
            let sample = series_to_values(series, allow_missing)?;
            Self::Categorical(CategoricalFeature { name, sample, })
        };
        Ok(feature)
    }


    /// Get the feature name.
    pub fn name(&self) -> &str {
        match self {
            Self::Continuous(feat) => &feat.name,
            Self::Categorical(feat) => &feat.name,
        }
    }


    /// Get the feature kind.
    #[inline]
    pub fn kind(&self) -> FeatureKind {
        match self {
            Self::Continuous(_) => FeatureKind::Continuous,
            Self::Categorical(_) => FeatureKind::Categorical,
        }
    }


    /// Returns the number of items in this feature.
    pub fn len(&self) -> usize {
        match self {
            Self::Continuous(feat) => feat.sample.len(),
            Self::Categorical(feat) => feat.sample.len(),
        }
    }


    /// Returns `true` if this feature has no items.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }


    /// Returns the value at `row` as a [`Value`].
    /// Continuous values are wrapped in `Value::Float`,
    /// a missing continuous value is `Value::Missing`.
    #[inline]
    pub fn value_at(&self, row: usize) -> Value {
        match self {
            Self::Continuous(feat) if feat.sample[row].is_nan() => {
                Value::Missing
            },
            Self::Continuous(feat) => Value::Float(feat.sample[row]),
            Self::Categorical(feat) => feat.sample[row].clone(),
        }
    }


    /// Returns the numeric value at `row`.
    /// Returns `None` for a categorical feature.
    #[inline]
    pub fn numeric_at(&self, row: usize) -> Option<f64> {
        match self {
            Self::Continuous(feat) => Some(feat.sample[row]),
            Self::Categorical(_) => None,
        }
    }


    /// Returns `true` if the value at `row` is missing.
    /// Only prediction input can hold missing values.
    #[inline]
    pub fn is_missing(&self, row: usize) -> bool {
        match self {
            Self::Continuous(feat) => feat.sample[row].is_nan(),
            Self::Categorical(feat) => feat.sample[row].is_missing(),
        }
    }


    /// Returns `true` if the value at `row` equals to `value`.
    /// A missing value equals nothing.
    #[inline]
    pub(crate) fn value_eq(&self, row: usize, value: &Value) -> bool {
        if self.is_missing(row) { return false; }
        match self {
            Self::Continuous(feat) => Value::Float(feat.sample[row]) == *value,
            Self::Categorical(feat) => feat.sample[row] == *value,
        }
    }


    /// Returns the distinct values over `indices`
    /// in the order of their first appearance.
    pub fn distinct_values(&self, indices: &[usize]) -> Vec<Value> {
        let mut seen = HashSet::new();
        let mut values = Vec::new();
        for &i in indices {
            let value = self.value_at(i);
            if seen.insert(value.clone()) {
                values.push(value);
            }
        }
        values
    }
}


#[inline]
fn is_numeric(dtype: &DataType) -> bool {
    is_integer(dtype) || is_float(dtype)
}


#[inline]
fn is_integer(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8 | DataType::Int16 | DataType::Int32 | DataType::Int64
        | DataType::UInt8 | DataType::UInt16 | DataType::UInt32 | DataType::UInt64
    )
}


#[inline]
fn is_float(dtype: &DataType) -> bool {
    matches!(dtype, DataType::Float32 | DataType::Float64)
}


/// Convert `polars::Series` into a vector of [`Value`]s
/// while keeping the dtype of the column.
/// Null cells become `Value::Missing` if `allow_missing` is set,
/// and are rejected otherwise.
pub(crate) fn series_to_values(series: &Series, allow_missing: bool)
    -> Result<Vec<Value>>
{
    let name = series.name();
    let null = |row: usize| {
        if allow_missing {
            Ok(Value::Missing)
        } else {
            Err(TreeError::NullValue(name.to_string(), row))
        }
    };

    let dtype = series.dtype();
    let values = if is_integer(dtype) {
        let series = series.cast(&DataType::Int64)?;
        series.i64()?
            .into_iter()
            .enumerate()
            .map(|(row, x)| x.map(Value::Int).map_or_else(|| null(row), Ok))
            .collect::<Result<Vec<_>>>()?
    } else if is_float(dtype) {
        let series = series.cast(&DataType::Float64)?;
        series.f64()?
            .into_iter()
            .enumerate()
            .map(|(row, x)| x.map(Value::Float).map_or_else(|| null(row), Ok))
            .collect::<Result<Vec<_>>>()?
    } else if let DataType::Boolean = dtype {
        series.bool()?
            .into_iter()
            .enumerate()
            .map(|(row, x)| x.map(Value::Bool).map_or_else(|| null(row), Ok))
            .collect::<Result<Vec<_>>>()?
    } else {
        let series = series.cast(&DataType::Utf8)?;
        series.utf8()?
            .into_iter()
            .enumerate()
            .map(|(row, x)| {
                x.map(|s| Value::Str(s.to_string())).map_or_else(|| null(row), Ok)
            })
            .collect::<Result<Vec<_>>>()?
    };
    Ok(values)
}
