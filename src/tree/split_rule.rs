//! This file defines split rules for decision tree.
use std::fmt;

use crate::sample::{Feature, Value};


/// The output of the function `split` of `Split`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LeftRight {
    Left,
    Right,
}


/// A splitting rule chosen by a split selector.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Split {
    /// One branch per distinct value of `feature`.
    Multiway {
        feature: String,
    },
    /// `feature <= threshold` goes left, the rest goes right.
    Threshold {
        feature: String,
        threshold: f64,
    },
    /// A value in `values` goes left, the rest goes right.
    Subset {
        feature: String,
        values: Vec<Value>,
    },
}


impl Split {
    /// The feature name this rule reads.
    pub(crate) fn feature(&self) -> &str {
        match self {
            Self::Multiway { feature }
            | Self::Threshold { feature, .. }
            | Self::Subset { feature, .. } => feature,
        }
    }


    /// Sends the record at `row` to the left or the right.
    /// A multi-way rule has no sides, and always returns `Left`.
    #[inline]
    pub(crate) fn split(&self, column: &Feature, row: usize) -> LeftRight {
        match self {
            Self::Multiway { .. } => LeftRight::Left,
            Self::Threshold { threshold, .. } => {
                match column.numeric_at(row) {
                    Some(x) if x <= *threshold => LeftRight::Left,
                    _ => LeftRight::Right,
                }
            },
            Self::Subset { values, .. } => {
                if values.iter().any(|v| column.value_eq(row, v)) {
                    LeftRight::Left
                } else {
                    LeftRight::Right
                }
            },
        }
    }
}


impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Multiway { feature } => write!(f, "{feature} = *"),
            Self::Threshold { feature, threshold } => {
                write!(f, "{feature} <= {threshold}")
            },
            Self::Subset { feature, values } => {
                write!(f, "{feature} in {}", value_set(values))
            },
        }
    }
}


/// Formats `values` as `{a, b, c}`.
pub(crate) fn value_set(values: &[Value]) -> String {
    let items = values.iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    format!("{{{items}}}")
}
