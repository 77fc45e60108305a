#![warn(missing_docs)]

//!
//! A crate that provides the classical decision tree induction algorithms
//! for classification.
//!
//! - `Id3`
//!     Multi-way splits on the feature with the largest information gain.
//!     Intended for categorical (or pre-discretized) features.
//!
//! - `C45`
//!     Ranks features by gain ratio.
//!     Categorical features get multi-way splits,
//!     continuous features get binary threshold splits.
//!
//! - `Cart`
//!     Strictly binary splits maximizing the Gini gain,
//!     on continuous thresholds or categorical value subsets.
//!
//! Every algorithm takes a `polars::DataFrame` of features
//! and a `polars::Series` of labels.
//! Integer and float columns are continuous,
//! every other column is categorical.
//!
//! ```no_run
//! use minitrees::prelude::*;
//! use polars::prelude::*;
//!
//! let data = df!(
//!     "outlook"  => &["sunny", "sunny", "overcast", "rainy"],
//!     "humidity" => &[85.0, 90.0, 78.0, 96.0],
//! ).unwrap();
//! let play = Series::new("play", &["no", "no", "yes", "yes"]);
//!
//! let mut c45 = C45::new();
//! c45.fit(&data, &play).unwrap();
//! println!("{}", c45.tree().unwrap());
//!
//! let predictions = c45.predict(&data).unwrap();
//! ```

pub mod error;
pub mod sample;
pub mod criterion;
pub mod tree;
pub mod classifier;
pub mod algorithm;
pub mod prelude;


pub use error::{Result, TreeError};
pub use sample::{Sample, Feature, FeatureKind, Value};
pub use tree::{Tree, Node, UnseenValue};
pub use classifier::{Classifier, accuracy};
pub use algorithm::{
    Id3,
    C45,
    C45Builder,
    Cart,
    CartBuilder,
    DEFAULT_MAX_DEPTH,
    DEFAULT_MIN_SAMPLES_SPLIT,
};
