//! Struct `Sample` represents a batch of labeled records.

// Provides the cell type.
pub(crate) mod value;
// Provides feature struct.
pub(crate) mod feature_struct;
// Provides sample struct.
pub(crate) mod sample_struct;


pub use value::Value;
pub use sample_struct::Sample;
pub use feature_struct::{
    Feature,
    FeatureKind,
    ContinuousFeature,
    CategoricalFeature,
};
