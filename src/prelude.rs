//! Exports the tree algorithms and traits.
//!
pub use crate::classifier::{
    // Classifier trait
    Classifier,
    accuracy,
};


pub use crate::algorithm::{
    // Multi-way, information gain
    Id3,

    // Multi-way and threshold, gain ratio
    C45,
    C45Builder,

    // Binary, Gini gain
    Cart,
    CartBuilder,
};


pub use crate::sample::{
    Sample,
    Feature,
    FeatureKind,
    Value,
};


pub use crate::tree::{
    Tree,
    UnseenValue,
};


pub use crate::error::TreeError;
