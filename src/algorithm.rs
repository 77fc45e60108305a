//! The files in `algorithm/` directory define
//! the three tree induction algorithms.
use log::info;

use crate::error::{Result, TreeError};
use crate::sample::Sample;
use crate::tree::{Tree, UnseenValue};
use crate::tree::grow::{grow, Induction};

/// Defines ID3.
pub mod id3;
/// Defines C4.5.
pub mod c45;
/// Defines CART.
pub mod cart;

pub use id3::Id3;
pub use c45::{C45, C45Builder};
pub use cart::{Cart, CartBuilder};


/// The depth ceiling set as default for ID3 and C4.5.
pub const DEFAULT_MAX_DEPTH: usize = 64;
/// The minimal number of records to split, set as default for CART.
pub const DEFAULT_MIN_SAMPLES_SPLIT: usize = 2;

/// Score floor of the split selectors.
/// Any usable split scores above it.
pub(crate) const NO_SPLIT: f64 = -1f64;


/// Grows a tree over every record of `sample`
/// with every feature eligible at the root.
pub(crate) fn fit_tree<I>(
    inducer: &I,
    sample: &Sample,
    unseen: Option<UnseenValue>,
) -> Result<Tree>
    where I: Induction
{
    let target = sample.target()?;
    let (n_sample, n_feature) = sample.shape();
    if n_feature == 0 { return Err(TreeError::NoFeatures); }
    if n_sample == 0 { return Err(TreeError::EmptySample); }

    info!(
        "{}: fitting on {n_sample} records and {n_feature} features",
        inducer.name(),
    );

    let features = sample.feature_names();
    let indices = (0..n_sample).collect::<Vec<_>>();
    let root = grow(inducer, sample, target, &indices, &indices, &features, 0)?;
    let tree = Tree::new(root, unseen);

    info!(
        "{}: fitted a tree of depth {} with {} leaves",
        inducer.name(), tree.depth(), tree.n_leaves(),
    );
    Ok(tree)
}


/// Checks that a depth limit is positive.
pub(crate) fn check_max_depth(depth: usize) -> Result<()> {
    if depth == 0 {
        return Err(TreeError::InvalidParameter(
            "max_depth".to_string(),
            "a positive integer".to_string(),
            depth.to_string(),
        ));
    }
    Ok(())
}
