//! Tree configuration.
//!
//! [`OctreeBuilder`] collects the settings of a new [`Octree`] and
//! validates them in [`build`](OctreeBuilder::build).

use std::{fmt, marker::PhantomData};

use tracing::debug;

use crate::{
    bounding::{Float, TVec3},
    tree::Octree,
    Position, TreeError,
};

/// Floor a fresh tree compares node half sizes against.
pub const DEFAULT_MIN_NODE_SIZE: f64 = 4.0;

/// How [`reduce_branch`](Octree::reduce_branch) decides that a child can be dropped.
#[derive(Default, Clone, Copy, PartialEq, Eq, Debug)]
pub enum Pruning {
    /// Drop a child only when its whole subtree holds no points.
    #[default]
    Subtree,

    /// Drop a child whenever its own bucket is empty or absent.
    ///
    /// Branch children never own a bucket, so they are dropped
    /// together with every point stored below them.
    Bucket,
}

impl fmt::Display for Pruning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pruning::Subtree => write!(f, "Pruning: Subtree"),
            Pruning::Bucket => write!(f, "Pruning: Bucket"),
        }
    }
}

/// Builder for an [`Octree`] storing `T`.
///
/// ```rust
/// use pointree::prelude::*;
///
/// let tree: Octree<f64, TVec3<f64>> = Octree::builder(TVec3::zero(), 64.0)
///     .min_node_size(2.0)
///     .auto_reduction(true)
///     .build()
///     .unwrap();
///
/// assert_eq!(tree.min_node_size(), 1.0);
/// assert!(tree.auto_reduction());
/// ```
#[derive(Clone, Debug)]
pub struct OctreeBuilder<F: Float, T> {
    origin: TVec3<F>,
    size: F,
    min_node_size: Option<F>,
    auto_reduction: bool,
    pruning: Pruning,
    _marker: PhantomData<T>,
}

impl<F, T> OctreeBuilder<F, T>
where
    F: Float,
    T: Position<F = F>,
{
    /// Cube with the minimal corner at `origin` and edge length `size`.
    pub fn new(origin: TVec3<F>, size: F) -> Self {
        OctreeBuilder {
            origin,
            size,
            min_node_size: None,
            auto_reduction: false,
            pruning: Pruning::default(),
            _marker: PhantomData,
        }
    }

    /// Same convention as [`Octree::set_min_node_size`]: the value is halved
    /// before it is compared against node half sizes.
    pub fn min_node_size(mut self, size: F) -> Self {
        self.min_node_size = Some(size);
        self
    }

    pub fn auto_reduction(mut self, enabled: bool) -> Self {
        self.auto_reduction = enabled;
        self
    }

    pub fn pruning(mut self, pruning: Pruning) -> Self {
        self.pruning = pruning;
        self
    }

    pub fn build(self) -> Result<Octree<F, T>, TreeError> {
        if !self.origin.is_finite() || !self.size.is_finite() {
            return Err(TreeError::NotFinite(format!(
                "origin: {}, size: {}",
                self.origin, self.size
            )));
        }
        if self.size <= F::zero() {
            return Err(TreeError::NotPositive(format!("size: {}", self.size)));
        }

        let floor = match self.min_node_size {
            Some(size) => {
                check_min_node_size(size, self.size)?;
                size.half()
            }
            None => {
                let floor = default_min_node_size::<F>();
                if self.size < floor {
                    return Err(TreeError::TooSmall(format!(
                        "size: {}, min node size: {floor}",
                        self.size
                    )));
                }
                floor
            }
        };

        debug!(
            origin = %self.origin,
            size = %self.size,
            min_node_size = %floor,
            auto_reduction = self.auto_reduction,
            pruning = %self.pruning,
            "octree created"
        );

        Ok(Octree::from_parts(
            self.origin,
            self.size,
            floor,
            self.auto_reduction,
            self.pruning,
        ))
    }
}

pub(crate) fn default_min_node_size<F: Float>() -> F {
    let two = F::two();
    two * two
}

/// Validates a requested min node size against the size of the tree.
pub(crate) fn check_min_node_size<F: Float>(size: F, tree_size: F) -> Result<(), TreeError> {
    if !size.is_finite() {
        Err(TreeError::NotFinite(format!("min node size: {size}")))
    } else if size <= F::zero() {
        Err(TreeError::NotPositive(format!("min node size: {size}")))
    } else if tree_size < size {
        Err(TreeError::TooSmall(format!(
            "size: {tree_size}, min node size: {size}"
        )))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeState;

    type Tree = Octree<f32, TVec3<f32>>;

    #[test]
    fn test_defaults() {
        let tree: Tree = OctreeBuilder::new(TVec3::splat(-2.0), 32.0).build().unwrap();
        assert_eq!(tree.min_node_size(), DEFAULT_MIN_NODE_SIZE as f32);
        assert!(!tree.auto_reduction());
        assert_eq!(tree.pruning(), Pruning::Subtree);

        let root = tree.root_node();
        assert_eq!(root.offset(), TVec3::splat(-2.0));
        assert_eq!(root.size(), 32.0);
        assert_eq!(root.depth(), 0);
        assert_eq!(root.state(), NodeState::Empty);
        assert_eq!(tree.bounds().center(), TVec3::splat(14.0));
    }

    #[test]
    fn test_builder_from_tree() {
        let mut tree = Octree::builder(TVec3::splat(-4.0), 8.0f32)
            .min_node_size(2.0)
            .pruning(Pruning::Bucket)
            .build()
            .unwrap();
        assert!(tree.insert(TVec3::splat(0.5)));
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.min_node_size(), 1.0);
        assert_eq!(tree.pruning(), Pruning::Bucket);
    }

    #[test]
    fn test_validation() {
        let err = |b: OctreeBuilder<f32, TVec3<f32>>| b.build().err();

        assert!(matches!(
            err(OctreeBuilder::new(TVec3::zero(), 0.0)),
            Some(TreeError::NotPositive(_))
        ));
        assert!(matches!(
            err(OctreeBuilder::new(TVec3::zero(), -16.0)),
            Some(TreeError::NotPositive(_))
        ));
        assert!(matches!(
            err(OctreeBuilder::new(TVec3::zero(), f32::INFINITY)),
            Some(TreeError::NotFinite(_))
        ));
        assert!(matches!(
            err(OctreeBuilder::new(TVec3::new(f32::NAN, 0.0, 0.0), 16.0)),
            Some(TreeError::NotFinite(_))
        ));
        assert!(matches!(
            err(OctreeBuilder::new(TVec3::zero(), 2.0)),
            Some(TreeError::TooSmall(_))
        ));
        assert!(matches!(
            err(OctreeBuilder::new(TVec3::zero(), 16.0).min_node_size(32.0)),
            Some(TreeError::TooSmall(_))
        ));
        assert!(matches!(
            err(OctreeBuilder::new(TVec3::zero(), 16.0).min_node_size(0.0)),
            Some(TreeError::NotPositive(_))
        ));

        // a small tree works with a small floor
        let tree: Tree = OctreeBuilder::new(TVec3::zero(), 2.0)
            .min_node_size(0.5)
            .build()
            .unwrap();
        assert_eq!(tree.min_node_size(), 0.25);
    }

    #[test]
    fn test_set_min_node_size_only_while_empty() {
        let mut tree: Tree = Octree::new(TVec3::zero(), 16.0).unwrap();
        assert!(tree.set_min_node_size(8.0).is_ok());
        assert_eq!(tree.min_node_size(), 4.0);
        assert!(tree.set_min_node_size(-1.0).is_err());

        tree.insert(TVec3::splat(3.0));
        assert!(matches!(
            tree.set_min_node_size(2.0),
            Err(TreeError::NotEmpty(_))
        ));
        assert_eq!(tree.min_node_size(), 4.0);

        tree.clear();
        assert!(tree.set_min_node_size(2.0).is_ok());
        assert_eq!(tree.min_node_size(), 1.0);
    }
}
