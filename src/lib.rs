//! Lazily subdivided [`point octree`](tree::Octree).
//!
//! Stores any type implementing [`Position`] and answers
//! box, sphere and point lookups.
//!
//! ## Available methods:
//!
//! - ### Mutation
//!
//!   - [`Insertion`](tree::Octree::insert)
//!   - [`Bulk insertion`](tree::Octree::insert_all)
//!   - [`Removing`](tree::Octree::remove)
//!   - [`Branch reduction`](tree::Octree::reduce_branch)
//!   - [`Emptying a node`](tree::Octree::empty)
//!
//! - ### Queries
//!
//!   - [`Leaf lookup`](tree::Octree::leaf_for_point)
//!   - [`Points within a box`](tree::Octree::points_within_box)
//!   - [`Points within a sphere`](tree::Octree::points_within_sphere)
//!   - [`All points`](tree::Octree::points)
//!
//! - ### Traversal
//!
//!   - [`Pre-order visitor`](tree::Octree::visit)
//!   - [`Statistics`](tree::Octree::stats)
//!
//! Nodes are created only when a point first lands in an octant.
//! A node whose half size reaches the configured floor stops splitting
//! and keeps every point that falls into it in a bucket.
//!
//! To enable bevy integrations:
//!
//! ```toml
//! [dependencies]
//! pointree = { version = "0.1", features = ["bevy"] }
//! ```
//!
//! ## Example
//!
//! ```rust
//! use pointree::prelude::*;
//!
//! fn main() -> Result<(), TreeError> {
//!     let mut tree: Octree<f32, TVec3<f32>> = Octree::new(TVec3::zero(), 16.0)?;
//!
//!     assert!(tree.insert(TVec3::splat(1.0)));
//!     assert!(tree.insert(TVec3::splat(15.0)));
//!     assert!(!tree.insert(TVec3::splat(17.0)));
//!
//!     let volume = Aabb::cube(TVec3::splat(1.0), 2.0)?;
//!     assert_eq!(tree.points_within_box(&volume), vec![TVec3::splat(1.0)]);
//!
//!     let found = tree.points_within_sphere(TVec3::splat(14.0), 2.0);
//!     assert_eq!(found, vec![TVec3::splat(15.0)]);
//!
//!     assert!(tree.remove(&TVec3::splat(1.0)));
//!     assert_eq!(tree.len(), 1);
//!     Ok(())
//! }
//! ```
//!
//! ## Check yourself list:
//!
//! - tests
//!
//!   ```sh
//!   cargo test --all-targets --all-features
//!   ```
//!
//! - benchmark
//!
//!   ```sh
//!   cargo bench
//!   ```

#[cfg(feature = "bevy")]
pub mod bevy_integration;
pub mod bounding;
pub mod config;
pub mod node;
pub mod pool;
pub mod prelude;
pub mod query;
pub mod tree;
pub mod visit;

use bounding::{Float, TVec3};
use std::{
    error::Error,
    fmt::{self},
    ops::Deref,
    rc::Rc,
    sync::Arc,
};

/// Implement to represent your object as a point in a [`tree`](tree::Octree)
///
/// Implement on stored type to inform a tree
/// about object's spatial coordinates.
pub trait Position {
    type F: Float;

    fn position(&self) -> TVec3<Self::F>;
}

impl<T> Position for Box<T>
where
    T: Position,
{
    type F = T::F;

    fn position(&self) -> TVec3<Self::F> {
        self.deref().position()
    }
}

impl<T> Position for Rc<T>
where
    T: Position,
{
    type F = T::F;

    fn position(&self) -> TVec3<Self::F> {
        self.deref().position()
    }
}

impl<T> Position for Arc<T>
where
    T: Position,
{
    type F = T::F;

    fn position(&self) -> TVec3<Self::F> {
        self.deref().position()
    }
}

/// Index [`tree.nodes`](pool::Pool) with it.
///
#[derive(Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct NodeId(pub u32);

impl From<NodeId> for usize {
    fn from(value: NodeId) -> Self {
        value.0 as usize
    }
}

impl From<usize> for NodeId {
    fn from(value: usize) -> Self {
        NodeId(value as u32)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId {}", self.0)
    }
}

/// Enum of all possible errors of the octree's operations.
///
/// Ordinary misses (a point outside of the tree, a point that is not stored)
/// are reported with `bool`, [`Option`] or an empty [`Vec`] instead.
#[derive(Debug, PartialEq)]
pub enum TreeError {
    /// Size, half extent or node size is zero or negative.
    NotPositive(String),

    /// A coordinate or size is NaN or infinite.
    NotFinite(String),

    /// Tree is smaller than its minimal node size.
    TooSmall(String),

    /// Configuration can only change while the tree holds no nodes.
    NotEmpty(String),

    /// [`NodeId`] does not refer to a live node.
    NodeNotFound(String),
}

impl Error for TreeError {}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeError::NotPositive(info) => write!(f, "Dimensions should be positive. {info}"),
            TreeError::NotFinite(info) => write!(f, "Values should be finite. {info}"),
            TreeError::TooSmall(info) => {
                write!(f, "Tree is smaller than its minimal node size. {info}")
            }
            TreeError::NotEmpty(info) => write!(f, "Tree is not empty. {info}"),
            TreeError::NodeNotFound(info) => write!(f, "Node not found. {info}"),
        }
    }
}
