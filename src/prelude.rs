//! Crate's core types reimports.

pub use crate::{
    bounding::{Aabb, Float, Sphere, TVec3},
    config::{OctreeBuilder, Pruning, DEFAULT_MIN_NODE_SIZE},
    node::{Node, NodeState},
    tree::Octree,
    visit::{NodeVisitor, TreeStats},
    NodeId, Position, TreeError,
};
