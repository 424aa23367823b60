use core::fmt;

use smallvec::SmallVec;

use crate::{
    bounding::{Aabb, Float, TVec3},
    NodeId,
};

/// Points owned by a floor leaf.
pub type Bucket<T> = SmallVec<[T; 4]>;

/// One cube of space in an [`Octree`](crate::tree::Octree).
///
/// A node either holds up to 8 children indexed by octant,
/// or a bucket of points, or nothing at all.
#[derive(Clone, Debug)]
pub struct Node<F: Float, T> {
    pub(crate) bounds: Aabb<F>,
    pub(crate) half_size: F,
    pub(crate) depth: u32,
    pub(crate) min_node_size: F,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: [Option<NodeId>; 8],
    pub(crate) num_children: u8,
    pub(crate) points: Option<Bucket<T>>,
}

impl<F: Float, T> Node<F, T> {
    /// Root node of a tree: a cube with the minimal corner at `origin`.
    pub(crate) fn root(origin: TVec3<F>, size: F, min_node_size: F) -> Self {
        let bounds = Aabb::from_min_max(origin, origin + TVec3::splat(size));
        Node::new(bounds, size.half(), 0, min_node_size, None)
    }

    fn new(
        bounds: Aabb<F>,
        half_size: F,
        depth: u32,
        min_node_size: F,
        parent: Option<NodeId>,
    ) -> Self {
        Node {
            bounds,
            half_size,
            depth,
            min_node_size,
            parent,
            children: [None; 8],
            num_children: 0,
            points: None,
        }
    }

    /// Split plane of the node. Points at or above it on an axis
    /// go to the upper half of that axis.
    #[inline]
    pub fn mid(&self) -> TVec3<F> {
        self.bounds.min() + TVec3::splat(self.half_size)
    }

    /// Builds the (detached) child for `octant`.
    ///
    /// Child faces are taken from this node's faces and split plane,
    /// so the 8 children tile the parent without gaps.
    pub(crate) fn child(&self, octant: usize, id: NodeId) -> Self {
        let (lo, mid, hi) = (self.bounds.min(), self.mid(), self.bounds.max());
        let side = |flag: usize, lo: F, mid: F, hi: F| {
            if octant & flag != 0 {
                (mid, hi)
            } else {
                (lo, mid)
            }
        };
        let (x0, x1) = side(0b1, lo.x, mid.x, hi.x);
        let (y0, y1) = side(0b10, lo.y, mid.y, hi.y);
        let (z0, z1) = side(0b100, lo.z, mid.z, hi.z);

        Node::new(
            Aabb::from_min_max(TVec3::new(x0, y0, z0), TVec3::new(x1, y1, z1)),
            self.half_size.half(),
            self.depth + 1,
            self.min_node_size,
            Some(id),
        )
    }

    /// Octant code of `position` relative to this node:
    /// bit0 `x`, bit1 `y`, bit2 `z` at or above [`mid`](Self::mid).
    #[inline]
    pub fn octant(&self, position: TVec3<F>) -> usize {
        position.ge(self.mid()).bitmask()
    }

    /// Floor nodes never split and take every point landing in them.
    #[inline]
    pub fn is_floor(&self) -> bool {
        self.half_size <= self.min_node_size
    }

    #[inline]
    pub fn has_points(&self) -> bool {
        self.points.as_ref().is_some_and(|b| !b.is_empty())
    }

    pub fn state(&self) -> NodeState {
        if self.num_children > 0 {
            NodeState::Branch
        } else if self.has_points() {
            NodeState::Leaf
        } else {
            NodeState::Empty
        }
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn num_children(&self) -> u8 {
        self.num_children
    }

    /// Copy of the 8 child slots, indexed by octant.
    pub fn children(&self) -> [Option<NodeId>; 8] {
        self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn size(&self) -> F {
        self.half_size * F::two()
    }

    pub fn half_size(&self) -> F {
        self.half_size
    }

    /// Minimal corner of the node.
    pub fn offset(&self) -> TVec3<F> {
        self.bounds.min()
    }

    pub fn bounds(&self) -> &Aabb<F> {
        &self.bounds
    }

    pub fn min_node_size(&self) -> F {
        self.min_node_size
    }

    /// Bucket of a floor leaf. `Some(&[])` after its last point was removed
    /// and before the branch was reduced.
    pub fn points(&self) -> Option<&[T]> {
        self.points.as_deref()
    }
}

/// Explicit per node state.
#[derive(Default, Clone, Copy, PartialEq, Eq, Debug)]
pub enum NodeState {
    /// No points and no materialized children.
    #[default]
    Empty,

    /// Floor node holding at least one point.
    Leaf,

    /// At least one materialized child.
    Branch,
}

impl fmt::Display for NodeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeState::Empty => write!(f, "NodeState: Empty"),
            NodeState::Leaf => write!(f, "NodeState: Leaf"),
            NodeState::Branch => write!(f, "NodeState: Branch"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_layout() {
        let root: Node<f32, TVec3<f32>> = Node::root(TVec3::zero(), 16.0, 2.0);
        assert_eq!(root.size(), 16.0);
        assert_eq!(root.bounds().max(), TVec3::splat(16.0));

        let expected = [
            TVec3::new(0.0, 0.0, 0.0),
            TVec3::new(8.0, 0.0, 0.0),
            TVec3::new(0.0, 8.0, 0.0),
            TVec3::new(8.0, 8.0, 0.0),
            TVec3::new(0.0, 0.0, 8.0),
            TVec3::new(8.0, 0.0, 8.0),
            TVec3::new(0.0, 8.0, 8.0),
            TVec3::new(8.0, 8.0, 8.0),
        ];
        for (octant, origin) in expected.into_iter().enumerate() {
            let child = root.child(octant, NodeId(0));
            assert_eq!(child.offset(), origin);
            assert_eq!(child.half_size(), 4.0);
            assert_eq!(child.depth(), 1);
            assert_eq!(child.parent(), Some(NodeId(0)));
            assert_eq!(child.min_node_size(), 2.0);
            // the child's center lands back in the same octant
            assert_eq!(root.octant(child.bounds().center()), octant);
        }
    }

    #[test]
    fn test_children_share_faces() {
        let origin = TVec3::new(-1.6671829f32, -9.393654, -7.148936);
        let root: Node<f32, TVec3<f32>> = Node::root(origin, 14.295263, 0.5);
        let (lo, mid, hi) = (root.bounds().min(), root.mid(), root.bounds().max());
        assert_eq!(lo, origin);

        let first = root.child(0, NodeId(0));
        assert_eq!(first.bounds().min(), lo);
        assert_eq!(first.bounds().max(), mid);

        let last = root.child(7, NodeId(0));
        assert_eq!(last.bounds().min(), mid);
        assert_eq!(last.bounds().max(), hi);

        for octant in 0..8 {
            let child = root.child(octant, NodeId(0));
            assert_eq!(root.octant(child.bounds().min()), octant);
            assert_eq!(child.offset(), child.bounds().min());
        }
    }

    #[test]
    fn test_floor_and_state() {
        let mut node: Node<f64, TVec3<f64>> = Node::root(TVec3::zero(), 4.0, 2.0);
        assert!(node.is_floor());
        assert_eq!(node.state(), NodeState::Empty);
        assert_eq!(node.points(), None);

        node.points = Some(Bucket::new());
        assert_eq!(node.state(), NodeState::Empty);
        assert!(!node.has_points());

        node.points.as_mut().unwrap().push(TVec3::splat(1.0));
        assert_eq!(node.state(), NodeState::Leaf);

        let node: Node<f64, TVec3<f64>> = Node::root(TVec3::zero(), 8.0, 2.0);
        assert!(!node.is_floor());
    }
}
