//! Pre-order traversal.

use smallvec::SmallVec;

use crate::{
    bounding::Float,
    node::{Node, NodeState},
    tree::Octree,
    NodeId, Position, TreeError,
};

/// Called once per node by [`Octree::accept`].
pub trait NodeVisitor<F: Float, T> {
    fn visit(&mut self, id: NodeId, node: &Node<F, T>);
}

impl<F, T, V> NodeVisitor<F, T> for V
where
    F: Float,
    V: FnMut(NodeId, &Node<F, T>),
{
    fn visit(&mut self, id: NodeId, node: &Node<F, T>) {
        self(id, node)
    }
}

/// Shape of a tree, collected with [`Octree::stats`].
#[derive(Default, Clone, Copy, PartialEq, Eq, Debug)]
pub struct TreeStats {
    pub nodes: usize,
    pub leaves: usize,
    pub branches: usize,
    pub points: usize,
    pub max_depth: u32,
}

impl<F: Float, T> NodeVisitor<F, T> for TreeStats {
    fn visit(&mut self, _id: NodeId, node: &Node<F, T>) {
        self.nodes += 1;
        match node.state() {
            NodeState::Leaf => self.leaves += 1,
            NodeState::Branch => self.branches += 1,
            NodeState::Empty => (),
        }
        self.points += node.points().map_or(0, |b| b.len());
        self.max_depth = self.max_depth.max(node.depth());
    }
}

impl<F, T> Octree<F, T>
where
    F: Float,
    T: Position<F = F>,
{
    /// Visits every node, parents before children,
    /// children in octant order.
    ///
    /// ```rust
    /// use pointree::prelude::*;
    ///
    /// let mut tree: Octree<f32, TVec3<f32>> = Octree::new(TVec3::zero(), 16.0).unwrap();
    /// tree.insert(TVec3::splat(12.0));
    /// tree.insert(TVec3::splat(1.0));
    ///
    /// let mut depths = Vec::new();
    /// tree.visit(|_, node| depths.push(node.depth()));
    /// assert_eq!(depths, vec![0, 1, 1]);
    /// ```
    pub fn visit<V>(&self, mut visitor: V)
    where
        V: FnMut(NodeId, &Node<F, T>),
    {
        self.accept(&mut visitor);
    }

    /// Runs `visitor` over the whole tree.
    pub fn accept<V: NodeVisitor<F, T>>(&self, visitor: &mut V) {
        self.walk(self.root, visitor);
    }

    /// Runs `visitor` over the subtree rooted at `node`.
    pub fn accept_from<V: NodeVisitor<F, T>>(
        &self,
        node: NodeId,
        visitor: &mut V,
    ) -> Result<(), TreeError> {
        if self.nodes.is_garbage(node) {
            return Err(TreeError::NodeNotFound(format!("{node}")));
        }
        self.walk(node, visitor);
        Ok(())
    }

    fn walk<V: NodeVisitor<F, T>>(&self, node: NodeId, visitor: &mut V) {
        let mut stack: SmallVec<[NodeId; 64]> = SmallVec::new();
        stack.push(node);
        while let Some(id) = stack.pop() {
            let n = &self.nodes[id];
            visitor.visit(id, n);
            stack.extend(n.children.iter().rev().flatten().copied());
        }
    }

    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats::default();
        self.accept(&mut stats);
        stats
    }
}
