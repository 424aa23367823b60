use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::{
    bounding::{Aabb, Float, TVec3},
    config::{check_min_node_size, OctreeBuilder, Pruning},
    node::{Bucket, Node},
    pool::Pool,
    NodeId, Position, TreeError,
};

/// Point octree.
///
/// Nodes live in a flat [`Pool`] and refer to each other by [`NodeId`].
/// A node owns its children; the parent id is only used to walk
/// upward while reducing a branch.
#[derive(Clone, Debug)]
pub struct Octree<F, T>
where
    F: Float,
    T: Position<F = F>,
{
    pub(crate) nodes: Pool<Node<F, T>>,
    pub(crate) root: NodeId,
    pub(crate) auto_reduction: bool,
    pub(crate) pruning: Pruning,
    pub(crate) len: usize,
}

impl<F, T> Octree<F, T>
where
    F: Float,
    T: Position<F = F>,
{
    /// Cube with the minimal corner at `origin` and edge length `size`,
    /// using the default settings of [`OctreeBuilder`].
    pub fn new(origin: TVec3<F>, size: F) -> Result<Self, TreeError> {
        OctreeBuilder::new(origin, size).build()
    }

    /// Starts an [`OctreeBuilder`] for a tree of `T`.
    pub fn builder(origin: TVec3<F>, size: F) -> OctreeBuilder<F, T> {
        OctreeBuilder::new(origin, size)
    }

    pub(crate) fn from_parts(
        origin: TVec3<F>,
        size: F,
        min_node_size: F,
        auto_reduction: bool,
        pruning: Pruning,
    ) -> Self {
        let mut nodes = Pool::default();
        let root = nodes.insert(Node::root(origin, size, min_node_size));
        Octree {
            nodes,
            root,
            auto_reduction,
            pruning,
            len: 0,
        }
    }

    /// Sets the recursion floor.
    ///
    /// The value is halved before it is compared against node half sizes.
    /// Fails with [`TreeError::NotEmpty`] once the root has a bucket or children,
    /// since existing nodes keep the floor they were created with.
    pub fn set_min_node_size(&mut self, size: F) -> Result<(), TreeError> {
        let root = &self.nodes[self.root];
        check_min_node_size(size, root.size())?;
        if root.num_children > 0 || root.points.is_some() {
            return Err(TreeError::NotEmpty(format!(
                "min node size can't change after insertion, requested: {size}"
            )));
        }

        let root = &mut self.nodes[self.root];
        root.min_node_size = size.half();
        debug!(min_node_size = %root.min_node_size, "min node size changed");
        Ok(())
    }

    /// Reduce the branch automatically once a removal empties a leaf.
    pub fn set_auto_reduction(&mut self, enabled: bool) {
        debug!(enabled, "auto reduction changed");
        self.auto_reduction = enabled;
    }

    pub fn set_pruning(&mut self, pruning: Pruning) {
        debug!(%pruning, "pruning changed");
        self.pruning = pruning;
    }

    /// Inserts a point.
    ///
    /// Returns `false` without touching the tree
    /// if the point is outside of the root's bounds.
    pub fn insert(&mut self, elem: T) -> bool {
        let position = elem.position();
        if !self.nodes[self.root].bounds.contains(position) {
            trace!(%position, "point is outside of the tree");
            return false;
        }

        let mut node = self.root;
        loop {
            let n = &self.nodes[node];
            if n.is_floor() {
                self.nodes[node]
                    .points
                    .get_or_insert_with(Bucket::new)
                    .push(elem);
                self.len += 1;
                return true;
            }

            let octant = n.octant(position);
            let child = n.children[octant];
            node = match child {
                Some(child) => child,
                None => self.spawn_child(node, octant),
            };
        }
    }

    fn spawn_child(&mut self, parent: NodeId, octant: usize) -> NodeId {
        let child = self.nodes[parent].child(octant, parent);
        let id = self.nodes.insert(child);

        let n = &mut self.nodes[parent];
        n.children[octant] = Some(id);
        n.num_children += 1;
        trace!(%parent, child = %id, octant, "node created");
        id
    }

    /// Inserts every point, even after a failure.
    ///
    /// Returns `true` only if all of them were inserted.
    pub fn insert_all<I>(&mut self, elems: I) -> bool
    where
        I: IntoIterator<Item = T>,
    {
        elems
            .into_iter()
            .fold(true, |all, elem| self.insert(elem) && all)
    }

    /// Finds the leaf holding points on the path of `position`.
    ///
    /// Returns [`None`] if `position` is outside of the tree
    /// or lands in a branch that was never materialized.
    pub fn leaf_for_point(&self, position: TVec3<F>) -> Option<NodeId> {
        if !self.nodes[self.root].bounds.contains(position) {
            return None;
        }

        let mut node = self.root;
        loop {
            let n = &self.nodes[node];
            if n.has_points() {
                return Some(node);
            }
            if n.is_floor() {
                return None;
            }
            node = n.children[n.octant(position)]?;
        }
    }

    /// Removes the first stored point equal to `elem`.
    ///
    /// Returns `false` if there is no such point, whether or not
    /// `elem` is inside of the tree.
    pub fn remove(&mut self, elem: &T) -> bool
    where
        T: PartialEq,
    {
        let Some(leaf) = self.leaf_for_point(elem.position()) else {
            return false;
        };
        let Some(bucket) = self.nodes[leaf].points.as_mut() else {
            return false;
        };
        let Some(idx) = bucket.iter().position(|p| p == elem) else {
            return false;
        };

        bucket.remove(idx);
        let emptied = bucket.is_empty();
        self.len -= 1;
        trace!(node = %leaf, emptied, "point removed");

        if emptied && self.auto_reduction {
            self.reduce(leaf);
        }
        true
    }

    /// Removes every point of `elems`, ignoring misses.
    pub fn remove_all<'a, I>(&mut self, elems: I)
    where
        T: PartialEq + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        for elem in elems {
            self.remove(elem);
        }
    }

    /// Prunes empty children starting at `node` and walking up to the root.
    ///
    /// What counts as empty is decided by [`Pruning`].
    ///
    /// Pruned slots are handed out again by later insertions, so a [`NodeId`]
    /// kept across a reduction may refer to a different node afterwards.
    /// Fails with [`TreeError::NodeNotFound`] only while the slot is still free.
    pub fn reduce_branch(&mut self, node: NodeId) -> Result<(), TreeError> {
        self.check_node(node)?;
        self.reduce(node);
        Ok(())
    }

    fn reduce(&mut self, node: NodeId) {
        let mut current = Some(node);
        while let Some(id) = current {
            let n = &mut self.nodes[id];
            if n.points.as_ref().is_some_and(|b| b.is_empty()) {
                n.points = None;
            }

            let children = n.children;
            for (octant, child) in children.into_iter().enumerate() {
                let Some(child) = child else { continue };
                if !self.is_prunable(child) {
                    continue;
                }

                let dropped = self.free_subtree(child);
                let n = &mut self.nodes[id];
                n.children[octant] = None;
                n.num_children -= 1;
                self.len -= dropped;

                if dropped > 0 {
                    debug!(node = %child, dropped, "pruned branch discarded points");
                } else {
                    trace!(node = %child, "pruned");
                }
            }

            current = self.nodes[id].parent;
        }
    }

    fn is_prunable(&self, node: NodeId) -> bool {
        match self.pruning {
            Pruning::Bucket => !self.nodes[node].has_points(),
            Pruning::Subtree => self.subtree_is_empty(node),
        }
    }

    fn subtree_is_empty(&self, node: NodeId) -> bool {
        let mut stack: SmallVec<[NodeId; 32]> = SmallVec::new();
        stack.push(node);
        while let Some(id) = stack.pop() {
            let n = &self.nodes[id];
            if n.has_points() {
                return false;
            }
            stack.extend(n.children.iter().flatten().copied());
        }
        true
    }

    /// Releases `node` and all of its descendants.
    ///
    /// Returns the number of points they held.
    fn free_subtree(&mut self, node: NodeId) -> usize {
        let mut dropped = 0;
        let mut stack: SmallVec<[NodeId; 32]> = SmallVec::new();
        stack.push(node);
        while let Some(id) = stack.pop() {
            if let Some(n) = self.nodes.remove(id) {
                dropped += n.points.map_or(0, |b| b.len());
                stack.extend(n.children.into_iter().flatten());
            }
        }
        dropped
    }

    /// Resets `node` to an empty node, releasing its children and bucket.
    ///
    /// The parent is left untouched, call [`reduce_branch`](Self::reduce_branch)
    /// to prune upward.
    ///
    /// Same as [`reduce_branch`](Self::reduce_branch), `node` must be an id
    /// taken after the last reduction or removal.
    pub fn empty(&mut self, node: NodeId) -> Result<(), TreeError> {
        self.check_node(node)?;

        let n = &mut self.nodes[node];
        let children = std::mem::replace(&mut n.children, [None; 8]);
        n.num_children = 0;
        let mut dropped = n.points.take().map_or(0, |b| b.len());

        for child in children.into_iter().flatten() {
            dropped += self.free_subtree(child);
        }
        self.len -= dropped;
        trace!(%node, dropped, "node emptied");
        Ok(())
    }

    /// Removes every point and node except the root.
    pub fn clear(&mut self) {
        let root = self.root;
        let n = &mut self.nodes[root];
        let children = std::mem::replace(&mut n.children, [None; 8]);
        n.num_children = 0;
        n.points = None;
        for child in children.into_iter().flatten() {
            self.free_subtree(child);
        }
        self.len = 0;
    }

    fn check_node(&self, node: NodeId) -> Result<(), TreeError> {
        if self.nodes.is_garbage(node) {
            Err(TreeError::NodeNotFound(format!("{node}")))
        } else {
            Ok(())
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn root_node(&self) -> &Node<F, T> {
        &self.nodes[self.root]
    }

    /// Live node behind `node`.
    ///
    /// Ids are slots in [`Pool`], reused once their node is pruned.
    /// Re-resolve ids (for example with [`leaf_for_point`](Self::leaf_for_point))
    /// after anything that may reduce a branch.
    pub fn node(&self, node: NodeId) -> Option<&Node<F, T>> {
        self.nodes.get(node)
    }

    pub fn nodes(&self) -> &Pool<Node<F, T>> {
        &self.nodes
    }

    /// Bounds of the root node.
    pub fn bounds(&self) -> &Aabb<F> {
        &self.nodes[self.root].bounds
    }

    /// Number of stored points, duplicates included.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Floor compared against node half sizes.
    pub fn min_node_size(&self) -> F {
        self.nodes[self.root].min_node_size
    }

    pub fn auto_reduction(&self) -> bool {
        self.auto_reduction
    }

    pub fn pruning(&self) -> Pruning {
        self.pruning
    }
}
