//! Range queries.

use heapless::Vec as HVec;

use crate::{
    bounding::{Aabb, Float, Sphere, TVec3},
    tree::Octree,
    NodeId, Position,
};

impl<F, T> Octree<F, T>
where
    F: Float,
    T: Position<F = F>,
{
    /// Points contained in `volume`, faces included.
    ///
    /// Returns an empty [`Vec`] if nothing matches.
    ///
    /// ```rust
    /// use pointree::prelude::*;
    ///
    /// let mut tree: Octree<f32, TVec3<f32>> = Octree::new(TVec3::zero(), 16.0).unwrap();
    /// tree.insert(TVec3::splat(1.0));
    /// tree.insert(TVec3::splat(9.0));
    ///
    /// let volume = Aabb::cube(TVec3::splat(8.0), 1.0).unwrap();
    /// assert_eq!(tree.points_within_box(&volume), vec![TVec3::splat(9.0)]);
    /// ```
    pub fn points_within_box(&self, volume: &Aabb<F>) -> Vec<T>
    where
        T: Clone,
    {
        let mut points = Vec::new();
        self.for_each_within_box(volume, |p| points.push(p.clone()));
        points
    }

    /// Points at most `radius` away from `center`.
    ///
    /// Returns an empty [`Vec`] if nothing matches.
    pub fn points_within_sphere(&self, center: TVec3<F>, radius: F) -> Vec<T>
    where
        T: Clone,
    {
        let mut points = Vec::new();
        self.for_each_within_sphere(&Sphere::new(center, radius), |p| {
            points.push(p.clone())
        });
        points
    }

    /// Every stored point, duplicates included.
    pub fn points(&self) -> Vec<T>
    where
        T: Clone,
    {
        let mut points = Vec::with_capacity(self.len);
        self.rquery(
            self.root,
            &|_: &Aabb<F>| true,
            &|_: TVec3<F>| true,
            &mut |p: &T| points.push(p.clone()),
        );
        points
    }

    /// Passes every point contained in `volume` to `actor`.
    pub fn for_each_within_box<'a, A>(&'a self, volume: &Aabb<F>, mut actor: A)
    where
        A: FnMut(&'a T),
    {
        self.rquery(
            self.root,
            &|bounds: &Aabb<F>| volume.intersects_aabb(bounds),
            &|position: TVec3<F>| volume.contains(position),
            &mut actor,
        );
    }

    /// Passes every point inside of `sphere` to `actor`.
    pub fn for_each_within_sphere<'a, A>(&'a self, sphere: &Sphere<F>, mut actor: A)
    where
        A: FnMut(&'a T),
    {
        self.rquery(
            self.root,
            &|bounds: &Aabb<F>| sphere.intersects_aabb(bounds),
            &|position: TVec3<F>| sphere.contains(position),
            &mut actor,
        );
    }

    fn rquery<'a, N, P, A>(&'a self, node: NodeId, hits_node: &N, hits_point: &P, actor: &mut A)
    where
        N: Fn(&Aabb<F>) -> bool,
        P: Fn(TVec3<F>) -> bool,
        A: FnMut(&'a T),
    {
        // We use a heapless stack to loop through the nodes until we complete the query however
        // if the stack becomes full then we fall back on recursive calls.
        let mut stack = HVec::<NodeId, 32>::new();
        let _ = stack.push(node);
        while let Some(node) = stack.pop() {
            let n = &self.nodes[node];
            if !hits_node(&n.bounds) {
                continue;
            }

            if let Some(bucket) = n.points.as_ref() {
                for p in bucket.iter() {
                    if hits_point(p.position()) {
                        actor(p);
                    }
                }
            }

            for child in n.children.iter().flatten() {
                if stack.push(*child).is_err() {
                    self.rquery(*child, hits_node, hits_point, actor);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    fn tree() -> Octree<f64, TVec3<f64>> {
        let mut tree = Octree::builder(TVec3::zero(), 16.0)
            .min_node_size(4.0)
            .build()
            .unwrap();
        assert!(tree.insert_all([
            TVec3::new(1.0, 1.0, 1.0),
            TVec3::new(3.0, 1.0, 1.0),
            TVec3::new(8.0, 8.0, 8.0),
            TVec3::new(15.0, 15.0, 15.0),
            TVec3::new(15.0, 15.0, 15.0),
        ]));
        tree
    }

    #[test]
    fn test_box_query() {
        let tree = tree();

        let volume = Aabb::cube(TVec3::splat(1.0), 2.0).unwrap();
        let mut found = tree.points_within_box(&volume);
        found.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap());
        assert_eq!(
            found,
            vec![TVec3::new(1.0, 1.0, 1.0), TVec3::new(3.0, 1.0, 1.0)]
        );

        // point on the face of the query box
        let volume = Aabb::from_min_max(TVec3::splat(8.0), TVec3::splat(9.0));
        assert_eq!(tree.points_within_box(&volume), vec![TVec3::splat(8.0)]);

        let volume = Aabb::cube(TVec3::splat(15.0), 0.5).unwrap();
        assert_eq!(tree.points_within_box(&volume).len(), 2);

        // query entirely outside of the tree
        let volume = Aabb::cube(TVec3::splat(100.0), 4.0).unwrap();
        assert!(tree.points_within_box(&volume).is_empty());
    }

    #[test]
    fn test_sphere_query() {
        let tree = tree();

        assert_eq!(
            tree.points_within_sphere(TVec3::splat(1.0), 2.0),
            vec![TVec3::new(1.0, 1.0, 1.0), TVec3::new(3.0, 1.0, 1.0)]
                .into_iter()
                .filter(|p| p.distance_squared(TVec3::splat(1.0)) <= 4.0)
                .collect::<Vec<_>>()
        );

        // box query would catch the corner, the sphere does not
        assert!(tree.points_within_sphere(TVec3::splat(6.0), 3.0).is_empty());
        assert_eq!(
            tree.points_within_sphere(TVec3::splat(6.0), 3.5),
            vec![TVec3::splat(8.0)]
        );

        assert!(tree.points_within_sphere(TVec3::splat(-10.0), 1.0).is_empty());
    }

    #[test]
    fn test_for_each_borrows() {
        let tree = tree();

        let mut refs: Vec<&TVec3<f64>> = Vec::new();
        tree.for_each_within_box(tree.bounds(), |p| refs.push(p));
        assert_eq!(refs.len(), 5);

        let mut count = 0;
        tree.for_each_within_sphere(&Sphere::new(TVec3::splat(15.0), 0.1), |_| count += 1);
        assert_eq!(count, 2);

        assert_eq!(tree.points().len(), tree.len());
    }

    #[test]
    fn test_empty_tree_queries() {
        let tree: Octree<f32, TVec3<f32>> = Octree::new(TVec3::zero(), 16.0).unwrap();
        assert!(tree.points().is_empty());
        assert!(tree.points_within_box(tree.bounds()).is_empty());
        assert!(tree.points_within_sphere(TVec3::splat(8.0), 100.0).is_empty());
    }
}
