//! [Bevy](https://docs.rs/bevy/) game engine integrations.
//!
//! Adds the [Bevy](https://docs.rs/bevy/) game engine as a dependency.
//!
//! - bevy's [`Aabb3d`] and [`BoundingSphere`] can be used as query volumes.
//! - The tree's root bounds implement [`IntersectsVolume`].
//!
//! ```ignore
//! let volume = Aabb3d::new(Vec3A::splat(2.0), Vec3A::splat(2.0));
//! let points = tree.points_within_box(&volume.into());
//! ```

use bevy::math::{
    bounding::{Aabb3d, BoundingSphere, IntersectsVolume},
    Vec3, Vec3A,
};

use crate::{
    bounding::{Aabb, Sphere, TVec3},
    tree::Octree,
    Position,
};

impl<T> Octree<f32, T>
where
    T: Position<F = f32>,
{
    /// Points inside of a bevy [`Aabb3d`].
    pub fn points_within_aabb3d(&self, volume: &Aabb3d) -> Vec<T>
    where
        T: Clone,
    {
        self.points_within_box(&(*volume).into())
    }

    /// Points inside of a bevy [`BoundingSphere`].
    pub fn points_within_bounding_sphere(&self, sphere: &BoundingSphere) -> Vec<T>
    where
        T: Clone,
    {
        let sphere: Sphere<f32> = (*sphere).into();
        self.points_within_sphere(sphere.center, sphere.radius)
    }
}

impl From<Aabb<f32>> for Aabb3d {
    fn from(value: Aabb<f32>) -> Self {
        Aabb3d {
            min: value.min().into(),
            max: value.max().into(),
        }
    }
}

impl From<Aabb3d> for Aabb<f32> {
    fn from(value: Aabb3d) -> Self {
        Aabb::from_min_max(value.min.into(), value.max.into())
    }
}

impl From<BoundingSphere> for Sphere<f32> {
    fn from(value: BoundingSphere) -> Self {
        Sphere::new(value.center.into(), value.radius())
    }
}

impl From<TVec3<f32>> for Vec3A {
    fn from(value: TVec3<f32>) -> Self {
        Vec3A::new(value.x, value.y, value.z)
    }
}

impl From<TVec3<f32>> for Vec3 {
    fn from(value: TVec3<f32>) -> Self {
        Vec3::new(value.x, value.y, value.z)
    }
}

impl From<Vec3A> for TVec3<f32> {
    fn from(value: Vec3A) -> Self {
        TVec3::new(value.x, value.y, value.z)
    }
}

impl From<Vec3> for TVec3<f32> {
    fn from(value: Vec3) -> Self {
        TVec3::new(value.x, value.y, value.z)
    }
}

impl Position for Vec3 {
    type F = f32;

    fn position(&self) -> TVec3<f32> {
        (*self).into()
    }
}

impl<T> IntersectsVolume<Aabb3d> for Octree<f32, T>
where
    T: Position<F = f32>,
{
    /// Check if a [Aabb3d] volume intersects with the [Octree] root node.
    fn intersects(&self, volume: &Aabb3d) -> bool {
        let aabb: Aabb3d = (*self.bounds()).into();
        volume.intersects(&aabb)
    }
}

impl<T> IntersectsVolume<BoundingSphere> for Octree<f32, T>
where
    T: Position<F = f32>,
{
    /// Check if a [BoundingSphere] volume intersects with the [Octree] root node.
    fn intersects(&self, volume: &BoundingSphere) -> bool {
        let aabb: Aabb3d = (*self.bounds()).into();
        volume.intersects(&aabb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bevy_volumes() {
        let mut tree: Octree<f32, Vec3> = Octree::new(TVec3::zero(), 16.0).unwrap();
        assert!(tree.insert(Vec3::splat(1.0)));
        assert!(tree.insert(Vec3::splat(9.0)));

        let volume = Aabb3d::new(Vec3A::splat(2.0), Vec3A::splat(2.0));
        assert_eq!(tree.points_within_aabb3d(&volume), vec![Vec3::splat(1.0)]);

        let sphere = BoundingSphere::new(Vec3A::splat(9.5), 1.0);
        assert_eq!(
            tree.points_within_bounding_sphere(&sphere),
            vec![Vec3::splat(9.0)]
        );

        assert!(tree.intersects(&volume));
        assert!(!tree.intersects(&Aabb3d::new(Vec3A::splat(40.0), Vec3A::splat(1.0))));
        assert!(tree.intersects(&BoundingSphere::new(Vec3A::splat(17.0), 2.0)));
    }
}
