//! Bounding primitives.
//!
//! [`TVec3`], [`BVec3`], [`Aabb`], [`Sphere`]

use std::{
    fmt::{Debug, Display},
    ops::{Add, Mul, Sub},
};

use num::Float as NumFloat;

use crate::{Position, TreeError};

/// Scalar type of every coordinate in the crate.
///
/// Implemented for `f32` and `f64`.
pub trait Float: NumFloat + Copy + Display + Debug + Default {
    /// `2` in the scalar type.
    #[inline]
    fn two() -> Self {
        Self::one() + Self::one()
    }

    /// `x / 2`
    #[inline]
    fn half(self) -> Self {
        self / Self::two()
    }
}
impl Float for f32 {}
impl Float for f64 {}

/// Tree Vec3
///
/// Inner type should be any [`Float`]: `f32` or `f64`.
#[derive(Default, Debug, PartialEq, PartialOrd, Clone, Copy)]
pub struct TVec3<F: Float> {
    pub x: F,
    pub y: F,
    pub z: F,
}

impl<F: Float> Add for TVec3<F> {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        TVec3 {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl<F: Float> Sub for TVec3<F> {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        TVec3 {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl<F: Float> Mul<F> for TVec3<F> {
    type Output = Self;

    fn mul(self, scale: F) -> Self {
        TVec3 {
            x: self.x * scale,
            y: self.y * scale,
            z: self.z * scale,
        }
    }
}

impl<F: Float> Display for TVec3<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Vec3: x: {}, y: {}, z: {}", self.x, self.y, self.z)
    }
}

impl<F: Float> Position for TVec3<F> {
    type F = F;

    fn position(&self) -> TVec3<F> {
        *self
    }
}

impl<F: Float> TVec3<F> {
    pub fn new(x: F, y: F, z: F) -> Self {
        TVec3 { x, y, z }
    }

    pub fn splat(v: F) -> Self {
        TVec3 { x: v, y: v, z: v }
    }

    pub fn zero() -> Self {
        Self::splat(F::zero())
    }

    pub fn lt(&self, other: Self) -> BVec3 {
        BVec3::new(self.x < other.x, self.y < other.y, self.z < other.z)
    }

    pub fn le(&self, other: Self) -> BVec3 {
        BVec3::new(self.x <= other.x, self.y <= other.y, self.z <= other.z)
    }

    pub fn ge(&self, other: Self) -> BVec3 {
        BVec3::new(self.x >= other.x, self.y >= other.y, self.z >= other.z)
    }

    /// Component-wise minimum.
    pub fn min(&self, other: Self) -> Self {
        TVec3::new(
            self.x.min(other.x),
            self.y.min(other.y),
            self.z.min(other.z),
        )
    }

    /// Component-wise maximum.
    pub fn max(&self, other: Self) -> Self {
        TVec3::new(
            self.x.max(other.x),
            self.y.max(other.y),
            self.z.max(other.z),
        )
    }

    pub fn length_squared(&self) -> F {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    pub fn distance_squared(&self, other: Self) -> F {
        (*self - other).length_squared()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// Boolean Vec3 mask.
#[derive(Default, Clone, Copy, PartialEq, Debug)]
pub struct BVec3 {
    x: bool,
    y: bool,
    z: bool,
}

impl BVec3 {
    fn new(x: bool, y: bool, z: bool) -> Self {
        BVec3 { x, y, z }
    }

    pub fn all(&self) -> bool {
        self.x && self.y && self.z
    }

    pub fn any(&self) -> bool {
        self.x || self.y || self.z
    }

    /// Packs the mask into an octant code: bit0 `x`, bit1 `y`, bit2 `z`.
    pub fn bitmask(&self) -> usize {
        (self.x as usize) | (self.y as usize) << 1 | (self.z as usize) << 2
    }
}

/// Axis Aligned Bounding Box
///
/// Stored as center and half extent. `min` and `max` are cached
/// and recomputed by every mutator, so `min <= max` always holds
/// for boxes built through [`Aabb::new`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb<F: Float> {
    center: TVec3<F>,
    half_extent: TVec3<F>,
    min: TVec3<F>,
    max: TVec3<F>,
}

impl<F: Float> Default for Aabb<F> {
    fn default() -> Self {
        Self::new_unchecked(TVec3::splat(F::one().half()), TVec3::splat(F::one().half()))
    }
}

impl<F: Float> Display for Aabb<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Aabb(min: {}, max: {})", self.min, self.max)
    }
}

impl<F: Float> Aabb<F> {
    /// Creates a new [`Aabb`] object without any checks
    pub fn new_unchecked(center: TVec3<F>, half_extent: TVec3<F>) -> Self {
        Aabb {
            center,
            half_extent,
            min: center - half_extent,
            max: center + half_extent,
        }
    }

    /// Creates a new [`Aabb`] object
    ///
    /// Checks that all components are finite
    /// and that the half extent is not negative.
    pub fn new(center: TVec3<F>, half_extent: TVec3<F>) -> Result<Self, TreeError> {
        if !center.is_finite() || !half_extent.is_finite() {
            Err(TreeError::NotFinite(format!(
                "center: {center}, half extent: {half_extent}"
            )))
        } else if half_extent.lt(TVec3::zero()).any() {
            Err(TreeError::NotPositive(format!("half extent: {half_extent}")))
        } else {
            Ok(Self::new_unchecked(center, half_extent))
        }
    }

    /// Creates a cube from its center and a single half size.
    pub fn cube(center: TVec3<F>, half_size: F) -> Result<Self, TreeError> {
        Self::new(center, TVec3::splat(half_size))
    }

    /// Creates a new [`Aabb`] object from a min and max
    pub fn from_min_max(min: TVec3<F>, max: TVec3<F>) -> Self {
        let lo = min.min(max);
        let hi = min.max(max);
        let half_extent = (hi - lo) * F::one().half();
        Aabb {
            center: lo + half_extent,
            half_extent,
            min: lo,
            max: hi,
        }
    }

    pub fn center(&self) -> TVec3<F> {
        self.center
    }

    pub fn half_extent(&self) -> TVec3<F> {
        self.half_extent
    }

    pub fn min(&self) -> TVec3<F> {
        self.min
    }

    pub fn max(&self) -> TVec3<F> {
        self.max
    }

    pub fn set_center(&mut self, center: TVec3<F>) {
        self.center = center;
        self.recompute();
    }

    pub fn set_half_extent(&mut self, half_extent: TVec3<F>) {
        self.half_extent = half_extent;
        self.recompute();
    }

    fn recompute(&mut self) {
        self.min = self.center - self.half_extent;
        self.max = self.center + self.half_extent;
    }

    /// Checks if the aabb contains a point. All six faces are inclusive.
    pub fn contains(&self, position: TVec3<F>) -> bool {
        self.min.le(position).all() && self.max.ge(position).all()
    }

    /// Checks if this volume overlaps with another [`Aabb`].
    ///
    /// Touching faces count as an overlap.
    pub fn intersects_aabb(&self, other: &Aabb<F>) -> bool {
        self.min.le(other.max).all() && self.max.ge(other.min).all()
    }

    /// Checks if a sphere touches this volume.
    pub fn intersects_sphere(&self, center: TVec3<F>, radius: F) -> bool {
        let closest = center.max(self.min).min(self.max);
        closest.distance_squared(center) <= radius * radius
    }

    /// Expands the box just enough to contain `position`.
    pub fn grow_to_contain(&mut self, position: TVec3<F>) {
        *self = Self::from_min_max(self.min.min(position), self.max.max(position));
    }

    /// Smallest box containing both boxes.
    pub fn union(&self, other: &Aabb<F>) -> Aabb<F> {
        Self::from_min_max(self.min.min(other.min), self.max.max(other.max))
    }

    pub fn size(&self) -> TVec3<F> {
        self.max - self.min
    }
}

/// Bounding sphere used by [`sphere queries`](crate::tree::Octree::points_within_sphere).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere<F: Float> {
    pub center: TVec3<F>,
    pub radius: F,
}

impl<F: Float> Sphere<F> {
    pub fn new(center: TVec3<F>, radius: F) -> Self {
        Sphere { center, radius }
    }

    /// Exact point in sphere test. The surface is inclusive.
    pub fn contains(&self, position: TVec3<F>) -> bool {
        self.center.distance_squared(position) <= self.radius * self.radius
    }

    pub fn intersects_aabb(&self, aabb: &Aabb<F>) -> bool {
        aabb.intersects_sphere(self.center, self.radius)
    }
}

#[cfg(test)]
mod tests {
    use super::{Aabb, Sphere, TVec3};

    #[test]
    fn test_aabb_contains() {
        let aabb = Aabb::cube(TVec3::splat(8.0), 8.0f32).unwrap();
        assert!(aabb.contains(TVec3::zero()));
        assert!(aabb.contains(TVec3::splat(8.0)));

        // faces are inclusive
        assert!(aabb.contains(TVec3::splat(16.0)));
        assert!(aabb.contains(TVec3::new(0.0, 16.0, 8.0)));

        assert!(!aabb.contains(TVec3::new(16.1, 8.0, 8.0)));
        assert!(!aabb.contains(TVec3::new(8.0, -0.1, 8.0)));
    }

    #[test]
    fn test_aabb_constructor() {
        assert!(Aabb::cube(TVec3::splat(2.0f64), 2.0).is_ok());
        assert!(Aabb::new(TVec3::zero(), TVec3::new(1.0f32, -1.0, 1.0)).is_err());
        assert!(Aabb::cube(TVec3::new(f32::NAN, 0.0, 0.0), 1.0).is_err());

        let aabb = Aabb::cube(TVec3::new(1.0f32, 2.0, 3.0), 1.0).unwrap();
        assert_eq!(aabb.min(), TVec3::new(0.0, 1.0, 2.0));
        assert_eq!(aabb.max(), TVec3::new(2.0, 3.0, 4.0));
    }

    #[test]
    fn test_from_min_max() {
        let aabb = Aabb::from_min_max(TVec3::new(4.0f32, 0.0, 0.0), TVec3::new(0.0, 2.0, 2.0));
        assert_eq!(aabb.min(), TVec3::zero());
        assert_eq!(aabb.max(), TVec3::new(4.0, 2.0, 2.0));
        assert_eq!(aabb.center(), TVec3::new(2.0, 1.0, 1.0));
        assert_eq!(aabb.half_extent(), TVec3::new(2.0, 1.0, 1.0));
    }

    #[test]
    fn test_mutators_recompute_bounds() {
        let mut aabb = Aabb::cube(TVec3::zero(), 1.0f32).unwrap();

        aabb.set_center(TVec3::splat(2.0));
        assert_eq!(aabb.min(), TVec3::splat(1.0));
        assert_eq!(aabb.max(), TVec3::splat(3.0));

        aabb.set_half_extent(TVec3::new(2.0, 1.0, 0.0));
        assert_eq!(aabb.min(), TVec3::new(0.0, 1.0, 2.0));
        assert_eq!(aabb.max(), TVec3::new(4.0, 3.0, 2.0));

        aabb.grow_to_contain(TVec3::new(-1.0, 2.0, 5.0));
        assert_eq!(aabb.min(), TVec3::new(-1.0, 1.0, 2.0));
        assert_eq!(aabb.max(), TVec3::new(4.0, 3.0, 5.0));
        assert!(aabb.contains(TVec3::new(-1.0, 2.0, 5.0)));
    }

    #[test]
    fn test_union() {
        let a = Aabb::cube(TVec3::splat(1.0f32), 1.0).unwrap();
        let b = Aabb::cube(TVec3::splat(5.0f32), 1.0).unwrap();
        let u = a.union(&b);
        assert_eq!(u.min(), TVec3::zero());
        assert_eq!(u.max(), TVec3::splat(6.0));
    }

    #[test]
    fn test_intersections() {
        let a = Aabb::cube(TVec3::splat(2.0f32), 2.0).unwrap();
        let touching = Aabb::cube(TVec3::new(6.0, 2.0, 2.0), 2.0).unwrap();
        let apart = Aabb::cube(TVec3::new(7.0, 2.0, 2.0), 2.0).unwrap();
        assert!(a.intersects_aabb(&touching));
        assert!(!a.intersects_aabb(&apart));
        assert!(apart.intersects_aabb(&touching));

        assert!(a.intersects_sphere(TVec3::new(5.0, 2.0, 2.0), 1.0));
        assert!(!a.intersects_sphere(TVec3::new(5.0, 5.0, 5.0), 1.0));
        // sphere around the box corner
        assert!(a.intersects_sphere(TVec3::splat(5.0), 1.8));
        assert!(!a.intersects_sphere(TVec3::splat(5.0), 1.7));

        let sphere = Sphere::new(TVec3::zero(), 1.0f64);
        assert!(sphere.contains(TVec3::new(1.0, 0.0, 0.0)));
        assert!(!sphere.contains(TVec3::new(0.8, 0.8, 0.0)));
    }

    #[test]
    fn test_octant_bitmask() {
        let origin = TVec3::zero();
        let half = TVec3::splat(4.0f32);
        assert_eq!((TVec3::new(1.0, 1.0, 1.0) - origin).ge(half).bitmask(), 0);
        assert_eq!((TVec3::new(5.0, 1.0, 1.0) - origin).ge(half).bitmask(), 1);
        assert_eq!((TVec3::new(1.0, 5.0, 1.0) - origin).ge(half).bitmask(), 2);
        assert_eq!((TVec3::new(1.0, 1.0, 5.0) - origin).ge(half).bitmask(), 4);
        assert_eq!((TVec3::splat(4.0) - origin).ge(half).bitmask(), 7);
    }
}
