//! Geometry primitives shared by the voxel crates: vectors, integer block
//! positions, axis-aligned boxes and the swept-box collision test.
#![forbid(unsafe_code)]

use core::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

#[derive(Debug, thiserror::Error, Clone, Copy, PartialEq)]
pub enum GeomError {
    #[error("non-finite coordinate in box bounds")]
    NonFinite,
    #[error("box is inverted on axis {axis}: min {min} > max {max}")]
    Inverted { axis: usize, min: f32, max: f32 },
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };
    pub const UP: Vec3 = Vec3 {
        x: 0.0,
        y: 1.0,
        z: 0.0,
    };

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub const fn splat(v: f32) -> Self {
        Self { x: v, y: v, z: v }
    }

    #[inline]
    pub const fn from_array(a: [f32; 3]) -> Self {
        Self::new(a[0], a[1], a[2])
    }

    #[inline]
    pub const fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    /// Component by axis index (0 = x, 1 = y, 2 = z).
    #[inline]
    pub fn axis(self, axis: usize) -> f32 {
        match axis {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    #[inline]
    pub fn axis_mut(&mut self, axis: usize) -> &mut f32 {
        match axis {
            0 => &mut self.x,
            1 => &mut self.y,
            _ => &mut self.z,
        }
    }

    #[inline]
    pub fn dot(self, rhs: Vec3) -> f32 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    #[inline]
    pub fn cross(self, rhs: Vec3) -> Vec3 {
        Vec3 {
            x: self.y * rhs.z - self.z * rhs.y,
            y: self.z * rhs.x - self.x * rhs.z,
            z: self.x * rhs.y - self.y * rhs.x,
        }
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    #[inline]
    pub fn normalized(self) -> Vec3 {
        let len = self.length();
        if len > 0.0 { self / len } else { self }
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    #[inline]
    pub fn floor(self) -> Vec3 {
        Vec3::new(self.x.floor(), self.y.floor(), self.z.floor())
    }

    #[inline]
    pub fn min(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x.min(rhs.x), self.y.min(rhs.y), self.z.min(rhs.z))
    }

    #[inline]
    pub fn max(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x.max(rhs.x), self.y.max(rhs.y), self.z.max(rhs.z))
    }

    /// Component-wise product.
    #[inline]
    pub fn mul_elem(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x * rhs.x, self.y * rhs.y, self.z * rhs.z)
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    #[inline]
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    #[inline]
    fn add_assign(&mut self, rhs: Vec3) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    #[inline]
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl SubAssign for Vec3 {
    #[inline]
    fn sub_assign(&mut self, rhs: Vec3) {
        self.x -= rhs.x;
        self.y -= rhs.y;
        self.z -= rhs.z;
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    #[inline]
    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Div<f32> for Vec3 {
    type Output = Vec3;
    #[inline]
    fn div(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;
    #[inline]
    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

/// Integer coordinate of a block cell. Block `(x, y, z)` covers the unit
/// cube `[x, x+1) x [y, y+1) x [z, z+1)` in world space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// Cell containing the given world-space point.
    #[inline]
    pub fn containing(p: Vec3) -> Self {
        Self::new(p.x.floor() as i32, p.y.floor() as i32, p.z.floor() as i32)
    }

    /// World-space minimum corner of the cell.
    #[inline]
    pub fn min_corner(self) -> Vec3 {
        Vec3::new(self.x as f32, self.y as f32, self.z as f32)
    }

    #[inline]
    pub fn center(self) -> Vec3 {
        self.min_corner() + Vec3::splat(0.5)
    }
}

impl From<(i32, i32, i32)> for BlockPos {
    #[inline]
    fn from(value: (i32, i32, i32)) -> Self {
        Self::new(value.0, value.1, value.2)
    }
}

impl From<BlockPos> for (i32, i32, i32) {
    #[inline]
    fn from(value: BlockPos) -> Self {
        (value.x, value.y, value.z)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

/// Result of a swept-box test: the fraction of the displacement travelled
/// before contact and the outward normal of the struck face.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SweepHit {
    pub entry_time: f32,
    pub normal: [i8; 3],
}

impl Aabb {
    #[inline]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Checked constructor: rejects non-finite bounds and inverted axes.
    pub fn try_new(min: Vec3, max: Vec3) -> Result<Self, GeomError> {
        if !min.is_finite() || !max.is_finite() {
            return Err(GeomError::NonFinite);
        }
        for axis in 0..3 {
            let (lo, hi) = (min.axis(axis), max.axis(axis));
            if lo > hi {
                return Err(GeomError::Inverted {
                    axis,
                    min: lo,
                    max: hi,
                });
            }
        }
        Ok(Self { min, max })
    }

    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) / 2.0
    }

    #[inline]
    pub fn translated(&self, by: Vec3) -> Aabb {
        Aabb::new(self.min + by, self.max + by)
    }

    /// Smallest box containing both this box and the box displaced by `delta`.
    #[inline]
    pub fn swept_bounds(&self, delta: Vec3) -> Aabb {
        let moved = self.translated(delta);
        Aabb::new(self.min.min(moved.min), self.max.max(moved.max))
    }

    /// Strict overlap: boxes that only share a face do not intersect.
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        (0..3).all(|axis| overlap_on(self, other, axis))
    }

    /// Sweeps `self` by `velocity` over one unit of time against the
    /// stationary `obstacle` using the slab method.
    ///
    /// An axis with zero velocity contributes an unbounded interval when the
    /// boxes already overlap on it, and rules out any contact otherwise.
    /// Returns `None` when the sweep starts past the obstacle on every axis,
    /// when contact would happen after the step, or when the per-axis
    /// intervals do not intersect.
    pub fn sweep(&self, obstacle: &Aabb, velocity: Vec3) -> Option<SweepHit> {
        let mut entry = [0.0f32; 3];
        let mut exit = [0.0f32; 3];
        for axis in 0..3 {
            let v = velocity.axis(axis);
            let (a_min, a_max) = (self.min.axis(axis), self.max.axis(axis));
            let (b_min, b_max) = (obstacle.min.axis(axis), obstacle.max.axis(axis));
            if v == 0.0 {
                if overlap_on(self, obstacle, axis) {
                    entry[axis] = f32::NEG_INFINITY;
                    exit[axis] = f32::INFINITY;
                } else {
                    entry[axis] = f32::INFINITY;
                    exit[axis] = f32::NEG_INFINITY;
                }
            } else if v > 0.0 {
                entry[axis] = (b_min - a_max) / v;
                exit[axis] = (b_max - a_min) / v;
            } else {
                entry[axis] = (b_max - a_min) / v;
                exit[axis] = (b_min - a_max) / v;
            }
        }

        if entry.iter().all(|&t| t < 0.0) {
            return None;
        }
        if entry.iter().any(|&t| t > 1.0) {
            return None;
        }
        let entry_time = entry[0].max(entry[1]).max(entry[2]);
        let exit_time = exit[0].min(exit[1]).min(exit[2]);
        if entry_time > exit_time {
            return None;
        }

        let mut normal = [0i8; 3];
        for axis in 0..3 {
            if entry[axis] == entry_time {
                normal[axis] = if velocity.axis(axis) > 0.0 { -1 } else { 1 };
            }
        }
        Some(SweepHit { entry_time, normal })
    }
}

#[inline]
fn overlap_on(a: &Aabb, b: &Aabb, axis: usize) -> bool {
    a.max.axis(axis).min(b.max.axis(axis)) - a.min.axis(axis).max(b.min.axis(axis)) > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn containing_cell_holds_point(p in any::<Vec3>()) {
            prop_assume!(p.is_finite() && p.x.abs() < 1e6 && p.y.abs() < 1e6 && p.z.abs() < 1e6);
            let b = BlockPos::containing(p);
            let lo = b.min_corner();
            prop_assert!(lo.x <= p.x && p.x < lo.x + 1.0);
            prop_assert!(lo.y <= p.y && p.y < lo.y + 1.0);
            prop_assert!(lo.z <= p.z && p.z < lo.z + 1.0);
        }
    }

    #[test]
    fn negative_points_floor_down() {
        assert_eq!(
            BlockPos::containing(Vec3::new(-0.25, 0.0, -1.0)),
            BlockPos::new(-1, 0, -1)
        );
    }
}
