//! Block picking: a ray walked through the grid one block face at a time.

use quarry_blocks::AIR;
use quarry_chunk::VoxelQuery;
use quarry_geom::{BlockPos, Vec3};

use crate::error::PhysicsError;

/// Default reach of a picking ray, in blocks.
pub const HIT_RANGE: f32 = 3.0;

// Slack on the exit-face bounds so a point sitting on an edge after an
// advance still finds its way out.
const FACE_EPSILON: f32 = 1e-4;

/// Unit look vector for `yaw` (around +y, from +x towards +z) and `pitch`.
#[inline]
pub fn direction_from_rotation(yaw: f32, pitch: f32) -> Vec3 {
    Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos())
}

/// The block a ray struck and the block it came from. Placing a block
/// targets `previous`, breaking targets `block`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RayTarget {
    pub previous: BlockPos,
    pub block: BlockPos,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// The next block is solid; the ray did not move.
    Hit(RayTarget),
    /// The ray crossed into the next (air) block.
    Advanced,
    /// No exit face was found. Only reachable through float drift.
    Stalled,
}

#[derive(Clone, Debug)]
pub struct RayHit {
    direction: Vec3,
    position: Vec3,
    block: BlockPos,
    distance: f32,
}

impl RayHit {
    /// `direction` is normalised; zero-length and non-finite input is rejected.
    pub fn new(origin: Vec3, direction: Vec3) -> Result<Self, PhysicsError> {
        if !origin.is_finite() {
            return Err(PhysicsError::NonFinite { what: "ray origin" });
        }
        if !direction.is_finite() {
            return Err(PhysicsError::NonFinite { what: "ray direction" });
        }
        let len = direction.length();
        if len <= f32::EPSILON {
            return Err(PhysicsError::DegenerateDirection);
        }
        Ok(Self {
            direction: direction / len,
            position: origin,
            block: BlockPos::containing(origin),
            distance: 0.0,
        })
    }

    pub fn from_rotation(origin: Vec3, yaw: f32, pitch: f32) -> Result<Self, PhysicsError> {
        if !(yaw.is_finite() && pitch.is_finite()) {
            return Err(PhysicsError::NonFinite { what: "ray rotation" });
        }
        Self::new(origin, direction_from_rotation(yaw, pitch))
    }

    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Block the ray point is currently in.
    #[inline]
    pub fn block(&self) -> BlockPos {
        self.block
    }

    /// Distance travelled so far.
    #[inline]
    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Crosses one block face.
    ///
    /// Works relative to the current block centre with every component
    /// reflected into the positive octant, so only the `+0.5` plane of each
    /// axis is tested. Axes are tried x, then y, then z; the first exit face
    /// found wins, which settles edge and corner crossings.
    pub fn step<Q: VoxelQuery + ?Sized>(&mut self, query: &Q) -> StepOutcome {
        let centre = self.block.center();
        let mut local = [
            self.position.x - centre.x,
            self.position.y - centre.y,
            self.position.z - centre.z,
        ];
        let mut dir = self.direction.to_array();
        let mut sign = [1i32; 3];
        for axis in 0..3 {
            if dir[axis] < 0.0 {
                sign[axis] = -1;
                dir[axis] = -dir[axis];
                local[axis] = -local[axis];
            }
        }

        for axis in 0..3 {
            if dir[axis] == 0.0 {
                continue;
            }
            let t = (0.5 - local[axis]) / dir[axis];
            let mut exit = [0.0f32; 3];
            for a in 0..3 {
                exit[a] = if a == axis { 0.5 } else { local[a] + dir[a] * t };
            }
            let inside = (0..3)
                .filter(|&a| a != axis)
                .all(|a| (-0.5 - FACE_EPSILON..=0.5 + FACE_EPSILON).contains(&exit[a]));
            if !inside {
                continue;
            }
            let distance = (0..3)
                .map(|a| (exit[a] - local[a]).powi(2))
                .sum::<f32>()
                .sqrt();
            let mut next = self.block;
            match axis {
                0 => next.x += sign[0],
                1 => next.y += sign[1],
                _ => next.z += sign[2],
            }
            return self.check(query, distance, next);
        }
        log::trace!("ray stalled in block {:?}", self.block);
        StepOutcome::Stalled
    }

    fn check<Q: VoxelQuery + ?Sized>(
        &mut self,
        query: &Q,
        distance: f32,
        next: BlockPos,
    ) -> StepOutcome {
        if query.block_id(next) != AIR {
            return StepOutcome::Hit(RayTarget {
                previous: self.block,
                block: next,
            });
        }
        self.position += self.direction * distance;
        self.block = next;
        self.distance += distance;
        StepOutcome::Advanced
    }

    /// Steps until a solid block is found or `max_distance` has been
    /// travelled. `None` is a miss.
    pub fn cast<Q: VoxelQuery + ?Sized>(
        &mut self,
        query: &Q,
        max_distance: f32,
    ) -> Option<RayTarget> {
        while self.distance < max_distance {
            match self.step(query) {
                StepOutcome::Hit(target) => return Some(target),
                StepOutcome::Advanced => {}
                StepOutcome::Stalled => return None,
            }
        }
        None
    }
}
