use quarry_blocks::{AIR, BlockRegistry};
use quarry_chunk::VoxelQuery;
use quarry_geom::{Aabb, BlockPos, SweepHit, Vec3};

use crate::error::PhysicsError;

pub const GRAVITY: f32 = -32.0;

// Coefficients per tick rate of 20 Hz, scaled to seconds.
pub const FRICTION: Vec3 = Vec3::splat(20.0);
pub const DRAG_FLY: Vec3 = Vec3::splat(5.0);
pub const DRAG_JUMP: Vec3 = Vec3::new(1.8, 0.0, 1.8);
pub const DRAG_FALL: Vec3 = Vec3::new(1.8, 0.4, 1.8);

pub const JUMP_HEIGHT: f32 = 1.25;
pub const ENTITY_WIDTH: f32 = 0.6;
pub const ENTITY_HEIGHT: f32 = 1.8;

const MAX_PASSES: usize = 3;
// Pulled off every entry time so the box stops just short of the surface.
const CONTACT_EPSILON: f32 = 0.001;

/// A box-shaped body moved by acceleration, gravity and drag, colliding
/// with block collider boxes.
///
/// `pos` is the centre of the bottom face. View rotation belongs to the
/// controller driving the entity (see `Player`).
#[derive(Clone, Debug)]
pub struct Entity {
    pub pos: Vec3,
    pub vel: Vec3,
    /// Input acceleration for the next `update`; cleared after use.
    pub accel: Vec3,
    pub grounded: bool,
    pub flying: bool,
    pub jump_height: f32,
    width: f32,
    height: f32,
    collider: Aabb,
}

impl Entity {
    pub fn new(pos: Vec3) -> Result<Self, PhysicsError> {
        Self::with_size(pos, ENTITY_WIDTH, ENTITY_HEIGHT)
    }

    pub fn with_size(pos: Vec3, width: f32, height: f32) -> Result<Self, PhysicsError> {
        if !pos.is_finite() {
            return Err(PhysicsError::NonFinite { what: "position" });
        }
        if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
            return Err(PhysicsError::NonPositiveExtent { width, height });
        }
        let mut e = Self {
            pos,
            vel: Vec3::ZERO,
            accel: Vec3::ZERO,
            grounded: false,
            flying: false,
            jump_height: JUMP_HEIGHT,
            width,
            height,
            collider: Aabb::default(),
        };
        e.update_collider();
        Ok(e)
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Collision box at the current position.
    #[inline]
    pub fn collider(&self) -> &Aabb {
        &self.collider
    }

    fn update_collider(&mut self) {
        let half = self.width / 2.0;
        self.collider = Aabb::new(
            Vec3::new(self.pos.x - half, self.pos.y, self.pos.z - half),
            Vec3::new(self.pos.x + half, self.pos.y + self.height, self.pos.z + half),
        );
    }

    /// Moves the entity and drops its velocity.
    pub fn teleport(&mut self, pos: Vec3) -> Result<(), PhysicsError> {
        if !pos.is_finite() {
            return Err(PhysicsError::NonFinite { what: "position" });
        }
        self.pos = pos;
        self.vel = Vec3::ZERO;
        self.update_collider();
        Ok(())
    }

    /// Starts a jump reaching `jump_height`. Ignored unless grounded.
    pub fn jump(&mut self) {
        self.jump_to(self.jump_height);
    }

    pub fn jump_to(&mut self, height: f32) {
        if !self.grounded {
            return;
        }
        self.vel.y = (-2.0 * GRAVITY * height).sqrt();
    }

    /// Drag coefficients for the current movement state.
    pub fn friction(&self) -> Vec3 {
        if self.flying {
            DRAG_FLY
        } else if self.grounded {
            FRICTION
        } else if self.vel.y > 0.0 {
            DRAG_JUMP
        } else {
            DRAG_FALL
        }
    }

    /// Advances the entity by `dt` seconds.
    ///
    /// Collisions are resolved in up to three passes, each stopping the
    /// box at the earliest contact among every block collider near its
    /// swept path and zeroing velocity on the struck axes.
    pub fn update<Q: VoxelQuery + ?Sized>(&mut self, dt: f32, query: &Q, reg: &BlockRegistry) {
        if !(dt.is_finite() && dt > 0.0) {
            log::warn!("entity update skipped: bad time step {dt}");
            return;
        }

        self.vel += self.accel.mul_elem(self.friction()) * dt;
        self.accel = Vec3::ZERO;

        self.update_collider();
        self.grounded = false;

        for _ in 0..MAX_PASSES {
            let delta = self.vel * dt;
            let Some(hit) = self.earliest_contact(delta, query, reg) else {
                break;
            };
            let t = hit.entry_time - CONTACT_EPSILON;
            for axis in 0..3 {
                if hit.normal[axis] != 0 {
                    *self.vel.axis_mut(axis) = 0.0;
                    *self.pos.axis_mut(axis) += delta.axis(axis) * t;
                }
            }
            if hit.normal[1] == 1 {
                self.grounded = true;
            }
            self.update_collider();
        }

        self.pos += self.vel * dt;

        if !self.flying {
            self.vel.y += GRAVITY * dt;
        }

        let f = self.friction();
        for axis in 0..3 {
            let v = self.vel.axis(axis);
            let decel = (v.abs() * f.axis(axis) * dt).min(v.abs());
            *self.vel.axis_mut(axis) = v - v.signum() * decel;
        }

        self.update_collider();
    }

    fn earliest_contact<Q: VoxelQuery + ?Sized>(
        &self,
        delta: Vec3,
        query: &Q,
        reg: &BlockRegistry,
    ) -> Option<SweepHit> {
        let bounds = self.collider.swept_bounds(delta);
        let lo = BlockPos::containing(bounds.min);
        let hi = BlockPos::containing(bounds.max);
        let mut best: Option<SweepHit> = None;
        for x in lo.x..=hi.x {
            for y in lo.y..=hi.y {
                for z in lo.z..=hi.z {
                    let pos = BlockPos::new(x, y, z);
                    let id = query.block_id(pos);
                    if id == AIR {
                        continue;
                    }
                    let Some(ty) = reg.get(id) else {
                        continue;
                    };
                    let origin = pos.min_corner();
                    for c in ty.colliders() {
                        let Some(hit) = self.collider.sweep(&c.translated(origin), delta) else {
                            continue;
                        };
                        if best.is_none_or(|b| hit.entry_time < b.entry_time) {
                            best = Some(hit);
                        }
                    }
                }
            }
        }
        best
    }
}
