use std::f32::consts::FRAC_PI_2;

use quarry_blocks::BlockRegistry;
use quarry_chunk::VoxelQuery;
use quarry_geom::Vec3;

use crate::entity::Entity;
use crate::error::PhysicsError;
use crate::hit::{HIT_RANGE, RayHit, RayTarget};

pub const WALKING_SPEED: f32 = 4.317;
pub const SPRINTING_SPEED: f32 = 7.0;

/// Discrete controls delivered between ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Jump,
    ToggleFly,
    Sprint(bool),
}

/// Entity driven by a movement intent and a view rotation.
#[derive(Clone, Debug)]
pub struct Player {
    pub entity: Entity,
    /// Radians around +y, measured from +x towards +z.
    pub yaw: f32,
    pub pitch: f32,
    /// `(strafe, vertical, forward)`, each component usually in `[-1, 1]`.
    pub intent: Vec3,
    target_speed: f32,
    speed: f32,
}

impl Player {
    pub fn new(pos: Vec3) -> Result<Self, PhysicsError> {
        Ok(Self {
            entity: Entity::new(pos)?,
            yaw: -FRAC_PI_2,
            pitch: 0.0,
            intent: Vec3::ZERO,
            target_speed: WALKING_SPEED,
            speed: WALKING_SPEED,
        })
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn eye_position(&self) -> Vec3 {
        self.entity.pos + Vec3::new(0.0, self.entity.height() - 0.2, 0.0)
    }

    pub fn handle(&mut self, event: InputEvent) {
        match event {
            InputEvent::Jump => self.entity.jump(),
            InputEvent::ToggleFly => {
                self.entity.flying = !self.entity.flying;
                log::debug!("flying={}", self.entity.flying);
            }
            InputEvent::Sprint(on) => {
                self.target_speed = if on { SPRINTING_SPEED } else { WALKING_SPEED };
            }
        }
    }

    /// Turns the intent into acceleration and advances the entity.
    pub fn update<Q: VoxelQuery + ?Sized>(&mut self, dt: f32, query: &Q, reg: &BlockRegistry) {
        if dt * 20.0 > 1.0 {
            self.speed = self.target_speed;
        } else {
            self.speed += (self.target_speed - self.speed) * dt * 20.0;
        }
        let multiplier = self.speed * if self.entity.flying { 2.0 } else { 1.0 };

        if self.entity.flying && self.intent.y != 0.0 {
            self.entity.accel.y = self.intent.y * multiplier;
        }
        if self.intent.x != 0.0 || self.intent.z != 0.0 {
            let angle = self.yaw - self.intent.z.atan2(self.intent.x) + FRAC_PI_2;
            self.entity.accel.x = angle.cos() * multiplier;
            self.entity.accel.z = angle.sin() * multiplier;
        }
        if !self.entity.flying && self.intent.y > 0.0 {
            self.entity.jump();
        }

        self.entity.update(dt, query, reg);
    }

    /// Ray from the eyes along the view direction.
    pub fn look_ray(&self) -> Result<RayHit, PhysicsError> {
        RayHit::from_rotation(self.eye_position(), self.yaw, self.pitch)
    }

    /// Block under the crosshair within `HIT_RANGE`.
    pub fn target<Q: VoxelQuery + ?Sized>(&self, query: &Q) -> Option<RayTarget> {
        let mut ray = self.look_ray().ok()?;
        ray.cast(query, HIT_RANGE)
    }
}
