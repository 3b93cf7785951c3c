//! Entity movement against the voxel grid and block picking rays.
#![forbid(unsafe_code)]

mod entity;
mod error;
mod hit;
mod player;

pub use entity::{
    DRAG_FALL, DRAG_FLY, DRAG_JUMP, ENTITY_HEIGHT, ENTITY_WIDTH, Entity, FRICTION, GRAVITY,
    JUMP_HEIGHT,
};
pub use error::PhysicsError;
pub use hit::{HIT_RANGE, RayHit, RayTarget, StepOutcome, direction_from_rotation};
pub use player::{InputEvent, Player, SPRINTING_SPEED, WALKING_SPEED};
