use quarry_blocks::{BlockId, BlockRegistry, FaceSelector, ModelName};
use quarry_chunk::{Chunk, ChunkCoord, GridDims};
use quarry_geom::Vec3;
use quarry_physics::{Entity, InputEvent, PhysicsError, Player};

const STONE: BlockId = 1;
const ROSE: BlockId = 2;
const SLAB: BlockId = 3;
const DT: f32 = 1.0 / 60.0;

fn registry() -> BlockRegistry {
    let mut reg = BlockRegistry::new();
    reg.insert(STONE, "stone", ModelName::Cube, &[(FaceSelector::All, "stone")]).unwrap();
    reg.insert(ROSE, "rose", ModelName::Plant, &[(FaceSelector::All, "rose")]).unwrap();
    reg.insert(SLAB, "slab", ModelName::Slab, &[(FaceSelector::All, "stone")]).unwrap();
    reg
}

/// 16^3 chunk with a stone floor filling y = 0.
fn floor_chunk() -> Chunk {
    let mut chunk = Chunk::new(ChunkCoord::new(0, 0, 0), GridDims::cubic(16));
    for x in 0..16 {
        for z in 0..16 {
            chunk.set_local(x, 0, z, STONE);
        }
    }
    chunk
}

#[test]
fn falls_onto_floor_and_rests() {
    let reg = registry();
    let chunk = floor_chunk();
    let mut e = Entity::new(Vec3::new(8.5, 6.0, 8.5)).unwrap();
    for _ in 0..240 {
        e.update(DT, &chunk, &reg);
        assert!(e.pos.y > 1.0 - 1e-3, "sank into the floor: {}", e.pos.y);
    }
    assert!(e.grounded);
    assert!((e.pos.y - 1.0).abs() < 1e-2);
    assert!(e.vel.y <= 0.0);
    assert!(e.collider().min.y >= 1.0 - 1e-3);
}

#[test]
fn plants_do_not_block_movement() {
    let reg = registry();
    let mut chunk = floor_chunk();
    chunk.set_local(8, 1, 8, ROSE);
    let mut e = Entity::new(Vec3::new(8.5, 3.0, 8.5)).unwrap();
    for _ in 0..120 {
        e.update(DT, &chunk, &reg);
    }
    assert!((e.pos.y - 1.0).abs() < 1e-2);
}

#[test]
fn lands_on_slab_top() {
    let reg = registry();
    let mut chunk = floor_chunk();
    chunk.set_local(8, 1, 8, SLAB);
    let mut e = Entity::new(Vec3::new(8.5, 4.0, 8.5)).unwrap();
    for _ in 0..120 {
        e.update(DT, &chunk, &reg);
    }
    assert!(e.grounded);
    assert!((e.pos.y - 1.5).abs() < 1e-2);
}

#[test]
fn wall_stops_horizontal_motion() {
    let reg = registry();
    let mut chunk = floor_chunk();
    for z in 0..16 {
        chunk.set_local(6, 1, z, STONE);
        chunk.set_local(6, 2, z, STONE);
    }
    let mut e = Entity::new(Vec3::new(3.5, 1.0, 8.5)).unwrap();
    for _ in 0..120 {
        e.accel = Vec3::new(4.317, 0.0, 0.0);
        e.update(DT, &chunk, &reg);
        assert!(e.collider().max.x <= 6.0 + 1e-4);
    }
    assert!(e.pos.x > 5.6);
    assert!(e.grounded);
}

#[test]
fn jump_reaches_configured_height() {
    let reg = registry();
    let chunk = floor_chunk();
    let mut e = Entity::new(Vec3::new(8.5, 1.0, 8.5)).unwrap();
    for _ in 0..10 {
        e.update(DT, &chunk, &reg);
    }
    assert!(e.grounded);
    e.jump();
    let mut peak = e.pos.y;
    for _ in 0..60 {
        e.update(DT, &chunk, &reg);
        peak = peak.max(e.pos.y);
    }
    let rise = peak - 1.0;
    assert!(rise > 1.1 && rise < 1.5, "rise {rise}");
}

#[test]
fn jump_is_ignored_mid_air() {
    let mut e = Entity::new(Vec3::new(0.0, 50.0, 0.0)).unwrap();
    e.jump();
    assert_eq!(e.vel.y, 0.0);
}

#[test]
fn flying_ignores_gravity() {
    let reg = registry();
    let chunk = floor_chunk();
    let mut e = Entity::new(Vec3::new(8.5, 10.0, 8.5)).unwrap();
    e.flying = true;
    for _ in 0..60 {
        e.update(DT, &chunk, &reg);
    }
    assert_eq!(e.pos.y, 10.0);
}

#[test]
fn drag_never_reverses_velocity() {
    let reg = registry();
    let chunk = Chunk::new(ChunkCoord::new(0, 0, 0), GridDims::cubic(16));
    let mut e = Entity::new(Vec3::new(8.0, 8.0, 8.0)).unwrap();
    e.flying = true;
    e.vel = Vec3::new(3.0, -2.0, 1.0);
    e.update(1.0, &chunk, &reg);
    assert_eq!(e.vel, Vec3::ZERO);
}

#[test]
fn teleport_resets_velocity() {
    let mut e = Entity::new(Vec3::ZERO).unwrap();
    e.vel = Vec3::new(1.0, 2.0, 3.0);
    e.teleport(Vec3::new(4.0, 5.0, 6.0)).unwrap();
    assert_eq!(e.vel, Vec3::ZERO);
    let c = e.collider();
    assert!((c.min.x - 3.7).abs() < 1e-5 && (c.max.z - 6.3).abs() < 1e-5);
    assert_eq!(c.min.y, 5.0);
    assert!((c.max.y - 6.8).abs() < 1e-5);
    assert!(e.teleport(Vec3::new(f32::NAN, 0.0, 0.0)).is_err());
}

#[test]
fn construction_rejects_bad_state() {
    assert_eq!(
        Entity::new(Vec3::new(0.0, f32::INFINITY, 0.0)).unwrap_err(),
        PhysicsError::NonFinite { what: "position" }
    );
    assert!(matches!(
        Entity::with_size(Vec3::ZERO, 0.0, 1.8),
        Err(PhysicsError::NonPositiveExtent { .. })
    ));
    assert!(Entity::with_size(Vec3::ZERO, 0.6, -1.0).is_err());
}

#[test]
fn player_walks_along_look_direction() {
    let reg = registry();
    let chunk = floor_chunk();
    let mut p = Player::new(Vec3::new(2.5, 1.0, 8.5)).unwrap();
    p.yaw = 0.0;
    p.intent = Vec3::new(0.0, 0.0, 1.0);
    for _ in 0..30 {
        p.update(DT, &chunk, &reg);
    }
    assert!(p.entity.pos.x > 3.5);
    assert!((p.entity.pos.z - 8.5).abs() < 1e-3);
}

#[test]
fn player_sprint_and_fly_toggle() {
    let reg = registry();
    let chunk = floor_chunk();
    let mut p = Player::new(Vec3::new(8.5, 1.0, 8.5)).unwrap();
    p.handle(InputEvent::Sprint(true));
    p.update(1.0, &chunk, &reg);
    assert_eq!(p.speed(), quarry_physics::SPRINTING_SPEED);

    p.handle(InputEvent::ToggleFly);
    assert!(p.entity.flying);
    p.intent = Vec3::new(0.0, 1.0, 0.0);
    let start = p.entity.pos.y;
    for _ in 0..10 {
        p.update(DT, &chunk, &reg);
    }
    assert!(p.entity.pos.y > start);
}
