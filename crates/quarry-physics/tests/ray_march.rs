use quarry_blocks::BlockId;
use quarry_chunk::{Chunk, ChunkCoord, GridDims};
use quarry_geom::{BlockPos, Vec3};
use quarry_physics::{HIT_RANGE, RayHit, RayTarget, StepOutcome};

const STONE: BlockId = 1;

fn chunk_with(blocks: &[(usize, usize, usize)]) -> Chunk {
    let mut chunk = Chunk::new(ChunkCoord::new(0, 0, 0), GridDims::cubic(16));
    for &(x, y, z) in blocks {
        chunk.set_local(x, y, z, STONE);
    }
    chunk
}

#[test]
fn first_step_from_block_centre_is_half_a_block() {
    let chunk = chunk_with(&[]);
    let mut ray = RayHit::new(Vec3::new(0.5, 0.5, 0.5), Vec3::new(1.0, 0.0, 0.0)).unwrap();
    assert_eq!(ray.step(&chunk), StepOutcome::Advanced);
    assert_eq!(ray.block(), BlockPos::new(1, 0, 0));
    assert_eq!(ray.distance(), 0.5);
    assert_eq!(ray.position(), Vec3::new(1.0, 0.5, 0.5));
}

#[test]
fn hit_reports_previous_and_struck_block() {
    let chunk = chunk_with(&[(4, 2, 2)]);
    let mut ray = RayHit::new(Vec3::new(1.5, 2.5, 2.5), Vec3::new(1.0, 0.0, 0.0)).unwrap();
    assert_eq!(ray.step(&chunk), StepOutcome::Advanced);
    assert_eq!(ray.step(&chunk), StepOutcome::Advanced);
    let hit = ray.step(&chunk);
    assert_eq!(
        hit,
        StepOutcome::Hit(RayTarget {
            previous: BlockPos::new(3, 2, 2),
            block: BlockPos::new(4, 2, 2),
        })
    );
    // A hit leaves the ray where it was.
    assert_eq!(ray.block(), BlockPos::new(3, 2, 2));
    assert_eq!(ray.distance(), 1.5);
}

#[test]
fn cast_misses_beyond_range() {
    let chunk = chunk_with(&[(8, 2, 2)]);
    let mut ray = RayHit::new(Vec3::new(2.5, 2.5, 2.5), Vec3::new(1.0, 0.0, 0.0)).unwrap();
    assert_eq!(ray.cast(&chunk, HIT_RANGE), None);
    assert!(ray.distance() >= HIT_RANGE);
}

#[test]
fn downward_look_targets_floor_top() {
    let chunk = chunk_with(&[(5, 0, 5)]);
    let mut ray =
        RayHit::from_rotation(Vec3::new(5.5, 2.6, 5.5), 0.0, -std::f32::consts::FRAC_PI_2)
            .unwrap();
    let target = ray.cast(&chunk, HIT_RANGE).unwrap();
    assert_eq!(target.block, BlockPos::new(5, 0, 5));
    assert_eq!(target.previous, BlockPos::new(5, 1, 5));
}

#[test]
fn diagonal_ray_walks_face_adjacent_blocks() {
    let chunk = chunk_with(&[]);
    let mut ray = RayHit::new(Vec3::new(0.3, 0.6, 0.5), Vec3::new(1.0, 1.0, 0.0)).unwrap();
    let mut prev = ray.block();
    for _ in 0..8 {
        assert_eq!(ray.step(&chunk), StepOutcome::Advanced);
        let b = ray.block();
        let moved = (b.x - prev.x).abs() + (b.y - prev.y).abs() + (b.z - prev.z).abs();
        assert_eq!(moved, 1);
        prev = b;
    }
    assert!(ray.block().x >= 3 && ray.block().y >= 3);
}
