use quarry_blocks::{BlockId, BlockRegistry, FaceSelector, ModelName};
use quarry_chunk::{Chunk, ChunkCoord, GridDims, SubchunkLayout, VoxelQuery};
use quarry_geom::BlockPos;
use quarry_mesh_cpu::{ChunkMesh, MeshBuild, build_grid_mesh};

const STONE: BlockId = 1;
const GLASS: BlockId = 2;
const TINTED: BlockId = 3;
const FLOWER: BlockId = 4;
const LEAVES: BlockId = 5;

fn registry() -> BlockRegistry {
    let mut reg = BlockRegistry::new();
    reg.insert(STONE, "stone", ModelName::Cube, &[(FaceSelector::All, "stone")])
        .unwrap();
    reg.insert(GLASS, "glass", ModelName::Glass, &[(FaceSelector::All, "glass")])
        .unwrap();
    reg.insert(TINTED, "tinted_glass", ModelName::Glass, &[(FaceSelector::All, "tinted")])
        .unwrap();
    reg.insert(FLOWER, "rose", ModelName::Plant, &[(FaceSelector::All, "rose")])
        .unwrap();
    reg.insert(LEAVES, "leaves", ModelName::Leaves, &[(FaceSelector::All, "leaves")])
        .unwrap();
    reg
}

/// Chunk surrounded by an endless wall of one block id.
struct Surrounded<'a> {
    chunk: &'a Chunk,
    outside: BlockId,
}

impl VoxelQuery for Surrounded<'_> {
    fn block_id(&self, pos: BlockPos) -> BlockId {
        self.chunk.get_world(pos).unwrap_or(self.outside)
    }
}

fn chunk16() -> Chunk {
    Chunk::new(ChunkCoord::new(0, 0, 0), GridDims::cubic(16))
}

fn layout16() -> SubchunkLayout {
    SubchunkLayout::new(GridDims::cubic(16), GridDims::cubic(4)).unwrap()
}

/// Axis and coordinate of the plane a quad lies on.
fn plane_of(mesh: &MeshBuild, i: usize) -> Option<(usize, f32)> {
    let q = mesh.quad_positions(i);
    (0..3).find_map(|axis| {
        let v = q[axis];
        (0..4).all(|k| q[k * 3 + axis] == v).then_some((axis, v))
    })
}

#[test]
fn isolated_block_has_six_faces() {
    let reg = registry();
    let mut chunk = chunk16();
    chunk.set_local(5, 5, 5, STONE);
    let mesh = ChunkMesh::build(&chunk, layout16(), &chunk, &reg);
    let m = mesh.mesh();
    assert_eq!(m.face_count(), 6);
    assert_eq!(m.vertex_count(), 24);
    assert_eq!(m.index_count(), 36);
    assert_eq!(m.shading.len(), 24);
    assert!(m.indices.iter().all(|&i| i < 24));
}

#[test]
fn solid_chunk_inside_solid_world_has_no_faces() {
    let reg = registry();
    let dims = GridDims::cubic(16);
    let chunk = Chunk::from_blocks(ChunkCoord::new(0, 0, 0), dims, vec![STONE; dims.volume()]).unwrap();
    let query = Surrounded {
        chunk: &chunk,
        outside: STONE,
    };
    let mesh = ChunkMesh::build(&chunk, layout16(), &query, &reg);
    assert!(mesh.mesh().is_empty());
    assert_eq!(mesh.mesh().index_count(), 0);
}

#[test]
fn half_filled_chunk_shows_single_top_layer() {
    let reg = registry();
    let mut chunk = chunk16();
    for x in 0..16 {
        for z in 0..16 {
            for y in 0..8 {
                chunk.set_local(x, y, z, STONE);
            }
        }
    }
    // Stone all around and below, open sky above y = 8.
    struct StoneBelow<'a>(&'a Chunk);
    impl VoxelQuery for StoneBelow<'_> {
        fn block_id(&self, pos: BlockPos) -> BlockId {
            match self.0.get_world(pos) {
                Some(id) => id,
                None if pos.y < 8 => STONE,
                None => 0,
            }
        }
    }
    let mesh = ChunkMesh::build(&chunk, layout16(), &StoneBelow(&chunk), &reg);
    let m = mesh.mesh();
    assert_eq!(m.face_count(), 256);
    for i in 0..m.face_count() {
        assert_eq!(plane_of(m, i), Some((1, 8.0)));
    }

    // With air outside, every face still lies on the stone region's boundary.
    let open = ChunkMesh::build(&chunk, layout16(), &chunk, &reg);
    let m = open.mesh();
    assert_eq!(m.face_count(), 256 + 256 + 4 * 16 * 8);
    for i in 0..m.face_count() {
        let (axis, v) = plane_of(m, i).unwrap();
        match axis {
            1 => assert!(v == 0.0 || v == 8.0),
            _ => assert!(v == 0.0 || v == 16.0),
        }
    }
}

#[test]
fn same_glass_hides_shared_face() {
    let reg = registry();
    let mut chunk = chunk16();
    chunk.set_local(3, 3, 3, GLASS);
    chunk.set_local(4, 3, 3, GLASS);
    let mesh = ChunkMesh::build(&chunk, layout16(), &chunk, &reg);
    assert_eq!(mesh.mesh().face_count(), 10);
    for i in 0..10 {
        assert_ne!(plane_of(mesh.mesh(), i), Some((0, 4.0)));
    }
}

#[test]
fn different_glass_ids_keep_both_faces() {
    let reg = registry();
    let mut chunk = chunk16();
    chunk.set_local(3, 3, 3, GLASS);
    chunk.set_local(4, 3, 3, TINTED);
    let mesh = ChunkMesh::build(&chunk, layout16(), &chunk, &reg);
    assert_eq!(mesh.mesh().face_count(), 12);
}

#[test]
fn glass_next_to_opaque_follows_opacity() {
    let reg = registry();
    let mut chunk = chunk16();
    chunk.set_local(3, 3, 3, GLASS);
    chunk.set_local(4, 3, 3, STONE);
    let mesh = ChunkMesh::build(&chunk, layout16(), &chunk, &reg);
    let m = mesh.mesh();
    // Glass hides its face against stone; stone shows its face against glass.
    assert_eq!(m.face_count(), 11);
    let shared: Vec<_> = (0..m.face_count())
        .filter(|&i| plane_of(m, i) == Some((0, 4.0)))
        .collect();
    assert_eq!(shared.len(), 1);
    // Stone's -x face has shading 0.6 and sits on x = 4.
    assert_eq!(m.shading[shared[0] * 4], 0.6);
}

#[test]
fn transparent_cubes_render_against_each_other() {
    let reg = registry();
    let mut chunk = chunk16();
    chunk.set_local(3, 3, 3, LEAVES);
    chunk.set_local(3, 4, 3, LEAVES);
    let mesh = ChunkMesh::build(&chunk, layout16(), &chunk, &reg);
    assert_eq!(mesh.mesh().face_count(), 12);
}

#[test]
fn non_cube_models_emit_all_faces() {
    let reg = registry();
    let dims = GridDims::cubic(3);
    let mut chunk =
        Chunk::from_blocks(ChunkCoord::new(0, 0, 0), dims, vec![STONE; dims.volume()]).unwrap();
    chunk.set_local(1, 1, 1, FLOWER);
    let query = Surrounded {
        chunk: &chunk,
        outside: STONE,
    };
    let mut out = MeshBuild::default();
    build_grid_mesh(&mut out, &query, &reg, BlockPos::new(0, 0, 0), dims);
    // Four plant quads plus the six stone faces looking into the plant cell.
    assert_eq!(out.face_count(), 4 + 6);
}

#[test]
fn chunk_mesh_translates_to_world_space() {
    let reg = registry();
    let dims = GridDims::cubic(16);
    let mut chunk = Chunk::new(ChunkCoord::new(-1, 0, 2), dims);
    chunk.set_local(15, 0, 0, STONE);
    let mesh = ChunkMesh::build(&chunk, layout16(), &chunk, &reg);
    let m = mesh.mesh();
    let xs: Vec<f32> = m.positions.chunks(3).map(|v| v[0]).collect();
    let zs: Vec<f32> = m.positions.chunks(3).map(|v| v[2]).collect();
    assert!(xs.iter().all(|&x| x == -1.0 || x == 0.0));
    assert!(zs.iter().all(|&z| z == 32.0 || z == 33.0));
}
