use std::time::Instant;

use quarry_blocks::{AIR, BlockId, BlockRegistry, BlockType, Face};
use quarry_chunk::{Chunk, GridDims, SubchunkCoord, SubchunkLayout, VoxelQuery};
use quarry_geom::BlockPos;

use crate::mesh_build::MeshBuild;

/// Face-culling test for a cube face of `ty` bordering a cell holding `neighbor`.
///
/// A face is drawn only when the neighbour is not opaque. Glass-like types
/// additionally hide faces shared with the same block id.
#[inline]
pub fn should_render_face(reg: &BlockRegistry, ty: &BlockType, neighbor: BlockId) -> bool {
    if reg.is_opaque(neighbor) {
        return false;
    }
    !(ty.is_glass() && neighbor == ty.id)
}

/// Emits the faces of the block at `pos` into `out`. Air and unknown ids
/// emit nothing; non-cube models emit every face.
#[inline]
pub fn mesh_cell<Q: VoxelQuery + ?Sized>(
    out: &mut MeshBuild,
    query: &Q,
    reg: &BlockRegistry,
    pos: BlockPos,
    id: BlockId,
) {
    if id == AIR {
        return;
    }
    let Some(ty) = reg.get(id) else {
        return;
    };
    let origin = pos.min_corner();
    if !ty.is_cube() {
        for face in ty.faces() {
            out.add_face(face, origin);
        }
        return;
    }
    for face in Face::ALL {
        let (dx, dy, dz) = face.delta();
        let neighbor = query.block_id(pos.offset(dx, dy, dz));
        if !should_render_face(reg, ty, neighbor) {
            continue;
        }
        if let Some(geom) = ty.face(face.index()) {
            out.add_face(geom, origin);
        }
    }
}

/// Meshes the box of cells starting at world position `min` with extent
/// `dims`, walking x outermost, then y, then z.
pub fn build_grid_mesh<Q: VoxelQuery + ?Sized>(
    out: &mut MeshBuild,
    query: &Q,
    reg: &BlockRegistry,
    min: BlockPos,
    dims: GridDims,
) {
    out.clear_keep_capacity();
    for x in 0..dims.sx as i32 {
        for y in 0..dims.sy as i32 {
            for z in 0..dims.sz as i32 {
                let pos = min.offset(x, y, z);
                mesh_cell(out, query, reg, pos, query.block_id(pos));
            }
        }
    }
}

/// Meshes one subchunk of `chunk`. Cells inside the chunk are read from it
/// directly; neighbours outside it go through `query`.
pub fn build_subchunk_mesh<Q: VoxelQuery + ?Sized>(
    chunk: &Chunk,
    layout: &SubchunkLayout,
    sc: SubchunkCoord,
    query: &Q,
    reg: &BlockRegistry,
) -> MeshBuild {
    let started = Instant::now();
    let view = ChunkFirst { chunk, rest: query };
    let (ox, oy, oz) = layout.local_origin(sc);
    let min = chunk.origin().offset(ox as i32, oy as i32, oz as i32);
    let mut out = MeshBuild::default();
    build_grid_mesh(&mut out, &view, reg, min, layout.sub);
    log::trace!(
        target: "perf",
        "ms={} mesher_subchunk chunk=({}, {}, {}) sub=({}, {}, {}) faces={}",
        started.elapsed().as_millis(),
        chunk.coord.cx,
        chunk.coord.cy,
        chunk.coord.cz,
        sc.x,
        sc.y,
        sc.z,
        out.face_count()
    );
    out
}

// Resolves positions inside `chunk` without going through the outer query.
struct ChunkFirst<'a, Q: ?Sized> {
    chunk: &'a Chunk,
    rest: &'a Q,
}

impl<Q: VoxelQuery + ?Sized> VoxelQuery for ChunkFirst<'_, Q> {
    #[inline]
    fn block_id(&self, pos: BlockPos) -> BlockId {
        match self.chunk.get_world(pos) {
            Some(id) => id,
            None => self.rest.block_id(pos),
        }
    }
}
