use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use quarry_blocks::{AIR, BlockId, BlockRegistry};
use quarry_chunk::{
    Chunk, ChunkCoord, GridDims, SubchunkCoord, SubchunkLayout, VoxelQuery, chunk_coord_of,
    local_coord_of,
};
use quarry_geom::{Aabb, BlockPos};
use quarry_mesh_cpu::{ChunkMesh, MeshBuild};

use crate::error::WorldError;
use crate::worldgen::WorldConfig;

/// Axis neighbours of a cell.
const NEIGHBORS: [(i32, i32, i32); 6] = [
    (1, 0, 0),
    (-1, 0, 0),
    (0, 1, 0),
    (0, -1, 0),
    (0, 0, 1),
    (0, 0, -1),
];

/// Chunk map view used as the mesher's occlusion oracle.
struct ChunkLookup<'a> {
    chunks: &'a HashMap<ChunkCoord, Chunk>,
    dims: GridDims,
}

impl VoxelQuery for ChunkLookup<'_> {
    #[inline]
    fn block_id(&self, pos: BlockPos) -> BlockId {
        let coord = chunk_coord_of(pos, self.dims);
        match self.chunks.get(&coord) {
            Some(chunk) => {
                let (lx, ly, lz) = local_coord_of(pos, self.dims);
                chunk.get_local(lx, ly, lz)
            }
            None => AIR,
        }
    }
}

/// Sparse map of chunks plus their meshes.
///
/// Chunks stay loaded until `remove_chunk` is called; nothing is evicted
/// automatically. Absent chunks read as air everywhere.
pub struct World {
    registry: Arc<BlockRegistry>,
    layout: SubchunkLayout,
    chunks: HashMap<ChunkCoord, Chunk>,
    meshes: HashMap<ChunkCoord, ChunkMesh>,
    // Chunks whose mesh must be rebuilt from scratch.
    stale: HashSet<ChunkCoord>,
    mesh_updates: Vec<ChunkCoord>,
}

impl World {
    pub fn new(registry: Arc<BlockRegistry>, cfg: &WorldConfig) -> Result<Self, WorldError> {
        let chunk = GridDims::new(cfg.chunk_size.sx, cfg.chunk_size.sy, cfg.chunk_size.sz)?;
        let layout = SubchunkLayout::new(chunk, cfg.subchunk_size)?;
        log::info!(
            "world: chunk {}x{}x{}, subchunk {}x{}x{}",
            chunk.sx,
            chunk.sy,
            chunk.sz,
            layout.sub.sx,
            layout.sub.sy,
            layout.sub.sz
        );
        Ok(Self {
            registry,
            layout,
            chunks: HashMap::new(),
            meshes: HashMap::new(),
            stale: HashSet::new(),
            mesh_updates: Vec::new(),
        })
    }

    #[inline]
    pub fn registry(&self) -> &Arc<BlockRegistry> {
        &self.registry
    }

    #[inline]
    pub fn dims(&self) -> GridDims {
        self.layout.chunk
    }

    #[inline]
    pub fn layout(&self) -> &SubchunkLayout {
        &self.layout
    }

    fn lookup(&self) -> ChunkLookup<'_> {
        ChunkLookup {
            chunks: &self.chunks,
            dims: self.dims(),
        }
    }

    /// Block id at `pos`; air when the owning chunk is not loaded.
    #[inline]
    pub fn block_id(&self, pos: BlockPos) -> BlockId {
        self.lookup().block_id(pos)
    }

    /// False for air, transparent models and unloaded chunks.
    #[inline]
    pub fn is_opaque(&self, pos: BlockPos) -> bool {
        self.registry.is_opaque(self.block_id(pos))
    }

    #[inline]
    pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    pub fn chunk_coords(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.chunks.keys().copied()
    }

    #[inline]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Current revision of a loaded chunk. Bumped whenever an edit or a
    /// neighbour change alters what its mesh should contain.
    #[inline]
    pub fn chunk_rev(&self, coord: ChunkCoord) -> Option<u64> {
        self.chunks.get(&coord).map(Chunk::rev)
    }

    #[inline]
    pub fn mesh(&self, coord: ChunkCoord) -> Option<&ChunkMesh> {
        self.meshes.get(&coord)
    }

    /// Adds or replaces a chunk. Its mesh, and the meshes of loaded
    /// neighbours, are rebuilt by the next `rebuild_stale_meshes`.
    pub fn insert_chunk(&mut self, mut chunk: Chunk) -> Result<(), WorldError> {
        let coord = chunk.coord;
        if chunk.dims != self.dims() {
            return Err(WorldError::DimsMismatch {
                coord,
                expected: self.dims(),
                actual: chunk.dims,
            });
        }
        if let Some(&id) = chunk.blocks().iter().find(|&&id| !self.registry.contains(id)) {
            return Err(WorldError::UnknownBlockInChunk { coord, id });
        }
        if let Some(old) = self.chunks.get(&coord) {
            chunk.set_rev(old.rev().max(chunk.rev()) + 1);
        }
        self.chunks.insert(coord, chunk);
        self.stale.insert(coord);
        self.mark_neighbors_stale(coord);
        Ok(())
    }

    /// Drops a chunk and its mesh; loaded neighbours get rebuilt.
    pub fn remove_chunk(&mut self, coord: ChunkCoord) -> Option<Chunk> {
        let chunk = self.chunks.remove(&coord)?;
        self.meshes.remove(&coord);
        self.stale.remove(&coord);
        self.mark_neighbors_stale(coord);
        log::debug!("removed chunk ({}, {}, {})", coord.cx, coord.cy, coord.cz);
        Some(chunk)
    }

    fn mark_neighbors_stale(&mut self, coord: ChunkCoord) {
        for (dx, dy, dz) in NEIGHBORS {
            let n = coord.offset(dx, dy, dz);
            if let Some(chunk) = self.chunks.get_mut(&n) {
                chunk.bump_rev();
                self.stale.insert(n);
            }
        }
    }

    /// Writes a block and remeshes what it affects.
    ///
    /// Returns `Ok(false)` when nothing changed: the cell already held `id`,
    /// or `id` is air and the chunk is not loaded (no chunk is allocated for
    /// a removal). Otherwise the owning chunk is created if needed, marked
    /// modified, and every subchunk holding the cell or one of its six
    /// neighbours is remeshed, including those in adjacent chunks.
    pub fn set_block(&mut self, pos: BlockPos, id: BlockId) -> Result<bool, WorldError> {
        if !self.registry.contains(id) {
            return Err(WorldError::UnknownBlock { id, pos });
        }
        let dims = self.dims();
        let coord = chunk_coord_of(pos, dims);
        if id == AIR && !self.chunks.contains_key(&coord) {
            return Ok(false);
        }
        let chunk = self.chunks.entry(coord).or_insert_with(|| {
            log::debug!("new chunk ({}, {}, {})", coord.cx, coord.cy, coord.cz);
            Chunk::new(coord, dims)
        });
        let (lx, ly, lz) = local_coord_of(pos, dims);
        if chunk.get_local(lx, ly, lz) == id {
            return Ok(false);
        }
        chunk.set_local(lx, ly, lz, id);
        chunk.mark_modified();

        let mut targets: Vec<(ChunkCoord, SubchunkCoord)> = Vec::with_capacity(7);
        for p in std::iter::once(pos).chain(NEIGHBORS.iter().map(|&(dx, dy, dz)| pos.offset(dx, dy, dz))) {
            let c = chunk_coord_of(p, dims);
            if !self.chunks.contains_key(&c) {
                continue;
            }
            let (x, y, z) = local_coord_of(p, dims);
            let sc = self.layout.subchunk_of(x, y, z);
            if !targets.contains(&(c, sc)) {
                targets.push((c, sc));
            }
        }
        let mut touched: Vec<ChunkCoord> = Vec::new();
        for &(c, _) in &targets {
            if !touched.contains(&c) {
                touched.push(c);
            }
        }
        for c in touched {
            if let Some(chunk) = self.chunks.get_mut(&c) {
                chunk.bump_rev();
            }
            let subs: Vec<SubchunkCoord> = targets
                .iter()
                .filter(|(tc, _)| *tc == c)
                .map(|&(_, sc)| sc)
                .collect();
            self.remesh_subchunks(c, &subs);
        }
        Ok(true)
    }

    /// Like `set_block`, but refuses to place a block whose collision boxes
    /// overlap `occupant` (typically an entity collider). Removal is never
    /// refused. Returns whether the world changed.
    pub fn try_set_block(
        &mut self,
        pos: BlockPos,
        id: BlockId,
        occupant: &Aabb,
    ) -> Result<bool, WorldError> {
        if id != AIR {
            let ty = self
                .registry
                .get(id)
                .ok_or(WorldError::UnknownBlock { id, pos })?;
            let origin = pos.min_corner();
            if ty
                .colliders()
                .iter()
                .any(|c| c.translated(origin).intersects(occupant))
            {
                log::debug!("placement of {} at {:?} blocked by occupant", ty.name, pos);
                return Ok(false);
            }
        }
        self.set_block(pos, id)
    }

    fn remesh_subchunks(&mut self, coord: ChunkCoord, subs: &[SubchunkCoord]) {
        let lookup = ChunkLookup {
            chunks: &self.chunks,
            dims: self.layout.chunk,
        };
        let Some(chunk) = self.chunks.get(&coord) else {
            return;
        };
        match self.meshes.get_mut(&coord) {
            Some(mesh) if !self.stale.contains(&coord) => {
                for &sc in subs {
                    mesh.rebuild_subchunk(sc, chunk, &lookup, &self.registry);
                }
                mesh.recombine();
            }
            _ => {
                let mesh = ChunkMesh::build(chunk, self.layout, &lookup, &self.registry);
                self.meshes.insert(coord, mesh);
                self.stale.remove(&coord);
            }
        }
        push_unique(&mut self.mesh_updates, coord);
    }

    /// Fully rebuilds every chunk mesh that was invalidated by chunk
    /// insertion or removal. Returns the number of meshes rebuilt.
    pub fn rebuild_stale_meshes(&mut self) -> usize {
        let mut coords: Vec<ChunkCoord> = self.stale.drain().collect();
        coords.sort();
        for &coord in &coords {
            self.build_mesh(coord);
        }
        coords.len()
    }

    /// Rebuilds every loaded chunk's mesh from scratch.
    pub fn rebuild_all_meshes(&mut self) -> usize {
        self.stale.extend(self.chunks.keys().copied());
        self.rebuild_stale_meshes()
    }

    fn build_mesh(&mut self, coord: ChunkCoord) {
        let lookup = ChunkLookup {
            chunks: &self.chunks,
            dims: self.layout.chunk,
        };
        if let Some(chunk) = self.chunks.get(&coord) {
            let mesh = ChunkMesh::build(chunk, self.layout, &lookup, &self.registry);
            self.meshes.insert(coord, mesh);
            push_unique(&mut self.mesh_updates, coord);
        }
    }

    /// Installs a subchunk mesh produced off-thread from the chunk at
    /// revision `rev`. Returns false when the chunk has no current mesh to
    /// patch or has changed since the mesh was captured.
    pub fn apply_subchunk_mesh(
        &mut self,
        coord: ChunkCoord,
        sc: SubchunkCoord,
        rev: u64,
        mesh: MeshBuild,
    ) -> bool {
        if self.stale.contains(&coord) {
            return false;
        }
        match self.chunk_rev(coord) {
            Some(current) if current == rev => {}
            Some(current) => {
                log::debug!(
                    "dropping subchunk mesh for ({}, {}, {}): rev {} != {}",
                    coord.cx,
                    coord.cy,
                    coord.cz,
                    rev,
                    current
                );
                return false;
            }
            None => return false,
        }
        let Some(chunk_mesh) = self.meshes.get_mut(&coord) else {
            return false;
        };
        chunk_mesh.set_subchunk(sc, mesh);
        chunk_mesh.recombine();
        push_unique(&mut self.mesh_updates, coord);
        true
    }

    /// Chunks whose mesh changed since the last call, in change order.
    pub fn drain_mesh_updates(&mut self) -> Vec<ChunkCoord> {
        std::mem::take(&mut self.mesh_updates)
    }

    /// Loaded chunks edited since they were last saved.
    pub fn modified_chunks(&self) -> Vec<ChunkCoord> {
        let mut out: Vec<ChunkCoord> = self
            .chunks
            .values()
            .filter(|c| c.is_modified())
            .map(|c| c.coord)
            .collect();
        out.sort();
        out
    }

    pub fn clear_modified(&mut self, coord: ChunkCoord) {
        if let Some(chunk) = self.chunks.get_mut(&coord) {
            chunk.clear_modified();
        }
    }
}

impl VoxelQuery for World {
    #[inline]
    fn block_id(&self, pos: BlockPos) -> BlockId {
        World::block_id(self, pos)
    }
}

fn push_unique(v: &mut Vec<ChunkCoord>, coord: ChunkCoord) {
    if !v.contains(&coord) {
        v.push(coord);
    }
}
