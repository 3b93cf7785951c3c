use std::time::Instant;

use quarry_blocks::BlockRegistry;
use quarry_chunk::{Chunk, ChunkCoord, SubchunkCoord, SubchunkLayout, VoxelQuery};

use crate::mesh_build::MeshBuild;
use crate::mesher::build_subchunk_mesh;

/// Per-subchunk meshes of one chunk plus their concatenation.
#[derive(Clone, Debug)]
pub struct ChunkMesh {
    pub coord: ChunkCoord,
    layout: SubchunkLayout,
    subchunks: Vec<MeshBuild>,
    combined: MeshBuild,
}

impl ChunkMesh {
    /// Meshes every subchunk of `chunk` and combines the result.
    pub fn build<Q: VoxelQuery + ?Sized>(
        chunk: &Chunk,
        layout: SubchunkLayout,
        query: &Q,
        reg: &BlockRegistry,
    ) -> Self {
        let started = Instant::now();
        let subchunks = layout
            .iter()
            .map(|sc| build_subchunk_mesh(chunk, &layout, sc, query, reg))
            .collect();
        let mut mesh = Self {
            coord: chunk.coord,
            layout,
            subchunks,
            combined: MeshBuild::default(),
        };
        mesh.recombine();
        log::debug!(
            target: "perf",
            "ms={} mesher_chunk chunk=({}, {}, {}) faces={}",
            started.elapsed().as_millis(),
            chunk.coord.cx,
            chunk.coord.cy,
            chunk.coord.cz,
            mesh.combined.face_count()
        );
        mesh
    }

    /// Remeshes a single subchunk. Call `recombine` afterwards.
    pub fn rebuild_subchunk<Q: VoxelQuery + ?Sized>(
        &mut self,
        sc: SubchunkCoord,
        chunk: &Chunk,
        query: &Q,
        reg: &BlockRegistry,
    ) {
        let mesh = build_subchunk_mesh(chunk, &self.layout, sc, query, reg);
        self.set_subchunk(sc, mesh);
    }

    /// Installs a subchunk mesh built elsewhere. Call `recombine` afterwards.
    pub fn set_subchunk(&mut self, sc: SubchunkCoord, mesh: MeshBuild) {
        let i = self.layout.index(sc);
        self.subchunks[i] = mesh;
    }

    /// Rebuilds the chunk mesh from the subchunk meshes in layout order.
    pub fn recombine(&mut self) {
        self.combined.clear_keep_capacity();
        let quads = self.subchunks.iter().map(MeshBuild::face_count).sum();
        self.combined.reserve_quads(quads);
        for sub in &self.subchunks {
            self.combined.append_rebased(sub);
        }
    }

    #[inline]
    pub fn layout(&self) -> &SubchunkLayout {
        &self.layout
    }

    #[inline]
    pub fn subchunk(&self, sc: SubchunkCoord) -> &MeshBuild {
        &self.subchunks[self.layout.index(sc)]
    }

    /// The chunk-level mesh the renderer uploads.
    #[inline]
    pub fn mesh(&self) -> &MeshBuild {
        &self.combined
    }
}
