//! CPU meshing crate: face-culling mesher and mesh buffers.
#![forbid(unsafe_code)]

mod chunk;
mod mesh_build;
mod mesher;

pub use chunk::ChunkMesh;
pub use mesh_build::MeshBuild;
pub use mesher::{build_grid_mesh, build_subchunk_mesh, mesh_cell, should_render_face};
