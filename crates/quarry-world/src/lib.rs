//! Sparse voxel world: chunk map, edits with incremental remeshing, terrain
//! generation and chunk persistence.
#![forbid(unsafe_code)]

mod error;
pub mod generation;
pub mod persistence;
mod world;
pub mod worldgen;

pub use error::{StoreError, WorldError};
pub use generation::TerrainGenerator;
pub use persistence::{ChunkStore, DirStore, MemoryStore, RegionLoad, WorldSave, chunk_path};
pub use world::World;
pub use worldgen::{WorldConfig, WorldGenConfig, WorldGenMode};
