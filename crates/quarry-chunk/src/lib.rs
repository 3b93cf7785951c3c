//! Dense chunk storage, chunk/local coordinate math and subchunk layout.
#![forbid(unsafe_code)]

mod chunk;
mod coords;
mod query;
mod subchunk;

pub use chunk::Chunk;
pub use coords::{ChunkCoord, GridDims, chunk_coord_of, floor_div, floor_mod, local_coord_of};
pub use query::VoxelQuery;
pub use subchunk::{SubchunkCoord, SubchunkLayout};

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ChunkError {
    #[error("grid dimensions must be non-zero, got {0}x{1}x{2}")]
    ZeroDims(usize, usize, usize),
    #[error("expected {expected} blocks for the chunk, got {actual}")]
    BlockCountMismatch { expected: usize, actual: usize },
    #[error("subchunk size {sub:?} does not divide chunk size {chunk:?}")]
    SubchunkMismatch { chunk: GridDims, sub: GridDims },
}
