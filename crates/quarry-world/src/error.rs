use std::path::PathBuf;

use quarry_blocks::BlockId;
use quarry_chunk::{ChunkCoord, ChunkError, GridDims};
use quarry_geom::BlockPos;

#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    #[error("block id {id} is not registered (at {pos:?})")]
    UnknownBlock { id: BlockId, pos: BlockPos },
    #[error("chunk {coord:?} holds unregistered block id {id}")]
    UnknownBlockInChunk { coord: ChunkCoord, id: BlockId },
    #[error("chunk {coord:?} has dims {actual:?}, world uses {expected:?}")]
    DimsMismatch {
        coord: ChunkCoord,
        expected: GridDims,
        actual: GridDims,
    },
    #[error(transparent)]
    Chunk(#[from] ChunkError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("reading world config: {0}")]
    Io(#[from] std::io::Error),
    #[error("parsing world config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("chunk file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("chunk file {path} holds {actual} bytes, expected {expected}")]
    Malformed {
        path: PathBuf,
        expected: usize,
        actual: usize,
    },
}
