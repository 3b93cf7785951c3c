use quarry_blocks::{AIR, BlockId};
use quarry_geom::BlockPos;

use crate::ChunkError;
use crate::coords::{ChunkCoord, GridDims};
use crate::query::VoxelQuery;

/// Dense block array for one chunk.
///
/// Cells are stored in a single flat buffer at
/// `index = x * sz * sy + z * sy + y`, the same layout the chunk store
/// reads and writes.
#[derive(Clone, Debug, PartialEq)]
pub struct Chunk {
    pub coord: ChunkCoord,
    pub dims: GridDims,
    blocks: Vec<BlockId>,
    modified: bool,
    rev: u64,
}

impl Chunk {
    pub fn new(coord: ChunkCoord, dims: GridDims) -> Self {
        Self {
            coord,
            dims,
            blocks: vec![AIR; dims.volume()],
            modified: false,
            rev: 0,
        }
    }

    pub fn from_blocks(
        coord: ChunkCoord,
        dims: GridDims,
        blocks: Vec<BlockId>,
    ) -> Result<Self, ChunkError> {
        let expected = dims.volume();
        if blocks.len() != expected {
            return Err(ChunkError::BlockCountMismatch {
                expected,
                actual: blocks.len(),
            });
        }
        Ok(Self {
            coord,
            dims,
            blocks,
            modified: false,
            rev: 0,
        })
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize, z: usize) -> usize {
        (x * self.dims.sz + z) * self.dims.sy + y
    }

    #[inline]
    pub fn get_local(&self, x: usize, y: usize, z: usize) -> BlockId {
        self.blocks[self.idx(x, y, z)]
    }

    /// Writes a cell and returns the previous id.
    #[inline]
    pub fn set_local(&mut self, x: usize, y: usize, z: usize, id: BlockId) -> BlockId {
        let i = self.idx(x, y, z);
        std::mem::replace(&mut self.blocks[i], id)
    }

    #[inline]
    pub fn origin(&self) -> BlockPos {
        self.coord.origin(self.dims)
    }

    #[inline]
    pub fn contains_world(&self, pos: BlockPos) -> bool {
        let o = self.origin();
        self.dims.contains_local(pos.x - o.x, pos.y - o.y, pos.z - o.z)
    }

    #[inline]
    pub fn get_world(&self, pos: BlockPos) -> Option<BlockId> {
        if !self.contains_world(pos) {
            return None;
        }
        let o = self.origin();
        Some(self.get_local(
            (pos.x - o.x) as usize,
            (pos.y - o.y) as usize,
            (pos.z - o.z) as usize,
        ))
    }

    #[inline]
    pub fn blocks(&self) -> &[BlockId] {
        &self.blocks
    }

    /// Set when a cell changes; cleared once the chunk is persisted.
    #[inline]
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    #[inline]
    pub fn mark_modified(&mut self) {
        self.modified = true;
    }

    #[inline]
    pub fn clear_modified(&mut self) {
        self.modified = false;
    }

    /// Revision of the chunk's contents and surroundings, as seen by its
    /// mesh. Meshes built from an older revision are out of date.
    #[inline]
    pub fn rev(&self) -> u64 {
        self.rev
    }

    #[inline]
    pub fn bump_rev(&mut self) -> u64 {
        self.rev += 1;
        self.rev
    }

    #[inline]
    pub fn set_rev(&mut self, rev: u64) {
        self.rev = rev;
    }

    #[inline]
    pub fn has_non_air(&self) -> bool {
        self.blocks.iter().any(|&b| b != AIR)
    }

    #[inline]
    pub fn is_all_air(&self) -> bool {
        !self.has_non_air()
    }
}

/// Cells outside the chunk read as air.
impl VoxelQuery for Chunk {
    #[inline]
    fn block_id(&self, pos: BlockPos) -> BlockId {
        self.get_world(pos).unwrap_or(AIR)
    }
}
