use quarry_geom::BlockPos;
use serde::{Deserialize, Serialize};

use crate::ChunkError;

/// Floor division for a positive divisor: rounds toward negative infinity.
#[inline]
pub fn floor_div(a: i32, b: i32) -> i32 {
    debug_assert!(b > 0, "divisor must be positive");
    a.div_euclid(b)
}

/// Mathematical modulo for a positive divisor: always in `[0, b)`.
#[inline]
pub fn floor_mod(a: i32, b: i32) -> i32 {
    debug_assert!(b > 0, "divisor must be positive");
    let r = a % b;
    if r < 0 { r + b } else { r }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub cx: i32,
    pub cy: i32,
    pub cz: i32,
}

impl ChunkCoord {
    #[inline]
    pub const fn new(cx: i32, cy: i32, cz: i32) -> Self {
        Self { cx, cy, cz }
    }

    #[inline]
    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self {
            cx: self.cx + dx,
            cy: self.cy + dy,
            cz: self.cz + dz,
        }
    }

    /// World position of the chunk's `(0, 0, 0)` cell.
    #[inline]
    pub fn origin(self, dims: GridDims) -> BlockPos {
        BlockPos::new(
            self.cx * dims.sx as i32,
            self.cy * dims.sy as i32,
            self.cz * dims.sz as i32,
        )
    }

    #[inline]
    pub fn distance_sq(self, other: ChunkCoord) -> i64 {
        let dx = i64::from(self.cx - other.cx);
        let dy = i64::from(self.cy - other.cy);
        let dz = i64::from(self.cz - other.cz);
        dx * dx + dy * dy + dz * dz
    }
}

impl From<(i32, i32, i32)> for ChunkCoord {
    fn from(value: (i32, i32, i32)) -> Self {
        Self::new(value.0, value.1, value.2)
    }
}

impl From<ChunkCoord> for (i32, i32, i32) {
    fn from(value: ChunkCoord) -> Self {
        (value.cx, value.cy, value.cz)
    }
}

/// Extent of a dense grid in cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridDims {
    pub sx: usize,
    pub sy: usize,
    pub sz: usize,
}

impl GridDims {
    pub const CHUNK: GridDims = GridDims {
        sx: 16,
        sy: 128,
        sz: 16,
    };
    pub const SUBCHUNK: GridDims = GridDims {
        sx: 4,
        sy: 4,
        sz: 4,
    };

    pub fn new(sx: usize, sy: usize, sz: usize) -> Result<Self, ChunkError> {
        if sx == 0 || sy == 0 || sz == 0 {
            return Err(ChunkError::ZeroDims(sx, sy, sz));
        }
        Ok(Self { sx, sy, sz })
    }

    #[inline]
    pub const fn cubic(n: usize) -> Self {
        Self {
            sx: n,
            sy: n,
            sz: n,
        }
    }

    #[inline]
    pub fn volume(self) -> usize {
        self.sx * self.sy * self.sz
    }

    #[inline]
    pub fn axis(self, axis: usize) -> usize {
        match axis {
            0 => self.sx,
            1 => self.sy,
            _ => self.sz,
        }
    }

    #[inline]
    pub fn contains_local(self, lx: i32, ly: i32, lz: i32) -> bool {
        lx >= 0
            && ly >= 0
            && lz >= 0
            && (lx as usize) < self.sx
            && (ly as usize) < self.sy
            && (lz as usize) < self.sz
    }
}

impl Default for GridDims {
    fn default() -> Self {
        Self::CHUNK
    }
}

/// Chunk owning the world position `pos`.
#[inline]
pub fn chunk_coord_of(pos: BlockPos, dims: GridDims) -> ChunkCoord {
    ChunkCoord::new(
        floor_div(pos.x, dims.sx as i32),
        floor_div(pos.y, dims.sy as i32),
        floor_div(pos.z, dims.sz as i32),
    )
}

/// Position of `pos` inside its owning chunk.
#[inline]
pub fn local_coord_of(pos: BlockPos, dims: GridDims) -> (usize, usize, usize) {
    (
        floor_mod(pos.x, dims.sx as i32) as usize,
        floor_mod(pos.y, dims.sy as i32) as usize,
        floor_mod(pos.z, dims.sz as i32) as usize,
    )
}
