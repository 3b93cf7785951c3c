use crate::ChunkError;
use crate::coords::GridDims;

/// Index of a subchunk inside its chunk, in subchunk units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubchunkCoord {
    pub x: usize,
    pub y: usize,
    pub z: usize,
}

impl SubchunkCoord {
    #[inline]
    pub const fn new(x: usize, y: usize, z: usize) -> Self {
        Self { x, y, z }
    }
}

/// How a chunk splits into equally sized subchunks, the unit of remeshing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubchunkLayout {
    pub chunk: GridDims,
    pub sub: GridDims,
    counts: GridDims,
}

impl SubchunkLayout {
    pub fn new(chunk: GridDims, sub: GridDims) -> Result<Self, ChunkError> {
        let divides = (0..3).all(|a| sub.axis(a) > 0 && chunk.axis(a) % sub.axis(a) == 0);
        if !divides {
            return Err(ChunkError::SubchunkMismatch { chunk, sub });
        }
        Ok(Self {
            chunk,
            sub,
            counts: GridDims {
                sx: chunk.sx / sub.sx,
                sy: chunk.sy / sub.sy,
                sz: chunk.sz / sub.sz,
            },
        })
    }

    /// Number of subchunks along each axis.
    #[inline]
    pub fn counts(&self) -> GridDims {
        self.counts
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.counts.volume()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Position of `sc` in iteration order; matches `iter()`.
    #[inline]
    pub fn index(&self, sc: SubchunkCoord) -> usize {
        (sc.x * self.counts.sy + sc.y) * self.counts.sz + sc.z
    }

    /// All subchunks, x outer, then y, z inner.
    pub fn iter(&self) -> impl Iterator<Item = SubchunkCoord> + use<> {
        let c = self.counts;
        (0..c.sx).flat_map(move |x| {
            (0..c.sy).flat_map(move |y| (0..c.sz).map(move |z| SubchunkCoord::new(x, y, z)))
        })
    }

    /// Subchunk containing the chunk-local cell.
    #[inline]
    pub fn subchunk_of(&self, lx: usize, ly: usize, lz: usize) -> SubchunkCoord {
        SubchunkCoord::new(lx / self.sub.sx, ly / self.sub.sy, lz / self.sub.sz)
    }

    /// Chunk-local cell at the subchunk's minimum corner.
    #[inline]
    pub fn local_origin(&self, sc: SubchunkCoord) -> (usize, usize, usize) {
        (sc.x * self.sub.sx, sc.y * self.sub.sy, sc.z * self.sub.sz)
    }
}

impl Default for SubchunkLayout {
    fn default() -> Self {
        Self {
            chunk: GridDims::CHUNK,
            sub: GridDims::SUBCHUNK,
            counts: GridDims {
                sx: GridDims::CHUNK.sx / GridDims::SUBCHUNK.sx,
                sy: GridDims::CHUNK.sy / GridDims::SUBCHUNK.sy,
                sz: GridDims::CHUNK.sz / GridDims::SUBCHUNK.sz,
            },
        }
    }
}
