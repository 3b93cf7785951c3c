use quarry_blocks::BlockId;
use quarry_chunk::{Chunk, GridDims, SubchunkCoord, SubchunkLayout};
use quarry_geom::BlockPos;

/// Copy of one subchunk plus a one-cell halo, taken on the main thread.
///
/// Halo cells inside the owning chunk are copied; cells that belong to
/// another chunk are left unresolved and answered by a call back to the
/// world owner.
#[derive(Clone, Debug)]
pub struct BlockWindow {
    /// World position of the window's minimum cell (subchunk min minus one).
    pub origin: BlockPos,
    pub dims: GridDims,
    cells: Vec<Option<BlockId>>,
}

impl BlockWindow {
    pub fn capture(chunk: &Chunk, layout: &SubchunkLayout, sc: SubchunkCoord) -> Self {
        let (ox, oy, oz) = layout.local_origin(sc);
        let dims = GridDims {
            sx: layout.sub.sx + 2,
            sy: layout.sub.sy + 2,
            sz: layout.sub.sz + 2,
        };
        let mut cells = Vec::with_capacity(dims.volume());
        for x in 0..dims.sx as i32 {
            for z in 0..dims.sz as i32 {
                for y in 0..dims.sy as i32 {
                    let lx = ox as i32 + x - 1;
                    let ly = oy as i32 + y - 1;
                    let lz = oz as i32 + z - 1;
                    let cell = chunk
                        .dims
                        .contains_local(lx, ly, lz)
                        .then(|| chunk.get_local(lx as usize, ly as usize, lz as usize));
                    cells.push(cell);
                }
            }
        }
        let origin = chunk
            .origin()
            .offset(ox as i32 - 1, oy as i32 - 1, oz as i32 - 1);
        Self {
            origin,
            dims,
            cells,
        }
    }

    /// World position of the first meshed (non-halo) cell.
    #[inline]
    pub fn interior_min(&self) -> BlockPos {
        self.origin.offset(1, 1, 1)
    }

    /// Extent of the meshed region.
    #[inline]
    pub fn interior_dims(&self) -> GridDims {
        GridDims {
            sx: self.dims.sx - 2,
            sy: self.dims.sy - 2,
            sz: self.dims.sz - 2,
        }
    }

    /// `None` outside the window or for an unresolved halo cell.
    #[inline]
    pub fn get(&self, pos: BlockPos) -> Option<BlockId> {
        let (x, y, z) = (
            pos.x - self.origin.x,
            pos.y - self.origin.y,
            pos.z - self.origin.z,
        );
        if !self.dims.contains_local(x, y, z) {
            return None;
        }
        let i = (x as usize * self.dims.sz + z as usize) * self.dims.sy + y as usize;
        self.cells[i]
    }

    pub fn unresolved(&self) -> usize {
        self.cells.iter().filter(|c| c.is_none()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quarry_chunk::ChunkCoord;

    #[test]
    fn halo_outside_chunk_is_unresolved() {
        let dims = GridDims::cubic(8);
        let layout = SubchunkLayout::new(dims, GridDims::cubic(4)).unwrap();
        let mut chunk = Chunk::new(ChunkCoord::new(1, 0, 0), dims);
        chunk.set_local(4, 0, 0, 9);
        let w = BlockWindow::capture(&chunk, &layout, SubchunkCoord::new(0, 0, 0));
        assert_eq!(w.origin, BlockPos::new(7, -1, -1));
        assert_eq!(w.interior_min(), BlockPos::new(8, 0, 0));
        assert_eq!(w.interior_dims(), GridDims::cubic(4));
        // x + 1 past the subchunk is still inside the chunk.
        assert_eq!(w.get(BlockPos::new(12, 0, 0)), Some(9));
        assert_eq!(w.get(BlockPos::new(7, 0, 0)), None);
        assert_eq!(w.get(BlockPos::new(8, -1, 0)), None);
        assert_eq!(w.get(BlockPos::new(100, 0, 0)), None);
        // Faces at x = -1, y = -1, z = -1 fall outside: 3 * 36 - 3 * 6 + 1.
        assert_eq!(w.unresolved(), 91);
    }
}
