use quarry_blocks::BlockId;
use quarry_geom::BlockPos;

/// Read access to block ids by world position.
///
/// Positions that are not loaded report air; a query never fails.
pub trait VoxelQuery {
    fn block_id(&self, pos: BlockPos) -> BlockId;
}

impl<T: VoxelQuery + ?Sized> VoxelQuery for &T {
    #[inline]
    fn block_id(&self, pos: BlockPos) -> BlockId {
        (**self).block_id(pos)
    }
}
