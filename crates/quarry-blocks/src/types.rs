/// Numeric block id stored in chunk arrays. Id 0 is air and never has a type.
pub type BlockId = u16;

pub const AIR: BlockId = 0;

/// Layer of a texture inside the texture atlas, in registration order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureLayer(pub u16);

impl TextureLayer {
    #[inline]
    pub fn as_f32(self) -> f32 {
        self.0 as f32
    }
}
