use std::collections::HashMap;

use crate::error::BlockError;
use crate::types::TextureLayer;

/// Texture array the block types draw their layers from.
pub trait TextureAtlas {
    /// Registers `name`, returning its layer. Registering a known name is a no-op.
    fn register_texture(&mut self, name: &str) -> Result<TextureLayer, BlockError>;

    fn layer_index(&self, name: &str) -> Option<TextureLayer>;
}

/// Atlas bookkeeping without any pixel data: names in registration order.
#[derive(Clone, Debug)]
pub struct TextureCatalog {
    pub textures: Vec<String>,
    pub by_name: HashMap<String, TextureLayer>,
    capacity: usize,
}

impl Default for TextureCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl TextureCatalog {
    /// Layer limit of the texture array.
    pub const MAX_LAYERS: usize = 256;
    /// Edge length, in texels, of every layer.
    pub const TEXTURE_SIZE: u32 = 16;

    pub fn new() -> Self {
        Self::with_capacity_limit(Self::MAX_LAYERS)
    }

    pub fn with_capacity_limit(capacity: usize) -> Self {
        Self {
            textures: Vec::new(),
            by_name: HashMap::new(),
            capacity,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    pub fn name(&self, layer: TextureLayer) -> Option<&str> {
        self.textures.get(layer.0 as usize).map(String::as_str)
    }
}

impl TextureAtlas for TextureCatalog {
    fn register_texture(&mut self, name: &str) -> Result<TextureLayer, BlockError> {
        if let Some(&layer) = self.by_name.get(name) {
            return Ok(layer);
        }
        if self.textures.len() >= self.capacity {
            return Err(BlockError::AtlasFull {
                capacity: self.capacity,
                texture: name.to_string(),
            });
        }
        let layer = TextureLayer(self.textures.len() as u16);
        self.textures.push(name.to_string());
        self.by_name.insert(name.to_string(), layer);
        log::trace!("texture `{name}` -> layer {}", layer.0);
        Ok(layer)
    }

    fn layer_index(&self, name: &str) -> Option<TextureLayer> {
        self.by_name.get(name).copied()
    }
}
