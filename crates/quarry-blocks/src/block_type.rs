use std::sync::Arc;

use quarry_geom::Aabb;

use crate::atlas::TextureAtlas;
use crate::error::BlockError;
use crate::model::{BlockModel, FaceGeometry};
use crate::selector::FaceSelector;
use crate::types::BlockId;

/// A block id bound to a shared model and its own textured face table.
#[derive(Clone, Debug)]
pub struct BlockType {
    pub id: BlockId,
    pub name: String,
    model: Arc<BlockModel>,
    // Private copy of the model faces with atlas layers written in.
    faces: Vec<FaceGeometry>,
}

impl BlockType {
    pub fn new(id: BlockId, name: impl Into<String>, model: Arc<BlockModel>) -> Self {
        let faces = model.faces.clone();
        Self {
            id,
            name: name.into(),
            model,
            faces,
        }
    }

    /// Registers `texture` with the atlas and writes its layer into every
    /// face covered by `selector`. Faces past the end of the table are skipped.
    pub fn set_texture<A: TextureAtlas + ?Sized>(
        &mut self,
        selector: FaceSelector,
        texture: &str,
        atlas: &mut A,
    ) -> Result<(), BlockError> {
        let layer = atlas.register_texture(texture)?;
        for &i in selector.indices() {
            if let Some(face) = self.faces.get_mut(i) {
                face.set_layer(layer.as_f32());
            }
        }
        Ok(())
    }

    #[inline]
    pub fn model(&self) -> &BlockModel {
        &self.model
    }

    #[inline]
    pub fn shared_model(&self) -> &Arc<BlockModel> {
        &self.model
    }

    #[inline]
    pub fn faces(&self) -> &[FaceGeometry] {
        &self.faces
    }

    #[inline]
    pub fn face(&self, index: usize) -> Option<&FaceGeometry> {
        self.faces.get(index)
    }

    #[inline]
    pub fn is_cube(&self) -> bool {
        self.model.is_cube()
    }

    #[inline]
    pub fn is_glass(&self) -> bool {
        self.model.glass
    }

    #[inline]
    pub fn is_transparent(&self) -> bool {
        self.model.transparent
    }

    /// Opaque blocks hide the faces of their neighbours.
    #[inline]
    pub fn is_opaque(&self) -> bool {
        !self.model.transparent
    }

    #[inline]
    pub fn colliders(&self) -> &[Aabb] {
        &self.model.colliders
    }
}
