//! Block models, block types, face-texture resolution and the block registry.
#![forbid(unsafe_code)]

pub mod atlas;
pub mod block_type;
pub mod config;
pub mod error;
pub mod face;
pub mod model;
pub mod registry;
pub mod selector;
pub mod types;

pub use atlas::{TextureAtlas, TextureCatalog};
pub use block_type::BlockType;
pub use error::BlockError;
pub use face::Face;
pub use model::{BlockModel, FaceGeometry, ModelName, Shape};
pub use registry::BlockRegistry;
pub use selector::FaceSelector;
pub use types::{AIR, BlockId, TextureLayer};
