use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::atlas::TextureCatalog;
use crate::block_type::BlockType;
use crate::config::{BlockDef, BlocksConfig};
use crate::error::BlockError;
use crate::model::{BlockModel, ModelName};
use crate::selector::FaceSelector;
use crate::types::{AIR, BlockId};

/// Block types indexed by id. Slot 0 is air and stays empty.
#[derive(Clone, Debug)]
pub struct BlockRegistry {
    pub textures: TextureCatalog,
    blocks: Vec<Option<BlockType>>,
    by_name: HashMap<String, BlockId>,
    models: HashMap<ModelName, Arc<BlockModel>>,
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// Definition after `same_as` inheritance, before textures are applied.
struct Resolved {
    name: String,
    model: ModelName,
    textures: Vec<(FaceSelector, String)>,
}

impl BlockRegistry {
    pub fn new() -> Self {
        Self {
            textures: TextureCatalog::new(),
            blocks: vec![None],
            by_name: HashMap::new(),
            models: HashMap::new(),
        }
    }

    #[inline]
    pub fn get(&self, id: BlockId) -> Option<&BlockType> {
        self.blocks.get(id as usize).and_then(Option::as_ref)
    }

    /// Air and every registered id.
    #[inline]
    pub fn contains(&self, id: BlockId) -> bool {
        id == AIR || self.get(id).is_some()
    }

    /// Air, unknown ids and transparent models are not opaque.
    #[inline]
    pub fn is_opaque(&self, id: BlockId) -> bool {
        self.get(id).is_some_and(BlockType::is_opaque)
    }

    pub fn id_by_name(&self, name: &str) -> Option<BlockId> {
        self.by_name.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BlockType> {
        self.blocks.iter().flatten()
    }

    /// Number of registered block types, air excluded.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Shared model instance for `name`; models are built once per registry.
    pub fn model(&mut self, name: ModelName) -> Arc<BlockModel> {
        self.models
            .entry(name)
            .or_insert_with(|| Arc::new(BlockModel::named(name)))
            .clone()
    }

    /// Adds a block type and resolves its textures through the catalog.
    /// Assignments are applied broadest selector first.
    pub fn insert(
        &mut self,
        id: BlockId,
        name: &str,
        model: ModelName,
        textures: &[(FaceSelector, &str)],
    ) -> Result<&BlockType, BlockError> {
        if id == AIR {
            return Err(BlockError::ReservedAirId {
                name: name.to_string(),
            });
        }
        if self.get(id).is_some() {
            return Err(BlockError::DuplicateId(id));
        }
        let mut ty = BlockType::new(id, name, self.model(model));
        let mut ordered: Vec<&(FaceSelector, &str)> = textures.iter().collect();
        ordered.sort_by_key(|(sel, _)| sel.specificity());
        for (sel, tex) in ordered {
            ty.set_texture(*sel, tex, &mut self.textures)?;
        }
        let slot = id as usize;
        if self.blocks.len() <= slot {
            self.blocks.resize(slot + 1, None);
        }
        self.by_name.entry(name.to_string()).or_insert(id);
        Ok(self.blocks[slot].insert(ty))
    }

    pub fn from_config(cfg: BlocksConfig) -> Result<Self, BlockError> {
        let mut reg = BlockRegistry::new();
        let mut resolved: HashMap<BlockId, Resolved> = HashMap::new();
        for def in cfg.blocks {
            let id = def.id;
            let r = resolve_def(def, &resolved)?;
            let textures: Vec<(FaceSelector, &str)> = r
                .textures
                .iter()
                .map(|(sel, tex)| (*sel, tex.as_str()))
                .collect();
            reg.insert(id, &r.name, r.model, &textures)?;
            resolved.insert(id, r);
        }
        log::info!(
            "block registry: {} types, {} textures",
            reg.len(),
            reg.textures.len()
        );
        Ok(reg)
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, BlockError> {
        let cfg: BlocksConfig = toml::from_str(toml_str)?;
        Self::from_config(cfg)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, BlockError> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }
}

fn resolve_def(def: BlockDef, earlier: &HashMap<BlockId, Resolved>) -> Result<Resolved, BlockError> {
    let base = match def.same_as {
        Some(src) => Some(earlier.get(&src).ok_or(BlockError::UnresolvedSameAs {
            id: def.id,
            same_as: src,
        })?),
        None => None,
    };
    let name = def
        .name
        .or_else(|| base.map(|b| b.name.clone()))
        .ok_or(BlockError::MissingName(def.id))?;
    let model = def
        .model
        .or_else(|| base.map(|b| b.model))
        .ok_or(BlockError::MissingModel(def.id))?;
    let mut textures = base.map(|b| b.textures.clone()).unwrap_or_default();
    for (key, tex) in def.textures {
        textures.push((key.parse()?, tex));
    }
    Ok(Resolved {
        name,
        model,
        textures,
    })
}
