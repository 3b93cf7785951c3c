use std::collections::BTreeMap;

use serde::Deserialize;

use crate::model::ModelName;
use crate::types::BlockId;

/// Root of `blocks.toml`.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct BlocksConfig {
    #[serde(default)]
    pub blocks: Vec<BlockDef>,
}

/// One `[[blocks]]` entry.
///
/// ```toml
/// [[blocks]]
/// id = 2
/// name = "grass"
/// model = "cube"
/// textures = { all = "dirt", top = "grass" }
/// ```
#[derive(Deserialize, Clone, Debug, Default)]
pub struct BlockDef {
    pub id: BlockId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub model: Option<ModelName>,
    /// Face selector -> texture name.
    #[serde(default)]
    pub textures: BTreeMap<String, String>,
    /// Inherit name, model and textures from an earlier id.
    #[serde(default)]
    pub same_as: Option<BlockId>,
}
