use std::fs;
use std::path::Path;

use quarry_chunk::GridDims;
use serde::Deserialize;

use crate::error::WorldError;

/// Root of `world.toml`.
#[derive(Clone, Debug, Deserialize)]
pub struct WorldConfig {
    #[serde(default = "default_chunk_size")]
    pub chunk_size: GridDims,
    #[serde(default = "default_subchunk_size")]
    pub subchunk_size: GridDims,
    /// Chunk layers (by `cy`) that persist to disk.
    #[serde(default = "default_persist_layers")]
    pub persist_layers: (i32, i32),
    #[serde(default)]
    pub worldgen: WorldGenConfig,
}

fn default_chunk_size() -> GridDims {
    GridDims::CHUNK
}
fn default_subchunk_size() -> GridDims {
    GridDims::SUBCHUNK
}
fn default_persist_layers() -> (i32, i32) {
    (0, 0)
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            subchunk_size: default_subchunk_size(),
            persist_layers: default_persist_layers(),
            worldgen: WorldGenConfig::default(),
        }
    }
}

impl WorldConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, WorldError> {
        Ok(toml::from_str(s)?)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, WorldError> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WorldGenMode {
    Normal,
    Flat,
}

#[derive(Clone, Debug, Deserialize)]
pub struct WorldGenConfig {
    #[serde(default = "default_mode")]
    pub mode: WorldGenMode,
    #[serde(default)]
    pub flat: Flat,
    #[serde(default)]
    pub height: Height,
    #[serde(default)]
    pub surface: Surface,
}

fn default_mode() -> WorldGenMode {
    WorldGenMode::Normal
}

impl Default for WorldGenConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            flat: Flat::default(),
            height: Height::default(),
            surface: Surface::default(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Flat {
    #[serde(default = "default_flat_thickness")]
    pub thickness: i32,
}
fn default_flat_thickness() -> i32 {
    4
}
impl Default for Flat {
    fn default() -> Self {
        Self {
            thickness: default_flat_thickness(),
        }
    }
}

/// Height field sampled from 2D noise, remapped into `min_y..=max_y`.
#[derive(Clone, Debug, Deserialize)]
pub struct Height {
    #[serde(default = "default_height_freq")]
    pub frequency: f32,
    #[serde(default = "default_min_y")]
    pub min_y: i32,
    #[serde(default = "default_max_y")]
    pub max_y: i32,
}
fn default_height_freq() -> f32 {
    0.02
}
fn default_min_y() -> i32 {
    24
}
fn default_max_y() -> i32 {
    64
}
impl Default for Height {
    fn default() -> Self {
        Self {
            frequency: default_height_freq(),
            min_y: default_min_y(),
            max_y: default_max_y(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Surface {
    #[serde(default = "default_topsoil")]
    pub topsoil_thickness: i32,
    #[serde(default = "default_top")]
    pub top: String,
    #[serde(default = "default_sub_near")]
    pub subsoil_near: String,
    #[serde(default = "default_sub_deep")]
    pub subsoil_deep: String,
}
fn default_topsoil() -> i32 {
    3
}
fn default_top() -> String {
    "grass".into()
}
fn default_sub_near() -> String {
    "dirt".into()
}
fn default_sub_deep() -> String {
    "stone".into()
}
impl Default for Surface {
    fn default() -> Self {
        Self {
            topsoil_thickness: default_topsoil(),
            top: default_top(),
            subsoil_near: default_sub_near(),
            subsoil_deep: default_sub_deep(),
        }
    }
}
