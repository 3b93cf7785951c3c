//! Chunk persistence.
//!
//! A chunk is stored as its flat block array (see [`Chunk::idx`]). Only the
//! chunk layers inside the configured vertical range are written.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use quarry_blocks::BlockId;
use quarry_chunk::{Chunk, ChunkCoord, GridDims, floor_mod};

use crate::error::{StoreError, WorldError};
use crate::generation::TerrainGenerator;
use crate::world::World;

/// Backing storage for chunk block arrays.
pub trait ChunkStore {
    /// `Ok(None)` when nothing is stored for `coord`.
    fn load_chunk(
        &self,
        coord: ChunkCoord,
        dims: GridDims,
    ) -> Result<Option<Vec<BlockId>>, StoreError>;

    fn save_chunk(&mut self, coord: ChunkCoord, blocks: &[BlockId]) -> Result<(), StoreError>;
}

#[derive(Default, Debug, Clone)]
pub struct MemoryStore {
    pub chunks: HashMap<ChunkCoord, Vec<BlockId>>,
}

impl ChunkStore for MemoryStore {
    fn load_chunk(
        &self,
        coord: ChunkCoord,
        _dims: GridDims,
    ) -> Result<Option<Vec<BlockId>>, StoreError> {
        Ok(self.chunks.get(&coord).cloned())
    }

    fn save_chunk(&mut self, coord: ChunkCoord, blocks: &[BlockId]) -> Result<(), StoreError> {
        self.chunks.insert(coord, blocks.to_vec());
        Ok(())
    }
}

/// One file per chunk under `root`, blocks as little-endian `u16`.
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[inline]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Signed base-36 rendering, lowercase digits.
fn base36(v: i32) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if v == 0 {
        return "0".to_string();
    }
    let mut n = i64::from(v).unsigned_abs();
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    if v < 0 {
        out.push(b'-');
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

/// `root/<x mod 64>/<z mod 64>/c.<x>.<z>.dat`, every number in base 36.
/// Layers other than `cy == 0` get the layer appended: `c.<x>.<z>.<y>.dat`.
pub fn chunk_path(root: &Path, coord: ChunkCoord) -> PathBuf {
    let file = if coord.cy == 0 {
        format!("c.{}.{}.dat", base36(coord.cx), base36(coord.cz))
    } else {
        format!(
            "c.{}.{}.{}.dat",
            base36(coord.cx),
            base36(coord.cz),
            base36(coord.cy)
        )
    };
    root.join(base36(floor_mod(coord.cx, 64)))
        .join(base36(floor_mod(coord.cz, 64)))
        .join(file)
}

impl ChunkStore for DirStore {
    fn load_chunk(
        &self,
        coord: ChunkCoord,
        dims: GridDims,
    ) -> Result<Option<Vec<BlockId>>, StoreError> {
        let path = chunk_path(&self.root, coord);
        let bytes = match fs::read(&path) {
            Ok(b) => b,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        let expected = dims.volume() * 2;
        if bytes.len() != expected {
            return Err(StoreError::Malformed {
                path,
                expected,
                actual: bytes.len(),
            });
        }
        Ok(Some(
            bytes
                .chunks_exact(2)
                .map(|b| u16::from_le_bytes([b[0], b[1]]))
                .collect(),
        ))
    }

    fn save_chunk(&mut self, coord: ChunkCoord, blocks: &[BlockId]) -> Result<(), StoreError> {
        let path = chunk_path(&self.root, coord);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|source| StoreError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        let bytes: Vec<u8> = blocks.iter().flat_map(|b| b.to_le_bytes()).collect();
        fs::write(&path, bytes).map_err(|source| StoreError::Io { path, source })
    }
}

/// Outcome of `WorldSave::load_region`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RegionLoad {
    pub loaded: usize,
    pub generated: usize,
}

/// Applies the vertical persistence limit on top of a store and moves
/// chunks between it and a `World`.
pub struct WorldSave<S: ChunkStore> {
    store: S,
    layers: (i32, i32),
}

impl<S: ChunkStore> WorldSave<S> {
    /// `layers` is the inclusive `cy` range that persists.
    pub fn new(store: S, layers: (i32, i32)) -> Self {
        Self { store, layers }
    }

    #[inline]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[inline]
    pub fn persists(&self, coord: ChunkCoord) -> bool {
        coord.cy >= self.layers.0 && coord.cy <= self.layers.1
    }

    /// Reads a stored chunk. Unreadable or corrupt data counts as absent.
    pub fn load_chunk(&self, coord: ChunkCoord, dims: GridDims) -> Option<Chunk> {
        if !self.persists(coord) {
            return None;
        }
        let blocks = match self.store.load_chunk(coord, dims) {
            Ok(Some(b)) => b,
            Ok(None) => return None,
            Err(e) => {
                log::warn!("treating chunk ({}, {}, {}) as new: {e}", coord.cx, coord.cy, coord.cz);
                return None;
            }
        };
        match Chunk::from_blocks(coord, dims, blocks) {
            Ok(chunk) => Some(chunk),
            Err(e) => {
                log::warn!("treating chunk ({}, {}, {}) as new: {e}", coord.cx, coord.cy, coord.cz);
                None
            }
        }
    }

    /// Loads or generates every persisted layer of the square of chunk
    /// columns within `radius` of `(cx, cz)`.
    pub fn load_region(
        &self,
        world: &mut World,
        generator: &TerrainGenerator,
        center: (i32, i32),
        radius: i32,
    ) -> Result<RegionLoad, WorldError> {
        let dims = world.dims();
        let mut out = RegionLoad::default();
        for cx in center.0 - radius..=center.0 + radius {
            for cz in center.1 - radius..=center.1 + radius {
                for cy in self.layers.0..=self.layers.1 {
                    let coord = ChunkCoord::new(cx, cy, cz);
                    let (chunk, from_store) = match self.load_chunk(coord, dims) {
                        Some(c) => (c, true),
                        None => (generator.generate(coord, dims), false),
                    };
                    match world.insert_chunk(chunk) {
                        Ok(()) if from_store => out.loaded += 1,
                        Ok(()) => out.generated += 1,
                        Err(WorldError::UnknownBlockInChunk { id, .. }) if from_store => {
                            log::warn!(
                                "chunk ({}, {}, {}) holds unknown id {id}; regenerating",
                                coord.cx,
                                coord.cy,
                                coord.cz
                            );
                            world.insert_chunk(generator.generate(coord, dims))?;
                            out.generated += 1;
                        }
                        Err(e) => return Err(e),
                    }
                }
            }
        }
        log::info!(
            "region around ({}, {}): {} loaded, {} generated",
            center.0,
            center.1,
            out.loaded,
            out.generated
        );
        Ok(out)
    }

    /// Writes every modified chunk inside the persisted layers and clears
    /// its modified flag. Stops at the first write error.
    pub fn save_modified(&mut self, world: &mut World) -> Result<usize, WorldError> {
        let mut saved = 0;
        for coord in world.modified_chunks() {
            if !self.persists(coord) {
                continue;
            }
            let Some(chunk) = world.chunk(coord) else {
                continue;
            };
            self.store.save_chunk(coord, chunk.blocks())?;
            world.clear_modified(coord);
            saved += 1;
        }
        log::info!("saved {saved} chunks");
        Ok(saved)
    }
}
