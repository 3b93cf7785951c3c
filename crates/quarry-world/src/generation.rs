//! Column-based terrain: a 2D height field filled with top, near-surface
//! and deep layers.

use fastnoise_lite::{FastNoiseLite, NoiseType};
use quarry_blocks::{AIR, BlockId, BlockRegistry};
use quarry_chunk::{Chunk, ChunkCoord, GridDims};

use crate::worldgen::{WorldGenConfig, WorldGenMode};

pub struct TerrainGenerator {
    cfg: WorldGenConfig,
    noise: FastNoiseLite,
    top: BlockId,
    near: BlockId,
    deep: BlockId,
}

impl TerrainGenerator {
    pub fn new(cfg: WorldGenConfig, seed: i32, reg: &BlockRegistry) -> Self {
        let mut noise = FastNoiseLite::with_seed(seed);
        noise.set_noise_type(Some(NoiseType::OpenSimplex2));
        noise.set_frequency(Some(cfg.height.frequency));
        let top = resolve(reg, &cfg.surface.top);
        let near = resolve(reg, &cfg.surface.subsoil_near);
        let deep = resolve(reg, &cfg.surface.subsoil_deep);
        Self {
            cfg,
            noise,
            top,
            near,
            deep,
        }
    }

    /// Number of solid cells in the column at `(wx, wz)`, counted up from y = 0.
    pub fn height_at(&self, wx: i32, wz: i32) -> i32 {
        match self.cfg.mode {
            WorldGenMode::Flat => self.cfg.flat.thickness,
            WorldGenMode::Normal => {
                let n = self.noise.get_noise_2d(wx as f32, wz as f32);
                remap_noise_to_height(n, self.cfg.height.min_y, self.cfg.height.max_y)
            }
        }
    }

    /// Block for world cell `(wy)` in a column whose surface height is `height`.
    #[inline]
    pub fn block_at(&self, wy: i32, height: i32) -> BlockId {
        if wy < 0 || wy >= height {
            AIR
        } else if wy == height - 1 {
            self.top
        } else if wy >= height - 1 - self.cfg.surface.topsoil_thickness {
            self.near
        } else {
            self.deep
        }
    }

    pub fn generate(&self, coord: ChunkCoord, dims: GridDims) -> Chunk {
        let mut chunk = Chunk::new(coord, dims);
        let origin = coord.origin(dims);
        for x in 0..dims.sx {
            for z in 0..dims.sz {
                let height = self.height_at(origin.x + x as i32, origin.z + z as i32);
                for y in 0..dims.sy {
                    let id = self.block_at(origin.y + y as i32, height);
                    if id != AIR {
                        chunk.set_local(x, y, z, id);
                    }
                }
            }
        }
        log::debug!(
            "generated chunk ({}, {}, {}) solid={}",
            coord.cx,
            coord.cy,
            coord.cz,
            chunk.has_non_air()
        );
        chunk
    }
}

fn resolve(reg: &BlockRegistry, name: &str) -> BlockId {
    match reg.id_by_name(name) {
        Some(id) => id,
        None => {
            log::warn!("worldgen block `{name}` is not registered; using air");
            AIR
        }
    }
}

/// Maps noise in `[-1, 1]` onto `[min_y, max_y]`.
#[inline]
pub fn remap_noise_to_height(noise: f32, min_y: i32, max_y: i32) -> i32 {
    let t = (noise * 0.5 + 0.5).clamp(0.0, 1.0);
    min_y + ((max_y - min_y) as f32 * t).round() as i32
}
