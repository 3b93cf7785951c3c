use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use quarry_blocks::{AIR, BlockRegistry};
use quarry_geom::Vec3;
use quarry_physics::{InputEvent, Player};
use quarry_runtime::{MeshRuntime, RuntimeError};
use quarry_world::{
    ChunkStore, DirStore, MemoryStore, TerrainGenerator, World, WorldConfig, WorldSave,
};

const DT: f32 = 1.0 / 60.0;
const OFFLOAD_TIMEOUT: Duration = Duration::from_secs(60);

pub struct SessionOptions {
    pub seed: i32,
    pub radius: i32,
    pub ticks: u32,
    pub save_dir: Option<PathBuf>,
    pub offload: usize,
}

#[derive(Debug, Default)]
pub struct SessionReport {
    pub chunks: usize,
    pub loaded: usize,
    pub faces: usize,
    pub offloaded: usize,
    pub edits: usize,
    pub saved: usize,
    pub final_pos: Vec3,
}

pub fn run(
    reg: Arc<BlockRegistry>,
    cfg: &WorldConfig,
    opts: &SessionOptions,
) -> Result<SessionReport, Box<dyn Error>> {
    match &opts.save_dir {
        Some(dir) => {
            log::info!("saving to {}", dir.display());
            run_with(WorldSave::new(DirStore::new(dir), cfg.persist_layers), reg, cfg, opts)
        }
        None => run_with(
            WorldSave::new(MemoryStore::default(), cfg.persist_layers),
            reg,
            cfg,
            opts,
        ),
    }
}

fn run_with<S: ChunkStore>(
    mut save: WorldSave<S>,
    reg: Arc<BlockRegistry>,
    cfg: &WorldConfig,
    opts: &SessionOptions,
) -> Result<SessionReport, Box<dyn Error>> {
    let generator = TerrainGenerator::new(cfg.worldgen.clone(), opts.seed, &reg);
    let mut world = World::new(Arc::clone(&reg), cfg)?;
    let region = save.load_region(&mut world, &generator, (0, 0), opts.radius)?;

    let t0 = Instant::now();
    let meshed = world.rebuild_stale_meshes();
    log::info!(
        target: "perf",
        "ms={} initial_meshing chunks={}",
        t0.elapsed().as_millis(),
        meshed
    );
    world.drain_mesh_updates();

    let mut report = SessionReport {
        chunks: world.chunk_count(),
        loaded: region.loaded,
        ..SessionReport::default()
    };
    if opts.offload > 0 {
        report.offloaded = offload_remesh(&mut world, opts.offload)?;
    }

    let spawn_y = generator.height_at(0, 0) as f32 + 2.0;
    let mut player = Player::new(Vec3::new(0.5, spawn_y, 0.5))?;
    player.pitch = -0.7;
    player.intent = Vec3::new(0.0, 0.0, 1.0);
    let place = reg
        .id_by_name("cobblestone")
        .or_else(|| reg.iter().find(|t| t.is_opaque()).map(|t| t.id));

    for tick in 0..opts.ticks {
        if tick == opts.ticks / 2 {
            player.handle(InputEvent::Sprint(true));
            log::info!(target: "events", "[tick {}] SprintStarted", tick);
        }
        player.update(DT, &world, &reg);

        if tick % 30 == 29 {
            if let Some(target) = player.target(&world) {
                log::info!(
                    target: "events",
                    "[tick {}] RaycastHit block={:?} previous={:?}",
                    tick,
                    target.block,
                    target.previous
                );
                let changed = if tick % 60 == 59 {
                    world.set_block(target.block, AIR)?
                } else if let Some(id) = place {
                    world.try_set_block(target.previous, id, player.entity.collider())?
                } else {
                    false
                };
                if changed {
                    report.edits += 1;
                }
            }
        }

        let updated = world.drain_mesh_updates();
        if !updated.is_empty() {
            log::debug!(target: "events", "[tick {}] MeshesUpdated count={}", tick, updated.len());
        }
    }

    report.faces = world
        .chunk_coords()
        .filter_map(|c| world.mesh(c))
        .map(|m| m.mesh().face_count())
        .sum();
    report.saved = save.save_modified(&mut world)?;
    report.final_pos = player.entity.pos;
    Ok(report)
}

/// Remeshes every loaded chunk on worker threads and installs the results.
fn offload_remesh(world: &mut World, workers: usize) -> Result<usize, RuntimeError> {
    let t0 = Instant::now();
    let mut rt = MeshRuntime::new(workers)?;
    let coords: Vec<_> = world.chunk_coords().collect();
    for coord in coords {
        rt.submit_chunk(world, coord)?;
    }
    let outs = rt.finish(world, OFFLOAD_TIMEOUT);
    let calls: usize = outs.iter().map(|o| o.calls).sum();
    let mut applied = 0;
    for out in outs {
        if world.apply_subchunk_mesh(out.coord, out.sc, out.rev, out.mesh) {
            applied += 1;
        }
    }
    world.drain_mesh_updates();
    log::info!(
        target: "perf",
        "ms={} offload_remesh subchunks={} calls={}",
        t0.elapsed().as_millis(),
        applied,
        calls
    );
    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quarry_chunk::GridDims;
    use quarry_world::WorldGenMode;

    fn registry() -> Arc<BlockRegistry> {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/blocks.toml");
        Arc::new(BlockRegistry::load_from_path(path).unwrap())
    }

    fn small_flat() -> WorldConfig {
        let mut cfg = WorldConfig {
            chunk_size: GridDims::cubic(8),
            subchunk_size: GridDims::cubic(4),
            ..WorldConfig::default()
        };
        cfg.worldgen.mode = WorldGenMode::Flat;
        cfg
    }

    fn opts(save_dir: Option<PathBuf>, offload: usize) -> SessionOptions {
        SessionOptions {
            seed: 1,
            radius: 1,
            ticks: 60,
            save_dir,
            offload,
        }
    }

    #[test]
    fn bundled_assets_parse() {
        let reg = registry();
        assert_eq!(reg.id_by_name("cobblestone"), Some(1));
        assert!(reg.get(10).unwrap().is_glass());
        let cfg = WorldConfig::load_from_path(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/assets/world.toml"
        ))
        .unwrap();
        assert_eq!(cfg.chunk_size, GridDims::CHUNK);
        assert_eq!(cfg.persist_layers, (0, 0));
    }

    #[test]
    fn session_walks_and_edits() {
        let report = run(registry(), &small_flat(), &opts(None, 0)).unwrap();
        assert_eq!(report.chunks, 9);
        assert!(report.faces > 0);
        // Spawned at (0.5, 6, 0.5) above a 4 block slab; ends standing on it.
        assert!(report.final_pos.y >= 4.0 - 1e-3);
    }

    #[test]
    fn saved_session_reloads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let first = run(
            registry(),
            &small_flat(),
            &opts(Some(dir.path().to_path_buf()), 0),
        )
        .unwrap();
        let second = run(
            registry(),
            &small_flat(),
            &opts(Some(dir.path().to_path_buf()), 0),
        )
        .unwrap();
        assert_eq!(second.loaded, first.saved);
    }

    #[test]
    fn offloaded_session_installs_every_subchunk() {
        let report = run(registry(), &small_flat(), &opts(None, 2)).unwrap();
        assert_eq!(report.offloaded, 9 * 8);
    }
}
