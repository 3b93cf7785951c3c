//! Headless driver: loads the block catalogue and world settings, builds a
//! region around the origin and runs a scripted walk with block edits.
#![forbid(unsafe_code)]

mod session;

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use quarry_blocks::BlockRegistry;
use quarry_world::WorldConfig;

use crate::session::SessionOptions;

#[derive(Parser, Debug)]
#[command(name = "quarry", version, about = "Voxel meshing and movement driver")]
struct Args {
    /// Block catalogue.
    #[arg(long, default_value = "assets/blocks.toml")]
    blocks: PathBuf,
    /// World and terrain settings; built-in defaults when omitted.
    #[arg(long)]
    worldgen: Option<PathBuf>,
    #[arg(long, default_value_t = 1337)]
    seed: i32,
    /// Chunk columns loaded around the origin in each direction.
    #[arg(long, default_value_t = 2)]
    radius: i32,
    /// Physics ticks at 60 Hz.
    #[arg(long, default_value_t = 300)]
    ticks: u32,
    /// Persist edited chunks under this directory.
    #[arg(long)]
    save_dir: Option<PathBuf>,
    /// Remesh the loaded region on this many worker threads (0 = off).
    #[arg(long, default_value_t = 0)]
    offload: usize,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let reg = Arc::new(BlockRegistry::load_from_path(&args.blocks)?);
    log::info!(
        "loaded {} block types ({} textures) from {}",
        reg.len(),
        reg.textures.len(),
        args.blocks.display()
    );
    let cfg = match &args.worldgen {
        Some(path) => {
            let cfg = WorldConfig::load_from_path(path)?;
            log::info!("world config loaded from {}", path.display());
            cfg
        }
        None => WorldConfig::default(),
    };

    let opts = SessionOptions {
        seed: args.seed,
        radius: args.radius,
        ticks: args.ticks,
        save_dir: args.save_dir,
        offload: args.offload,
    };
    let report = session::run(reg, &cfg, &opts)?;
    log::info!(
        "session done: chunks={} faces={} offloaded={} edits={} saved={} player=({:.2}, {:.2}, {:.2})",
        report.chunks,
        report.faces,
        report.offloaded,
        report.edits,
        report.saved,
        report.final_pos.x,
        report.final_pos.y,
        report.final_pos.z
    );
    Ok(())
}
