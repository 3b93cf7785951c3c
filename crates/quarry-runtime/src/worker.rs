use std::cell::Cell;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use crossbeam_channel::{Receiver, Sender};
use quarry_blocks::{AIR, BlockId, BlockRegistry};
use quarry_chunk::{ChunkCoord, SubchunkCoord, VoxelQuery};
use quarry_geom::BlockPos;
use quarry_mesh_cpu::{MeshBuild, build_grid_mesh};

use crate::window::BlockWindow;

/// Block lookup a worker could not answer from its window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CallRequest {
    pub request_id: u64,
    pub worker: usize,
    pub pos: BlockPos,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CallResponse {
    pub request_id: u64,
    pub block: BlockId,
}

pub(crate) struct MeshJob {
    pub job_id: u64,
    pub coord: ChunkCoord,
    pub sc: SubchunkCoord,
    pub rev: u64,
    pub window: BlockWindow,
    pub reg: Arc<BlockRegistry>,
}

/// A finished subchunk mesh.
#[derive(Debug)]
pub struct MeshOut {
    pub job_id: u64,
    pub coord: ChunkCoord,
    pub sc: SubchunkCoord,
    /// Chunk revision the window was captured at.
    pub rev: u64,
    pub mesh: MeshBuild,
    /// Lookups answered by the main thread while meshing.
    pub calls: usize,
    pub t_mesh_ms: u32,
}

/// A worker's end of the call channel pair.
pub(crate) struct WorkerLink {
    pub index: usize,
    pub calls: Sender<CallRequest>,
    pub replies: Receiver<CallResponse>,
    pub next_request: Arc<AtomicU64>,
}

impl WorkerLink {
    /// Blocks until the main thread answers. A closed channel answers air.
    fn call(&self, pos: BlockPos) -> BlockId {
        let request_id = self.next_request.fetch_add(1, Ordering::Relaxed);
        let req = CallRequest {
            request_id,
            worker: self.index,
            pos,
        };
        if self.calls.send(req).is_err() {
            log::debug!("worker {}: call channel closed, treating {pos:?} as air", self.index);
            return AIR;
        }
        loop {
            match self.replies.recv() {
                Ok(resp) if resp.request_id == request_id => return resp.block,
                Ok(resp) => log::warn!(
                    "worker {}: reply {} does not match request {request_id}",
                    self.index,
                    resp.request_id
                ),
                Err(_) => {
                    log::debug!("worker {}: reply channel closed during call", self.index);
                    return AIR;
                }
            }
        }
    }
}

struct WindowQuery<'a> {
    window: &'a BlockWindow,
    link: &'a WorkerLink,
    calls: Cell<usize>,
}

impl VoxelQuery for WindowQuery<'_> {
    fn block_id(&self, pos: BlockPos) -> BlockId {
        if let Some(id) = self.window.get(pos) {
            return id;
        }
        self.calls.set(self.calls.get() + 1);
        self.link.call(pos)
    }
}

fn process_job(job: MeshJob, link: &WorkerLink) -> MeshOut {
    let t0 = Instant::now();
    let query = WindowQuery {
        window: &job.window,
        link,
        calls: Cell::new(0),
    };
    let mut mesh = MeshBuild::default();
    build_grid_mesh(
        &mut mesh,
        &query,
        &job.reg,
        job.window.interior_min(),
        job.window.interior_dims(),
    );
    let t_mesh_ms = t0.elapsed().as_millis().min(u128::from(u32::MAX)) as u32;
    MeshOut {
        job_id: job.job_id,
        coord: job.coord,
        sc: job.sc,
        rev: job.rev,
        mesh,
        calls: query.calls.get(),
        t_mesh_ms,
    }
}

pub(crate) fn run_worker(link: WorkerLink, jobs: Receiver<MeshJob>, results: Sender<MeshOut>) {
    while let Ok(job) = jobs.recv() {
        let out = process_job(job, &link);
        log::trace!(
            target: "perf",
            "ms={} offload_mesh worker={} job={} calls={} faces={}",
            out.t_mesh_ms,
            link.index,
            out.job_id,
            out.calls,
            out.mesh.face_count()
        );
        if results.send(out).is_err() {
            break;
        }
    }
    log::debug!("mesh worker {} exiting", link.index);
}
