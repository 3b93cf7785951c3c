//! Off-thread subchunk meshing.
//!
//! Workers mesh a captured [`BlockWindow`] and call back to the thread that
//! owns the [`World`] for any neighbour outside it. Calls are matched by
//! request id and answered from [`MeshRuntime::pump`], so the main thread
//! must keep pumping while jobs are outstanding.
#![forbid(unsafe_code)]

mod window;
mod worker;

use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender, select, unbounded};
use hashbrown::HashMap;
use quarry_chunk::{ChunkCoord, SubchunkCoord};
use quarry_world::World;
use rayon::{ThreadPool, ThreadPoolBuilder};
use thiserror::Error;

pub use window::BlockWindow;
pub use worker::{CallRequest, CallResponse, MeshOut};

use crate::worker::{MeshJob, WorkerLink, run_worker};

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("mesh runtime needs at least one worker")]
    NoWorkers,
    #[error("failed to build worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
    #[error("chunk {0:?} is not loaded")]
    ChunkNotLoaded(ChunkCoord),
    #[error("subchunk {sc:?} is outside chunk {coord:?}")]
    InvalidSubchunk { coord: ChunkCoord, sc: SubchunkCoord },
    #[error("mesh runtime is shut down")]
    ShutDown,
}

pub struct MeshRuntime {
    job_tx: Option<Sender<MeshJob>>,
    res_rx: Receiver<MeshOut>,
    call_rx: Receiver<CallRequest>,
    reply_tx: Vec<Sender<CallResponse>>,
    // Calls received but not yet answered, by request id.
    in_flight: HashMap<u64, CallRequest>,
    next_job: u64,
    submitted: usize,
    completed: usize,
    _pool: Arc<ThreadPool>,
}

impl MeshRuntime {
    pub fn new(workers: usize) -> Result<Self, RuntimeError> {
        if workers == 0 {
            return Err(RuntimeError::NoWorkers);
        }
        let (job_tx, job_rx) = unbounded::<MeshJob>();
        let (res_tx, res_rx) = unbounded::<MeshOut>();
        let (call_tx, call_rx) = unbounded::<CallRequest>();
        let next_request = Arc::new(AtomicU64::new(0));

        let pool = Arc::new(
            ThreadPoolBuilder::new()
                .num_threads(workers)
                .thread_name(|i| format!("quarry-mesh-{i}"))
                .build()?,
        );
        let mut reply_tx = Vec::with_capacity(workers);
        for index in 0..workers {
            let (tx, rx) = unbounded::<CallResponse>();
            reply_tx.push(tx);
            let link = WorkerLink {
                index,
                calls: call_tx.clone(),
                replies: rx,
                next_request: Arc::clone(&next_request),
            };
            let jobs = job_rx.clone();
            let results = res_tx.clone();
            pool.spawn(move || run_worker(link, jobs, results));
        }
        log::info!("mesh runtime started with {workers} workers");

        Ok(Self {
            job_tx: Some(job_tx),
            res_rx,
            call_rx,
            reply_tx,
            in_flight: HashMap::new(),
            next_job: 0,
            submitted: 0,
            completed: 0,
            _pool: pool,
        })
    }

    #[inline]
    pub fn workers(&self) -> usize {
        self.reply_tx.len()
    }

    /// Jobs submitted whose result has not been returned yet.
    #[inline]
    pub fn pending_jobs(&self) -> usize {
        self.submitted - self.completed
    }

    #[inline]
    pub fn in_flight_calls(&self) -> usize {
        self.in_flight.len()
    }

    /// Queues a remesh of one subchunk. The block window and the chunk
    /// revision are captured now; if the chunk changes before the result is
    /// installed, `World::apply_subchunk_mesh` refuses it.
    pub fn submit(
        &mut self,
        world: &World,
        coord: ChunkCoord,
        sc: SubchunkCoord,
    ) -> Result<u64, RuntimeError> {
        let chunk = world
            .chunk(coord)
            .ok_or(RuntimeError::ChunkNotLoaded(coord))?;
        let layout = world.layout();
        let counts = layout.counts();
        if sc.x >= counts.sx || sc.y >= counts.sy || sc.z >= counts.sz {
            return Err(RuntimeError::InvalidSubchunk { coord, sc });
        }
        let job_tx = self.job_tx.as_ref().ok_or(RuntimeError::ShutDown)?;
        let job_id = self.next_job;
        let job = MeshJob {
            job_id,
            coord,
            sc,
            rev: chunk.rev(),
            window: BlockWindow::capture(chunk, layout, sc),
            reg: Arc::clone(world.registry()),
        };
        job_tx.send(job).map_err(|_| RuntimeError::ShutDown)?;
        self.next_job += 1;
        self.submitted += 1;
        Ok(job_id)
    }

    /// Queues every subchunk of a chunk.
    pub fn submit_chunk(
        &mut self,
        world: &World,
        coord: ChunkCoord,
    ) -> Result<Vec<u64>, RuntimeError> {
        world
            .layout()
            .iter()
            .map(|sc| self.submit(world, coord, sc))
            .collect()
    }

    /// Answers every queued worker call and returns finished meshes.
    /// Never blocks.
    pub fn pump(&mut self, world: &World) -> Vec<MeshOut> {
        for req in self.call_rx.try_iter() {
            track_call(&mut self.in_flight, req);
        }
        self.answer_calls(world);
        let out: Vec<MeshOut> = self.res_rx.try_iter().collect();
        self.completed += out.len();
        out
    }

    /// Pumps and installs the results into `world`. Returns how many
    /// subchunk meshes were installed; results for chunks edited since
    /// submission are dropped.
    pub fn pump_into(&mut self, world: &mut World) -> usize {
        let mut applied = 0;
        for out in self.pump(world) {
            if world.apply_subchunk_mesh(out.coord, out.sc, out.rev, out.mesh) {
                applied += 1;
            }
        }
        applied
    }

    /// Pumps until every submitted job has returned or `timeout` elapses.
    pub fn finish(&mut self, world: &World, timeout: Duration) -> Vec<MeshOut> {
        let deadline = Instant::now() + timeout;
        let call_rx = self.call_rx.clone();
        let res_rx = self.res_rx.clone();
        let mut outs = self.pump(world);
        while self.pending_jobs() > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            select! {
                recv(call_rx) -> msg => match msg {
                    Ok(req) => {
                        track_call(&mut self.in_flight, req);
                        self.answer_calls(world);
                    }
                    Err(_) => break,
                },
                recv(res_rx) -> msg => match msg {
                    Ok(out) => {
                        self.completed += 1;
                        outs.push(out);
                    }
                    Err(_) => break,
                },
                default(remaining) => {
                    log::warn!(
                        "mesh runtime: {} jobs still pending after {:?}",
                        self.pending_jobs(),
                        timeout
                    );
                    break;
                }
            }
        }
        outs
    }

    fn answer_calls(&mut self, world: &World) {
        for (request_id, req) in self.in_flight.drain() {
            let block = world.block_id(req.pos);
            let Some(tx) = self.reply_tx.get(req.worker) else {
                log::warn!("call {request_id} names unknown worker {}", req.worker);
                continue;
            };
            if tx.send(CallResponse { request_id, block }).is_err() {
                log::debug!("worker {} gone before call {request_id} was answered", req.worker);
            }
        }
    }
}

fn track_call(in_flight: &mut HashMap<u64, CallRequest>, req: CallRequest) {
    if in_flight.insert(req.request_id, req).is_some() {
        log::warn!("duplicate call request id {}", req.request_id);
    }
}

impl Drop for MeshRuntime {
    fn drop(&mut self) {
        // Workers leave their loop once the job queue is closed and drained.
        self.job_tx.take();
        log::debug!(
            "mesh runtime shutting down, {} jobs unfinished",
            self.pending_jobs()
        );
    }
}
