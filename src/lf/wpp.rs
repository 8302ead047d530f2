//! Wavefront dispatch for the loop filter: each worker owns every n-th
//! superblock row and trails the worker above it by one row, tracked with a
//! per-strip progress counter.

use crate::api::frame::Frame;
use crate::def::*;
use crate::lf::{filter_block, LoopFilterInfo};
use crate::plane::Plane;
use crate::plane_region::PlaneRegionMut;

use log::{debug, error};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::thread;

const MAX_LF_WORKERS: usize = 32;

/// Row-range policy for the next dispatch. `Partial` keeps only a fraction
/// of the lanes busy so a preview pass does not monopolize the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleMode {
    Full,
    Partial,
}

/// How strip tasks get executed.
pub trait WorkerPool {
    /// Number of strips the next dispatch should be cut into.
    fn workers(&self) -> usize;
    fn spawn(&mut self, strip: FilterStrip) -> StripHandle;
    fn join(&mut self, handle: StripHandle);
    fn set_mode(&mut self, _mode: ScheduleMode) {}
}

pub struct StripHandle {
    join: Option<thread::JoinHandle<()>>,
    /// Strip whose worker never started; the dispatcher must drive it.
    stranded: Option<FilterStrip>,
}

/* raw pointer to the (0, 0) visible sample of one plane; the job it belongs
 * to never outlives the frame borrow in loop_filter_rows */
#[derive(Clone, Copy)]
struct PlaneHandle {
    data: *mut pel,
    stride: usize,
    width: usize,
    height: usize,
}

unsafe impl Send for PlaneHandle {}
unsafe impl Sync for PlaneHandle {}

impl PlaneHandle {
    fn new(plane: &mut Plane<pel>) -> Self {
        let cfg = plane.cfg;
        let origin = cfg.yorigin * cfg.stride + cfg.xorigin;
        PlaneHandle {
            data: unsafe { plane.data.as_mut_ptr().add(origin) },
            stride: cfg.stride,
            width: cfg.width,
            height: cfg.height,
        }
    }

    unsafe fn region(&self) -> PlaneRegionMut<'static, pel> {
        PlaneRegionMut::from_raw_parts(self.data, self.stride, self.width, self.height)
    }
}

/// Shared state of one frame dispatch.
pub struct FilterJob {
    planes: [PlaneHandle; N_C],
    grid: Arc<ModeInfoGrid>,
    lfi: LoopFilterInfo,
    /// Last mi row each strip has fully filtered; -8 relative to `start`
    /// until the strip finishes its first row.
    progress: Vec<AtomicI64>,
    start_mi_row: usize,
    end_mi_row: usize,
    step: usize,
    y_only: bool,
}

/// One worker's share of a dispatch: superblock rows `next_mi_row`,
/// `next_mi_row + step`, ... gated on the strip covering the row above.
#[derive(Clone)]
pub struct FilterStrip {
    job: Arc<FilterJob>,
    nr: usize,
    next_mi_row: usize,
    upper: usize,
}

impl FilterStrip {
    fn done(&self) -> bool {
        self.next_mi_row >= self.job.end_mi_row
    }

    /// The row above must be fully filtered before ours starts: its
    /// horizontal pass writes into our top pixels.
    fn gate_open(&self) -> bool {
        if self.next_mi_row <= self.job.start_mi_row {
            return true;
        }
        let target = self.next_mi_row as i64 - MI_BLOCK_SIZE as i64;
        self.job.progress[self.upper].load(Ordering::Acquire) >= target
    }

    fn filter_next_row(&mut self) {
        let job = &*self.job;
        let mi_row = self.next_mi_row;
        // Safe: strips only touch rows they own, and the row gate keeps
        // neighbouring strips a full superblock row apart.
        let mut regions = unsafe {
            [
                job.planes[0].region(),
                job.planes[1].region(),
                job.planes[2].region(),
            ]
        };
        for mi_col in (0..job.grid.mi_cols).step_by(MI_BLOCK_SIZE) {
            filter_block(&mut regions, &job.grid, &job.lfi, mi_row, mi_col, job.y_only);
        }
        self.next_mi_row += job.step;
        if self.done() {
            // run-out marker so strips below never stall on a finished lane
            job.progress[self.nr].store(job.end_mi_row as i64, Ordering::Release);
        } else {
            job.progress[self.nr].store(mi_row as i64, Ordering::Release);
        }
    }

    /// Filters every remaining row whose gate is already open, without
    /// blocking. Returns true once the strip has covered its whole range.
    fn advance(&mut self) -> bool {
        while !self.done() && self.gate_open() {
            self.filter_next_row();
        }
        self.done()
    }

    pub fn run(mut self) {
        while !self.done() {
            while !self.gate_open() {
                thread::yield_now();
            }
            self.filter_next_row();
        }
    }
}

/// Cuts the row range into interleaved strips and runs them on the pool.
/// Returns once the whole range is filtered.
pub(crate) fn loop_filter_rows(
    frame: &mut Frame<pel>,
    grid: &Arc<ModeInfoGrid>,
    lfi: &LoopFilterInfo,
    pool: &mut dyn WorkerPool,
    start: usize,
    stop: usize,
    y_only: bool,
) {
    if start >= stop {
        return;
    }
    let sb_rows = (stop - start + MI_BLOCK_SIZE - 1) / MI_BLOCK_SIZE;
    let n = pool.workers().max(1).min(MAX_LF_WORKERS).min(sb_rows);
    debug!("dispatching {} filter strips over mi rows {}..{}", n, start, stop);

    let planes = [
        PlaneHandle::new(&mut frame.planes[0]),
        PlaneHandle::new(&mut frame.planes[1]),
        PlaneHandle::new(&mut frame.planes[2]),
    ];
    let progress = (0..n)
        .map(|_| AtomicI64::new(start as i64 - MI_BLOCK_SIZE as i64))
        .collect();
    let job = Arc::new(FilterJob {
        planes,
        grid: grid.clone(),
        lfi: lfi.clone(),
        progress,
        start_mi_row: start,
        end_mi_row: stop,
        step: n * MI_BLOCK_SIZE,
        y_only,
    });

    let mut handles = Vec::with_capacity(n);
    let mut stranded = Vec::new();
    for i in 0..n {
        let mut h = pool.spawn(FilterStrip {
            job: job.clone(),
            nr: i,
            next_mi_row: start + MI_BLOCK_SIZE * i,
            upper: (i + n - 1) % n,
        });
        if let Some(strip) = h.stranded.take() {
            stranded.push(strip);
        }
        handles.push(h);
    }
    // Strips whose worker never started are driven from this thread, only
    // once every other strip has been dispatched: running one inline during
    // the spawn loop would stall its row gate on a strip not yet spawned.
    // Polling them interleaved keeps the wavefront moving even when several
    // lanes end up stranded, since the lowest pending row is always open.
    while !stranded.is_empty() {
        let mut i = 0;
        while i < stranded.len() {
            if stranded[i].advance() {
                stranded.swap_remove(i);
            } else {
                i += 1;
            }
        }
        if !stranded.is_empty() {
            thread::yield_now();
        }
    }
    for h in handles {
        pool.join(h);
    }
}

/// Pool backed by one short-lived thread per strip.
pub struct ThreadPool {
    threads: usize,
    tail_threads: usize,
    mode: ScheduleMode,
}

impl ThreadPool {
    pub fn new(threads: usize) -> Self {
        let threads = threads.max(1);
        ThreadPool {
            threads,
            // a partial pass keeps the front lanes free for decode work
            tail_threads: (threads / 2).max(1),
            mode: ScheduleMode::Full,
        }
    }
}

impl WorkerPool for ThreadPool {
    fn workers(&self) -> usize {
        match self.mode {
            ScheduleMode::Full => self.threads,
            ScheduleMode::Partial => self.tail_threads,
        }
    }

    fn spawn(&mut self, strip: FilterStrip) -> StripHandle {
        let fallback = strip.clone();
        let builder = thread::Builder::new().name(format!("lf-strip-{}", strip.nr));
        match builder.spawn(move || strip.run()) {
            Ok(join) => StripHandle {
                join: Some(join),
                stranded: None,
            },
            Err(e) => {
                error!("failed to spawn filter worker: {}, deferring the strip", e);
                StripHandle {
                    join: None,
                    stranded: Some(fallback),
                }
            }
        }
    }

    fn join(&mut self, handle: StripHandle) {
        if let Some(join) = handle.join {
            if join.join().is_err() {
                error!("loop filter worker panicked");
            }
        }
    }

    fn set_mode(&mut self, mode: ScheduleMode) {
        self.mode = mode;
    }
}

/// Single-threaded pool: strips run inline at spawn time. Always reports one
/// worker, since two inline strips would deadlock on the row gate.
pub struct SyncPool;

impl WorkerPool for SyncPool {
    fn workers(&self) -> usize {
        1
    }

    fn spawn(&mut self, strip: FilterStrip) -> StripHandle {
        strip.run();
        StripHandle {
            join: None,
            stranded: None,
        }
    }

    fn join(&mut self, _handle: StripHandle) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::frame::Frame;
    use pretty_assertions::assert_eq;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaChaRng;

    fn noisy_frame(width: usize, height: usize, seed: u8) -> Frame<u8> {
        let mut ra = ChaChaRng::from_seed([seed; 32]);
        let mut f: Frame<u8> = Frame::new(width, height, Default::default());
        for plane in f.planes.iter_mut() {
            let h = plane.cfg.height;
            for y in 0..h {
                for s in plane.row_mut(y).iter_mut() {
                    // low-amplitude noise keeps every edge inside the
                    // lim/mblim gates at filter level 32
                    *s = 120 + (ra.gen::<u8>() & 15);
                }
            }
        }
        f
    }

    fn filtered_on(frame: &Frame<u8>, pool: &mut dyn WorkerPool) -> Frame<u8> {
        let mut out = frame.clone();
        let mut grid = ModeInfoGrid::for_frame_size(out.planes[0].cfg.width, out.planes[0].cfg.height);
        let mi = ModeInfo {
            sb_type: BlockSize::BLOCK_16X16,
            tx_size: TxSize::TX_8X8,
            ..Default::default()
        };
        for r in (0..grid.mi_rows).step_by(2) {
            for c in (0..grid.mi_cols).step_by(2) {
                grid.set_block(r, c, mi);
            }
        }
        let grid = Arc::new(grid);

        let mut lfi = LoopFilterInfo::default();
        let lf = LoopFilterParams {
            filter_level: 32,
            mode_ref_delta_enabled: false,
            ..Default::default()
        };
        lfi.frame_init(&lf, &Segmentation::default(), 32);

        loop_filter_rows(&mut out, &grid, &lfi, pool, 0, grid.mi_rows, false);
        out
    }

    fn filtered(frame: &Frame<u8>, threads: usize) -> Frame<u8> {
        if threads <= 1 {
            filtered_on(frame, &mut SyncPool)
        } else {
            filtered_on(frame, &mut ThreadPool::new(threads))
        }
    }

    #[test]
    fn parallel_output_matches_serial() {
        let frame = noisy_frame(192, 192, 7);
        let serial = filtered(&frame, 1);
        let wide = filtered(&frame, 4);
        for p in 0..N_C {
            for y in 0..serial.planes[p].cfg.height {
                assert_eq!(
                    serial.planes[p].row(y),
                    wide.planes[p].row(y),
                    "plane {} row {}",
                    p,
                    y
                );
            }
        }
    }

    #[test]
    fn filtering_changes_noisy_content() {
        let frame = noisy_frame(128, 128, 3);
        let out = filtered(&frame, 2);
        let mut changed = 0usize;
        for y in 0..128 {
            for x in 0..128 {
                if frame.planes[0].p(x, y) != out.planes[0].p(x, y) {
                    changed += 1;
                }
            }
        }
        assert!(changed > 0);
    }

    /// Pool whose workers never start, so the dispatcher has to drive every
    /// strip itself.
    struct RefusingPool {
        lanes: usize,
    }

    impl WorkerPool for RefusingPool {
        fn workers(&self) -> usize {
            self.lanes
        }

        fn spawn(&mut self, strip: FilterStrip) -> StripHandle {
            StripHandle {
                join: None,
                stranded: Some(strip),
            }
        }

        fn join(&mut self, _handle: StripHandle) {}
    }

    #[test]
    fn stranded_strips_still_cover_the_frame() {
        let frame = noisy_frame(192, 192, 9);
        let serial = filtered(&frame, 1);
        let stranded = filtered_on(&frame, &mut RefusingPool { lanes: 3 });
        for p in 0..N_C {
            for y in 0..serial.planes[p].cfg.height {
                assert_eq!(
                    serial.planes[p].row(y),
                    stranded.planes[p].row(y),
                    "plane {} row {}",
                    p,
                    y
                );
            }
        }
    }

    #[test]
    fn partial_mode_narrows_the_pool() {
        let mut pool = ThreadPool::new(8);
        assert_eq!(pool.workers(), 8);
        pool.set_mode(ScheduleMode::Partial);
        assert_eq!(pool.workers(), 4);
        pool.set_mode(ScheduleMode::Full);
        assert_eq!(pool.workers(), 8);
        assert_eq!(ThreadPool::new(1).workers(), 1);
    }

    #[test]
    fn empty_range_is_a_no_op() {
        let mut frame = noisy_frame(64, 64, 1);
        let reference = frame.clone();
        let grid = Arc::new(ModeInfoGrid::for_frame_size(64, 64));
        let lfi = LoopFilterInfo::default();
        let mut pool = SyncPool;
        loop_filter_rows(&mut frame, &grid, &lfi, &mut pool, 8, 8, false);
        for y in 0..64 {
            assert_eq!(frame.planes[0].row(y), reference.planes[0].row(y));
        }
    }
}
