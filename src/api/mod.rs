use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use num_derive::{FromPrimitive, ToPrimitive};
use thiserror::Error;

pub mod frame;

use crate::dec::pipeline::Pipeline;
use crate::def::pel;
use crate::lf::wpp::{SyncPool, ThreadPool, WorkerPool};
use crate::recon::ReconStage;
use frame::Frame;

pub use crate::def::{
    BlockSize, LoopFilterParams, ModeInfo, ModeInfoGrid, PredictionMode, RefFrame, Segmentation,
    TxSize, MAX_LOOP_FILTER, MAX_SEGMENTS, N_C,
};
pub use crate::lf::wpp::ScheduleMode;
pub use crate::picman::FramePool;
pub use crate::recon::ReconFrame;

/*****************************************************************************
 * return values and error code
 *****************************************************************************/

#[derive(Debug, Error, FromPrimitive, ToPrimitive, PartialEq, Eq, Clone, Copy)]
pub enum Vp9Error {
    #[error("unspecified decoder failure")]
    CodecError = 1,
    #[error("memory allocation failed")]
    MemError = 2,
    #[error("bitstream not parseable by this decoder")]
    UnsupBitstream = 5,
    #[error("bitstream uses an unimplemented feature")]
    UnsupFeature = 6,
    #[error("packet is corrupt or truncated")]
    CorruptFrame = 7,
    #[error("invalid parameter")]
    InvalidParam = 8,
    #[error("no output frame available")]
    OutputNotAvailable = 9,
}

impl Default for Vp9Error {
    fn default() -> Self {
        Vp9Error::CodecError
    }
}

/*****************************************************************************
 * status after decoder operation
 *****************************************************************************/
#[derive(Debug, Default)]
pub struct Vp9dStat {
    /* byte size of the consumed packet payload */
    pub read: usize,
    /* index of the decoded frame, counting shown frames from zero */
    pub fnum: isize,
    /* presentation interval carried through from the packet */
    pub ts: u64,
    pub ts_end: u64,
    /* whether the decoded frame is meant to be displayed */
    pub show_frame: bool,
    /* whether pull() has a frame ready */
    pub img_avail: bool,
    /* whether the just-decoded frame came out of a damaged packet */
    pub corrupted: bool,
}

pub struct Packet {
    pub data: Option<Vec<u8>>,
    /// Presentation interval of the frame in this packet; the pair rides
    /// along to the decoded frame unchanged.
    pub pts: u64,
    pub pts_end: u64,
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let len = if let Some(data) = &self.data {
            data.len()
        } else {
            0
        };
        write!(f, "Packet {} - {} bytes", self.pts, len)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, FromPrimitive)]
#[repr(C)]
pub enum ChromaSampling {
    Cs400,
    Cs420,
    Cs422,
    Cs444,
}

impl Default for ChromaSampling {
    fn default() -> Self {
        ChromaSampling::Cs420
    }
}

impl ChromaSampling {
    // Provides the sampling period in the horizontal and vertical axes.
    pub fn sampling_period(self) -> (usize, usize) {
        use self::ChromaSampling::*;
        match self {
            Cs420 => (2, 2),
            Cs422 => (2, 1),
            Cs444 => (1, 1),
            Cs400 => (2, 2),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Config {
    /// Worker threads for the loop filter; 1 runs everything inline.
    pub threads: usize,
    /// Filter only the middle band of each frame, trading quality for speed.
    pub partial_filter: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            threads: 1,
            partial_filter: false,
        }
    }
}

pub struct Context {
    pipeline: Pipeline,
}

impl Context {
    pub fn new(cfg: &Config, recon: Box<dyn ReconStage>) -> Result<Self, Vp9Error> {
        if cfg.threads == 0 {
            return Err(Vp9Error::InvalidParam);
        }
        let workers: Box<dyn WorkerPool> = if cfg.threads > 1 {
            Box::new(ThreadPool::new(cfg.threads))
        } else {
            Box::new(SyncPool)
        };
        Ok(Context {
            pipeline: Pipeline::new(
                Rc::new(RefCell::new(recon)),
                workers,
                cfg.partial_filter,
            ),
        })
    }

    /// Decodes one packet. The packet's payload is consumed; `None` or empty
    /// payloads flush the frame still in flight.
    pub fn decode(&mut self, pkt: &mut Packet) -> Result<Vp9dStat, Vp9Error> {
        let data = pkt.data.take();
        self.pipeline.decode(data.as_deref(), pkt.pts, pkt.pts_end)
    }

    /// Takes the oldest decoded frame. Because decode is pipelined, the
    /// frame for packet n becomes available after feeding packet n+1 or
    /// flushing.
    pub fn pull(&mut self) -> Result<Rc<RefCell<Frame<pel>>>, Vp9Error> {
        match self.pipeline.take_output() {
            Some(out) => Ok(out.frame),
            None => Err(Vp9Error::OutputNotAvailable),
        }
    }

    /// Whether the most recently decoded packet was damaged.
    pub fn frame_corrupted(&self) -> bool {
        self.pipeline.frame_corrupted()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::def::*;
    use crate::picman::FramePool;

    use std::sync::Arc;

    struct GradientRecon;

    impl ReconStage for GradientRecon {
        fn reconstruct(
            &mut self,
            _data: &[u8],
            pool: &mut FramePool,
        ) -> Result<ReconFrame, Vp9Error> {
            let frame = pool.get_frame(128, 96)?;
            {
                let mut f = frame.borrow_mut();
                let h = f.planes[0].cfg.height;
                for y in 0..h {
                    for (x, s) in f.planes[0].row_mut(y).iter_mut().enumerate() {
                        *s = ((x * 31 + y * 17) & 0xff) as u8;
                    }
                }
            }
            let mut mi = ModeInfo::default();
            mi.sb_type = BlockSize::BLOCK_64X64;
            mi.tx_size = TxSize::TX_32X32;
            let mut grid = ModeInfoGrid::for_frame_size(128, 96);
            for r in (0..grid.mi_rows).step_by(8) {
                for c in (0..grid.mi_cols).step_by(8) {
                    grid.set_block(r, c, mi);
                }
            }
            let lf = LoopFilterParams {
                filter_level: 24,
                mode_ref_delta_enabled: false,
                ..Default::default()
            };
            Ok(ReconFrame {
                frame,
                mi: Arc::new(grid),
                lf,
                seg: Segmentation::default(),
                width: 128,
                height: 96,
                show_frame: true,
                corrupted: false,
            })
        }
    }

    #[test]
    fn rejects_zero_threads() {
        let cfg = Config {
            threads: 0,
            ..Default::default()
        };
        assert!(Context::new(&cfg, Box::new(GradientRecon)).is_err());
    }

    #[test]
    fn decode_pull_flush_cycle() {
        let mut ctx = Context::new(&Config::default(), Box::new(GradientRecon)).unwrap();

        let mut pkt = Packet {
            data: Some(vec![1, 2, 3]),
            pts: 10,
            pts_end: 14,
        };
        let stat = ctx.decode(&mut pkt).unwrap();
        assert_eq!(stat.read, 3);
        assert_eq!(stat.ts, 10);
        assert_eq!(stat.ts_end, 14);
        assert!(pkt.data.is_none());
        assert_eq!(ctx.pull().unwrap_err(), Vp9Error::OutputNotAvailable);

        let mut pkt = Packet {
            data: Some(vec![4]),
            pts: 20,
            pts_end: 24,
        };
        let stat = ctx.decode(&mut pkt).unwrap();
        assert!(stat.img_avail);
        let first = ctx.pull().unwrap();
        assert_eq!(first.borrow().ts, 10);
        assert_eq!(first.borrow().ts_end, 14);

        let mut flush = Packet {
            data: None,
            pts: 30,
            pts_end: 30,
        };
        let stat = ctx.decode(&mut flush).unwrap();
        assert!(stat.img_avail);
        let last = ctx.pull().unwrap();
        assert_eq!(last.borrow().ts, 20);
        assert_eq!(last.borrow().ts_end, 24);
        assert!(!ctx.frame_corrupted());
    }

    #[test]
    fn threaded_context_matches_serial_output() {
        let decode_all = |threads: usize| {
            let cfg = Config {
                threads,
                ..Default::default()
            };
            let mut ctx = Context::new(&cfg, Box::new(GradientRecon)).unwrap();
            ctx.decode(&mut Packet {
                data: Some(vec![0]),
                pts: 0,
                pts_end: 1,
            })
            .unwrap();
            ctx.decode(&mut Packet {
                data: None,
                pts: 1,
                pts_end: 1,
            })
            .unwrap();
            ctx.pull().unwrap()
        };
        let serial = decode_all(1);
        let threaded = decode_all(4);
        let a = serial.borrow();
        let b = threaded.borrow();
        for p in 0..N_C {
            for y in 0..a.planes[p].cfg.height {
                assert_eq!(a.planes[p].row(y), b.planes[p].row(y), "plane {} row {}", p, y);
            }
        }
    }
}
