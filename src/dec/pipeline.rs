use crate::api::{Vp9Error, Vp9dStat};
use crate::dec::{OutputFrame, SharedRecon, Vp9dCtx};
use crate::lf::wpp::WorkerPool;

use log::debug;
use std::mem;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PipelineState {
    /// First packet in flight; there is no previous frame to emit yet.
    WarmingUp,
    Steady,
}

/// Double-buffered decode pipeline: while one context decodes packet n, the
/// frame of packet n-1 is collected from the other context, then the two
/// swap roles. Output therefore trails input by exactly one packet until a
/// flush drains the last frame.
pub(crate) struct Pipeline {
    live: Vp9dCtx,
    pending: Vp9dCtx,
    state: PipelineState,
    workers: Box<dyn WorkerPool>,
    partial_filter: bool,
    current_video_frame: u64,
    out: Option<OutputFrame>,
}

impl Pipeline {
    pub fn new(recon: SharedRecon, workers: Box<dyn WorkerPool>, partial_filter: bool) -> Self {
        Pipeline {
            live: Vp9dCtx::new(recon.clone()),
            pending: Vp9dCtx::new(recon),
            state: PipelineState::WarmingUp,
            workers,
            partial_filter,
            current_video_frame: 0,
            out: None,
        }
    }

    /// Feeds one packet. `None` or empty data flushes the in-flight frame.
    pub fn decode(
        &mut self,
        data: Option<&[u8]>,
        ts: u64,
        ts_end: u64,
    ) -> Result<Vp9dStat, Vp9Error> {
        match data {
            Some(d) if !d.is_empty() => self.decode_frame(d, ts, ts_end),
            _ => Ok(self.flush(ts, ts_end)),
        }
    }

    fn decode_frame(&mut self, data: &[u8], ts: u64, ts_end: u64) -> Result<Vp9dStat, Vp9Error> {
        let res = self.live.receive_compressed(
            data,
            ts,
            ts_end,
            &mut *self.workers,
            self.partial_filter,
        );

        // Collect the previous packet's frame and rotate, error or not; a
        // broken packet must not wedge the frame that preceded it.
        self.out = match self.state {
            PipelineState::Steady => self.pending.take_output(),
            PipelineState::WarmingUp => None,
        };
        mem::swap(&mut self.live, &mut self.pending);
        self.state = PipelineState::Steady;

        let show_frame = res?;
        if show_frame {
            self.current_video_frame += 1;
        }
        Ok(Vp9dStat {
            read: data.len(),
            fnum: self.current_video_frame as isize - 1,
            ts,
            ts_end,
            show_frame,
            img_avail: self.out.is_some(),
            corrupted: self.pending.frame_corrupted(),
        })
    }

    /// Emits the frame still in flight (if any) and rearms the pipeline.
    fn flush(&mut self, ts: u64, ts_end: u64) -> Vp9dStat {
        debug!("pipeline flush");
        self.out = match self.state {
            PipelineState::Steady => self.pending.take_output(),
            PipelineState::WarmingUp => None,
        };
        self.state = PipelineState::WarmingUp;
        Vp9dStat {
            read: 0,
            fnum: self.current_video_frame as isize - 1,
            ts,
            ts_end,
            show_frame: false,
            img_avail: self.out.is_some(),
            corrupted: self.pending.frame_corrupted(),
        }
    }

    pub fn take_output(&mut self) -> Option<OutputFrame> {
        self.out.take()
    }

    /// Corruption flag of the most recently decoded packet.
    pub fn frame_corrupted(&self) -> bool {
        self.pending.frame_corrupted()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::def::*;
    use crate::lf::wpp::SyncPool;
    use crate::picman::FramePool;
    use crate::recon::{ReconFrame, ReconStage};
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::Arc;

    /// Fills each frame with a per-packet shade so tests can tell frames
    /// apart after rotation; the first payload byte selects the shade and
    /// payload 0xee simulates a corrupt packet.
    struct ShadeRecon;

    impl ReconStage for ShadeRecon {
        fn reconstruct(
            &mut self,
            data: &[u8],
            pool: &mut FramePool,
        ) -> Result<ReconFrame, Vp9Error> {
            if data[0] == 0xee {
                return Err(Vp9Error::CorruptFrame);
            }
            let frame = pool.get_frame(64, 64)?;
            {
                let mut f = frame.borrow_mut();
                let shade = data[0];
                for plane in f.planes.iter_mut() {
                    let h = plane.cfg.height;
                    for y in 0..h {
                        for s in plane.row_mut(y).iter_mut() {
                            *s = shade;
                        }
                    }
                }
            }
            Ok(ReconFrame {
                frame,
                mi: Arc::new(ModeInfoGrid::for_frame_size(64, 64)),
                lf: LoopFilterParams::default(),
                seg: Segmentation::default(),
                width: 64,
                height: 64,
                show_frame: true,
                corrupted: false,
            })
        }
    }

    fn pipeline() -> Pipeline {
        let recon: SharedRecon = Rc::new(RefCell::new(Box::new(ShadeRecon)));
        Pipeline::new(recon, Box::new(SyncPool), false)
    }

    fn shade_of(out: &OutputFrame) -> u8 {
        out.frame.borrow().planes[0].p(0, 0)
    }

    #[test]
    fn output_trails_input_by_one_packet() {
        let mut p = pipeline();

        let stat = p.decode(Some(&[10]), 100, 105).unwrap();
        assert!(!stat.img_avail);
        assert!(p.take_output().is_none());

        let stat = p.decode(Some(&[20]), 200, 205).unwrap();
        assert!(stat.img_avail);
        assert_eq!(stat.ts, 200);
        assert_eq!(stat.ts_end, 205);
        let out = p.take_output().unwrap();
        assert_eq!(shade_of(&out), 10);
        assert_eq!(out.frame.borrow().ts, 100);
        assert_eq!(out.frame.borrow().ts_end, 105);

        let stat = p.decode(Some(&[30]), 300, 305).unwrap();
        assert!(stat.img_avail);
        assert_eq!(shade_of(&p.take_output().unwrap()), 20);
    }

    #[test]
    fn flush_drains_the_last_frame_and_rearms() {
        let mut p = pipeline();
        p.decode(Some(&[10]), 0, 1).unwrap();
        p.decode(Some(&[20]), 1, 2).unwrap();
        p.take_output();

        let stat = p.decode(None, 2, 2).unwrap();
        assert!(stat.img_avail);
        assert_eq!(shade_of(&p.take_output().unwrap()), 20);

        // rearmed: the next packet warms up again
        let stat = p.decode(Some(&[30]), 3, 4).unwrap();
        assert!(!stat.img_avail);
        let stat = p.decode(None, 4, 4).unwrap();
        assert!(stat.img_avail);
        assert_eq!(shade_of(&p.take_output().unwrap()), 30);
    }

    #[test]
    fn flush_on_empty_pipeline_yields_nothing() {
        let mut p = pipeline();
        let stat = p.decode(None, 0, 0).unwrap();
        assert!(!stat.img_avail);
        assert!(p.take_output().is_none());
        // empty packet data behaves like a flush
        let stat = p.decode(Some(&[]), 1, 1).unwrap();
        assert!(!stat.img_avail);
    }

    #[test]
    fn error_still_rotates_and_preserves_the_previous_frame() {
        let mut p = pipeline();
        p.decode(Some(&[10]), 0, 1).unwrap();

        let err = p.decode(Some(&[0xee]), 1, 2);
        assert_eq!(err.unwrap_err(), Vp9Error::CorruptFrame);
        // frame 1 was already in flight and must still come out
        assert_eq!(shade_of(&p.take_output().unwrap()), 10);

        // the pipeline keeps decoding afterwards
        p.decode(Some(&[40]), 2, 3).unwrap();
        let stat = p.decode(Some(&[50]), 3, 4).unwrap();
        assert!(stat.img_avail);
        assert_eq!(shade_of(&p.take_output().unwrap()), 40);
    }

    #[test]
    fn pipeline_matches_a_directly_driven_context() {
        let shades = [15u8, 35, 55];

        let mut p = pipeline();
        let mut piped = Vec::new();
        for (i, s) in shades.iter().enumerate() {
            p.decode(Some(&[*s]), i as u64, i as u64 + 1).unwrap();
            if let Some(out) = p.take_output() {
                piped.push(shade_of(&out));
            }
        }
        p.decode(None, 99, 99).unwrap();
        piped.push(shade_of(&p.take_output().unwrap()));

        let recon: SharedRecon = Rc::new(RefCell::new(Box::new(ShadeRecon)));
        let mut ctx = Vp9dCtx::new(recon);
        let mut pool = SyncPool;
        let direct: Vec<u8> = shades
            .iter()
            .enumerate()
            .map(|(i, s)| {
                ctx.receive_compressed(&[*s], i as u64, i as u64 + 1, &mut pool, false)
                    .unwrap();
                shade_of(&ctx.take_output().unwrap())
            })
            .collect();
        assert_eq!(piped, direct);
    }

    #[test]
    fn frame_numbers_advance_with_shown_frames() {
        let mut p = pipeline();
        let s0 = p.decode(Some(&[10]), 0, 1).unwrap();
        assert_eq!(s0.fnum, 0);
        let s1 = p.decode(Some(&[20]), 1, 2).unwrap();
        assert_eq!(s1.fnum, 1);
        assert_eq!(s0.read, 1);
    }
}
