pub(crate) mod pipeline;

use crate::api::frame::Frame;
use crate::api::{ChromaSampling, Vp9Error};
use crate::def::*;
use crate::lf::wpp::WorkerPool;
use crate::lf::{loop_filter_frame, LoopFilterInfo};
use crate::picman::FramePool;
use crate::recon::ReconStage;

use log::debug;
use std::cell::RefCell;
use std::rc::Rc;

/* both pipeline contexts drive the same reconstruction stage */
pub(crate) type SharedRecon = Rc<RefCell<Box<dyn ReconStage>>>;

pub(crate) struct OutputFrame {
    pub frame: Rc<RefCell<Frame<pel>>>,
}

/// One decoder context: reconstructs a packet into a pooled frame buffer,
/// deblocks it and holds it until the pipeline collects the result.
pub(crate) struct Vp9dCtx {
    recon: SharedRecon,
    pool: FramePool,
    lfi: LoopFilterInfo,
    output: Option<OutputFrame>,
    last_corrupted: bool,
    pub width: usize,
    pub height: usize,
}

impl Vp9dCtx {
    pub fn new(recon: SharedRecon) -> Self {
        Vp9dCtx {
            recon,
            pool: FramePool::new(ChromaSampling::Cs420),
            lfi: LoopFilterInfo::default(),
            output: None,
            last_corrupted: false,
            width: 0,
            height: 0,
        }
    }

    /// Decodes one compressed frame end to end. Returns whether the frame is
    /// meant to be shown; hidden frames update references only and produce
    /// no output.
    pub fn receive_compressed(
        &mut self,
        data: &[u8],
        ts: u64,
        ts_end: u64,
        workers: &mut dyn WorkerPool,
        partial_filter: bool,
    ) -> Result<bool, Vp9Error> {
        let rf = self
            .recon
            .borrow_mut()
            .reconstruct(data, &mut self.pool)?;

        self.width = rf.width;
        self.height = rf.height;
        self.last_corrupted = rf.corrupted;
        debug!(
            "reconstructed {}x{} frame, show {}, lf level {}",
            rf.width, rf.height, rf.show_frame, rf.lf.filter_level
        );

        {
            let mut frame = rf.frame.borrow_mut();
            frame.ts = ts;
            frame.ts_end = ts_end;
            frame.corrupted = rf.corrupted;
            loop_filter_frame(
                &mut frame,
                &rf.mi,
                &mut self.lfi,
                &rf.lf,
                &rf.seg,
                workers,
                false,
                partial_filter,
            );
            frame.pad();
        }

        self.output = if rf.show_frame {
            Some(OutputFrame { frame: rf.frame })
        } else {
            None
        };
        Ok(rf.show_frame)
    }

    pub fn take_output(&mut self) -> Option<OutputFrame> {
        self.output.take()
    }

    pub fn frame_corrupted(&self) -> bool {
        self.last_corrupted
    }
}
