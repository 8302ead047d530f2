use crate::api::frame::Frame;
use crate::api::Vp9Error;
use crate::def::*;
use crate::picman::FramePool;

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

/// Everything one reconstructed frame hands to the loop filter and the
/// output stage.
pub struct ReconFrame {
    pub frame: Rc<RefCell<Frame<u8>>>,
    /// Per-8x8 mode info, shared with the filter workers.
    pub mi: Arc<ModeInfoGrid>,
    pub lf: LoopFilterParams,
    pub seg: Segmentation,
    /// Display dimensions; the buffer itself may be allocated larger.
    pub width: usize,
    pub height: usize,
    pub show_frame: bool,
    pub corrupted: bool,
}

/// Producer of unfiltered frames. The pipeline drives one of these per
/// compressed packet; implementations parse the frame payload, run
/// prediction and the inverse transforms, and leave the deblocking to the
/// caller.
pub trait ReconStage {
    fn reconstruct(&mut self, data: &[u8], pool: &mut FramePool)
        -> Result<ReconFrame, Vp9Error>;
}
