use crate::api::frame::*;
use crate::api::{ChromaSampling, Vp9Error};
use crate::def::*;

use log::trace;
use std::cell::RefCell;
use std::rc::Rc;

/* matches the bitstream's maximum of in-flight references plus work frames */
pub(crate) const FRAME_BUFFERS: usize = 12;

/* planes are allocated on a 16-pixel grid so the filter's chroma passes can
 * run full 8x8 units on odd-sized frames */
const FRAME_ALIGN: usize = 2 * MI_SIZE;

#[inline]
fn aligned_dim(v: usize) -> usize {
    (v + FRAME_ALIGN - 1) & !(FRAME_ALIGN - 1)
}

/// Fixed-size pool of reusable frame buffers. A slot is free when nobody but
/// the pool holds its `Rc`; buffers are reallocated lazily when the frame
/// size changes.
pub struct FramePool {
    slots: Vec<Option<Rc<RefCell<Frame<pel>>>>>,
    width: usize,
    height: usize,
    chroma_sampling: ChromaSampling,
}

impl FramePool {
    pub fn new(chroma_sampling: ChromaSampling) -> Self {
        let mut slots = Vec::with_capacity(FRAME_BUFFERS);
        slots.resize_with(FRAME_BUFFERS, || None);
        FramePool {
            slots,
            width: 0,
            height: 0,
            chroma_sampling,
        }
    }

    /// Hands out a free buffer for a `width` x `height` frame, allocating or
    /// reallocating the slot as needed.
    pub fn get_frame(
        &mut self,
        width: usize,
        height: usize,
    ) -> Result<Rc<RefCell<Frame<pel>>>, Vp9Error> {
        if width == 0
            || height == 0
            || width > MAX_FRAME_WIDTH
            || height > MAX_FRAME_HEIGHT
        {
            return Err(Vp9Error::MemError);
        }

        let (aw, ah) = (aligned_dim(width), aligned_dim(height));
        if (aw, ah) != (self.width, self.height) {
            trace!("frame pool reconfigured to {}x{}", aw, ah);
            for slot in self.slots.iter_mut() {
                *slot = None;
            }
            self.width = aw;
            self.height = ah;
        }

        for slot in self.slots.iter_mut() {
            match slot {
                Some(frame) if Rc::strong_count(frame) == 1 => {
                    frame.borrow_mut().corrupted = false;
                    return Ok(Rc::clone(frame));
                }
                Some(_) => {}
                None => {
                    let frame =
                        Rc::new(RefCell::new(Frame::new(aw, ah, self.chroma_sampling)));
                    *slot = Some(Rc::clone(&frame));
                    return Ok(frame);
                }
            }
        }
        Err(Vp9Error::MemError)
    }

    #[cfg(test)]
    fn free_slots(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| match s {
                None => true,
                Some(f) => Rc::strong_count(f) == 1,
            })
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn rejects_bad_dimensions() {
        let mut pool = FramePool::new(ChromaSampling::Cs420);
        assert!(pool.get_frame(0, 64).is_err());
        assert!(pool.get_frame(64, MAX_FRAME_HEIGHT + 1).is_err());
        assert!(pool.get_frame(64, 64).is_ok());
    }

    #[test]
    fn dimensions_are_aligned_up() {
        let mut pool = FramePool::new(ChromaSampling::Cs420);
        let f = pool.get_frame(290, 242).unwrap();
        let planes = &f.borrow().planes;
        assert_eq!(planes[0].cfg.width, 304);
        assert_eq!(planes[0].cfg.height, 256);
        assert_eq!(planes[1].cfg.width, 152);
        assert_eq!(planes[1].cfg.height, 128);
    }

    #[test]
    fn released_buffers_are_reused() {
        let mut pool = FramePool::new(ChromaSampling::Cs420);
        let first = pool.get_frame(64, 64).unwrap();
        let first_ptr = first.as_ptr();
        assert_eq!(pool.free_slots(), FRAME_BUFFERS - 1);
        drop(first);
        assert_eq!(pool.free_slots(), FRAME_BUFFERS);
        let again = pool.get_frame(64, 64).unwrap();
        assert_eq!(again.as_ptr(), first_ptr);
    }

    #[test]
    fn pool_exhaustion_reports_out_of_memory() {
        let mut pool = FramePool::new(ChromaSampling::Cs420);
        let held: Vec<_> = (0..FRAME_BUFFERS)
            .map(|_| pool.get_frame(32, 32).unwrap())
            .collect();
        assert!(pool.get_frame(32, 32).is_err());
        drop(held);
        assert!(pool.get_frame(32, 32).is_ok());
    }

    #[test]
    fn resize_drops_old_buffers() {
        let mut pool = FramePool::new(ChromaSampling::Cs420);
        let old = pool.get_frame(64, 64).unwrap();
        let f = pool.get_frame(128, 128).unwrap();
        assert_eq!(f.borrow().planes[0].cfg.width, 128);
        // the caller's old frame stays alive, just detached from the pool
        assert_eq!(old.borrow().planes[0].cfg.width, 64);
    }
}
