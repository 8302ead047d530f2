use crate::api::frame::*;
use crate::plane_region::*;

use std::fmt::Debug;

/// Geometry of one plane allocation: visible area plus replicated padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaneConfig {
    pub stride: usize,
    pub alloc_height: usize,
    pub width: usize,
    pub height: usize,
    pub xdec: usize,
    pub ydec: usize,
    pub xpad: usize,
    pub ypad: usize,
    pub xorigin: usize,
    pub yorigin: usize,
}

impl PlaneConfig {
    pub fn new(
        width: usize,
        height: usize,
        xdec: usize,
        ydec: usize,
        xpad: usize,
        ypad: usize,
    ) -> Self {
        let xorigin = xpad;
        let yorigin = ypad;
        let stride = (xorigin + width + xpad).align_power_of_two(5);
        let alloc_height = yorigin + height + ypad;

        PlaneConfig {
            stride,
            alloc_height,
            width,
            height,
            xdec,
            ydec,
            xpad,
            ypad,
            xorigin,
            yorigin,
        }
    }
}

#[derive(Debug)]
pub struct Plane<T: Pixel> {
    pub data: AlignedBoxedSlice<T>,
    pub cfg: PlaneConfig,
}

impl<T: Pixel> Clone for Plane<T> {
    fn clone(&self) -> Self {
        let mut p = Plane {
            data: AlignedBoxedSlice::new(self.data.len(), T::cast_from(0u8)),
            cfg: self.cfg,
        };
        p.data.copy_from_slice(&self.data);
        p
    }
}

impl<T: Pixel> Plane<T> {
    pub fn new(
        width: usize,
        height: usize,
        xdec: usize,
        ydec: usize,
        xpad: usize,
        ypad: usize,
    ) -> Self {
        let cfg = PlaneConfig::new(width, height, xdec, ydec, xpad, ypad);
        let data = AlignedBoxedSlice::new(cfg.stride * cfg.alloc_height, T::cast_from(128u8));

        Plane { data, cfg }
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        (y + self.cfg.yorigin) * self.cfg.stride + x + self.cfg.xorigin
    }

    /// Sample at visible-area coordinates.
    #[inline]
    pub fn p(&self, x: usize, y: usize) -> T {
        self.data[self.index(x, y)]
    }

    #[inline]
    pub fn row(&self, y: usize) -> &[T] {
        let i = self.index(0, y);
        &self.data[i..i + self.cfg.width]
    }

    #[inline]
    pub fn row_mut(&mut self, y: usize) -> &mut [T] {
        let i = self.index(0, y);
        &mut self.data[i..i + self.cfg.width]
    }

    pub fn as_region_mut(&mut self) -> PlaneRegionMut<'_, T> {
        PlaneRegionMut::new(self)
    }

    /// Replicate the visible edges into the padding area.
    pub fn pad(&mut self) {
        let xorigin = self.cfg.xorigin;
        let yorigin = self.cfg.yorigin;
        let stride = self.cfg.stride;
        let width = self.cfg.width;
        let height = self.cfg.height;
        let alloc_height = self.cfg.alloc_height;

        for y in 0..height {
            let base = (yorigin + y) * stride;
            let left = self.data[base + xorigin];
            for x in 0..xorigin {
                self.data[base + x] = left;
            }
            let right = self.data[base + xorigin + width - 1];
            for x in (xorigin + width)..stride {
                self.data[base + x] = right;
            }
        }

        for y in 0..yorigin {
            let (dst, src) = self.data.split_at_mut(yorigin * stride);
            dst[y * stride..(y + 1) * stride].copy_from_slice(&src[..stride]);
        }
        for y in (yorigin + height)..alloc_height {
            let last = (yorigin + height - 1) * stride;
            let (src, dst) = self.data.split_at_mut((yorigin + height) * stride);
            let off = y * stride - (yorigin + height) * stride;
            dst[off..off + stride].copy_from_slice(&src[last..last + stride]);
        }
    }
}
