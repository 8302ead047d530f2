use crate::api::frame::Pixel;
use crate::plane::Plane;

use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

/// Mutable view of a plane's visible area, indexed as `region[y][x]`.
///
/// Built either safely from a `&mut Plane`, or from raw parts by the strip
/// workers. In the latter case several regions over the same plane may be
/// alive at once; the row-progress gating in `lf::wpp` guarantees that no
/// two workers ever touch the same rows at the same time.
pub struct PlaneRegionMut<'a, T: Pixel> {
    data: *mut T,
    pub stride: usize,
    pub width: usize,
    pub height: usize,
    phantom: PhantomData<&'a mut T>,
}

unsafe impl<T: Pixel> Send for PlaneRegionMut<'_, T> {}

impl<'a, T: Pixel> PlaneRegionMut<'a, T> {
    pub fn new(plane: &'a mut Plane<T>) -> Self {
        let cfg = plane.cfg;
        let origin = cfg.yorigin * cfg.stride + cfg.xorigin;
        PlaneRegionMut {
            data: unsafe { plane.data.as_mut_ptr().add(origin) },
            stride: cfg.stride,
            width: cfg.width,
            height: cfg.height,
            phantom: PhantomData,
        }
    }

    /// `data` must point at the (0, 0) sample of the visible area and stay
    /// valid for `'a`; the caller is responsible for row disjointness when
    /// several regions alias one plane.
    pub(crate) unsafe fn from_raw_parts(
        data: *mut T,
        stride: usize,
        width: usize,
        height: usize,
    ) -> Self {
        PlaneRegionMut {
            data,
            stride,
            width,
            height,
            phantom: PhantomData,
        }
    }

    #[inline]
    pub fn row(&self, y: usize) -> &[T] {
        debug_assert!(y < self.height);
        unsafe { std::slice::from_raw_parts(self.data.add(y * self.stride), self.width) }
    }

    #[inline]
    pub fn row_mut(&mut self, y: usize) -> &mut [T] {
        debug_assert!(y < self.height);
        unsafe { std::slice::from_raw_parts_mut(self.data.add(y * self.stride), self.width) }
    }
}

impl<T: Pixel> Index<usize> for PlaneRegionMut<'_, T> {
    type Output = [T];

    #[inline]
    fn index(&self, y: usize) -> &Self::Output {
        self.row(y)
    }
}

impl<T: Pixel> IndexMut<usize> for PlaneRegionMut<'_, T> {
    #[inline]
    fn index_mut(&mut self, y: usize) -> &mut Self::Output {
        debug_assert!(y < self.height);
        unsafe { std::slice::from_raw_parts_mut(self.data.add(y * self.stride), self.width) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_indexing_matches_plane() {
        let mut p: Plane<u8> = Plane::new(32, 16, 0, 0, 8, 8);
        {
            let mut r = p.as_region_mut();
            r[5][7] = 99;
            assert_eq!(r[5][7], 99);
        }
        assert_eq!(p.p(7, 5), 99);
    }
}
