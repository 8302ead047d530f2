pub(crate) mod filter;
pub(crate) mod mask;
pub mod wpp;

use crate::def::*;
use crate::plane_region::PlaneRegionMut;

use self::filter::filter_block_plane;
use self::mask::setup_mask;
use self::wpp::{loop_filter_rows, ScheduleMode, WorkerPool};

use crate::api::frame::Frame;
use log::debug;
use std::sync::Arc;

/* collapse prediction modes to the two filter-strength classes: only the
 * motion-compensated modes with a real vector get class 1 */
#[rustfmt::skip]
pub(crate) const MODE_LF_LUT: [usize; 14] = [
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, /* intra */
    1, 1, 0, 1,                   /* NEARESTMV, NEARMV, ZEROMV, NEWMV */
];

#[derive(Debug, Clone, Copy, Default)]
pub struct LoopFilterThresh {
    pub mblim: u8,
    pub lim: u8,
    pub hev_thr: u8,
}

/// Per-frame filter state: one threshold triple per filter level, and the
/// resolved level per segment / reference / mode class.
#[derive(Clone)]
pub struct LoopFilterInfo {
    pub lfthr: [LoopFilterThresh; MAX_LOOP_FILTER + 1],
    pub lvl: [[[u8; MAX_MODE_LF_DELTAS]; MAX_REF_FRAMES]; MAX_SEGMENTS],
    last_sharpness: Option<u8>,
}

impl Default for LoopFilterInfo {
    fn default() -> Self {
        LoopFilterInfo {
            lfthr: [LoopFilterThresh::default(); MAX_LOOP_FILTER + 1],
            lvl: [[[0; MAX_MODE_LF_DELTAS]; MAX_REF_FRAMES]; MAX_SEGMENTS],
            last_sharpness: None,
        }
    }
}

impl LoopFilterInfo {
    fn update_sharpness(&mut self, sharpness: u8) {
        for lvl in 0..=MAX_LOOP_FILTER {
            let mut block_inside_limit =
                (lvl >> ((sharpness > 0) as usize + (sharpness > 4) as usize)) as i32;
            if sharpness > 0 && block_inside_limit > 9 - sharpness as i32 {
                block_inside_limit = 9 - sharpness as i32;
            }
            if block_inside_limit < 1 {
                block_inside_limit = 1;
            }
            self.lfthr[lvl].lim = block_inside_limit as u8;
            self.lfthr[lvl].mblim = (2 * (lvl + 2) + block_inside_limit as usize) as u8;
            self.lfthr[lvl].hev_thr = (lvl >> 4) as u8;
        }
    }

    /// Resolves the per-frame level table. The threshold table only depends
    /// on sharpness and is rebuilt when it changes.
    pub fn frame_init(&mut self, lf: &LoopFilterParams, seg: &Segmentation, default_filt_lvl: u8) {
        if self.last_sharpness != Some(lf.sharpness_level) {
            self.update_sharpness(lf.sharpness_level);
            self.last_sharpness = Some(lf.sharpness_level);
        }

        let scale: i32 = 1 << (default_filt_lvl >> 5);

        for seg_id in 0..MAX_SEGMENTS {
            let mut lvl_seg = default_filt_lvl as i32;
            if let Some(data) = seg.active_lf_data(seg_id as u8) {
                lvl_seg = if seg.abs_delta {
                    data as i32
                } else {
                    lvl_seg + data as i32
                };
                lvl_seg = clamp_i32(lvl_seg, 0, MAX_LOOP_FILTER as i32);
            }

            if !lf.mode_ref_delta_enabled {
                for r in 0..MAX_REF_FRAMES {
                    for m in 0..MAX_MODE_LF_DELTAS {
                        self.lvl[seg_id][r][m] = lvl_seg as u8;
                    }
                }
            } else {
                let intra = RefFrame::INTRA_FRAME as usize;
                let intra_lvl = lvl_seg + lf.ref_deltas[intra] as i32 * scale;
                self.lvl[seg_id][intra][0] =
                    clamp_i32(intra_lvl, 0, MAX_LOOP_FILTER as i32) as u8;
                for r in 1..MAX_REF_FRAMES {
                    for m in 0..MAX_MODE_LF_DELTAS {
                        let inter_lvl = lvl_seg
                            + lf.ref_deltas[r] as i32 * scale
                            + lf.mode_deltas[m] as i32 * scale;
                        self.lvl[seg_id][r][m] =
                            clamp_i32(inter_lvl, 0, MAX_LOOP_FILTER as i32) as u8;
                    }
                }
            }
        }
    }

    #[inline]
    pub(crate) fn filter_level(&self, mi: &ModeInfo) -> u8 {
        self.lvl[mi.segment_id as usize][mi.ref_frame as usize][MODE_LF_LUT[mi.mode as usize]]
    }
}

/// Filters one 64x64 superblock: builds its edge masks, then applies them
/// plane by plane.
pub(crate) fn filter_block(
    planes: &mut [PlaneRegionMut<'_, pel>; N_C],
    grid: &ModeInfoGrid,
    lfi: &LoopFilterInfo,
    mi_row: usize,
    mi_col: usize,
    y_only: bool,
) {
    let mut lfm = setup_mask(grid, lfi, mi_row, mi_col);
    let num_planes = if y_only { 1 } else { N_C };
    for (p, buf) in planes.iter_mut().enumerate().take(num_planes) {
        filter_block_plane(lfi, buf, p, mi_row, mi_col, grid.mi_rows, &mut lfm);
    }
}

/// Frame-level entry: resolves levels, picks the row range (whole frame, or
/// the middle eighth for a partial preview pass) and hands the rows to the
/// worker pool.
pub(crate) fn loop_filter_frame(
    frame: &mut Frame<pel>,
    grid: &Arc<ModeInfoGrid>,
    lfi: &mut LoopFilterInfo,
    lf: &LoopFilterParams,
    seg: &Segmentation,
    pool: &mut dyn WorkerPool,
    y_only: bool,
    partial: bool,
) {
    let frame_filter_level = lf.filter_level;
    if frame_filter_level == 0 {
        return;
    }

    let mut start_mi_row = 0;
    let mut mi_rows_to_filter = grid.mi_rows;
    if partial && grid.mi_rows > 8 {
        start_mi_row = (grid.mi_rows >> 1) & !(MI_BLOCK_SIZE - 1);
        mi_rows_to_filter = (grid.mi_rows / 8).max(8);
    }
    let end_mi_row = (start_mi_row + mi_rows_to_filter).min(grid.mi_rows);

    lfi.frame_init(lf, seg, frame_filter_level);

    debug!(
        "loop filter: level {} rows {}..{} partial {}",
        frame_filter_level, start_mi_row, end_mi_row, partial
    );

    if partial {
        pool.set_mode(ScheduleMode::Partial);
    }
    loop_filter_rows(frame, grid, lfi, pool, start_mi_row, end_mi_row, y_only);
    if partial {
        pool.set_mode(ScheduleMode::Full);
    }
}
