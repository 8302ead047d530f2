use num_traits::FromPrimitive;

/*****************************************************************************
 * types
 *****************************************************************************/

/* 8-bit profile-0 reconstruction samples */
#[allow(non_camel_case_types)]
pub(crate) type pel = u8;

pub(crate) const Y_C: usize = 0; /* Y luma */
pub(crate) const U_C: usize = 1; /* Cb chroma */
pub(crate) const V_C: usize = 2; /* Cr chroma */
pub const N_C: usize = 3; /* number of color components */

pub(crate) const MI_SIZE_LOG2: usize = 3;
/* pixels per mode-info unit */
pub(crate) const MI_SIZE: usize = (1 << MI_SIZE_LOG2);
/* mode-info units per superblock side */
pub const MI_BLOCK_SIZE: usize = 8;

pub(crate) const PIC_PAD_SIZE_L: usize = 32;
pub(crate) const PIC_PAD_SIZE_C: usize = (PIC_PAD_SIZE_L >> 1);

pub const MAX_LOOP_FILTER: usize = 63;
pub const MAX_SEGMENTS: usize = 8;
pub const MAX_REF_FRAMES: usize = 4;
pub const MAX_MODE_LF_DELTAS: usize = 2;

/* decoder guard rails: dimensions outside this range fail frame-pool setup */
pub(crate) const MAX_FRAME_WIDTH: usize = 16384;
pub(crate) const MAX_FRAME_HEIGHT: usize = 16384;

pub const BLOCK_SIZES: usize = 13;
pub const TX_SIZES: usize = 4;

/*****************************************************************************
 * block partitions, transforms, prediction
 *****************************************************************************/

#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, FromPrimitive, ToPrimitive)]
pub enum BlockSize {
    BLOCK_4X4 = 0,
    BLOCK_4X8 = 1,
    BLOCK_8X4 = 2,
    BLOCK_8X8 = 3,
    BLOCK_8X16 = 4,
    BLOCK_16X8 = 5,
    BLOCK_16X16 = 6,
    BLOCK_16X32 = 7,
    BLOCK_32X16 = 8,
    BLOCK_32X32 = 9,
    BLOCK_32X64 = 10,
    BLOCK_64X32 = 11,
    BLOCK_64X64 = 12,
}

impl Default for BlockSize {
    fn default() -> Self {
        BlockSize::BLOCK_64X64
    }
}

#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, FromPrimitive, ToPrimitive)]
pub enum TxSize {
    TX_4X4 = 0,
    TX_8X8 = 1,
    TX_16X16 = 2,
    TX_32X32 = 3,
}

impl Default for TxSize {
    fn default() -> Self {
        TxSize::TX_4X4
    }
}

#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive, ToPrimitive)]
pub enum PredictionMode {
    DC_PRED = 0,
    V_PRED = 1,
    H_PRED = 2,
    D45_PRED = 3,
    D135_PRED = 4,
    D117_PRED = 5,
    D153_PRED = 6,
    D207_PRED = 7,
    D63_PRED = 8,
    TM_PRED = 9,
    NEARESTMV = 10,
    NEARMV = 11,
    ZEROMV = 12,
    NEWMV = 13,
}

impl Default for PredictionMode {
    fn default() -> Self {
        PredictionMode::DC_PRED
    }
}

#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive, ToPrimitive)]
pub enum RefFrame {
    INTRA_FRAME = 0,
    LAST_FRAME = 1,
    GOLDEN_FRAME = 2,
    ALTREF_FRAME = 3,
}

impl Default for RefFrame {
    fn default() -> Self {
        RefFrame::INTRA_FRAME
    }
}

/* block dimensions in 8x8 mode-info units */
#[allow(non_upper_case_globals)]
#[rustfmt::skip]
pub(crate) const num_8x8_blocks_wide_lookup: [usize; BLOCK_SIZES] =
    [1, 1, 1, 1, 1, 2, 2, 2, 4, 4, 4, 8, 8];
#[allow(non_upper_case_globals)]
#[rustfmt::skip]
pub(crate) const num_8x8_blocks_high_lookup: [usize; BLOCK_SIZES] =
    [1, 1, 1, 1, 2, 1, 2, 4, 2, 4, 8, 4, 8];

/*****************************************************************************
 * per-8x8 mode information
 *****************************************************************************/

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModeInfo {
    pub sb_type: BlockSize,
    pub tx_size: TxSize,
    pub mode: PredictionMode,
    pub ref_frame: RefFrame,
    pub segment_id: u8,
    pub skip: bool,
}

impl ModeInfo {
    #[inline]
    pub fn is_inter_block(&self) -> bool {
        self.ref_frame != RefFrame::INTRA_FRAME
    }

    /// Transform size of the chroma planes: capped by the largest transform
    /// that fits the 4:2:0 subsampled block.
    #[inline]
    pub fn uv_tx_size(&self) -> TxSize {
        let bw = num_8x8_blocks_wide_lookup[self.sb_type as usize];
        let bh = num_8x8_blocks_high_lookup[self.sb_type as usize];
        let max_uv = TxSize::from_usize(bw.min(bh).trailing_zeros() as usize)
            .unwrap_or(TxSize::TX_32X32);
        self.tx_size.min(max_uv)
    }
}

/// Dense mi_rows x mi_cols grid of per-8x8 mode info. Every cell covered by
/// a block carries that block's info, as the reconstruction stage leaves it.
#[derive(Debug, Clone)]
pub struct ModeInfoGrid {
    info: Vec<ModeInfo>,
    pub mi_rows: usize,
    pub mi_cols: usize,
}

impl ModeInfoGrid {
    pub fn new(mi_rows: usize, mi_cols: usize) -> Self {
        ModeInfoGrid {
            info: vec![ModeInfo::default(); mi_rows * mi_cols],
            mi_rows,
            mi_cols,
        }
    }

    pub fn for_frame_size(width: usize, height: usize) -> Self {
        Self::new(
            (height + MI_SIZE - 1) >> MI_SIZE_LOG2,
            (width + MI_SIZE - 1) >> MI_SIZE_LOG2,
        )
    }

    #[inline]
    pub fn get(&self, mi_row: usize, mi_col: usize) -> &ModeInfo {
        &self.info[mi_row * self.mi_cols + mi_col]
    }

    /// Stamp a block's info over its whole footprint, clipped to the grid.
    pub fn set_block(&mut self, mi_row: usize, mi_col: usize, mi: ModeInfo) {
        let bw = num_8x8_blocks_wide_lookup[mi.sb_type as usize];
        let bh = num_8x8_blocks_high_lookup[mi.sb_type as usize];
        for r in mi_row..(mi_row + bh).min(self.mi_rows) {
            for c in mi_col..(mi_col + bw).min(self.mi_cols) {
                self.info[r * self.mi_cols + c] = mi;
            }
        }
    }
}

/*****************************************************************************
 * frame-header filter parameters
 *****************************************************************************/

#[derive(Debug, Clone, Copy)]
pub struct LoopFilterParams {
    pub filter_level: u8,
    pub sharpness_level: u8,
    pub mode_ref_delta_enabled: bool,
    pub ref_deltas: [i8; MAX_REF_FRAMES],
    pub mode_deltas: [i8; MAX_MODE_LF_DELTAS],
}

impl Default for LoopFilterParams {
    fn default() -> Self {
        LoopFilterParams {
            filter_level: 0,
            sharpness_level: 0,
            mode_ref_delta_enabled: true,
            ref_deltas: [1, 0, -1, -1],
            mode_deltas: [0, 0],
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Segmentation {
    pub enabled: bool,
    /// true: the alt-lf feature value replaces the frame level,
    /// false: it is added as a delta
    pub abs_delta: bool,
    pub lf_level: [Option<i16>; MAX_SEGMENTS],
}

impl Segmentation {
    #[inline]
    pub(crate) fn active_lf_data(&self, segment_id: u8) -> Option<i16> {
        if self.enabled {
            self.lf_level[segment_id as usize]
        } else {
            None
        }
    }
}

#[inline]
pub(crate) fn clamp_i32(v: i32, min: i32, max: i32) -> i32 {
    if v < min {
        min
    } else if v > max {
        max
    } else {
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uv_tx_capped_by_block_size() {
        let mut mi = ModeInfo::default();
        mi.sb_type = BlockSize::BLOCK_8X8;
        mi.tx_size = TxSize::TX_8X8;
        assert_eq!(mi.uv_tx_size(), TxSize::TX_4X4);

        mi.sb_type = BlockSize::BLOCK_64X64;
        mi.tx_size = TxSize::TX_32X32;
        assert_eq!(mi.uv_tx_size(), TxSize::TX_32X32);

        mi.sb_type = BlockSize::BLOCK_32X16;
        mi.tx_size = TxSize::TX_16X16;
        assert_eq!(mi.uv_tx_size(), TxSize::TX_8X8);

        mi.sb_type = BlockSize::BLOCK_16X8;
        mi.tx_size = TxSize::TX_8X8;
        assert_eq!(mi.uv_tx_size(), TxSize::TX_4X4);
    }

    #[test]
    fn grid_block_stamping() {
        let mut grid = ModeInfoGrid::new(8, 8);
        let mut mi = ModeInfo::default();
        mi.sb_type = BlockSize::BLOCK_32X16;
        mi.skip = true;
        grid.set_block(2, 4, mi);
        assert!(grid.get(2, 4).skip);
        assert!(grid.get(3, 7).skip);
        assert!(!grid.get(4, 4).skip);
        assert!(!grid.get(2, 3).skip);
    }

    #[test]
    fn grid_stamping_clips_to_frame() {
        // 36 mi rows (288 px): a 64x64 block in the last superblock row
        // only covers 4 of its 8 rows
        let mut grid = ModeInfoGrid::new(36, 40);
        let mi = ModeInfo {
            sb_type: BlockSize::BLOCK_64X64,
            skip: true,
            ..Default::default()
        };
        grid.set_block(32, 0, mi);
        assert!(grid.get(35, 7).skip);
    }
}
