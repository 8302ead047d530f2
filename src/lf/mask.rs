use crate::def::*;
use crate::lf::LoopFilterInfo;

use TxSize::*;

/// Edge bits for one direction/tier of a 64x64 luma superblock. Bit i marks
/// the 8x8 unit at row i/8, column i%8; the low bit is the leftmost unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeSet64(u64);

impl EdgeSet64 {
    #[inline]
    pub fn set_range(&mut self, bits: u64, shift: usize) {
        self.0 |= bits << shift;
    }
    #[inline]
    pub fn clear_range(&mut self, bits: u64) {
        self.0 &= !bits;
    }
    #[inline]
    pub fn retain(&mut self, bits: u64) {
        self.0 &= bits;
    }
    #[inline]
    pub fn union_with(&mut self, other: EdgeSet64) {
        self.0 |= other.0;
    }
    #[inline]
    pub fn intersect(self, other: EdgeSet64) -> EdgeSet64 {
        EdgeSet64(self.0 & other.0)
    }
    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
    #[inline]
    pub fn bits(self) -> u64 {
        self.0
    }
}

/// Chroma counterpart on the 4:2:0 subsampled grid: bit i marks the 8x8
/// chroma unit at row i/4, column i%4.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeSet16(u16);

impl EdgeSet16 {
    #[inline]
    pub fn set_range(&mut self, bits: u16, shift: usize) {
        self.0 |= bits << shift;
    }
    #[inline]
    pub fn clear_range(&mut self, bits: u16) {
        self.0 &= !bits;
    }
    #[inline]
    pub fn retain(&mut self, bits: u16) {
        self.0 &= bits;
    }
    #[inline]
    pub fn union_with(&mut self, other: EdgeSet16) {
        self.0 |= other.0;
    }
    #[inline]
    pub fn intersect(self, other: EdgeSet16) -> EdgeSet16 {
        EdgeSet16(self.0 & other.0)
    }
    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
    #[inline]
    pub fn bits(self) -> u16 {
        self.0
    }
}

/// All deblocking work for one 64x64 superblock, precomputed as bitmasks.
/// One tier per transform size; interior 4x4 edges kept separate since they
/// sit 4 pixels inside their unit.
#[derive(Debug, Clone, Copy)]
pub struct LoopFilterMask {
    pub left_y: [EdgeSet64; TX_SIZES],
    pub above_y: [EdgeSet64; TX_SIZES],
    pub int_4x4_y: EdgeSet64,
    pub left_uv: [EdgeSet16; TX_SIZES],
    pub above_uv: [EdgeSet16; TX_SIZES],
    pub int_4x4_uv: EdgeSet16,
    pub lfl_y: [u8; 64],
    pub lfl_uv: [u8; 16],
}

impl Default for LoopFilterMask {
    fn default() -> Self {
        LoopFilterMask {
            left_y: [EdgeSet64::default(); TX_SIZES],
            above_y: [EdgeSet64::default(); TX_SIZES],
            int_4x4_y: EdgeSet64::default(),
            left_uv: [EdgeSet16::default(); TX_SIZES],
            above_uv: [EdgeSet16::default(); TX_SIZES],
            int_4x4_uv: EdgeSet16::default(),
            lfl_y: [0; 64],
            lfl_uv: [0; 16],
        }
    }
}

/* 4x4 edges that land on a 32x32 boundary always get at least the 8-tap
 * filter; these pick out those boundary positions */
pub(crate) const LEFT_BORDER: u64 = 0x1111111111111111;
pub(crate) const ABOVE_BORDER: u64 = 0x000000ff000000ff;
pub(crate) const LEFT_BORDER_UV: u16 = 0x1111;
pub(crate) const ABOVE_BORDER_UV: u16 = 0x000f;

/* transform edge spacing in 8x8 units, indexed by TxSize */
const TX_UNITS: [usize; TX_SIZES] = [1, 1, 2, 4];

fn y_row_bits(w: usize) -> u64 {
    (1u64 << w) - 1
}

fn uv_dims(bs: usize) -> (usize, usize) {
    let w = num_8x8_blocks_wide_lookup[bs];
    let h = num_8x8_blocks_high_lookup[bs];
    ((w + 1) >> 1, (h + 1) >> 1)
}

lazy_static! {
    /// Full footprint of each block size placed at the superblock origin.
    static ref SIZE_MASK: [u64; BLOCK_SIZES] = {
        let mut t = [0u64; BLOCK_SIZES];
        for bs in 0..BLOCK_SIZES {
            let w = num_8x8_blocks_wide_lookup[bs];
            let h = num_8x8_blocks_high_lookup[bs];
            for r in 0..h {
                t[bs] |= y_row_bits(w) << (r << 3);
            }
        }
        t
    };

    /// First column of each block footprint (its left prediction edge).
    static ref LEFT_PREDICTION_MASK: [u64; BLOCK_SIZES] = {
        let mut t = [0u64; BLOCK_SIZES];
        for bs in 0..BLOCK_SIZES {
            for r in 0..num_8x8_blocks_high_lookup[bs] {
                t[bs] |= 1u64 << (r << 3);
            }
        }
        t
    };

    /// First row of each block footprint (its top prediction edge).
    static ref ABOVE_PREDICTION_MASK: [u64; BLOCK_SIZES] = {
        let mut t = [0u64; BLOCK_SIZES];
        for bs in 0..BLOCK_SIZES {
            t[bs] = y_row_bits(num_8x8_blocks_wide_lookup[bs]);
        }
        t
    };

    /// Vertical transform edges over a full 64x64 area, per transform size.
    static ref LEFT_64X64_TXFORM_MASK: [u64; TX_SIZES] = {
        let mut t = [0u64; TX_SIZES];
        for tx in 0..TX_SIZES {
            for r in 0..8 {
                for c in (0..8).step_by(TX_UNITS[tx]) {
                    t[tx] |= 1u64 << ((r << 3) + c);
                }
            }
        }
        t
    };

    /// Horizontal transform edges over a full 64x64 area.
    static ref ABOVE_64X64_TXFORM_MASK: [u64; TX_SIZES] = {
        let mut t = [0u64; TX_SIZES];
        for tx in 0..TX_SIZES {
            for r in (0..8).step_by(TX_UNITS[tx]) {
                t[tx] |= 0xffu64 << (r << 3);
            }
        }
        t
    };

    static ref SIZE_MASK_UV: [u16; BLOCK_SIZES] = {
        let mut t = [0u16; BLOCK_SIZES];
        for bs in 0..BLOCK_SIZES {
            let (w, h) = uv_dims(bs);
            for r in 0..h {
                t[bs] |= (((1u32 << w) - 1) as u16) << (r << 2);
            }
        }
        t
    };

    static ref LEFT_PREDICTION_MASK_UV: [u16; BLOCK_SIZES] = {
        let mut t = [0u16; BLOCK_SIZES];
        for bs in 0..BLOCK_SIZES {
            let (_, h) = uv_dims(bs);
            for r in 0..h {
                t[bs] |= 1u16 << (r << 2);
            }
        }
        t
    };

    static ref ABOVE_PREDICTION_MASK_UV: [u16; BLOCK_SIZES] = {
        let mut t = [0u16; BLOCK_SIZES];
        for bs in 0..BLOCK_SIZES {
            let (w, _) = uv_dims(bs);
            t[bs] = ((1u32 << w) - 1) as u16;
        }
        t
    };

    /// Chroma transform edges on the subsampled grid, indexed by the chroma
    /// transform size.
    static ref LEFT_64X64_TXFORM_MASK_UV: [u16; TX_SIZES] = {
        let mut t = [0u16; TX_SIZES];
        for tx in 0..TX_SIZES {
            for r in 0..4 {
                for c in (0..4).step_by(TX_UNITS[tx]) {
                    t[tx] |= 1u16 << ((r << 2) + c);
                }
            }
        }
        t
    };

    static ref ABOVE_64X64_TXFORM_MASK_UV: [u16; TX_SIZES] = {
        let mut t = [0u16; TX_SIZES];
        for tx in 0..TX_SIZES {
            for r in (0..4).step_by(TX_UNITS[tx]) {
                t[tx] |= 0xfu16 << (r << 2);
            }
        }
        t
    };
}

/// Records one block's edges into the superblock mask. `shift_y`/`shift_uv`
/// position the block inside the 8x8 (resp. 4x4) unit grid.
fn build_masks(
    lfi: &LoopFilterInfo,
    mi: &ModeInfo,
    shift_y: usize,
    shift_uv: usize,
    lfm: &mut LoopFilterMask,
) {
    let bs = mi.sb_type as usize;
    let tx_y = mi.tx_size as usize;
    let tx_uv = mi.uv_tx_size() as usize;
    let filter_level = lfi.filter_level(mi);

    if filter_level == 0 {
        return;
    }
    let w = num_8x8_blocks_wide_lookup[bs];
    let h = num_8x8_blocks_high_lookup[bs];
    for i in 0..h {
        let index = shift_y + (i << 3);
        for l in lfm.lfl_y[index..index + w].iter_mut() {
            *l = filter_level;
        }
    }

    lfm.above_y[tx_y].set_range(ABOVE_PREDICTION_MASK[bs], shift_y);
    lfm.above_uv[tx_uv].set_range(ABOVE_PREDICTION_MASK_UV[bs], shift_uv);
    lfm.left_y[tx_y].set_range(LEFT_PREDICTION_MASK[bs], shift_y);
    lfm.left_uv[tx_uv].set_range(LEFT_PREDICTION_MASK_UV[bs], shift_uv);

    // Skipped inter blocks carry no residual, so their interior transform
    // edges cannot ring; only the prediction boundary is filtered.
    if mi.skip && mi.is_inter_block() {
        return;
    }

    lfm.above_y[tx_y].set_range(SIZE_MASK[bs] & ABOVE_64X64_TXFORM_MASK[tx_y], shift_y);
    lfm.above_uv[tx_uv].set_range(SIZE_MASK_UV[bs] & ABOVE_64X64_TXFORM_MASK_UV[tx_uv], shift_uv);
    lfm.left_y[tx_y].set_range(SIZE_MASK[bs] & LEFT_64X64_TXFORM_MASK[tx_y], shift_y);
    lfm.left_uv[tx_uv].set_range(SIZE_MASK_UV[bs] & LEFT_64X64_TXFORM_MASK_UV[tx_uv], shift_uv);

    if tx_y == TX_4X4 as usize {
        lfm.int_4x4_y.set_range(SIZE_MASK[bs], shift_y);
    }
    if tx_uv == TX_4X4 as usize {
        lfm.int_4x4_uv.set_range(SIZE_MASK_UV[bs], shift_uv);
    }
}

/// Same as `build_masks` but only touches the luma sets. Blocks narrower
/// than 16 pixels share one chroma unit, so only their first sibling updates
/// the uv masks.
fn build_y_mask(lfi: &LoopFilterInfo, mi: &ModeInfo, shift_y: usize, lfm: &mut LoopFilterMask) {
    let bs = mi.sb_type as usize;
    let tx_y = mi.tx_size as usize;
    let filter_level = lfi.filter_level(mi);

    if filter_level == 0 {
        return;
    }
    let w = num_8x8_blocks_wide_lookup[bs];
    let h = num_8x8_blocks_high_lookup[bs];
    for i in 0..h {
        let index = shift_y + (i << 3);
        for l in lfm.lfl_y[index..index + w].iter_mut() {
            *l = filter_level;
        }
    }

    lfm.above_y[tx_y].set_range(ABOVE_PREDICTION_MASK[bs], shift_y);
    lfm.left_y[tx_y].set_range(LEFT_PREDICTION_MASK[bs], shift_y);

    if mi.skip && mi.is_inter_block() {
        return;
    }

    lfm.above_y[tx_y].set_range(SIZE_MASK[bs] & ABOVE_64X64_TXFORM_MASK[tx_y], shift_y);
    lfm.left_y[tx_y].set_range(SIZE_MASK[bs] & LEFT_64X64_TXFORM_MASK[tx_y], shift_y);

    if tx_y == TX_4X4 as usize {
        lfm.int_4x4_y.set_range(SIZE_MASK[bs], shift_y);
    }
}

/* mask-grid positions of the four 32x32 quadrants, 16x16 quarters and 8x8
 * children, as shifts into the y and uv unit grids */
const SHIFT_32_Y: [usize; 4] = [0, 4, 32, 36];
const SHIFT_16_Y: [usize; 4] = [0, 2, 16, 18];
const SHIFT_8_Y: [usize; 4] = [0, 1, 8, 9];
const SHIFT_32_UV: [usize; 4] = [0, 2, 8, 10];
const SHIFT_16_UV: [usize; 4] = [0, 1, 4, 5];

/// Builds the complete mask for the 64x64 region at (mi_row, mi_col) by
/// walking the partition tree recorded in the mode-info grid.
pub fn setup_mask(
    grid: &ModeInfoGrid,
    lfi: &LoopFilterInfo,
    mi_row: usize,
    mi_col: usize,
) -> LoopFilterMask {
    let mut lfm = LoopFilterMask::default();

    let max_rows = (grid.mi_rows - mi_row).min(MI_BLOCK_SIZE);
    let max_cols = (grid.mi_cols - mi_col).min(MI_BLOCK_SIZE);
    let mi = |r: usize, c: usize| grid.get(mi_row + r, mi_col + c);

    match mi(0, 0).sb_type {
        BlockSize::BLOCK_64X64 => build_masks(lfi, mi(0, 0), 0, 0, &mut lfm),
        BlockSize::BLOCK_64X32 => {
            build_masks(lfi, mi(0, 0), 0, 0, &mut lfm);
            if 4 < max_rows {
                build_masks(lfi, mi(4, 0), 32, 8, &mut lfm);
            }
        }
        BlockSize::BLOCK_32X64 => {
            build_masks(lfi, mi(0, 0), 0, 0, &mut lfm);
            if 4 < max_cols {
                build_masks(lfi, mi(0, 4), 4, 2, &mut lfm);
            }
        }
        _ => {
            for idx_32 in 0..4 {
                let shift_y_32 = SHIFT_32_Y[idx_32];
                let shift_uv_32 = SHIFT_32_UV[idx_32];
                let row_32 = (idx_32 >> 1) << 2;
                let col_32 = (idx_32 & 1) << 2;
                if col_32 >= max_cols || row_32 >= max_rows {
                    continue;
                }
                match mi(row_32, col_32).sb_type {
                    BlockSize::BLOCK_32X32 => {
                        build_masks(lfi, mi(row_32, col_32), shift_y_32, shift_uv_32, &mut lfm)
                    }
                    BlockSize::BLOCK_32X16 => {
                        build_masks(lfi, mi(row_32, col_32), shift_y_32, shift_uv_32, &mut lfm);
                        if row_32 + 2 >= max_rows {
                            continue;
                        }
                        build_masks(
                            lfi,
                            mi(row_32 + 2, col_32),
                            shift_y_32 + 16,
                            shift_uv_32 + 4,
                            &mut lfm,
                        );
                    }
                    BlockSize::BLOCK_16X32 => {
                        build_masks(lfi, mi(row_32, col_32), shift_y_32, shift_uv_32, &mut lfm);
                        if col_32 + 2 >= max_cols {
                            continue;
                        }
                        build_masks(
                            lfi,
                            mi(row_32, col_32 + 2),
                            shift_y_32 + 2,
                            shift_uv_32 + 1,
                            &mut lfm,
                        );
                    }
                    _ => {
                        for idx_16 in 0..4 {
                            let shift_y_16 = shift_y_32 + SHIFT_16_Y[idx_16];
                            let shift_uv_16 = shift_uv_32 + SHIFT_16_UV[idx_16];
                            let row_16 = row_32 + (((idx_16 >> 1) & 1) << 1);
                            let col_16 = col_32 + ((idx_16 & 1) << 1);
                            if col_16 >= max_cols || row_16 >= max_rows {
                                continue;
                            }
                            match mi(row_16, col_16).sb_type {
                                BlockSize::BLOCK_16X16 => build_masks(
                                    lfi,
                                    mi(row_16, col_16),
                                    shift_y_16,
                                    shift_uv_16,
                                    &mut lfm,
                                ),
                                BlockSize::BLOCK_16X8 => {
                                    build_masks(
                                        lfi,
                                        mi(row_16, col_16),
                                        shift_y_16,
                                        shift_uv_16,
                                        &mut lfm,
                                    );
                                    if row_16 + 1 >= max_rows {
                                        continue;
                                    }
                                    build_y_mask(
                                        lfi,
                                        mi(row_16 + 1, col_16),
                                        shift_y_16 + 8,
                                        &mut lfm,
                                    );
                                }
                                BlockSize::BLOCK_8X16 => {
                                    build_masks(
                                        lfi,
                                        mi(row_16, col_16),
                                        shift_y_16,
                                        shift_uv_16,
                                        &mut lfm,
                                    );
                                    if col_16 + 1 >= max_cols {
                                        continue;
                                    }
                                    build_y_mask(
                                        lfi,
                                        mi(row_16, col_16 + 1),
                                        shift_y_16 + 1,
                                        &mut lfm,
                                    );
                                }
                                _ => {
                                    // 8x8 or smaller: the first child owns
                                    // the shared chroma unit
                                    build_masks(
                                        lfi,
                                        mi(row_16, col_16),
                                        shift_y_16 + SHIFT_8_Y[0],
                                        shift_uv_16,
                                        &mut lfm,
                                    );
                                    for idx_8 in 1..4 {
                                        let row_8 = row_16 + (idx_8 >> 1);
                                        let col_8 = col_16 + (idx_8 & 1);
                                        if col_8 >= max_cols || row_8 >= max_rows {
                                            continue;
                                        }
                                        build_y_mask(
                                            lfi,
                                            mi(row_8, col_8),
                                            shift_y_16 + SHIFT_8_Y[idx_8],
                                            &mut lfm,
                                        );
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    // The widest filter is 16 pixels, so 32x32 transform edges are filtered
    // with the 16x16 tier.
    let fold_y = lfm.left_y[TX_32X32 as usize];
    lfm.left_y[TX_16X16 as usize].union_with(fold_y);
    let fold_y = lfm.above_y[TX_32X32 as usize];
    lfm.above_y[TX_16X16 as usize].union_with(fold_y);
    let fold_uv = lfm.left_uv[TX_32X32 as usize];
    lfm.left_uv[TX_16X16 as usize].union_with(fold_uv);
    let fold_uv = lfm.above_uv[TX_32X32 as usize];
    lfm.above_uv[TX_16X16 as usize].union_with(fold_uv);

    // 4x4 edges sitting on a 32x32 boundary get at least the 8-tap filter.
    let promote = lfm.left_y[TX_4X4 as usize].bits() & LEFT_BORDER;
    lfm.left_y[TX_8X8 as usize].set_range(promote, 0);
    lfm.left_y[TX_4X4 as usize].clear_range(LEFT_BORDER);
    let promote = lfm.above_y[TX_4X4 as usize].bits() & ABOVE_BORDER;
    lfm.above_y[TX_8X8 as usize].set_range(promote, 0);
    lfm.above_y[TX_4X4 as usize].clear_range(ABOVE_BORDER);
    let promote = lfm.left_uv[TX_4X4 as usize].bits() & LEFT_BORDER_UV;
    lfm.left_uv[TX_8X8 as usize].set_range(promote, 0);
    lfm.left_uv[TX_4X4 as usize].clear_range(LEFT_BORDER_UV);
    let promote = lfm.above_uv[TX_4X4 as usize].bits() & ABOVE_BORDER_UV;
    lfm.above_uv[TX_8X8 as usize].set_range(promote, 0);
    lfm.above_uv[TX_4X4 as usize].clear_range(ABOVE_BORDER_UV);

    // Drop everything below the frame bottom.
    if mi_row + MI_BLOCK_SIZE > grid.mi_rows {
        let rows = grid.mi_rows - mi_row;
        let mask_y = (1u64 << (rows << 3)) - 1;
        let mask_uv = ((1u32 << (((rows + 1) >> 1) << 2)) - 1) as u16;

        for i in 0..TX_32X32 as usize {
            lfm.left_y[i].retain(mask_y);
            lfm.above_y[i].retain(mask_y);
            lfm.left_uv[i].retain(mask_uv);
            lfm.above_uv[i].retain(mask_uv);
        }
        lfm.int_4x4_y.retain(mask_y);
        lfm.int_4x4_uv.retain(mask_uv);

        // The wide filter cannot run on the last chroma block row; demote
        // it to the 8-tap filter instead.
        if rows == 1 {
            let demote = lfm.above_uv[TX_16X16 as usize];
            lfm.above_uv[TX_8X8 as usize].union_with(demote);
            lfm.above_uv[TX_16X16 as usize] = EdgeSet16::default();
        }
        if rows == 5 {
            let demote = lfm.above_uv[TX_16X16 as usize].bits() & 0xff00;
            lfm.above_uv[TX_8X8 as usize].set_range(demote, 0);
            lfm.above_uv[TX_16X16 as usize].clear_range(demote);
        }
    }

    // Drop everything right of the frame edge.
    if mi_col + MI_BLOCK_SIZE > grid.mi_cols {
        let columns = grid.mi_cols - mi_col;
        let mask_y = ((1u64 << columns) - 1) * 0x0101010101010101;
        let mask_uv = (((1u32 << ((columns + 1) >> 1)) - 1) * 0x1111) as u16;
        // internal edges are never applied on the last image column
        let mask_uv_int = (((1u32 << (columns >> 1)) - 1) * 0x1111) as u16;

        for i in 0..TX_32X32 as usize {
            lfm.left_y[i].retain(mask_y);
            lfm.above_y[i].retain(mask_y);
            lfm.left_uv[i].retain(mask_uv);
            lfm.above_uv[i].retain(mask_uv);
        }
        lfm.int_4x4_y.retain(mask_y);
        lfm.int_4x4_uv.retain(mask_uv_int);

        if columns == 1 {
            let demote = lfm.left_uv[TX_16X16 as usize];
            lfm.left_uv[TX_8X8 as usize].union_with(demote);
            lfm.left_uv[TX_16X16 as usize] = EdgeSet16::default();
        }
        if columns == 5 {
            let demote = lfm.left_uv[TX_16X16 as usize].bits() & 0xcccc;
            lfm.left_uv[TX_8X8 as usize].set_range(demote, 0);
            lfm.left_uv[TX_16X16 as usize].clear_range(demote);
        }
    }

    // The first image column is never filtered.
    if mi_col == 0 {
        for i in 0..TX_32X32 as usize {
            lfm.left_y[i].retain(0xfefefefefefefefe);
            lfm.left_uv[i].retain(0xeeee);
        }
    }

    // Two different filters must never land on the same edge.
    debug_assert!(lfm.left_y[TX_16X16 as usize]
        .intersect(lfm.left_y[TX_8X8 as usize])
        .is_empty());
    debug_assert!(lfm.left_y[TX_16X16 as usize]
        .intersect(lfm.left_y[TX_4X4 as usize])
        .is_empty());
    debug_assert!(lfm.left_y[TX_8X8 as usize]
        .intersect(lfm.left_y[TX_4X4 as usize])
        .is_empty());
    debug_assert!(lfm.int_4x4_y
        .intersect(lfm.left_y[TX_16X16 as usize])
        .is_empty());
    debug_assert!(lfm.left_uv[TX_16X16 as usize]
        .intersect(lfm.left_uv[TX_8X8 as usize])
        .is_empty());
    debug_assert!(lfm.left_uv[TX_16X16 as usize]
        .intersect(lfm.left_uv[TX_4X4 as usize])
        .is_empty());
    debug_assert!(lfm.left_uv[TX_8X8 as usize]
        .intersect(lfm.left_uv[TX_4X4 as usize])
        .is_empty());
    debug_assert!(lfm.int_4x4_uv
        .intersect(lfm.left_uv[TX_16X16 as usize])
        .is_empty());
    debug_assert!(lfm.above_y[TX_16X16 as usize]
        .intersect(lfm.above_y[TX_8X8 as usize])
        .is_empty());
    debug_assert!(lfm.above_y[TX_16X16 as usize]
        .intersect(lfm.above_y[TX_4X4 as usize])
        .is_empty());
    debug_assert!(lfm.above_y[TX_8X8 as usize]
        .intersect(lfm.above_y[TX_4X4 as usize])
        .is_empty());
    debug_assert!(lfm.int_4x4_y
        .intersect(lfm.above_y[TX_16X16 as usize])
        .is_empty());
    debug_assert!(lfm.above_uv[TX_16X16 as usize]
        .intersect(lfm.above_uv[TX_8X8 as usize])
        .is_empty());
    debug_assert!(lfm.above_uv[TX_16X16 as usize]
        .intersect(lfm.above_uv[TX_4X4 as usize])
        .is_empty());
    debug_assert!(lfm.above_uv[TX_8X8 as usize]
        .intersect(lfm.above_uv[TX_4X4 as usize])
        .is_empty());
    debug_assert!(lfm.int_4x4_uv
        .intersect(lfm.above_uv[TX_16X16 as usize])
        .is_empty());

    lfm
}
