use crate::def::*;
use crate::lf::mask::LoopFilterMask;
use crate::lf::{LoopFilterInfo, LoopFilterThresh};
use crate::plane_region::PlaneRegionMut;

#[inline]
fn abs_diff(a: u8, b: u8) -> i32 {
    (i32::from(a) - i32::from(b)).abs()
}

/* p[0] is the sample nearest the edge on the left/above side, q[0] the
 * nearest on the right/below side */
#[inline]
fn filter_mask(limit: u8, blimit: u8, p: &[u8; 4], q: &[u8; 4]) -> bool {
    let limit = i32::from(limit);
    let blimit = i32::from(blimit);
    let mut over = abs_diff(p[3], p[2]) > limit;
    over |= abs_diff(p[2], p[1]) > limit;
    over |= abs_diff(p[1], p[0]) > limit;
    over |= abs_diff(q[1], q[0]) > limit;
    over |= abs_diff(q[2], q[1]) > limit;
    over |= abs_diff(q[3], q[2]) > limit;
    over |= abs_diff(p[0], q[0]) * 2 + abs_diff(p[1], q[1]) / 2 > blimit;
    !over
}

#[inline]
fn flat_mask4(thresh: i32, p: &[u8; 4], q: &[u8; 4]) -> bool {
    abs_diff(p[1], p[0]) <= thresh
        && abs_diff(q[1], q[0]) <= thresh
        && abs_diff(p[2], p[0]) <= thresh
        && abs_diff(q[2], q[0]) <= thresh
        && abs_diff(p[3], p[0]) <= thresh
        && abs_diff(q[3], q[0]) <= thresh
}

/* outer-sample flatness for the widest filter: p4..p7 / q4..q7 against the
 * edge samples */
#[inline]
fn flat_mask5(thresh: i32, p: &[u8; 8], q: &[u8; 8]) -> bool {
    let mut flat = true;
    for i in 4..8 {
        flat &= abs_diff(p[i], p[0]) <= thresh && abs_diff(q[i], q[0]) <= thresh;
    }
    flat
}

#[inline]
fn hev_mask(thresh: u8, p1: u8, p0: u8, q0: u8, q1: u8) -> bool {
    abs_diff(p1, p0) > i32::from(thresh) || abs_diff(q1, q0) > i32::from(thresh)
}

/// Narrow filter, signed 8-bit arithmetic with the high-edge-variance
/// shortcut. Returns the replacement (p1, p0, q0, q1).
#[inline]
fn filter4(hev: bool, p1: u8, p0: u8, q0: u8, q1: u8) -> (u8, u8, u8, u8) {
    let sc = |v: i32| clamp_i32(v, -128, 127);
    let ps1 = i32::from(p1) - 128;
    let ps0 = i32::from(p0) - 128;
    let qs0 = i32::from(q0) - 128;
    let qs1 = i32::from(q1) - 128;

    let mut filter = if hev { sc(ps1 - qs1) } else { 0 };
    filter = sc(filter + 3 * (qs0 - ps0));

    let filter1 = sc(filter + 4) >> 3;
    let filter2 = sc(filter + 3) >> 3;

    let oq0 = (sc(qs0 - filter1) + 128) as u8;
    let op0 = (sc(ps0 + filter2) + 128) as u8;

    let outer = if hev { 0 } else { (filter1 + 1) >> 1 };
    let oq1 = (sc(qs1 - outer) + 128) as u8;
    let op1 = (sc(ps1 + outer) + 128) as u8;
    (op1, op0, oq0, oq1)
}

/// Wide filter over 3+3 samples, 7-tap rounded averages. Outputs ordered
/// nearest-first: ([p0, p1, p2], [q0, q1, q2]).
#[inline]
fn filter8(p: &[u8; 4], q: &[u8; 4]) -> ([u8; 3], [u8; 3]) {
    let p3 = u32::from(p[3]);
    let p2 = u32::from(p[2]);
    let p1 = u32::from(p[1]);
    let p0 = u32::from(p[0]);
    let q0 = u32::from(q[0]);
    let q1 = u32::from(q[1]);
    let q2 = u32::from(q[2]);
    let q3 = u32::from(q[3]);

    let op2 = (p3 + p3 + p3 + 2 * p2 + p1 + p0 + q0 + 4) >> 3;
    let op1 = (p3 + p3 + p2 + 2 * p1 + p0 + q0 + q1 + 4) >> 3;
    let op0 = (p3 + p2 + p1 + 2 * p0 + q0 + q1 + q2 + 4) >> 3;
    let oq0 = (p2 + p1 + p0 + 2 * q0 + q1 + q2 + q3 + 4) >> 3;
    let oq1 = (p1 + p0 + q0 + 2 * q1 + q2 + q3 + q3 + 4) >> 3;
    let oq2 = (p0 + q0 + q1 + 2 * q2 + q3 + q3 + q3 + 4) >> 3;
    (
        [op0 as u8, op1 as u8, op2 as u8],
        [oq0 as u8, oq1 as u8, oq2 as u8],
    )
}

/// Widest filter over 7+7 samples, 15-tap rounded averages. Outputs ordered
/// nearest-first: p0..p6 and q0..q6 replacements.
#[inline]
fn filter16(p: &[u8; 8], q: &[u8; 8]) -> ([u8; 7], [u8; 7]) {
    let side = |near: &[u8; 8], far: &[u8; 8]| -> [u8; 7] {
        let mut out = [0u8; 7];
        for (k, o) in out.iter_mut().enumerate() {
            // 15-tap window: the outermost sample repeats to pad past the
            // buffer edge, the center sample is counted twice
            let mut sum = u32::from(near[7]) * (k as u32 + 1) + u32::from(near[k]) + 8;
            for i in 0..7 {
                sum += u32::from(near[i]);
            }
            for i in 0..(7 - k) {
                sum += u32::from(far[i]);
            }
            *o = (sum >> 4) as u8;
        }
        out
    };
    (side(p, q), side(q, p))
}

// Directional kernels. Horizontal variants filter a horizontal edge at row
// `y` over `8 * count` columns starting at `x`; vertical variants filter a
// vertical edge at column `x` over 8 rows starting at `y`.

fn lpf_horizontal_4(
    buf: &mut PlaneRegionMut<'_, pel>,
    x: usize,
    y: usize,
    t: &LoopFilterThresh,
    count: usize,
) {
    for xi in x..x + 8 * count {
        let p = [buf[y - 1][xi], buf[y - 2][xi], buf[y - 3][xi], buf[y - 4][xi]];
        let q = [buf[y][xi], buf[y + 1][xi], buf[y + 2][xi], buf[y + 3][xi]];
        if filter_mask(t.lim, t.mblim, &p, &q) {
            let hev = hev_mask(t.hev_thr, p[1], p[0], q[0], q[1]);
            let (op1, op0, oq0, oq1) = filter4(hev, p[1], p[0], q[0], q[1]);
            buf[y - 2][xi] = op1;
            buf[y - 1][xi] = op0;
            buf[y][xi] = oq0;
            buf[y + 1][xi] = oq1;
        }
    }
}

fn lpf_horizontal_8(
    buf: &mut PlaneRegionMut<'_, pel>,
    x: usize,
    y: usize,
    t: &LoopFilterThresh,
    count: usize,
) {
    for xi in x..x + 8 * count {
        let p = [buf[y - 1][xi], buf[y - 2][xi], buf[y - 3][xi], buf[y - 4][xi]];
        let q = [buf[y][xi], buf[y + 1][xi], buf[y + 2][xi], buf[y + 3][xi]];
        if !filter_mask(t.lim, t.mblim, &p, &q) {
            continue;
        }
        if flat_mask4(1, &p, &q) {
            let (op, oq) = filter8(&p, &q);
            for k in 0..3 {
                buf[y - 1 - k][xi] = op[k];
                buf[y + k][xi] = oq[k];
            }
        } else {
            let hev = hev_mask(t.hev_thr, p[1], p[0], q[0], q[1]);
            let (op1, op0, oq0, oq1) = filter4(hev, p[1], p[0], q[0], q[1]);
            buf[y - 2][xi] = op1;
            buf[y - 1][xi] = op0;
            buf[y][xi] = oq0;
            buf[y + 1][xi] = oq1;
        }
    }
}

fn lpf_horizontal_16(
    buf: &mut PlaneRegionMut<'_, pel>,
    x: usize,
    y: usize,
    t: &LoopFilterThresh,
    count: usize,
) {
    for xi in x..x + 8 * count {
        let mut p = [0u8; 8];
        let mut q = [0u8; 8];
        for k in 0..8 {
            p[k] = buf[y - 1 - k][xi];
            q[k] = buf[y + k][xi];
        }
        let p4 = [p[0], p[1], p[2], p[3]];
        let q4 = [q[0], q[1], q[2], q[3]];
        if !filter_mask(t.lim, t.mblim, &p4, &q4) {
            continue;
        }
        let flat = flat_mask4(1, &p4, &q4);
        if flat && flat_mask5(1, &p, &q) {
            let (op, oq) = filter16(&p, &q);
            for k in 0..7 {
                buf[y - 1 - k][xi] = op[k];
                buf[y + k][xi] = oq[k];
            }
        } else if flat {
            let (op, oq) = filter8(&p4, &q4);
            for k in 0..3 {
                buf[y - 1 - k][xi] = op[k];
                buf[y + k][xi] = oq[k];
            }
        } else {
            let hev = hev_mask(t.hev_thr, p[1], p[0], q[0], q[1]);
            let (op1, op0, oq0, oq1) = filter4(hev, p[1], p[0], q[0], q[1]);
            buf[y - 2][xi] = op1;
            buf[y - 1][xi] = op0;
            buf[y][xi] = oq0;
            buf[y + 1][xi] = oq1;
        }
    }
}

fn lpf_vertical_4(buf: &mut PlaneRegionMut<'_, pel>, x: usize, y: usize, t: &LoopFilterThresh) {
    for yi in y..y + 8 {
        let row = &mut buf[yi];
        let p = [row[x - 1], row[x - 2], row[x - 3], row[x - 4]];
        let q = [row[x], row[x + 1], row[x + 2], row[x + 3]];
        if filter_mask(t.lim, t.mblim, &p, &q) {
            let hev = hev_mask(t.hev_thr, p[1], p[0], q[0], q[1]);
            let (op1, op0, oq0, oq1) = filter4(hev, p[1], p[0], q[0], q[1]);
            row[x - 2] = op1;
            row[x - 1] = op0;
            row[x] = oq0;
            row[x + 1] = oq1;
        }
    }
}

fn lpf_vertical_8(buf: &mut PlaneRegionMut<'_, pel>, x: usize, y: usize, t: &LoopFilterThresh) {
    for yi in y..y + 8 {
        let row = &mut buf[yi];
        let p = [row[x - 1], row[x - 2], row[x - 3], row[x - 4]];
        let q = [row[x], row[x + 1], row[x + 2], row[x + 3]];
        if !filter_mask(t.lim, t.mblim, &p, &q) {
            continue;
        }
        if flat_mask4(1, &p, &q) {
            let (op, oq) = filter8(&p, &q);
            for k in 0..3 {
                row[x - 1 - k] = op[k];
                row[x + k] = oq[k];
            }
        } else {
            let hev = hev_mask(t.hev_thr, p[1], p[0], q[0], q[1]);
            let (op1, op0, oq0, oq1) = filter4(hev, p[1], p[0], q[0], q[1]);
            row[x - 2] = op1;
            row[x - 1] = op0;
            row[x] = oq0;
            row[x + 1] = oq1;
        }
    }
}

fn lpf_vertical_16(
    buf: &mut PlaneRegionMut<'_, pel>,
    x: usize,
    y: usize,
    t: &LoopFilterThresh,
    rows: usize,
) {
    for yi in y..y + rows {
        let row = &mut buf[yi];
        let mut p = [0u8; 8];
        let mut q = [0u8; 8];
        for k in 0..8 {
            p[k] = row[x - 1 - k];
            q[k] = row[x + k];
        }
        let p4 = [p[0], p[1], p[2], p[3]];
        let q4 = [q[0], q[1], q[2], q[3]];
        if !filter_mask(t.lim, t.mblim, &p4, &q4) {
            continue;
        }
        let flat = flat_mask4(1, &p4, &q4);
        if flat && flat_mask5(1, &p, &q) {
            let (op, oq) = filter16(&p, &q);
            for k in 0..7 {
                row[x - 1 - k] = op[k];
                row[x + k] = oq[k];
            }
        } else if flat {
            let (op, oq) = filter8(&p4, &q4);
            for k in 0..3 {
                row[x - 1 - k] = op[k];
                row[x + k] = oq[k];
            }
        } else {
            let hev = hev_mask(t.hev_thr, p[1], p[0], q[0], q[1]);
            let (op1, op0, oq0, oq1) = filter4(hev, p[1], p[0], q[0], q[1]);
            row[x - 2] = op1;
            row[x - 1] = op0;
            row[x] = oq0;
            row[x + 1] = oq1;
        }
    }
}

/// Applies the vertical-edge masks for a pair of 8-pixel rows in one pass.
/// The second row's masks sit `mask_shift` bits up; its filter levels sit
/// `lfl_forward` entries further into `lfl`.
#[allow(clippy::too_many_arguments)]
fn filter_selectively_vert_row2(
    subsampled: bool,
    buf: &mut PlaneRegionMut<'_, pel>,
    x0: usize,
    y0: usize,
    mask_16x16: u32,
    mask_8x8: u32,
    mask_4x4: u32,
    mask_4x4_int: u32,
    lfi: &LoopFilterInfo,
    lfl: &[u8],
) {
    let (mask_shift, mask_cutoff, lfl_forward) = if subsampled {
        (4, 0xf, 4)
    } else {
        (8, 0xff, 8)
    };

    let mut m16_0 = mask_16x16 & mask_cutoff;
    let mut m8_0 = mask_8x8 & mask_cutoff;
    let mut m4_0 = mask_4x4 & mask_cutoff;
    let mut mi_0 = mask_4x4_int & mask_cutoff;
    let mut m16_1 = (mask_16x16 >> mask_shift) & mask_cutoff;
    let mut m8_1 = (mask_8x8 >> mask_shift) & mask_cutoff;
    let mut m4_1 = (mask_4x4 >> mask_shift) & mask_cutoff;
    let mut mi_1 = (mask_4x4_int >> mask_shift) & mask_cutoff;

    let mut mask = m16_0 | m8_0 | m4_0 | mi_0 | m16_1 | m8_1 | m4_1 | mi_1;
    let mut x = x0;
    let mut i = 0;
    let y1 = y0 + 8;

    while mask != 0 {
        if mask & 1 != 0 {
            let lfi0 = &lfi.lfthr[lfl[i] as usize];
            let lfi1 = &lfi.lfthr[lfl[i + lfl_forward] as usize];

            if (m16_0 | m16_1) & 1 != 0 {
                if (m16_0 & m16_1) & 1 != 0 {
                    // both halves take the wide filter; levels within a
                    // 16x16 are uniform, so one threshold covers the pair
                    lpf_vertical_16(buf, x, y0, lfi0, 16);
                } else if m16_0 & 1 != 0 {
                    lpf_vertical_16(buf, x, y0, lfi0, 8);
                } else {
                    lpf_vertical_16(buf, x, y1, lfi1, 8);
                }
            }
            if (m8_0 | m8_1) & 1 != 0 {
                if m8_0 & 1 != 0 {
                    lpf_vertical_8(buf, x, y0, lfi0);
                }
                if m8_1 & 1 != 0 {
                    lpf_vertical_8(buf, x, y1, lfi1);
                }
            }
            if (m4_0 | m4_1) & 1 != 0 {
                if m4_0 & 1 != 0 {
                    lpf_vertical_4(buf, x, y0, lfi0);
                }
                if m4_1 & 1 != 0 {
                    lpf_vertical_4(buf, x, y1, lfi1);
                }
            }
            if (mi_0 | mi_1) & 1 != 0 {
                if mi_0 & 1 != 0 {
                    lpf_vertical_4(buf, x + 4, y0, lfi0);
                }
                if mi_1 & 1 != 0 {
                    lpf_vertical_4(buf, x + 4, y1, lfi1);
                }
            }
        }
        x += 8;
        i += 1;
        m16_0 >>= 1;
        m8_0 >>= 1;
        m4_0 >>= 1;
        mi_0 >>= 1;
        m16_1 >>= 1;
        m8_1 >>= 1;
        m4_1 >>= 1;
        mi_1 >>= 1;
        mask >>= 1;
    }
}

/// Applies the horizontal-edge masks for one 8-pixel row. Adjacent units at
/// the same strength are consumed two at a time so the wide kernels run over
/// a full 16-pixel span.
#[allow(clippy::too_many_arguments)]
fn filter_selectively_horiz(
    buf: &mut PlaneRegionMut<'_, pel>,
    x0: usize,
    y: usize,
    mask_16x16: u32,
    mask_8x8: u32,
    mask_4x4: u32,
    mask_4x4_int: u32,
    lfi: &LoopFilterInfo,
    lfl: &[u8],
) {
    let mut m16 = mask_16x16;
    let mut m8 = mask_8x8;
    let mut m4 = mask_4x4;
    let mut mi = mask_4x4_int;
    let mut mask = m16 | m8 | m4 | mi;
    let mut x = x0;
    let mut i = 0;

    while mask != 0 {
        let mut count = 1;
        if mask & 1 != 0 {
            let t = &lfi.lfthr[lfl[i] as usize];
            if m16 & 1 != 0 {
                if m16 & 3 == 3 {
                    lpf_horizontal_16(buf, x, y, t, 2);
                    count = 2;
                } else {
                    lpf_horizontal_16(buf, x, y, t, 1);
                }
            } else if m8 & 1 != 0 {
                if m8 & 3 == 3 {
                    let tn = &lfi.lfthr[lfl[i + 1] as usize];
                    lpf_horizontal_8(buf, x, y, t, 1);
                    lpf_horizontal_8(buf, x + 8, y, tn, 1);
                    if mi & 3 == 3 {
                        lpf_horizontal_4(buf, x, y + 4, t, 1);
                        lpf_horizontal_4(buf, x + 8, y + 4, tn, 1);
                    } else if mi & 1 != 0 {
                        lpf_horizontal_4(buf, x, y + 4, t, 1);
                    } else if mi & 2 != 0 {
                        lpf_horizontal_4(buf, x + 8, y + 4, tn, 1);
                    }
                    count = 2;
                } else {
                    lpf_horizontal_8(buf, x, y, t, 1);
                    if mi & 1 != 0 {
                        lpf_horizontal_4(buf, x, y + 4, t, 1);
                    }
                }
            } else if m4 & 1 != 0 {
                if m4 & 3 == 3 {
                    let tn = &lfi.lfthr[lfl[i + 1] as usize];
                    lpf_horizontal_4(buf, x, y, t, 1);
                    lpf_horizontal_4(buf, x + 8, y, tn, 1);
                    if mi & 3 == 3 {
                        lpf_horizontal_4(buf, x, y + 4, t, 1);
                        lpf_horizontal_4(buf, x + 8, y + 4, tn, 1);
                    } else if mi & 1 != 0 {
                        lpf_horizontal_4(buf, x, y + 4, t, 1);
                    } else if mi & 2 != 0 {
                        lpf_horizontal_4(buf, x + 8, y + 4, tn, 1);
                    }
                    count = 2;
                } else {
                    lpf_horizontal_4(buf, x, y, t, 1);
                    if mi & 1 != 0 {
                        lpf_horizontal_4(buf, x, y + 4, t, 1);
                    }
                }
            } else if mi & 1 != 0 {
                lpf_horizontal_4(buf, x, y + 4, t, 1);
            }
        }
        x += 8 * count;
        i += count;
        m16 >>= count;
        m8 >>= count;
        m4 >>= count;
        mi >>= count;
        mask >>= count;
    }
}

/// Applies a superblock's masks to one plane. Luma walks the 8x8 unit grid
/// two rows per vertical pass and one per horizontal pass; chroma walks the
/// subsampled 4x4-unit grid four and two at a time.
pub fn filter_block_plane(
    lfi: &LoopFilterInfo,
    buf: &mut PlaneRegionMut<'_, pel>,
    plane: usize,
    mi_row: usize,
    mi_col: usize,
    mi_rows_total: usize,
    lfm: &mut LoopFilterMask,
) {
    use crate::def::TxSize::*;

    if plane == Y_C {
        let x0 = mi_col << MI_SIZE_LOG2;
        let y0 = mi_row << MI_SIZE_LOG2;

        let mut m16 = lfm.left_y[TX_16X16 as usize].bits();
        let mut m8 = lfm.left_y[TX_8X8 as usize].bits();
        let mut m4 = lfm.left_y[TX_4X4 as usize].bits();
        let mut mi_v = lfm.int_4x4_y.bits();
        let mut r = 0;
        while r < MI_BLOCK_SIZE && mi_row + r < mi_rows_total {
            filter_selectively_vert_row2(
                false,
                buf,
                x0,
                y0 + (r << MI_SIZE_LOG2),
                (m16 & 0xffff) as u32,
                (m8 & 0xffff) as u32,
                (m4 & 0xffff) as u32,
                (mi_v & 0xffff) as u32,
                lfi,
                &lfm.lfl_y[(r << 3)..],
            );
            m16 >>= 16;
            m8 >>= 16;
            m4 >>= 16;
            mi_v >>= 16;
            r += 2;
        }

        let mut m16 = lfm.above_y[TX_16X16 as usize].bits();
        let mut m8 = lfm.above_y[TX_8X8 as usize].bits();
        let mut m4 = lfm.above_y[TX_4X4 as usize].bits();
        let mut mi_h = lfm.int_4x4_y.bits();
        let mut r = 0;
        while r < MI_BLOCK_SIZE && mi_row + r < mi_rows_total {
            // no edge above the frame, interior edges still apply
            let (m16_r, m8_r, m4_r) = if mi_row + r == 0 {
                (0, 0, 0)
            } else {
                (m16 & 0xff, m8 & 0xff, m4 & 0xff)
            };
            filter_selectively_horiz(
                buf,
                x0,
                y0 + (r << MI_SIZE_LOG2),
                m16_r as u32,
                m8_r as u32,
                m4_r as u32,
                (mi_h & 0xff) as u32,
                lfi,
                &lfm.lfl_y[(r << 3)..],
            );
            m16 >>= 8;
            m8 >>= 8;
            m4 >>= 8;
            mi_h >>= 8;
            r += 1;
        }
    } else {
        let x0 = mi_col << (MI_SIZE_LOG2 - 1);
        let y0 = mi_row << (MI_SIZE_LOG2 - 1);

        let mut m16 = u64::from(lfm.left_uv[TX_16X16 as usize].bits());
        let mut m8 = u64::from(lfm.left_uv[TX_8X8 as usize].bits());
        let mut m4 = u64::from(lfm.left_uv[TX_4X4 as usize].bits());
        let mut mi_v = u64::from(lfm.int_4x4_uv.bits());
        let mut r = 0;
        while r < MI_BLOCK_SIZE && mi_row + r < mi_rows_total {
            if plane == U_C {
                // chroma levels track the co-located luma units; fill once,
                // the V pass reuses them
                for c in 0..(MI_BLOCK_SIZE >> 1) {
                    lfm.lfl_uv[(r << 1) + c] = lfm.lfl_y[(r << 3) + (c << 1)];
                    lfm.lfl_uv[((r + 2) << 1) + c] = lfm.lfl_y[((r + 2) << 3) + (c << 1)];
                }
            }
            filter_selectively_vert_row2(
                true,
                buf,
                x0,
                y0 + (r << (MI_SIZE_LOG2 - 1)),
                (m16 & 0xff) as u32,
                (m8 & 0xff) as u32,
                (m4 & 0xff) as u32,
                (mi_v & 0xff) as u32,
                lfi,
                &lfm.lfl_uv[(r << 1)..],
            );
            m16 >>= 8;
            m8 >>= 8;
            m4 >>= 8;
            mi_v >>= 8;
            r += 4;
        }

        let mut m16 = u64::from(lfm.above_uv[TX_16X16 as usize].bits());
        let mut m8 = u64::from(lfm.above_uv[TX_8X8 as usize].bits());
        let mut m4 = u64::from(lfm.above_uv[TX_4X4 as usize].bits());
        let mut mi_h = u64::from(lfm.int_4x4_uv.bits());
        let mut r = 0;
        while r < MI_BLOCK_SIZE && mi_row + r < mi_rows_total {
            // the last row's interior chroma edge would reach below the
            // frame on the subsampled grid
            let skip_border = mi_row + r == mi_rows_total - 1;
            let mi_r = if skip_border { 0 } else { mi_h & 0xf };
            let (m16_r, m8_r, m4_r) = if mi_row + r == 0 {
                (0, 0, 0)
            } else {
                (m16 & 0xf, m8 & 0xf, m4 & 0xf)
            };
            filter_selectively_horiz(
                buf,
                x0,
                y0 + (r << (MI_SIZE_LOG2 - 1)),
                m16_r as u32,
                m8_r as u32,
                m4_r as u32,
                mi_r as u32,
                lfi,
                &lfm.lfl_uv[(r << 1)..],
            );
            m16 >>= 4;
            m8 >>= 4;
            m4 >>= 4;
            mi_h >>= 4;
            r += 2;
        }
    }
}
