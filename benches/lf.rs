use criterion::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaChaRng;

use rvp9::bench::def::*;
use rvp9::bench::lf::*;
use rvp9::bench::plane::*;

criterion_group!(
    lf,
    bench_setup_mask,
    bench_filter_block_plane_luma,
    bench_filter_block_plane_chroma,
);

fn fill_plane(ra: &mut ChaChaRng, plane: &mut Plane<u8>) {
    for y in 0..plane.cfg.height {
        for pixel in plane.row_mut(y) {
            *pixel = ra.gen();
        }
    }
}

fn new_plane(ra: &mut ChaChaRng, width: usize, height: usize) -> Plane<u8> {
    let mut p = Plane::new(width, height, 0, 0, 16, 16);

    fill_plane(ra, &mut p);

    p
}

/// Superblock's worth of mode info with all four transform tiers present.
fn mixed_grid() -> ModeInfoGrid {
    let mut grid = ModeInfoGrid::new(8, 8);
    grid.set_block(
        0,
        0,
        ModeInfo {
            sb_type: BlockSize::BLOCK_32X32,
            tx_size: TxSize::TX_32X32,
            ..Default::default()
        },
    );
    for r in (0..4).step_by(2) {
        for c in (4..8).step_by(2) {
            grid.set_block(
                r,
                c,
                ModeInfo {
                    sb_type: BlockSize::BLOCK_16X16,
                    tx_size: TxSize::TX_16X16,
                    ..Default::default()
                },
            );
        }
    }
    for r in 4..8 {
        for c in 0..4 {
            grid.set_block(
                r,
                c,
                ModeInfo {
                    sb_type: BlockSize::BLOCK_8X8,
                    tx_size: TxSize::TX_8X8,
                    ..Default::default()
                },
            );
        }
    }
    grid.set_block(
        4,
        4,
        ModeInfo {
            sb_type: BlockSize::BLOCK_32X32,
            tx_size: TxSize::TX_4X4,
            ..Default::default()
        },
    );
    grid
}

fn frame_lfi(level: u8) -> LoopFilterInfo {
    let lf = LoopFilterParams {
        filter_level: level,
        mode_ref_delta_enabled: false,
        ..Default::default()
    };
    let mut lfi = LoopFilterInfo::default();
    lfi.frame_init(&lf, &Segmentation::default(), level);
    lfi
}

fn bench_setup_mask(c: &mut Criterion) {
    let grid = mixed_grid();
    let lfi = frame_lfi(32);

    c.bench_function("setup_mask", |b| {
        b.iter(|| {
            let _ = black_box(setup_mask(&grid, &lfi, 0, 0));
        })
    });
}

fn bench_filter_block_plane_luma(c: &mut Criterion) {
    let mut ra = ChaChaRng::from_seed([0; 32]);
    let grid = mixed_grid();
    let lfi = frame_lfi(32);
    let mut plane = new_plane(&mut ra, 64, 64);
    let lfm = setup_mask(&grid, &lfi, 0, 0);

    c.bench_function("filter_block_plane_luma", |b| {
        b.iter(|| {
            let mut m = lfm;
            filter_block_plane(&lfi, &mut plane.as_region_mut(), 0, 0, 0, 8, &mut m);
            black_box(&plane);
        })
    });
}

fn bench_filter_block_plane_chroma(c: &mut Criterion) {
    let mut ra = ChaChaRng::from_seed([0; 32]);
    let grid = mixed_grid();
    let lfi = frame_lfi(32);
    let mut plane = new_plane(&mut ra, 32, 32);
    let lfm = setup_mask(&grid, &lfi, 0, 0);

    c.bench_function("filter_block_plane_chroma", |b| {
        b.iter(|| {
            let mut m = lfm;
            filter_block_plane(&lfi, &mut plane.as_region_mut(), 1, 0, 0, 8, &mut m);
            black_box(&plane);
        })
    });
}
