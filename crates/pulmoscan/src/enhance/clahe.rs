//! Contrast-limited adaptive histogram equalization.
//!
//! The image is split into a `tile_grid[0] × tile_grid[1]` grid. Each tile
//! gets its own equalization lookup table built from a clipped histogram;
//! the clipped excess is spread evenly over all bins so a flat tile is not
//! amplified into noise. Output pixels bilinearly blend the lookup tables of
//! the four nearest tile centres.

use image::{GrayImage, Luma};

const BINS: usize = 256;

/// Apply CLAHE with the given clip limit and tile grid.
///
/// A `clip_limit` of zero or less disables clipping (plain tiled
/// equalization). When the image size is not a multiple of the grid, the
/// histograms are taken over the image mirrored past its right and bottom
/// edges (reflect-101), so every tile has the same area.
pub fn clahe(gray: &GrayImage, clip_limit: f32, tile_grid: [u32; 2]) -> GrayImage {
    let (w, h) = gray.dimensions();
    if w == 0 || h == 0 {
        return gray.clone();
    }

    let tiles_x = tile_grid[0].max(1) as usize;
    let tiles_y = tile_grid[1].max(1) as usize;
    let tile_w = (w as usize).div_ceil(tiles_x);
    let tile_h = (h as usize).div_ceil(tiles_y);

    let luts = build_tile_luts(gray, clip_limit, tiles_x, tiles_y, tile_w, tile_h);

    let inv_tw = 1.0f32 / tile_w as f32;
    let inv_th = 1.0f32 / tile_h as f32;

    // Per-column tile indices and weights are shared by every row.
    let cols: Vec<(usize, usize, f32)> = (0..w as usize)
        .map(|x| interp_coords(x as f32 * inv_tw - 0.5, tiles_x))
        .collect();

    let src = gray.as_raw();
    let mut out = GrayImage::new(w, h);
    let stride = w as usize;
    for y in 0..h as usize {
        let (ty1, ty2, ya) = interp_coords(y as f32 * inv_th - 0.5, tiles_y);
        let row1 = &luts[ty1 * tiles_x..(ty1 + 1) * tiles_x];
        let row2 = &luts[ty2 * tiles_x..(ty2 + 1) * tiles_x];
        for (x, &(tx1, tx2, xa)) in cols.iter().enumerate() {
            let v = src[y * stride + x] as usize;
            let top = row1[tx1][v] as f32 * (1.0 - xa) + row1[tx2][v] as f32 * xa;
            let bottom = row2[tx1][v] as f32 * (1.0 - xa) + row2[tx2][v] as f32 * xa;
            let res = top * (1.0 - ya) + bottom * ya;
            out.put_pixel(x as u32, y as u32, Luma([res.round().clamp(0.0, 255.0) as u8]));
        }
    }
    out
}

/// Neighbouring tile indices and blend weight for a fractional tile position.
#[inline]
fn interp_coords(t: f32, n_tiles: usize) -> (usize, usize, f32) {
    let t1 = t.floor();
    let a = t - t1;
    let last = n_tiles as i64 - 1;
    let i1 = (t1 as i64).clamp(0, last) as usize;
    let i2 = (t1 as i64 + 1).clamp(0, last) as usize;
    (i1, i2, a)
}

/// Index into `0..n` for position `i` of a reflect-101 extended axis.
#[inline]
fn reflect_101(i: usize, n: usize) -> usize {
    if n == 1 {
        return 0;
    }
    let period = 2 * (n - 1);
    let k = i % period;
    if k < n {
        k
    } else {
        period - k
    }
}

fn build_tile_luts(
    gray: &GrayImage,
    clip_limit: f32,
    tiles_x: usize,
    tiles_y: usize,
    tile_w: usize,
    tile_h: usize,
) -> Vec<[u8; BINS]> {
    let (w, h) = (gray.width() as usize, gray.height() as usize);
    let src = gray.as_raw();
    let cols: Vec<usize> = (0..tiles_x * tile_w).map(|x| reflect_101(x, w)).collect();
    let area = tile_w * tile_h;
    let mut luts = Vec::with_capacity(tiles_x * tiles_y);

    for ty in 0..tiles_y {
        for tx in 0..tiles_x {
            let mut hist = [0usize; BINS];
            for y in ty * tile_h..(ty + 1) * tile_h {
                let row = reflect_101(y, h) * w;
                for &x in &cols[tx * tile_w..(tx + 1) * tile_w] {
                    hist[src[row + x] as usize] += 1;
                }
            }
            luts.push(tile_lut(&mut hist, area, clip_limit));
        }
    }
    luts
}

/// Clip `hist`, redistribute the excess, and return the cumulative mapping.
fn tile_lut(hist: &mut [usize; BINS], area: usize, clip_limit: f32) -> [u8; BINS] {
    let mut lut = [0u8; BINS];
    if area == 0 {
        for (i, v) in lut.iter_mut().enumerate() {
            *v = i as u8;
        }
        return lut;
    }

    if clip_limit > 0.0 {
        let clip = ((clip_limit * area as f32 / BINS as f32) as usize).max(1);
        let mut excess = 0usize;
        for bin in hist.iter_mut() {
            if *bin > clip {
                excess += *bin - clip;
                *bin = clip;
            }
        }

        let redist = excess / BINS;
        let residual = excess - redist * BINS;
        for bin in hist.iter_mut() {
            *bin += redist;
        }
        if residual > 0 {
            let step = (BINS / residual).max(1);
            for i in (0..BINS).step_by(step).take(residual) {
                hist[i] += 1;
            }
        }
    }

    let scale = 255.0f32 / area as f32;
    let mut sum = 0usize;
    for (bin, v) in hist.iter().zip(lut.iter_mut()) {
        sum += bin;
        *v = (sum as f32 * scale).round().clamp(0.0, 255.0) as u8;
    }
    lut
}
