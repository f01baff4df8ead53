//! Contrast-Limited Adaptive Histogram Equalization (CLAHE).
//!
//! The channel is split into a grid of tiles. Each tile gets its own
//! equalization table built from a clipped histogram, and every output pixel
//! blends the tables of the four nearest tile centres bilinearly so no tile
//! edges show up in the result.
//!
//! Images whose size is not a multiple of the grid are virtually padded on
//! the bottom/right with mirrored samples (reflect-101); pixels outside the
//! outer tile centres use the nearest tile tables.

use ndarray::{Array2, Array3, ArrayView2, ArrayView3};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::color_space::{lab_to_rgb, lightness_from_u8, lightness_to_u8, rgb_to_lab, Lab};
use super::core::{ensure_rgb, reflect_101, round_to_u8, RGB_CHANNELS};
use super::histogram::BINS;
use crate::error::{EqualizeError, Result};

/// Default clip limit, relative to the average bin count of a tile.
pub const DEFAULT_CLIP_LIMIT: f32 = 2.0;

/// Default tile grid (rows, columns).
pub const DEFAULT_TILE_GRID: (usize, usize) = (8, 8);

/// CLAHE tuning parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClaheParams {
    /// Maximum bin height as a multiple of `tile_area / 256`.
    pub clip_limit: f32,
    /// Number of tiles as (rows, columns).
    pub tile_grid: (usize, usize),
}

impl Default for ClaheParams {
    fn default() -> Self {
        Self {
            clip_limit: DEFAULT_CLIP_LIMIT,
            tile_grid: DEFAULT_TILE_GRID,
        }
    }
}

impl ClaheParams {
    pub fn new(clip_limit: f32, tile_grid: (usize, usize)) -> Self {
        Self { clip_limit, tile_grid }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.clip_limit.is_finite() || self.clip_limit <= 0.0 {
            return Err(EqualizeError::InvalidParameter(format!(
                "clip limit must be a positive number, got {}",
                self.clip_limit
            )));
        }
        if self.tile_grid.0 == 0 || self.tile_grid.1 == 0 {
            return Err(EqualizeError::InvalidParameter(format!(
                "tile grid must be at least 1x1, got {}x{}",
                self.tile_grid.0, self.tile_grid.1
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Tile tables
// ============================================================================

/// Tile layout over a (height, width) channel.
#[derive(Debug, Clone, Copy)]
struct TileGrid {
    rows: usize,
    cols: usize,
    tile_h: usize,
    tile_w: usize,
}

impl TileGrid {
    fn new(height: usize, width: usize, requested: (usize, usize)) -> Self {
        let rows = requested.0.min(height);
        let cols = requested.1.min(width);
        if (rows, cols) != requested {
            warn!(
                requested_rows = requested.0,
                requested_cols = requested.1,
                rows,
                cols,
                "tile grid larger than image, clamping"
            );
        }
        Self {
            rows,
            cols,
            tile_h: height.div_ceil(rows),
            tile_w: width.div_ceil(cols),
        }
    }

    fn tile_area(&self) -> usize {
        self.tile_h * self.tile_w
    }
}

/// Clip a histogram at `limit` and spread the excess over all bins.
fn clip_histogram(hist: &mut [u32; BINS], limit: u32) {
    let mut excess = 0u32;
    for bin in hist.iter_mut() {
        if *bin > limit {
            excess += *bin - limit;
            *bin = limit;
        }
    }
    if excess == 0 {
        return;
    }

    let batch = excess / BINS as u32;
    let mut residual = excess as usize % BINS;
    for bin in hist.iter_mut() {
        *bin += batch;
    }

    if residual > 0 {
        let step = (BINS / residual).max(1);
        let mut i = 0;
        while i < BINS && residual > 0 {
            hist[i] += 1;
            residual -= 1;
            i += step;
        }
    }
}

/// Equalization table for one tile.
fn tile_lut(channel: &ArrayView2<u8>, grid: &TileGrid, ty: usize, tx: usize, clip_limit: f32) -> [u8; BINS] {
    let (height, width) = channel.dim();
    let mut hist = [0u32; BINS];

    for yy in ty * grid.tile_h..(ty + 1) * grid.tile_h {
        let sy = reflect_101(yy as isize, height);
        for xx in tx * grid.tile_w..(tx + 1) * grid.tile_w {
            let sx = reflect_101(xx as isize, width);
            hist[channel[[sy, sx]] as usize] += 1;
        }
    }

    let area = grid.tile_area();
    let limit = ((clip_limit * area as f32 / BINS as f32) as u32).max(1);
    clip_histogram(&mut hist, limit);

    let scale = (BINS - 1) as f32 / area as f32;
    let mut lut = [0u8; BINS];
    let mut sum = 0u32;
    for (entry, &count) in lut.iter_mut().zip(hist.iter()) {
        sum += count;
        *entry = round_to_u8(sum as f32 * scale);
    }
    lut
}

/// Interpolation coordinates along one axis.
#[derive(Debug, Clone, Copy)]
struct AxisWeight {
    lo: usize,
    hi: usize,
    frac: f32,
}

fn axis_weights(len: usize, tile: usize, tiles: usize) -> Vec<AxisWeight> {
    let inv = 1.0 / tile as f32;
    (0..len)
        .map(|i| {
            let t = i as f32 * inv - 0.5;
            let lo = t.floor();
            let frac = t - lo;
            let lo = lo as isize;
            AxisWeight {
                lo: lo.max(0) as usize,
                hi: ((lo + 1) as usize).min(tiles - 1),
                frac,
            }
        })
        .collect()
}

// ============================================================================
// CLAHE
// ============================================================================

/// Apply CLAHE to a single 8-bit channel.
///
/// # Arguments
/// * `channel` - 2D array of samples (height, width)
/// * `params` - Clip limit and tile grid
///
/// # Returns
/// Channel with the same shape. Empty channels are returned as-is.
pub fn clahe_channel(channel: ArrayView2<u8>, params: &ClaheParams) -> Result<Array2<u8>> {
    params.validate()?;
    let (height, width) = channel.dim();
    if height == 0 || width == 0 {
        return Ok(channel.to_owned());
    }

    let grid = TileGrid::new(height, width, params.tile_grid);
    debug!(
        rows = grid.rows,
        cols = grid.cols,
        tile_h = grid.tile_h,
        tile_w = grid.tile_w,
        clip_limit = params.clip_limit,
        "CLAHE tile grid"
    );

    let luts: Vec<[u8; BINS]> = (0..grid.rows * grid.cols)
        .into_par_iter()
        .map(|i| tile_lut(&channel, &grid, i / grid.cols, i % grid.cols, params.clip_limit))
        .collect();

    let ys = axis_weights(height, grid.tile_h, grid.rows);
    let xs = axis_weights(width, grid.tile_w, grid.cols);

    Ok(Array2::from_shape_fn((height, width), |(y, x)| {
        let v = channel[[y, x]] as usize;
        let wy = ys[y];
        let wx = xs[x];
        let at = |ty: usize, tx: usize| luts[ty * grid.cols + tx][v] as f32;

        let top = at(wy.lo, wx.lo) * (1.0 - wx.frac) + at(wy.lo, wx.hi) * wx.frac;
        let bottom = at(wy.hi, wx.lo) * (1.0 - wx.frac) + at(wy.hi, wx.hi) * wx.frac;
        round_to_u8(top * (1.0 - wy.frac) + bottom * wy.frac)
    }))
}

/// CLAHE on the Lab lightness channel with default parameters
/// (clip limit 2.0, 8x8 tiles).
pub fn clahe_equalize(input: ArrayView3<u8>) -> Result<Array3<u8>> {
    clahe_equalize_with(input, &ClaheParams::default())
}

/// CLAHE on the Lab lightness channel, a/b untouched.
pub fn clahe_equalize_with(input: ArrayView3<u8>, params: &ClaheParams) -> Result<Array3<u8>> {
    ensure_rgb(&input)?;
    params.validate()?;
    let (height, width, _) = input.dim();
    debug!(height, width, "CLAHE lightness equalization");

    let lab_rows: Vec<Vec<Lab>> = (0..height)
        .into_par_iter()
        .map(|y| {
            (0..width)
                .map(|x| rgb_to_lab(input[[y, x, 0]], input[[y, x, 1]], input[[y, x, 2]]))
                .collect()
        })
        .collect();

    let lightness = Array2::from_shape_fn((height, width), |(y, x)| lightness_to_u8(lab_rows[y][x].l));
    let lightness_eq = clahe_channel(lightness.view(), params)?;

    let data: Vec<u8> = lab_rows
        .par_iter()
        .enumerate()
        .flat_map_iter(|(y, row)| {
            let lightness_eq = &lightness_eq;
            row.iter().enumerate().flat_map(move |(x, px)| {
                let l = lightness_from_u8(lightness_eq[[y, x]]);
                let (r, g, b) = lab_to_rgb(l, px.a, px.b);
                [round_to_u8(r), round_to_u8(g), round_to_u8(b)]
            })
        })
        .collect();

    Array3::from_shape_vec((height, width, RGB_CHANNELS), data)
        .map_err(|e| EqualizeError::InvalidImageFormat(e.to_string()))
}
