//! Global histogram equalization: single channel, channel-wise RGB, HSV value.
//!
//! All filters take an RGB image (height, width, 3) and return a newly
//! allocated RGB image of the same shape. Inputs with any other channel
//! count fail with `InvalidImageFormat`.

use ndarray::{Array2, Array3, ArrayView2, ArrayView3, ArrayViewD};
use rayon::prelude::*;
use tracing::debug;

use super::clahe::{clahe_equalize_with, ClaheParams};
use super::color_space::{hsv_to_rgb, rgb_to_hsv, Hsv};
use super::core::{as_rgb_view, channel_view, ensure_rgb, merge_channels, round_to_u8, RGB_CHANNELS};
use super::histogram::{compute_histogram, cumulative, Histogram, BINS};
use super::method::Method;
use crate::error::{EqualizeError, Result};

// ============================================================================
// Equalization primitive
// ============================================================================

/// Build the equalization lookup table for a histogram.
///
/// Each value `v` maps to `round((cdf[v] - cdf_min) / (N - cdf_min) * 255)`
/// where `cdf_min` is the first non-zero cumulative count.
///
/// Returns `None` when the histogram is empty or holds a single distinct
/// value (`N == cdf_min`), in which case the samples must be left unchanged.
pub fn equalization_lut(hist: &Histogram) -> Option<[u8; BINS]> {
    let cdf = cumulative(hist);
    let total = cdf[BINS - 1];
    let cdf_min = *cdf.iter().find(|&&c| c > 0)?;
    if cdf_min == total {
        return None;
    }

    let scale = 255.0 / (total - cdf_min) as f64;
    let mut lut = [0u8; BINS];
    for (entry, &c) in lut.iter_mut().zip(cdf.iter()) {
        let mapped = c.saturating_sub(cdf_min) as f64 * scale;
        *entry = mapped.round().clamp(0.0, 255.0) as u8;
    }
    Some(lut)
}

/// Equalize a single 8-bit channel through its normalized cumulative histogram.
///
/// # Arguments
/// * `channel` - 2D array of samples (height, width)
///
/// # Returns
/// Equalized channel with the same shape. A channel with a single distinct
/// value (or no pixels) is returned unchanged.
pub fn equalize_channel(channel: ArrayView2<u8>) -> Array2<u8> {
    let hist = compute_histogram(&channel);
    match equalization_lut(&hist) {
        Some(lut) => channel.mapv(|v| lut[v as usize]),
        None => channel.to_owned(),
    }
}

// ============================================================================
// Channel-wise RGB
// ============================================================================

/// Equalize R, G and B independently.
///
/// Each channel is stretched by its own distribution, so the color balance
/// of the result can differ from the input.
pub fn channel_wise_equalize(input: ArrayView3<u8>) -> Result<Array3<u8>> {
    ensure_rgb(&input)?;
    let (height, width, _) = input.dim();
    debug!(height, width, "channel-wise RGB equalization");

    let planes: Vec<Array2<u8>> = (0..RGB_CHANNELS)
        .into_par_iter()
        .map(|c| equalize_channel(channel_view(&input, c)))
        .collect();

    merge_channels(&planes)
}

// ============================================================================
// HSV value channel
// ============================================================================

/// Equalize the HSV value channel, keeping hue and saturation untouched.
pub fn hsv_equalize(input: ArrayView3<u8>) -> Result<Array3<u8>> {
    ensure_rgb(&input)?;
    let (height, width, _) = input.dim();
    debug!(height, width, "HSV value equalization");

    let hsv_rows: Vec<Vec<Hsv>> = (0..height)
        .into_par_iter()
        .map(|y| {
            (0..width)
                .map(|x| rgb_to_hsv(input[[y, x, 0]], input[[y, x, 1]], input[[y, x, 2]]))
                .collect()
        })
        .collect();

    let value = Array2::from_shape_fn((height, width), |(y, x)| hsv_rows[y][x].v);
    let value_eq = equalize_channel(value.view());

    let data: Vec<u8> = hsv_rows
        .par_iter()
        .enumerate()
        .flat_map_iter(|(y, row)| {
            let value_eq = &value_eq;
            row.iter().enumerate().flat_map(move |(x, px)| {
                let (r, g, b) = hsv_to_rgb(px.h, px.s, value_eq[[y, x]]);
                [round_to_u8(r), round_to_u8(g), round_to_u8(b)]
            })
        })
        .collect();

    Array3::from_shape_vec((height, width, RGB_CHANNELS), data)
        .map_err(|e| EqualizeError::InvalidImageFormat(e.to_string()))
}

// ============================================================================
// Dispatch
// ============================================================================

/// Apply `method` with default CLAHE parameters.
///
/// Accepts any dimensionality so that grayscale (2D) input is rejected with
/// `InvalidImageFormat` instead of being misread.
pub fn equalize(input: ArrayViewD<u8>, method: Method) -> Result<Array3<u8>> {
    equalize_with(input, method, &ClaheParams::default())
}

/// Apply `method`, using `clahe` when the method is CLAHE.
pub fn equalize_with(input: ArrayViewD<u8>, method: Method, clahe: &ClaheParams) -> Result<Array3<u8>> {
    let rgb = as_rgb_view(input)?;
    apply_method(rgb, method, clahe)
}

/// Apply `method` to an RGB view.
pub fn apply_method(input: ArrayView3<u8>, method: Method, clahe: &ClaheParams) -> Result<Array3<u8>> {
    match method {
        Method::ChannelWiseRgb => channel_wise_equalize(input),
        Method::HsvValue => hsv_equalize(input),
        Method::ClaheLab => clahe_equalize_with(input, clahe),
    }
}
