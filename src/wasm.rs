//! WebAssembly exports for the equalization filters.
//!
//! These functions are exposed to JavaScript via wasm-bindgen.
//!
//! ## Buffer Layout
//!
//! Images cross the boundary as flat RGB byte arrays
//! (length = width * height * 3), row-major, no padding. Errors are raised
//! as JavaScript `Error` objects.

use wasm_bindgen::prelude::*;

use crate::filters::clahe::{clahe_equalize_with, ClaheParams};
use crate::filters::equalize::{channel_wise_equalize, hsv_equalize};
use crate::filters::histogram::compute_histogram;
use crate::image_io::{decode_image_bytes, encode_jpeg, from_raw_rgb};

fn rgb_input(data: &[u8], width: usize, height: usize) -> Result<ndarray::Array3<u8>, JsError> {
    Ok(from_raw_rgb(data.to_vec(), width, height, 3)?)
}

// ============================================================================
// RGB Equalization
// ============================================================================

/// Equalize R, G and B independently.
///
/// # Arguments
/// * `data` - Flat array of RGB bytes (length = width * height * 3)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
///
/// # Returns
/// Flat array of RGB bytes with the same size
#[wasm_bindgen]
pub fn channel_wise_equalize_wasm(data: &[u8], width: usize, height: usize) -> Result<Vec<u8>, JsError> {
    let input = rgb_input(data, width, height)?;
    let result = channel_wise_equalize(input.view())?;
    Ok(result.into_raw_vec_and_offset().0)
}

/// Equalize the HSV value channel only.
#[wasm_bindgen]
pub fn hsv_equalize_wasm(data: &[u8], width: usize, height: usize) -> Result<Vec<u8>, JsError> {
    let input = rgb_input(data, width, height)?;
    let result = hsv_equalize(input.view())?;
    Ok(result.into_raw_vec_and_offset().0)
}

/// CLAHE on the Lab lightness channel.
///
/// # Arguments
/// * `clip_limit` - Clip limit relative to the average bin count (2.0 by default elsewhere)
/// * `tile_rows`, `tile_cols` - Tile grid (8 x 8 by default elsewhere)
#[wasm_bindgen]
pub fn clahe_equalize_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    clip_limit: f32,
    tile_rows: usize,
    tile_cols: usize,
) -> Result<Vec<u8>, JsError> {
    let input = rgb_input(data, width, height)?;
    let params = ClaheParams::new(clip_limit, (tile_rows, tile_cols));
    let result = clahe_equalize_with(input.view(), &params)?;
    Ok(result.into_raw_vec_and_offset().0)
}

// ============================================================================
// Histogram & Codec
// ============================================================================

/// 256-bucket histogram over all bytes of the buffer.
#[wasm_bindgen]
pub fn compute_histogram_wasm(data: &[u8]) -> Vec<u32> {
    compute_histogram(&ndarray::ArrayView1::from(data)).to_vec()
}

/// Decode a JPEG/PNG file into flat RGB bytes.
///
/// The decoded width and height are prepended as two little-endian u32
/// values so the caller can rebuild the image shape.
#[wasm_bindgen]
pub fn decode_image_wasm(bytes: &[u8]) -> Result<Vec<u8>, JsError> {
    let image = decode_image_bytes(bytes)?;
    let (height, width, _) = image.dim();
    let mut out = Vec::with_capacity(8 + image.len());
    out.extend_from_slice(&(width as u32).to_le_bytes());
    out.extend_from_slice(&(height as u32).to_le_bytes());
    out.extend(image.iter().copied());
    Ok(out)
}

/// Encode flat RGB bytes as JPEG.
#[wasm_bindgen]
pub fn encode_jpeg_wasm(data: &[u8], width: usize, height: usize, quality: u8) -> Result<Vec<u8>, JsError> {
    let input = rgb_input(data, width, height)?;
    Ok(encode_jpeg(input.view(), quality)?)
}
