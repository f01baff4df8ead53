//! Intensity histograms for display and for building equalization tables.
//!
//! Histograms are read-only artifacts: computing one never touches the image.
//! The same function is used for original and processed images so both
//! distributions can be compared bucket for bucket.

use ndarray::{ArrayBase, ArrayView3, Axis, Data, Dimension};

use crate::error::{EqualizeError, Result};

/// Number of buckets for 8-bit samples.
pub const BINS: usize = 256;

/// 256-bucket frequency count of u8 samples.
pub type Histogram = [u32; BINS];

/// Count sample values over the flattened input.
///
/// Works for any dimensionality: a single channel, a full RGB image
/// (all channels pooled), or a raw 1D sample buffer.
pub fn compute_histogram<S, D>(samples: &ArrayBase<S, D>) -> Histogram
where
    S: Data<Elem = u8>,
    D: Dimension,
{
    let mut hist = [0u32; BINS];
    for &v in samples.iter() {
        hist[v as usize] += 1;
    }
    hist
}

/// Histogram of one channel of a (height, width, channels) image.
pub fn channel_histogram(input: ArrayView3<u8>, channel: usize) -> Result<Histogram> {
    let channels = input.dim().2;
    if channel >= channels {
        return Err(EqualizeError::InvalidParameter(format!(
            "channel {} out of range for {}-channel image",
            channel, channels
        )));
    }
    Ok(compute_histogram(&input.index_axis(Axis(2), channel)))
}

/// Running sum of a histogram.
pub fn cumulative(hist: &Histogram) -> [u64; BINS] {
    let mut cdf = [0u64; BINS];
    let mut sum = 0u64;
    for (i, &count) in hist.iter().enumerate() {
        sum += count as u64;
        cdf[i] = sum;
    }
    cdf
}

/// Lowest and highest occupied bucket, or `None` when the histogram is empty.
pub fn histogram_bounds(hist: &Histogram) -> Option<(u8, u8)> {
    let low = hist.iter().position(|&c| c > 0)?;
    let high = hist.iter().rposition(|&c| c > 0)?;
    Some((low as u8, high as u8))
}

/// Total number of samples counted.
pub fn total_count(hist: &Histogram) -> u64 {
    hist.iter().map(|&c| c as u64).sum()
}
