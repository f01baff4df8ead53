//! Core utilities shared by the equalization filters.
//!
//! This module provides:
//! - RGB input validation (shape, channel count, non-zero area)
//! - Channel split/merge helpers
//! - Boundary index mirroring for tiled processing
//! - Float to u8 quantization

use ndarray::{Array2, Array3, ArrayView2, ArrayView3, ArrayViewD, Axis, Ix3};

use crate::error::{EqualizeError, Result};

/// Number of color channels every public filter boundary expects.
pub const RGB_CHANNELS: usize = 3;

/// Check that a (height, width, channels) view is a non-empty RGB image.
pub fn ensure_rgb(input: &ArrayView3<u8>) -> Result<()> {
    let (height, width, channels) = input.dim();
    if channels != RGB_CHANNELS {
        return Err(EqualizeError::InvalidImageFormat(format!(
            "expected {} channels, got {}",
            RGB_CHANNELS, channels
        )));
    }
    if height == 0 || width == 0 {
        return Err(EqualizeError::EmptyImage { height, width });
    }
    Ok(())
}

/// Reinterpret a dynamic-dimension array as an RGB image view.
///
/// Grayscale (2D) arrays and anything that is not (height, width, 3)
/// are rejected with `InvalidImageFormat`.
pub fn as_rgb_view(input: ArrayViewD<'_, u8>) -> Result<ArrayView3<'_, u8>> {
    let shape = input.shape().to_vec();
    let view = input.into_dimensionality::<Ix3>().map_err(|_| {
        EqualizeError::InvalidImageFormat(format!(
            "expected a (height, width, 3) array, got shape {:?}",
            shape
        ))
    })?;
    ensure_rgb(&view)?;
    Ok(view)
}

/// Borrow a single channel plane.
#[inline]
pub fn channel_view<'a>(input: &'a ArrayView3<'_, u8>, channel: usize) -> ArrayView2<'a, u8> {
    input.index_axis(Axis(2), channel)
}

/// Stack three equally sized planes back into an RGB image.
pub fn merge_channels(planes: &[Array2<u8>]) -> Result<Array3<u8>> {
    if planes.len() != RGB_CHANNELS {
        return Err(EqualizeError::InvalidImageFormat(format!(
            "expected {} planes, got {}",
            RGB_CHANNELS,
            planes.len()
        )));
    }
    let (height, width) = planes[0].dim();
    if planes.iter().any(|p| p.dim() != (height, width)) {
        return Err(EqualizeError::InvalidImageFormat(
            "channel planes differ in size".to_string(),
        ));
    }
    Ok(Array3::from_shape_fn((height, width, RGB_CHANNELS), |(y, x, c)| {
        planes[c][[y, x]]
    }))
}

/// Mirror an index into `0..len` without repeating the edge sample
/// (`dcb|abcd|cba`).
#[inline]
pub fn reflect_101(index: isize, len: usize) -> usize {
    if len <= 1 {
        return 0;
    }
    let last = len as isize - 1;
    let mut i = index;
    loop {
        if i < 0 {
            i = -i;
        } else if i > last {
            i = 2 * last - i;
        } else {
            return i as usize;
        }
    }
}

/// Round and saturate a float sample to u8.
#[inline]
pub fn round_to_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array2, Array3, IxDyn};

    #[test]
    fn test_ensure_rgb_accepts_rgb() {
        let img = Array3::<u8>::zeros((2, 3, 3));
        assert!(ensure_rgb(&img.view()).is_ok());
    }

    #[test]
    fn test_ensure_rgb_rejects_rgba_and_gray() {
        for channels in [1, 2, 4] {
            let img = Array3::<u8>::zeros((2, 2, channels));
            let err = ensure_rgb(&img.view()).unwrap_err();
            assert!(matches!(err, EqualizeError::InvalidImageFormat(_)));
        }
    }

    #[test]
    fn test_ensure_rgb_rejects_empty() {
        let img = Array3::<u8>::zeros((0, 5, 3));
        let err = ensure_rgb(&img.view()).unwrap_err();
        assert!(matches!(err, EqualizeError::EmptyImage { height: 0, width: 5 }));
    }

    #[test]
    fn test_as_rgb_view_rejects_2d() {
        let gray = Array2::<u8>::zeros((4, 4)).into_dyn();
        let err = as_rgb_view(gray.view()).unwrap_err();
        assert!(matches!(err, EqualizeError::InvalidImageFormat(_)));
    }

    #[test]
    fn test_as_rgb_view_accepts_3d() {
        let img = ndarray::ArrayD::<u8>::zeros(IxDyn(&[2, 2, 3]));
        let view = as_rgb_view(img.view()).unwrap();
        assert_eq!(view.dim(), (2, 2, 3));
    }

    #[test]
    fn test_merge_channels_order() {
        let r = Array2::from_elem((1, 2), 10u8);
        let g = Array2::from_elem((1, 2), 20u8);
        let b = Array2::from_elem((1, 2), 30u8);
        let merged = merge_channels(&[r, g, b]).unwrap();
        assert_eq!(merged[[0, 1, 0]], 10);
        assert_eq!(merged[[0, 1, 1]], 20);
        assert_eq!(merged[[0, 1, 2]], 30);
    }

    #[test]
    fn test_reflect_101() {
        assert_eq!(reflect_101(-1, 4), 1);
        assert_eq!(reflect_101(0, 4), 0);
        assert_eq!(reflect_101(3, 4), 3);
        assert_eq!(reflect_101(4, 4), 2);
        assert_eq!(reflect_101(5, 4), 1);
        assert_eq!(reflect_101(7, 2), 1);
        assert_eq!(reflect_101(9, 1), 0);
    }

    #[test]
    fn test_round_to_u8_saturates() {
        assert_eq!(round_to_u8(-3.0), 0);
        assert_eq!(round_to_u8(127.5), 128);
        assert_eq!(round_to_u8(300.0), 255);
    }
}
