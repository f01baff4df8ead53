//! Request/response processing.
//!
//! A single `process` call takes an image and a method and returns the new
//! image with its label and both histograms. Display state stays with the
//! caller.

use ndarray::{Array3, ArrayView3};
use tracing::info;

use crate::config::EqualizerConfig;
use crate::error::Result;
use crate::filters::core::ensure_rgb;
use crate::filters::equalize::apply_method;
use crate::filters::histogram::{compute_histogram, Histogram};
use crate::filters::method::Method;

/// Result of one processing request.
#[derive(Debug, Clone)]
pub struct ProcessedImage {
    pub image: Array3<u8>,
    pub method: Method,
    /// Histogram of all samples of the input image.
    pub original_histogram: Histogram,
    /// Histogram of all samples of `image`.
    pub processed_histogram: Histogram,
}

impl ProcessedImage {
    pub fn label(&self) -> &'static str {
        self.method.label()
    }

    /// Caption for the processed image, e.g. "HSV V-channel Equalized".
    pub fn caption(&self) -> String {
        format!("{} Equalized", self.label())
    }

    pub fn download_file_name(&self) -> String {
        self.method.download_file_name()
    }
}

/// Equalize `image` with `method`, using `config.clahe` for CLAHE.
pub fn process(image: ArrayView3<u8>, method: Method, config: &EqualizerConfig) -> Result<ProcessedImage> {
    ensure_rgb(&image)?;
    let (height, width, _) = image.dim();

    let original_histogram = compute_histogram(&image);
    let processed = apply_method(image, method, &config.clahe)?;
    let processed_histogram = compute_histogram(&processed);

    info!(height, width, method = %method, "processed image");
    Ok(ProcessedImage {
        image: processed,
        method,
        original_histogram,
        processed_histogram,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EqualizeError;
    use crate::filters::histogram::total_count;
    use ndarray::Array3;

    #[test]
    fn test_process_reports_label_and_histograms() {
        let img = Array3::from_shape_fn((10, 12, 3), |(y, x, c)| (50 + y * 5 + x * 2 + c) as u8);

        for method in Method::ALL {
            let result = process(img.view(), method, &EqualizerConfig::default()).unwrap();

            assert_eq!(result.method, method);
            assert_eq!(result.label(), method.label());
            assert_eq!(result.image.dim(), (10, 12, 3));
            assert_eq!(total_count(&result.original_histogram), 360);
            assert_eq!(total_count(&result.processed_histogram), 360);
            assert_eq!(result.processed_histogram, compute_histogram(&result.image));
        }
    }

    #[test]
    fn test_process_caption_and_file_name() {
        let img = Array3::<u8>::from_elem((2, 2, 3), 9);
        let result = process(img.view(), Method::HsvValue, &EqualizerConfig::default()).unwrap();

        assert_eq!(result.caption(), "HSV V-channel Equalized");
        assert_eq!(result.download_file_name(), "equalized_hsv_v-channel.jpg");
    }

    #[test]
    fn test_process_uses_config_clahe() {
        let img = Array3::from_shape_fn((32, 32, 3), |(y, x, _)| (100 + (x + y) % 8) as u8);
        let mut config = EqualizerConfig::default();

        let default_result = process(img.view(), Method::ClaheLab, &config).unwrap();
        config.clahe.clip_limit = 200.0;
        let strong_result = process(img.view(), Method::ClaheLab, &config).unwrap();

        assert_ne!(default_result.image, strong_result.image);
    }

    #[test]
    fn test_process_rejects_non_rgb() {
        let img = Array3::<u8>::zeros((3, 3, 4));
        let err = process(img.view(), Method::ChannelWiseRgb, &EqualizerConfig::default()).unwrap_err();
        assert!(matches!(err, EqualizeError::InvalidImageFormat(_)));
    }
}
