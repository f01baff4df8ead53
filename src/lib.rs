//! Histogram equalization for RGB images.
//!
//! Three techniques are provided, all as pure functions over ndarray images:
//! - **Channel-wise RGB**: each of R, G, B equalized on its own
//! - **HSV V-channel**: brightness equalized, hue and saturation kept
//! - **CLAHE (LAB)**: contrast-limited adaptive equalization of Lab lightness
//!
//! With Python bindings via PyO3 and WASM bindings for JavaScript.
//!
//! ## Image Format
//! Public boundaries take and return RGB images of shape (height, width, 3)
//! with u8 samples. Anything else fails with `InvalidImageFormat`.
//!
//! ## Example
//! ```no_run
//! use histeq_rust::{load_image, process, EqualizerConfig, Method};
//!
//! let image = load_image("photo.jpg")?;
//! let result = process(image.view(), Method::HsvValue, &EqualizerConfig::default())?;
//! println!("{}: {} px", result.caption(), result.image.len() / 3);
//! # Ok::<(), histeq_rust::EqualizeError>(())
//! ```

pub mod config;
pub mod error;
pub mod filters;
pub mod image_io;
pub mod pipeline;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use config::EqualizerConfig;
pub use error::{EqualizeError, Result};
pub use filters::clahe::{clahe_channel, clahe_equalize, clahe_equalize_with, ClaheParams};
pub use filters::equalize::{channel_wise_equalize, equalize, equalize_channel, equalize_with, hsv_equalize};
pub use filters::histogram::{channel_histogram, compute_histogram, Histogram};
pub use filters::method::Method;
pub use image_io::{decode_image_bytes, encode_jpeg, from_raw_rgb, list_sample_images, load_image, save_jpeg};
pub use pipeline::{process, ProcessedImage};

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray2, PyArray3, PyReadonlyArray2, PyReadonlyArrayDyn};
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;

    use crate::error::EqualizeError;
    use crate::filters::clahe::{self, ClaheParams};
    use crate::filters::core::as_rgb_view;
    use crate::filters::equalize as equalize_mod;
    use crate::filters::histogram;
    use crate::filters::method::Method;

    impl From<EqualizeError> for PyErr {
        fn from(err: EqualizeError) -> Self {
            PyValueError::new_err(err.to_string())
        }
    }

    // ========================================================================
    // Primitive
    // ========================================================================

    /// Equalize a single 2D u8 channel.
    #[pyfunction]
    pub fn equalize_channel<'py>(
        py: Python<'py>,
        channel: PyReadonlyArray2<'py, u8>,
    ) -> Bound<'py, PyArray2<u8>> {
        let result = equalize_mod::equalize_channel(channel.as_array());
        result.into_pyarray(py)
    }

    // ========================================================================
    // RGB Equalization
    // ========================================================================

    /// Equalize R, G and B independently.
    ///
    /// Raises ValueError unless the image is (height, width, 3) u8.
    #[pyfunction]
    pub fn channel_wise_equalize<'py>(
        py: Python<'py>,
        image: PyReadonlyArrayDyn<'py, u8>,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let input = as_rgb_view(image.as_array())?;
        let result = equalize_mod::channel_wise_equalize(input)?;
        Ok(result.into_pyarray(py))
    }

    /// Equalize the HSV value channel only.
    #[pyfunction]
    pub fn hsv_equalize<'py>(
        py: Python<'py>,
        image: PyReadonlyArrayDyn<'py, u8>,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let input = as_rgb_view(image.as_array())?;
        let result = equalize_mod::hsv_equalize(input)?;
        Ok(result.into_pyarray(py))
    }

    /// CLAHE on the Lab lightness channel.
    ///
    /// # Arguments
    /// * `image` - RGB image (height, width, 3)
    /// * `clip_limit` - Clip limit relative to the average bin count (default: 2.0)
    /// * `tile_rows` - Tile grid rows (default: 8)
    /// * `tile_cols` - Tile grid columns (default: 8)
    #[pyfunction]
    #[pyo3(signature = (image, clip_limit=2.0, tile_rows=8, tile_cols=8))]
    pub fn clahe_equalize<'py>(
        py: Python<'py>,
        image: PyReadonlyArrayDyn<'py, u8>,
        clip_limit: f32,
        tile_rows: usize,
        tile_cols: usize,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let input = as_rgb_view(image.as_array())?;
        let params = ClaheParams::new(clip_limit, (tile_rows, tile_cols));
        let result = clahe::clahe_equalize_with(input, &params)?;
        Ok(result.into_pyarray(py))
    }

    /// Apply a method by name ("rgb", "hsv", "clahe" or the display label).
    #[pyfunction]
    pub fn equalize<'py>(
        py: Python<'py>,
        image: PyReadonlyArrayDyn<'py, u8>,
        method: &str,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let method: Method = method.parse()?;
        let result = equalize_mod::equalize(image.as_array(), method)?;
        Ok(result.into_pyarray(py))
    }

    /// Display label for a method name.
    #[pyfunction]
    pub fn method_label(method: &str) -> PyResult<&'static str> {
        let method: Method = method.parse()?;
        Ok(method.label())
    }

    // ========================================================================
    // Histogram
    // ========================================================================

    /// 256-bucket histogram over all samples of any u8 array.
    #[pyfunction]
    pub fn compute_histogram(samples: PyReadonlyArrayDyn<'_, u8>) -> Vec<u32> {
        histogram::compute_histogram(&samples.as_array()).to_vec()
    }

    /// Histogram equalization Rust extension module
    #[pymodule]
    pub fn histeq_rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(equalize_channel, m)?)?;

        m.add_function(wrap_pyfunction!(channel_wise_equalize, m)?)?;
        m.add_function(wrap_pyfunction!(hsv_equalize, m)?)?;
        m.add_function(wrap_pyfunction!(clahe_equalize, m)?)?;
        m.add_function(wrap_pyfunction!(equalize, m)?)?;
        m.add_function(wrap_pyfunction!(method_label, m)?)?;

        m.add_function(wrap_pyfunction!(compute_histogram, m)?)?;

        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::histeq_rust;
