//! Image decode/encode boundary.
//!
//! Everything entering the filters is converted to an RGB8
//! (height, width, 3) array; everything leaving can be encoded to JPEG.

use std::fs;
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use ndarray::{Array3, ArrayView3};
use tracing::{debug, info};

use crate::config::validate_jpeg_quality;
use crate::error::{EqualizeError, Result};
use crate::filters::core::{ensure_rgb, RGB_CHANNELS};

/// Extensions picked up by [`list_sample_images`].
pub const SAMPLE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Build an RGB image from a flat row-major buffer.
///
/// # Arguments
/// * `data` - Interleaved samples (length = width * height * channels)
/// * `width`, `height` - Image size in pixels
/// * `channels` - Must be 3
pub fn from_raw_rgb(data: Vec<u8>, width: usize, height: usize, channels: usize) -> Result<Array3<u8>> {
    if channels != RGB_CHANNELS {
        return Err(EqualizeError::InvalidImageFormat(format!(
            "expected {} channels, got {}",
            RGB_CHANNELS, channels
        )));
    }
    if width == 0 || height == 0 {
        return Err(EqualizeError::EmptyImage { height, width });
    }
    let expected = width * height * channels;
    if data.len() != expected {
        return Err(EqualizeError::InvalidImageFormat(format!(
            "buffer holds {} bytes, expected {} for {}x{}x{}",
            data.len(),
            expected,
            height,
            width,
            channels
        )));
    }
    Array3::from_shape_vec((height, width, channels), data)
        .map_err(|e| EqualizeError::InvalidImageFormat(e.to_string()))
}

/// Decode JPEG/PNG bytes into RGB8, whatever the source color type or depth.
pub fn decode_image_bytes(bytes: &[u8]) -> Result<Array3<u8>> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|e| EqualizeError::InvalidImageFormat(e.to_string()))?;
    let rgb = decoded.to_rgb8();
    let (width, height) = rgb.dimensions();
    debug!(width, height, "decoded image");
    from_raw_rgb(rgb.into_raw(), width as usize, height as usize, RGB_CHANNELS)
}

/// Read and decode an image file.
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<Array3<u8>> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    info!(path = %path.display(), bytes = bytes.len(), "loading image");
    decode_image_bytes(&bytes)
}

/// Encode an RGB image as JPEG.
pub fn encode_jpeg(image: ArrayView3<u8>, quality: u8) -> Result<Vec<u8>> {
    ensure_rgb(&image)?;
    validate_jpeg_quality(quality)?;
    let (height, width, _) = image.dim();

    // iter() walks in logical order, so non-standard layouts are fine.
    let raw: Vec<u8> = image.iter().copied().collect();
    let mut out = Vec::new();
    {
        let mut encoder = JpegEncoder::new_with_quality(&mut out, quality);
        encoder
            .encode(&raw, width as u32, height as u32, ExtendedColorType::Rgb8)
            .map_err(|e| EqualizeError::Encode(e.to_string()))?;
    }
    Ok(out)
}

/// Encode as JPEG and write to `dir/file_name`, creating `dir` if needed.
///
/// Returns the full path of the written file.
pub fn save_jpeg<P: AsRef<Path>>(image: ArrayView3<u8>, dir: P, file_name: &str, quality: u8) -> Result<PathBuf> {
    let bytes = encode_jpeg(image, quality)?;
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    let path = dir.join(file_name);
    fs::write(&path, &bytes)?;
    info!(path = %path.display(), bytes = bytes.len(), "saved image");
    Ok(path)
}

/// List decodable sample images in a directory, sorted by path.
pub fn list_sample_images<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| SAMPLE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
            .unwrap_or(false);
        if matches {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Luma, Rgb, RgbImage};
    use std::io::Cursor;

    fn png_bytes(img: &image::DynamicImage) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("histeq_rust_{}_{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_from_raw_rgb() {
        let img = from_raw_rgb((0..12).collect(), 2, 2, 3).unwrap();
        assert_eq!(img.dim(), (2, 2, 3));
        assert_eq!(img[[1, 0, 2]], 8);
    }

    #[test]
    fn test_from_raw_rgb_errors() {
        assert!(matches!(
            from_raw_rgb(vec![0; 16], 2, 2, 4),
            Err(EqualizeError::InvalidImageFormat(_))
        ));
        assert!(matches!(
            from_raw_rgb(vec![0; 11], 2, 2, 3),
            Err(EqualizeError::InvalidImageFormat(_))
        ));
        assert!(matches!(
            from_raw_rgb(Vec::new(), 0, 2, 3),
            Err(EqualizeError::EmptyImage { .. })
        ));
    }

    #[test]
    fn test_decode_png_rgb() {
        let mut src = RgbImage::new(3, 2);
        src.put_pixel(2, 1, Rgb([10, 20, 30]));
        let bytes = png_bytes(&image::DynamicImage::ImageRgb8(src));

        let img = decode_image_bytes(&bytes).unwrap();

        assert_eq!(img.dim(), (2, 3, 3));
        assert_eq!((img[[1, 2, 0]], img[[1, 2, 1]], img[[1, 2, 2]]), (10, 20, 30));
    }

    #[test]
    fn test_decode_grayscale_png_expands_to_rgb() {
        let mut src = image::GrayImage::new(2, 2);
        src.put_pixel(0, 0, Luma([200]));
        let bytes = png_bytes(&image::DynamicImage::ImageLuma8(src));

        let img = decode_image_bytes(&bytes).unwrap();

        assert_eq!(img.dim(), (2, 2, 3));
        assert_eq!(img[[0, 0, 1]], 200);
    }

    #[test]
    fn test_decode_garbage_fails() {
        let err = decode_image_bytes(b"definitely not an image").unwrap_err();
        assert!(matches!(err, EqualizeError::InvalidImageFormat(_)));
    }

    #[test]
    fn test_jpeg_roundtrip_keeps_shape() {
        let img = Array3::from_shape_fn((16, 24, 3), |(y, x, c)| ((y * 8 + x * 4 + c * 50) % 256) as u8);

        let bytes = encode_jpeg(img.view(), 95).unwrap();
        let back = decode_image_bytes(&bytes).unwrap();

        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
        assert_eq!(back.dim(), (16, 24, 3));
    }

    #[test]
    fn test_encode_jpeg_rejects_bad_quality() {
        let img = Array3::<u8>::zeros((2, 2, 3));
        assert!(matches!(
            encode_jpeg(img.view(), 0),
            Err(EqualizeError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_save_and_list() {
        let dir = scratch_dir("save");
        let img = Array3::<u8>::from_elem((4, 4, 3), 128);

        let path = save_jpeg(img.view(), &dir, "processed.jpg", 90).unwrap();
        fs::write(dir.join("notes.txt"), "skip me").unwrap();
        fs::write(dir.join("B.PNG"), png_bytes(&image::DynamicImage::ImageRgb8(RgbImage::new(1, 1)))).unwrap();

        assert!(path.ends_with("processed.jpg"));
        let loaded = load_image(&path).unwrap();
        assert_eq!(loaded.dim(), (4, 4, 3));

        let samples = list_sample_images(&dir).unwrap();
        let names: Vec<_> = samples
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["B.PNG", "processed.jpg"]);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = load_image(scratch_dir("missing").join("nope.png")).unwrap_err();
        assert!(matches!(err, EqualizeError::Io(_)));
    }
}
