use std::path::{Path, PathBuf};

use image::ImageReader;
use image::imageops::FilterType;
use log::debug;

use crate::error::KalconvError;

/// Widest thumbnail the preview canvas shows
pub const THUMBNAIL_MAX_WIDTH: u32 = 380;

/// Tallest thumbnail the preview canvas shows
pub const THUMBNAIL_MAX_HEIGHT: u32 = 280;

/// Decoded thumbnail ready for texture upload, tagged with the path it came from
#[derive(Debug)]
pub struct PreviewFrame {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    /// RGBA8, row-major, `width * height * 4` bytes
    pub pixels: Vec<u8>,
}

/// Largest size that fits the box while preserving aspect ratio.
/// Never upscales; each dimension is at least 1.
pub fn fit_within(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (1, 1);
    }

    let scale = (max_width as f32 / width as f32)
        .min(max_height as f32 / height as f32)
        .min(1.0);

    let fit_width = ((width as f32 * scale).round() as u32).max(1);
    let fit_height = ((height as f32 * scale).round() as u32).max(1);

    (fit_width, fit_height)
}

/// Decode an image and scale it down to the preview bounding box.
///
/// The format is sniffed from the file content, so a misnamed but decodable
/// file still previews. Every failure maps to the decode error carrying the
/// offending path.
pub fn load_preview(path: &Path) -> Result<PreviewFrame, KalconvError> {
    let img = ImageReader::open(path)
        .map_err(|e| KalconvError::Decode {
            path: path.to_path_buf(),
            source: e.into(),
        })?
        .with_guessed_format()
        .map_err(|e| KalconvError::Decode {
            path: path.to_path_buf(),
            source: e.into(),
        })?
        .decode()
        .map_err(|e| KalconvError::Decode {
            path: path.to_path_buf(),
            source: e,
        })?
        .into_rgba8();

    let (width, height) = img.dimensions();
    let (thumb_width, thumb_height) =
        fit_within(width, height, THUMBNAIL_MAX_WIDTH, THUMBNAIL_MAX_HEIGHT);

    let thumb = if (thumb_width, thumb_height) == (width, height) {
        img
    } else {
        image::imageops::resize(&img, thumb_width, thumb_height, FilterType::Lanczos3)
    };

    debug!(
        "Preview {} scaled {}x{} to {}x{}",
        path.display(),
        width,
        height,
        thumb_width,
        thumb_height
    );

    Ok(PreviewFrame {
        path: path.to_path_buf(),
        width: thumb_width,
        height: thumb_height,
        pixels: thumb.into_raw(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn write_test_png(path: &Path, width: u32, height: u32) {
        let mut img = RgbaImage::new(width, height);
        for pixel in img.pixels_mut() {
            *pixel = Rgba([0, 128, 255, 255]);
        }
        img.save(path).unwrap();
    }

    #[test]
    fn test_fit_landscape() {
        assert_eq!(fit_within(4000, 1000, 380, 280), (380, 95));
    }

    #[test]
    fn test_fit_portrait() {
        assert_eq!(fit_within(1000, 4000, 380, 280), (70, 280));
    }

    #[test]
    fn test_fit_never_upscales() {
        assert_eq!(fit_within(100, 50, 380, 280), (100, 50));
    }

    #[test]
    fn test_fit_preserves_aspect_within_rounding() {
        let (w, h) = fit_within(1277, 719, 380, 280);
        assert!(w <= 380 && h <= 280);

        let source_aspect = 1277.0 / 719.0;
        let fit_aspect = w as f32 / h as f32;
        assert!((source_aspect - fit_aspect).abs() < 0.01);
    }

    #[test]
    fn test_fit_extreme_strip_keeps_min_dimension() {
        assert_eq!(fit_within(10_000, 1, 380, 280), (380, 1));
    }

    #[test]
    fn test_load_preview_fits_bounding_box() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.png");
        write_test_png(&path, 800, 600);

        let frame = load_preview(&path).unwrap();

        assert_eq!((frame.width, frame.height), (373, 280));
        assert_eq!(frame.pixels.len(), 373 * 280 * 4);
        assert_eq!(frame.path, path);
    }

    #[test]
    fn test_load_preview_keeps_small_images_unscaled() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("icon.png");
        write_test_png(&path, 32, 32);

        let frame = load_preview(&path).unwrap();

        assert_eq!((frame.width, frame.height), (32, 32));
    }

    #[test]
    fn test_load_preview_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.png");

        let err = load_preview(&path).unwrap_err();

        assert!(matches!(err, KalconvError::Decode { .. }));
        assert!(err.to_string().contains("absent.png"));
    }
}
