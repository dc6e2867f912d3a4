use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::codecs::ico::{IcoEncoder, IcoFrame};
use image::imageops::FilterType;
use image::{DynamicImage, ExtendedColorType, ImageReader};
use log::info;

use crate::error::KalconvError;
use crate::format::TargetFormat;

/// Square resolutions embedded in ICO output
pub const ICO_SIZES: [u32; 4] = [16, 32, 64, 128];

/// Inserted between the source stem and the new extension
const OUTPUT_SUFFIX: &str = "_converted";

/// An accepted conversion. Source and format are captured by value so a
/// later selection change cannot affect an in-flight run.
#[derive(Debug, Clone)]
pub struct ConvertRequest {
    pub source: PathBuf,
    pub format: TargetFormat,
}

impl ConvertRequest {
    /// Check preconditions before any I/O is dispatched
    pub fn validate(
        source: Option<&Path>,
        format: Option<TargetFormat>,
    ) -> Result<Self, KalconvError> {
        let source = source.ok_or(KalconvError::NoSource)?;
        let format = format.ok_or(KalconvError::NoFormat)?;

        Ok(Self {
            source: source.to_path_buf(),
            format,
        })
    }
}

/// Derive `<dir>/<stem>_converted.<ext>` next to the source.
/// No existence check: anything already at that path gets overwritten.
pub fn output_path(source: &Path, format: TargetFormat) -> Result<PathBuf, KalconvError> {
    let stem = source
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| KalconvError::InvalidSourceName(source.to_path_buf()))?;

    Ok(source.with_file_name(format!("{}{}.{}", stem, OUTPUT_SUFFIX, format.extension())))
}

/// Decode the source and write the converted copy. Returns the output path.
pub fn convert_image(request: &ConvertRequest) -> Result<PathBuf, KalconvError> {
    let source = &request.source;
    info!("Converting {} to {}", source.display(), request.format);

    let img = ImageReader::open(source)
        .map_err(|e| KalconvError::Decode {
            path: source.to_path_buf(),
            source: e.into(),
        })?
        .with_guessed_format()
        .map_err(|e| KalconvError::Decode {
            path: source.to_path_buf(),
            source: e.into(),
        })?
        .decode()
        .map_err(|e| KalconvError::Decode {
            path: source.to_path_buf(),
            source: e,
        })?;

    let output = output_path(source, request.format)?;

    match request.format {
        TargetFormat::Ico => encode_ico(&img, &output)?,
        // The JPEG encoder has no alpha support; flatten first
        TargetFormat::Jpg | TargetFormat::Jpeg => {
            img.into_rgb8()
                .save_with_format(&output, request.format.image_format())
                .map_err(|e| KalconvError::Encode {
                    path: output.clone(),
                    source: e,
                })?;
        }
        TargetFormat::Png | TargetFormat::Bmp | TargetFormat::Gif | TargetFormat::Tiff => {
            img.save_with_format(&output, request.format.image_format())
                .map_err(|e| KalconvError::Encode {
                    path: output.clone(),
                    source: e,
                })?;
        }
    }

    info!("Saved {}", output.display());
    Ok(output)
}

/// Write a multi-resolution icon, one PNG-compressed frame per entry in
/// `ICO_SIZES`
fn encode_ico(img: &DynamicImage, output: &Path) -> Result<(), KalconvError> {
    let mut frames = Vec::with_capacity(ICO_SIZES.len());
    for &size in &ICO_SIZES {
        let resized = img
            .resize_exact(size, size, FilterType::Lanczos3)
            .into_rgba8();
        let frame = IcoFrame::as_png(resized.as_raw(), size, size, ExtendedColorType::Rgba8)
            .map_err(|e| KalconvError::Encode {
                path: output.to_path_buf(),
                source: e,
            })?;
        frames.push(frame);
    }

    let file = File::create(output).map_err(|e| KalconvError::OutputWrite {
        path: output.to_path_buf(),
        source: e,
    })?;

    IcoEncoder::new(BufWriter::new(file))
        .encode_images(&frames)
        .map_err(|e| KalconvError::Encode {
            path: output.to_path_buf(),
            source: e,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgba, RgbaImage};
    use std::fs;

    fn write_test_png(path: &Path, width: u32, height: u32) {
        let mut img = RgbaImage::new(width, height);
        for pixel in img.pixels_mut() {
            *pixel = Rgba([0, 128, 255, 255]);
        }
        img.save(path).unwrap();
    }

    #[test]
    fn test_validate_requires_source() {
        let err = ConvertRequest::validate(None, Some(TargetFormat::Png)).unwrap_err();
        assert_eq!(err.to_string(), "No image selected!");
    }

    #[test]
    fn test_validate_requires_format() {
        let err = ConvertRequest::validate(Some(Path::new("a.png")), None).unwrap_err();
        assert_eq!(err.to_string(), "No format selected!");
    }

    #[test]
    fn test_validate_captures_selection() {
        let request =
            ConvertRequest::validate(Some(Path::new("a.png")), Some(TargetFormat::Ico)).unwrap();
        assert_eq!(request.source, PathBuf::from("a.png"));
        assert_eq!(request.format, TargetFormat::Ico);
    }

    #[test]
    fn test_output_path_appends_suffix() {
        let path = output_path(Path::new("/tmp/photo.png"), TargetFormat::Ico).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/photo_converted.ico"));
    }

    #[test]
    fn test_output_path_source_without_extension() {
        let path = output_path(Path::new("/tmp/photo"), TargetFormat::Png).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/photo_converted.png"));
    }

    #[test]
    fn test_convert_preserves_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("sample.png");
        write_test_png(&source, 31, 17);

        let request = ConvertRequest {
            source,
            format: TargetFormat::Bmp,
        };
        let output = convert_image(&request).unwrap();

        assert_eq!(output, dir.path().join("sample_converted.bmp"));
        assert_eq!(image::open(&output).unwrap().dimensions(), (31, 17));
    }

    #[test]
    fn test_convert_rgba_source_to_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("sample.png");
        write_test_png(&source, 20, 10);

        let request = ConvertRequest {
            source,
            format: TargetFormat::Jpeg,
        };
        let output = convert_image(&request).unwrap();

        assert_eq!(output, dir.path().join("sample_converted.jpeg"));
        assert_eq!(image::open(&output).unwrap().dimensions(), (20, 10));
    }

    #[test]
    fn test_convert_overwrites_existing_output() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("sample.png");
        write_test_png(&source, 8, 8);

        let output = dir.path().join("sample_converted.png");
        fs::write(&output, b"stale").unwrap();

        let request = ConvertRequest {
            source,
            format: TargetFormat::Png,
        };
        let written = convert_image(&request).unwrap();

        assert_eq!(written, output);
        assert_eq!(image::open(&output).unwrap().dimensions(), (8, 8));
    }

    #[test]
    fn test_convert_ico_embeds_four_resolutions() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("sample.png");
        write_test_png(&source, 300, 200);

        let request = ConvertRequest {
            source,
            format: TargetFormat::Ico,
        };
        let output = convert_image(&request).unwrap();
        let bytes = fs::read(&output).unwrap();

        // ICONDIR: reserved word, type word (1 = icon), entry count
        assert_eq!(&bytes[0..4], &[0, 0, 1, 0]);
        let count = u16::from_le_bytes([bytes[4], bytes[5]]) as usize;
        assert_eq!(count, ICO_SIZES.len());

        // Each 16-byte ICONDIRENTRY leads with width and height (0 means 256)
        let mut sizes: Vec<(u32, u32)> = (0..count)
            .map(|i| {
                let entry = &bytes[6 + i * 16..6 + (i + 1) * 16];
                let dim = |b: u8| if b == 0 { 256 } else { u32::from(b) };
                (dim(entry[0]), dim(entry[1]))
            })
            .collect();
        sizes.sort_unstable();
        assert_eq!(sizes, vec![(16, 16), (32, 32), (64, 64), (128, 128)]);
    }

    #[test]
    fn test_convert_missing_source_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("absent.png");

        let request = ConvertRequest {
            source: source.clone(),
            format: TargetFormat::Png,
        };
        let err = convert_image(&request).unwrap_err();

        assert!(matches!(err, KalconvError::Decode { .. }));
        assert!(!output_path(&source, TargetFormat::Png).unwrap().exists());
    }
}
