use std::path::Path;

/// Extensions accepted by the file dialog and the drag-drop check
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "ico", "bmp", "gif", "tiff"];

/// Output encodings offered by the format selector
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum TargetFormat {
    #[default]
    Png,
    Jpg,
    Jpeg,
    Ico,
    Bmp,
    Gif,
    Tiff,
}

impl TargetFormat {
    /// Selector order
    pub const ALL: [TargetFormat; 7] = [
        TargetFormat::Png,
        TargetFormat::Jpg,
        TargetFormat::Jpeg,
        TargetFormat::Ico,
        TargetFormat::Bmp,
        TargetFormat::Gif,
        TargetFormat::Tiff,
    ];

    /// Lowercase extension used for the output path
    pub fn extension(self) -> &'static str {
        match self {
            TargetFormat::Png => "png",
            TargetFormat::Jpg => "jpg",
            TargetFormat::Jpeg => "jpeg",
            TargetFormat::Ico => "ico",
            TargetFormat::Bmp => "bmp",
            TargetFormat::Gif => "gif",
            TargetFormat::Tiff => "tiff",
        }
    }

    /// Encoder selection; `jpg` and `jpeg` share one codec
    pub fn image_format(self) -> image::ImageFormat {
        match self {
            TargetFormat::Png => image::ImageFormat::Png,
            TargetFormat::Jpg | TargetFormat::Jpeg => image::ImageFormat::Jpeg,
            TargetFormat::Ico => image::ImageFormat::Ico,
            TargetFormat::Bmp => image::ImageFormat::Bmp,
            TargetFormat::Gif => image::ImageFormat::Gif,
            TargetFormat::Tiff => image::ImageFormat::Tiff,
        }
    }
}

impl std::fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Extension check only; file content is never inspected here
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Strip the brace wrapping some drag sources add around paths with spaces
pub fn normalize_drop_payload(raw: &str) -> &str {
    raw.strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
        .unwrap_or(raw)
}
