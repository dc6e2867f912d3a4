pub mod convert;
pub mod error;
pub mod format;
pub mod gui;
pub mod preview;

pub use convert::{ConvertRequest, convert_image, output_path};
pub use error::KalconvError;
pub use format::{TargetFormat, is_supported_image, normalize_drop_payload};
pub use preview::{PreviewFrame, fit_within, load_preview};
