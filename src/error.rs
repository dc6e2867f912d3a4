use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum KalconvError {
    #[error("No image selected!")]
    NoSource,

    #[error("No format selected!")]
    NoFormat,

    #[error("Failed to decode image '{path}': {source}")]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Failed to encode image '{path}': {source}")]
    Encode {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Failed to write output file '{path}': {source}")]
    OutputWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Source path '{0}' has no file name")]
    InvalidSourceName(PathBuf),
}
