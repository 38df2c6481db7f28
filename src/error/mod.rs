use std::path::PathBuf;

use crate::config::ConfigError;
use crate::region::RegionDecodeError;
use thiserror::Error;

pub type AppResult<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Image(#[from] image::ImageError),
    #[error(transparent)]
    Regions(#[from] RegionDecodeError),
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no source image loaded")]
    NoImage,
}
