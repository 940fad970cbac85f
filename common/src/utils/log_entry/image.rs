use image::ImageError;
use std::path::Display;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImageEntry<'a> {
    #[error("Failed to decode image {0}: {1}")]
    DecodeError(Display<'a>, ImageError),
    #[error("Failed to encode image {0}: {1}")]
    EncodeError(Display<'a>, ImageError),
    #[error("Image {0} has zero dimension")]
    ZeroDimension(Display<'a>),
    #[error("Failed to parse font data")]
    FontError,
}

impl From<ImageEntry<'_>> for String {
    #[inline(always)]
    fn from(value: ImageEntry) -> Self {
        value.to_string()
    }
}
