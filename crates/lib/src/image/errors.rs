//! Error types for image storage and download
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImageError {
    #[error("image not found")]
    NotFound { id: Option<i64> },

    /// The remote host answered, but not with an image we can serve.
    #[error("invalid image: {reason}")]
    InvalidImage { reason: String },

    /// The remote host could not be reached or the transfer broke off.
    #[error("Image download failed: {reason}")]
    DownloadFailed {
        reason: String,
        #[source]
        source: Option<reqwest::Error>,
    },
}

impl ImageError {
    /// Check if this error indicates a resource was not found.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ImageError::NotFound { .. })
    }

    /// Check if the image reference points at something unusable.
    pub fn is_invalid_image(&self) -> bool {
        matches!(self, ImageError::InvalidImage { .. })
    }
}

impl From<ImageError> for crate::Error {
    fn from(err: ImageError) -> Self {
        crate::Error::Image(err)
    }
}
