//! Error types for the watermark-region crate.

/// Errors that can occur while loading images into the editor or submitting
/// a removal request.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The display thumbnail returned by the image source could not be decoded.
    #[error("failed to decode thumbnail: {0}")]
    ThumbnailDecode(image::ImageError),

    /// The image source reported dimensions the editor cannot work with.
    #[error("invalid image dimensions ({width}x{height})")]
    InvalidDimensions {
        /// Reported width in pixels.
        width: u32,
        /// Reported height in pixels.
        height: u32,
    },

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The image format is not supported.
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// A fill color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// The operation needs a loaded image but the editor is empty.
    #[error("no image loaded")]
    NoImage,

    /// A removal request is already in flight.
    #[error("a removal request is already in progress")]
    Busy,

    /// An error occurred during image processing (load, save, encode).
    #[error("image processing error: {0}")]
    Image(#[from] image::ImageError),
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let io_err = Error::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert!(io_err.to_string().contains("gone"));

        let unsupported = Error::UnsupportedFormat("tiff".to_string());
        assert!(unsupported.to_string().contains("tiff"));

        let dims = Error::InvalidDimensions {
            width: 0,
            height: 20,
        };
        assert!(dims.to_string().contains("0x20"));

        assert!(Error::InvalidColor("#zz".into()).to_string().contains("#zz"));
        assert_eq!(Error::NoImage.to_string(), "no image loaded");
    }
}
