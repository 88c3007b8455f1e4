//! Boundaries to the external collaborators: where images come from and
//! who performs the actual removal.
//!
//! Both are asynchronous: the editor issues a request, keeps handling input,
//! and applies the completion only if it is still the latest one.

use std::future::Future;
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::color::{FillColor, RemovalMode};
use crate::error::{Error, Result};
use crate::region::Region;

/// Default thumbnail width produced by [`FsImageSource`].
pub const DEFAULT_THUMBNAIL_WIDTH: u32 = 400;

/// JPEG quality used for thumbnails.
const THUMBNAIL_QUALITY: u8 = 85;

/// What an image source reports about a selected file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInfo {
    /// Full-resolution width in pixels.
    pub width: u32,
    /// Full-resolution height in pixels.
    pub height: u32,
    /// Path of the original asset, handed back to the removal operation.
    pub path: PathBuf,
    /// Encoded display-resolution raster (any format `image` can decode).
    pub thumbnail: Vec<u8>,
}

/// Provides image metadata and a display thumbnail for a path.
pub trait ImageSource {
    /// Inspect `path`.
    ///
    /// # Errors
    ///
    /// Any error is treated as recoverable: the editor keeps its prior image.
    fn load(&self, path: &Path) -> impl Future<Output = Result<ImageInfo>>;
}

/// Parameters handed to the removal operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovalRequest {
    /// Full-resolution asset to process.
    pub input_path: PathBuf,
    /// Region left edge in image pixels.
    pub x: u32,
    /// Region top edge in image pixels.
    pub y: u32,
    /// Region width in image pixels.
    pub width: u32,
    /// Region height in image pixels.
    pub height: u32,
    /// Fill color, meaningful in fill mode.
    pub color: FillColor,
    /// Removal strategy.
    pub mode: RemovalMode,
}

impl RemovalRequest {
    /// Package a region and removal settings for `input_path`.
    #[must_use]
    pub fn new(input_path: PathBuf, region: Region, mode: RemovalMode, color: FillColor) -> Self {
        Self {
            input_path,
            x: region.x,
            y: region.y,
            width: region.w,
            height: region.h,
            color,
            mode,
        }
    }

    /// The region carried by this request.
    #[must_use]
    pub fn region(&self) -> Region {
        Region::new(self.x, self.y, self.width, self.height)
    }
}

/// What the removal operation reports back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovalOutcome {
    /// Whether the output was written.
    pub success: bool,
    /// Where the output went, when it succeeded.
    pub output_path: Option<PathBuf>,
    /// Human-readable status message.
    pub message: String,
}

impl RemovalOutcome {
    /// Outcome recorded when the operation itself errored.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            output_path: None,
            message: message.into(),
        }
    }
}

/// Performs the pixel-level removal on the full-resolution asset.
pub trait RemovalBackend {
    /// Run the removal described by `request`.
    ///
    /// # Errors
    ///
    /// Returns the operation's error message; the editor shows it and keeps
    /// the region so the user can retry.
    fn remove(
        &self,
        request: &RemovalRequest,
    ) -> impl Future<Output = std::result::Result<RemovalOutcome, String>>;
}

/// Check if a file has an extension the editor accepts.
#[must_use]
pub fn is_supported_image(path: &Path) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => matches!(
            ext.to_lowercase().as_str(),
            "jpg" | "jpeg" | "png" | "webp"
        ),
        None => false,
    }
}

/// Output path convention of the removal operation.
///
/// Example: `"photo.jpg"` becomes `"photo_no_watermark.jpg"`.
#[must_use]
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let ext = input.extension().unwrap_or_default().to_string_lossy();
    let parent = input.parent().unwrap_or(Path::new("."));
    parent.join(format!("{stem}_no_watermark.{ext}"))
}

/// Image source backed by the local file system.
///
/// Reads dimensions from the file header and produces a JPEG thumbnail no
/// wider than `thumbnail_width`.
#[derive(Debug, Clone)]
pub struct FsImageSource {
    /// Maximum thumbnail width in pixels.
    pub thumbnail_width: u32,
}

impl Default for FsImageSource {
    fn default() -> Self {
        Self {
            thumbnail_width: DEFAULT_THUMBNAIL_WIDTH,
        }
    }
}

impl FsImageSource {
    /// Synchronous body of [`ImageSource::load`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedFormat`] for unknown extensions,
    /// [`Error::InvalidDimensions`] for empty images, and I/O or decode errors
    /// from reading the file.
    pub fn load_sync(&self, path: &Path) -> Result<ImageInfo> {
        if !is_supported_image(path) {
            return Err(Error::UnsupportedFormat(path.display().to_string()));
        }

        let (width, height) = image::image_dimensions(path)?;
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }

        let img = image::open(path)?;
        let thumbnail = encode_thumbnail(&img, self.thumbnail_width)?;
        log::debug!(
            "{}: {width}x{height}, thumbnail {} bytes",
            path.display(),
            thumbnail.len()
        );

        Ok(ImageInfo {
            width,
            height,
            path: path.to_path_buf(),
            thumbnail,
        })
    }
}

impl ImageSource for FsImageSource {
    async fn load(&self, path: &Path) -> Result<ImageInfo> {
        self.load_sync(path)
    }
}

fn encode_thumbnail(img: &DynamicImage, max_width: u32) -> Result<Vec<u8>> {
    let scaled = if img.width() > max_width {
        let height = (u64::from(img.height()) * u64::from(max_width) / u64::from(img.width())).max(1);
        let height = u32::try_from(height).unwrap_or(u32::MAX);
        img.resize_exact(max_width.max(1), height, FilterType::Triangle)
    } else {
        img.clone()
    };

    let mut buf = Vec::new();
    {
        let mut encoder = JpegEncoder::new_with_quality(&mut buf, THUMBNAIL_QUALITY);
        encoder.encode_image(&DynamicImage::ImageRgb8(scaled.to_rgb8()))?;
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_output_path_appends_suffix() {
        let p = default_output_path(Path::new("/tmp/photo.jpg"));
        assert_eq!(p, PathBuf::from("/tmp/photo_no_watermark.jpg"));

        let p = default_output_path(Path::new("image.png"));
        assert_eq!(
            p.file_name().unwrap().to_str().unwrap(),
            "image_no_watermark.png"
        );
    }

    #[test]
    fn is_supported_image_accepts_editor_formats() {
        assert!(is_supported_image(Path::new("photo.jpg")));
        assert!(is_supported_image(Path::new("photo.JPEG")));
        assert!(is_supported_image(Path::new("photo.png")));
        assert!(is_supported_image(Path::new("photo.webp")));
    }

    #[test]
    fn is_supported_image_rejects_other_formats() {
        assert!(!is_supported_image(Path::new("photo.bmp")));
        assert!(!is_supported_image(Path::new("clip.mp4")));
        assert!(!is_supported_image(Path::new("photo")));
    }

    #[test]
    fn request_serializes_with_wire_names() {
        let req = RemovalRequest::new(
            PathBuf::from("a.png"),
            Region::new(1, 2, 30, 40),
            RemovalMode::Fill,
            FillColor::rgb(0xab, 0xcd, 0xef),
        );
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["input_path"], "a.png");
        assert_eq!(json["width"], 30);
        assert_eq!(json["color"], "#abcdef");
        assert_eq!(json["mode"], "fill");
        assert_eq!(req.region(), Region::new(1, 2, 30, 40));
    }

    #[test]
    fn thumbnail_is_capped_in_width() {
        let img = DynamicImage::new_rgb8(1000, 500);
        let bytes = encode_thumbnail(&img, 400).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (400, 200));

        let small = DynamicImage::new_rgb8(120, 80);
        let bytes = encode_thumbnail(&small, 400).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (120, 80));
    }

    #[test]
    fn fs_source_rejects_unsupported_extension() {
        let err = FsImageSource::default()
            .load_sync(Path::new("notes.txt"))
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
    }
}
