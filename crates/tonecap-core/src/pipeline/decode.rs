//! Image decoding with format detection, validation, and timeout support.
//!
//! Every decoded image is converted to 8-bit RGB, the only layout the
//! caption requester accepts.

use image::{GenericImageView, ImageFormat, RgbImage};
use std::path::Path;
use std::time::Duration;
use tokio::time::timeout;

use crate::config::LimitsConfig;
use crate::error::PipelineError;

/// Image decoder with configurable limits and timeout.
#[derive(Debug, Clone)]
pub struct ImageDecoder {
    limits: LimitsConfig,
}

/// Result of decoding an image.
#[derive(Debug)]
pub struct DecodedImage {
    /// 3-channel bitmap
    pub image: RgbImage,
    /// Detected image format
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
    /// Size of the encoded input in bytes
    pub file_size: u64,
}

impl ImageDecoder {
    /// Create a new decoder with the given limits.
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// Read and decode an image file.
    pub async fn decode_file(&self, path: &Path) -> Result<DecodedImage, PipelineError> {
        if !path.exists() {
            return Err(PipelineError::FileNotFound(path.to_path_buf()));
        }
        let bytes = tokio::fs::read(path).await.map_err(|e| PipelineError::Decode {
            path: path.to_path_buf(),
            message: format!("Failed to read file: {e}"),
        })?;
        self.decode_from_bytes(bytes, path).await
    }

    /// Decode an image from an in-memory byte buffer with validation and timeout.
    ///
    /// `path` labels the source in errors and is the extension fallback when
    /// the format can't be sniffed from content (uploads pass their filename).
    pub async fn decode_from_bytes(
        &self,
        bytes: Vec<u8>,
        path: &Path,
    ) -> Result<DecodedImage, PipelineError> {
        let file_size = bytes.len() as u64;
        let max_bytes = self.limits.max_file_size_mb.saturating_mul(1024 * 1024);
        if file_size > max_bytes {
            return Err(PipelineError::FileTooLarge {
                path: path.to_path_buf(),
                size_mb: file_size / (1024 * 1024),
                max_mb: self.limits.max_file_size_mb,
            });
        }

        let path_owned = path.to_path_buf();
        let timeout_duration = Duration::from_millis(self.limits.decode_timeout_ms);

        let decode_result = timeout(timeout_duration, async {
            tokio::task::spawn_blocking(move || Self::decode_bytes_sync(bytes, &path_owned)).await
        })
        .await;

        match decode_result {
            Ok(Ok(Ok(decoded))) => {
                if decoded.width > self.limits.max_image_dimension
                    || decoded.height > self.limits.max_image_dimension
                {
                    return Err(PipelineError::ImageTooLarge {
                        path: path.to_path_buf(),
                        width: decoded.width,
                        height: decoded.height,
                        max_dim: self.limits.max_image_dimension,
                    });
                }
                tracing::debug!(
                    "Decoded {:?}: {}x{} {:?} ({} bytes)",
                    path,
                    decoded.width,
                    decoded.height,
                    decoded.format,
                    decoded.file_size
                );
                Ok(decoded)
            }
            Ok(Ok(Err(e))) => Err(e),
            Ok(Err(e)) => Err(PipelineError::Decode {
                path: path.to_path_buf(),
                message: format!("Task join error: {}", e),
            }),
            Err(_) => Err(PipelineError::Timeout {
                path: path.to_path_buf(),
                stage: "decode".to_string(),
                timeout_ms: self.limits.decode_timeout_ms,
            }),
        }
    }

    /// Synchronous decode from bytes (runs in spawn_blocking).
    fn decode_bytes_sync(bytes: Vec<u8>, path: &Path) -> Result<DecodedImage, PipelineError> {
        use std::io::Cursor;

        let file_size = bytes.len() as u64;
        let cursor = Cursor::new(bytes);
        let mut reader = image::ImageReader::new(cursor)
            .with_guessed_format()
            .map_err(|e| PipelineError::Decode {
                path: path.to_path_buf(),
                message: format!("Cannot detect image format: {}", e),
            })?;
        let format = match reader.format() {
            Some(f) => f,
            None => ImageFormat::from_path(path).map_err(|_| PipelineError::UnsupportedFormat {
                path: path.to_path_buf(),
                format: path
                    .extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or("unknown")
                    .to_string(),
            })?,
        };
        reader.set_format(format);
        let image = reader.decode().map_err(|e| PipelineError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let (width, height) = image.dimensions();
        Ok(DecodedImage {
            image: image.to_rgb8(),
            format,
            width,
            height,
            file_size,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{DynamicImage, RgbaImage};
    use std::io::Cursor;
    use std::path::PathBuf;

    /// Encode a solid-color image as PNG bytes.
    pub(crate) fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            width,
            height,
            image::Rgba([200, 30, 60, 128]),
        ));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    fn decoder() -> ImageDecoder {
        ImageDecoder::new(LimitsConfig::default())
    }

    #[tokio::test]
    async fn test_decode_png_to_rgb() {
        let decoded = decoder()
            .decode_from_bytes(png_bytes(6, 4), Path::new("upload"))
            .await
            .unwrap();
        assert_eq!(decoded.format, ImageFormat::Png);
        assert_eq!((decoded.width, decoded.height), (6, 4));
        assert_eq!(decoded.image.dimensions(), (6, 4));
        assert_eq!(decoded.image.get_pixel(0, 0).0, [200, 30, 60]);
    }

    #[tokio::test]
    async fn test_format_detected_by_content() {
        // PNG bytes behind a .jpg name are still decoded as PNG
        let decoded = decoder()
            .decode_from_bytes(png_bytes(2, 2), Path::new("photo.jpg"))
            .await
            .unwrap();
        assert_eq!(decoded.format, ImageFormat::Png);
    }

    #[tokio::test]
    async fn test_garbage_without_extension_is_unsupported() {
        let err = decoder()
            .decode_from_bytes(b"definitely not an image".to_vec(), Path::new("upload"))
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::UnsupportedFormat { .. }));
    }

    #[tokio::test]
    async fn test_garbage_with_extension_is_decode_error() {
        let err = decoder()
            .decode_from_bytes(b"definitely not an image".to_vec(), Path::new("upload.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_dimension_limit() {
        let limits = LimitsConfig {
            max_image_dimension: 4,
            ..LimitsConfig::default()
        };
        let err = ImageDecoder::new(limits)
            .decode_from_bytes(png_bytes(5, 2), Path::new("wide.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::ImageTooLarge { width: 5, .. }));
    }

    #[tokio::test]
    async fn test_size_limit() {
        let limits = LimitsConfig {
            max_file_size_mb: 1,
            ..LimitsConfig::default()
        };
        let bytes = vec![0u8; 1024 * 1024 + 1];
        let err = ImageDecoder::new(limits)
            .decode_from_bytes(bytes, Path::new("huge.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::FileTooLarge { max_mb: 1, .. }));
    }

    #[tokio::test]
    async fn test_huge_size_limit_does_not_overflow() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"[limits]\nmax_file_size_mb = 20000000000000\n")
            .unwrap();
        let config = crate::config::Config::load_from(file.path()).unwrap();

        let decoded = ImageDecoder::new(config.limits)
            .decode_from_bytes(png_bytes(4, 4), Path::new("upload"))
            .await
            .unwrap();
        assert_eq!(decoded.width, 4);
    }

    #[tokio::test]
    async fn test_decode_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.png");
        std::fs::write(&path, png_bytes(3, 3)).unwrap();

        let decoded = decoder().decode_file(&path).await.unwrap();
        assert_eq!(decoded.width, 3);
    }

    #[tokio::test]
    async fn test_decode_missing_file() {
        let path = PathBuf::from("/nonexistent/tonecap/missing.png");
        let err = decoder().decode_file(&path).await.unwrap_err();
        assert!(matches!(err, PipelineError::FileNotFound(p) if p == path));
    }
}
