//! Blur placeholder generation for cover images
//!
//! A cover image is downscaled to a tiny thumbnail, re-encoded as JPEG, and
//! emitted as a base64 data URL for progressive-loading UIs. The result is a
//! deterministic function of the image bytes and the configured size.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader};

use crate::error::{Error, Result};

/// Encodes blur placeholders for images under the static asset root.
pub struct PlaceholderEncoder {
    asset_root: PathBuf,
    /// Longest edge of the downscaled preview, in pixels.
    size: u32,
}

impl PlaceholderEncoder {
    pub fn new<P: AsRef<Path>>(asset_root: P, size: u32) -> Self {
        Self {
            asset_root: asset_root.as_ref().to_path_buf(),
            size: size.max(1),
        }
    }

    /// Resolve a `/`-prefixed image reference under the asset root.
    pub fn resolve(&self, image_ref: &str) -> Result<PathBuf> {
        let relative = image_ref.trim_start_matches('/');
        let path = self.asset_root.join(relative);
        if !path.is_file() {
            return Err(Error::ImageNotFound(path));
        }
        Ok(path)
    }

    /// Produce a `data:image/jpeg;base64,...` placeholder for an image.
    pub fn encode(&self, image_ref: &str) -> Result<String> {
        let path = self.resolve(image_ref)?;
        let img = decode(&path)?;

        let thumb = img.resize(self.size, self.size, FilterType::Lanczos3);

        // JPEG has no alpha channel; flatten before encoding.
        let rgb = DynamicImage::ImageRgb8(thumb.to_rgb8());
        let mut bytes = Vec::new();
        rgb.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Jpeg)
            .map_err(|source| Error::ImageDecode {
                path: path.clone(),
                source,
            })?;

        Ok(format!("data:image/jpeg;base64,{}", STANDARD.encode(bytes)))
    }
}

fn decode(path: &Path) -> Result<DynamicImage> {
    ImageReader::open(path)?
        .with_guessed_format()?
        .decode()
        .map_err(|source| Error::ImageDecode {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_test_png(dir: &Path, name: &str, width: u32, height: u32) {
        let img = image::RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x * 7 % 256) as u8, (y * 13 % 256) as u8, 200])
        });
        let path = dir.join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        img.save_with_format(&path, ImageFormat::Png).unwrap();
    }

    #[test]
    fn test_encode_produces_jpeg_data_url() {
        let dir = tempfile::tempdir().unwrap();
        write_test_png(dir.path(), "static/images/hi.png", 64, 48);

        let encoder = PlaceholderEncoder::new(dir.path(), 20);
        let data_url = encoder.encode("/static/images/hi.png").unwrap();

        let payload = data_url.strip_prefix("data:image/jpeg;base64,").unwrap();
        let bytes = STANDARD.decode(payload).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        // Longest edge downscaled to the configured size, aspect preserved.
        assert_eq!(decoded.width(), 20);
        assert_eq!(decoded.height(), 15);
    }

    #[test]
    fn test_encode_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        write_test_png(dir.path(), "cover.png", 40, 40);

        let encoder = PlaceholderEncoder::new(dir.path(), 20);
        let a = encoder.encode("/cover.png").unwrap();
        let b = encoder.encode("/cover.png").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_missing_image() {
        let dir = tempfile::tempdir().unwrap();
        let encoder = PlaceholderEncoder::new(dir.path(), 20);
        assert!(matches!(
            encoder.encode("/static/images/nope.png"),
            Err(Error::ImageNotFound(_))
        ));
    }

    #[test]
    fn test_corrupt_image() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bad.png"), b"not an image at all").unwrap();

        let encoder = PlaceholderEncoder::new(dir.path(), 20);
        assert!(matches!(
            encoder.encode("/bad.png"),
            Err(Error::ImageDecode { .. })
        ));
    }
}
