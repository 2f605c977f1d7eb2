//! Encoding Operations

use crate::error::{ErrorKind, Result};
use crate::{Encoding, MAX_DIMENSION};
use image::{DynamicImage, GenericImageView};
use tracing::instrument;
use webp::Encoder;

impl Encoding {
    /// Encode a decoded image to WebP.
    ///
    /// Images with an alpha channel keep it; everything else is flattened to
    /// 8-bit RGB first. Fails with [`ErrorKind::Encode`] for images WebP can't
    /// represent (empty, or larger than [`MAX_DIMENSION`] on either side).
    #[instrument(skip(image), fields(
        encoding = %self,
        width = image.width(),
        height = image.height(),
        output_size
    ))]
    pub fn encode(&self, image: &DynamicImage) -> Result<Vec<u8>> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
            exn::bail!(ErrorKind::Encode(format!("unsupported dimensions {width}x{height}")));
        }
        let encoded = match image.color().has_alpha() {
            true => {
                let rgba = image.to_rgba8();
                self.encode_with(Encoder::from_rgba(rgba.as_raw(), width, height))?
            },
            false => {
                let rgb = image.to_rgb8();
                self.encode_with(Encoder::from_rgb(rgb.as_raw(), width, height))?
            },
        };
        tracing::Span::current().record("output_size", encoded.len());
        Ok(encoded)
    }

    fn encode_with(&self, encoder: Encoder<'_>) -> Result<Vec<u8>> {
        let result = match self {
            Encoding::Lossy { quality } => encoder.encode_simple(false, f32::from(*quality)),
            Encoding::Lossless => encoder.encode_simple(true, 100.0),
        };
        match result {
            Ok(memory) => Ok(memory.to_vec()),
            Err(err) => exn::bail!(ErrorKind::Encode(format!("{err:?}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};
    use rstest::rstest;

    fn is_webp(bytes: &[u8]) -> bool {
        bytes.len() > 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP"
    }

    fn gradient(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| Rgb([(x * 8) as u8, (y * 8) as u8, 128])))
    }

    #[rstest]
    #[case(Encoding::Lossless)]
    #[case(Encoding::Lossy { quality: 75 })]
    #[case(Encoding::Lossy { quality: 0 })]
    fn test_encode_rgb(#[case] encoding: Encoding) {
        let encoded = encoding.encode(&gradient(16, 24)).unwrap();
        assert!(is_webp(&encoded));
    }

    #[test]
    fn test_encode_rgba() {
        let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(8, 8, Rgba([10, 20, 30, 128])));
        let encoded = Encoding::default().encode(&image).unwrap();
        assert!(is_webp(&encoded));
    }

    #[test]
    fn test_encode_grayscale_is_flattened() {
        let image = DynamicImage::ImageLuma8(image::GrayImage::from_pixel(4, 4, image::Luma([200])));
        assert!(is_webp(&Encoding::Lossless.encode(&image).unwrap()));
    }

    #[test]
    fn test_encode_is_deterministic() {
        let image = gradient(10, 10);
        let encoding = Encoding::Lossy { quality: 50 };
        assert_eq!(encoding.encode(&image).unwrap(), encoding.encode(&image).unwrap());
    }

    #[test]
    fn test_encode_rejects_oversized() {
        let image = DynamicImage::ImageRgb8(RgbImage::new(MAX_DIMENSION + 1, 1));
        let err = Encoding::default().encode(&image).unwrap_err();
        assert!(matches!(*err, ErrorKind::Encode(_)));
    }

    #[test]
    fn test_encode_rejects_empty() {
        let image = DynamicImage::ImageRgb8(RgbImage::new(0, 0));
        assert!(Encoding::Lossless.encode(&image).is_err());
    }
}
