//! Image encoding: bitmap → JPEG [`NormalizedImage`] → base64 `ImageData`.
//!
//! JPEG keeps a tall text page or a 150-DPI resume scan small enough for
//! every multimodal API's inline-image limit. Quality defaults to 90, which
//! keeps small body text free of visible ringing.

use crate::document::{NormalizedImage, JPEG_MIME_TYPE};
use crate::error::InsightError;
use edgequake_llm::ImageData;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, RgbImage};
use tracing::debug;

/// JPEG-encode an RGB canvas.
pub fn encode_rgb(img: &RgbImage, quality: u8) -> Result<NormalizedImage, image::ImageError> {
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100)).encode_image(img)?;
    debug!(
        "Encoded {}x{} px → {} bytes JPEG (q={})",
        img.width(),
        img.height(),
        buf.len(),
        quality
    );
    Ok(NormalizedImage::new(img.width(), img.height(), buf))
}

/// JPEG-encode any decoded image, dropping alpha (JPEG has none).
pub fn encode_dynamic(img: &DynamicImage, quality: u8) -> Result<NormalizedImage, image::ImageError> {
    match img {
        DynamicImage::ImageRgb8(rgb) => encode_rgb(rgb, quality),
        other => encode_rgb(&other.to_rgb8(), quality),
    }
}

/// Map an encoder failure onto the normalizer's error taxonomy.
pub(crate) fn encode_error(e: image::ImageError) -> InsightError {
    InsightError::Render {
        detail: format!("JPEG encoding failed: {e}"),
    }
}

/// Wrap a normalized image as the image part of a multimodal request.
///
/// `detail: "high"` asks OpenAI-style tilers to keep fine print readable;
/// providers that ignore the hint are unaffected.
pub fn image_part(img: &NormalizedImage) -> ImageData {
    let b64 = img.to_base64();
    debug!("Image part → {} bytes base64", b64.len());
    ImageData::new(b64, JPEG_MIME_TYPE).with_detail("high")
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use image::{Rgb, Rgba, RgbaImage};

    #[test]
    fn encode_small_image() {
        let img = RgbImage::from_pixel(10, 10, Rgb([255, 0, 0]));
        let out = encode_rgb(&img, 90).expect("encode should succeed");
        assert_eq!((out.width(), out.height()), (10, 10));
        assert_eq!(&out.jpeg_bytes()[..2], &[0xFF, 0xD8], "JPEG SOI marker");
    }

    #[test]
    fn rgba_input_is_flattened() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 3, Rgba([0, 0, 255, 128])));
        let out = encode_dynamic(&img, 85).unwrap();
        assert_eq!((out.width(), out.height()), (4, 3));
        assert_eq!(out.decode().unwrap().dimensions(), (4, 3));
    }

    #[test]
    fn image_part_is_base64_jpeg() {
        let img = RgbImage::from_pixel(8, 8, Rgb([255, 255, 255]));
        let out = encode_rgb(&img, 90).unwrap();
        let part = image_part(&out);
        assert_eq!(part.mime_type, "image/jpeg");
        let decoded = STANDARD.decode(&part.data).expect("valid base64");
        assert_eq!(decoded, out.jpeg_bytes());
        assert_eq!(part.data, out.to_base64());
    }

    #[test]
    fn higher_quality_is_not_smaller() {
        let mut img = RgbImage::new(64, 64);
        for (x, y, p) in img.enumerate_pixels_mut() {
            *p = Rgb([(x * 4) as u8, (y * 4) as u8, ((x ^ y) * 4) as u8]);
        }
        let low = encode_rgb(&img, 20).unwrap();
        let high = encode_rgb(&img, 95).unwrap();
        assert!(high.jpeg_bytes().len() >= low.jpeg_bytes().len());
    }
}
