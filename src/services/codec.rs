//! Transport encoding for images
//!
//! Image transport framing is a caller concern, but the pipeline still has
//! to hand crops over in an opaque, transport-friendly encoding and accept
//! inbound images the same way. This service owns that boundary: PNG bytes
//! wrapped in base64, tolerating data-URL prefixes on the way in.

use crate::error::{Result, VisionError};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::{DynamicImage, RgbaImage};
use std::io::Cursor;

/// Service for encoding and decoding transport images
pub struct TransportCodec;

impl TransportCodec {
    /// Encode an RGBA image as base64-wrapped PNG
    ///
    /// # Errors
    ///
    /// Returns `VisionError::Image` when PNG encoding fails.
    pub fn encode_png_base64(image: &RgbaImage) -> Result<String> {
        let mut buffer = Vec::new();
        let mut cursor = Cursor::new(&mut buffer);
        image.write_to(&mut cursor, image::ImageFormat::Png)?;
        Ok(STANDARD.encode(&buffer))
    }

    /// Decode a base64 image payload, tolerating a `data:...;base64,` prefix
    ///
    /// # Errors
    ///
    /// Returns `VisionError::Processing` for invalid base64 and
    /// `VisionError::Image` for undecodable image bytes.
    pub fn decode_base64_image(encoded: &str) -> Result<DynamicImage> {
        // Data-URL prefixes put their comma well before any base64 payload
        // could; a comma later in the string is payload corruption.
        let payload = match encoded.find(',') {
            Some(idx) if idx < 100 => &encoded[idx + 1..],
            _ => encoded,
        };

        let bytes = STANDARD
            .decode(payload.trim())
            .map_err(|e| VisionError::processing(format!("invalid base64 image payload: {e}")))?;
        Ok(image::load_from_memory(&bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_round_trip_preserves_pixels_and_alpha() {
        let mut source = RgbaImage::from_pixel(4, 3, Rgba([10, 20, 30, 255]));
        source.put_pixel(1, 1, Rgba([200, 100, 50, 0]));

        let encoded = TransportCodec::encode_png_base64(&source).unwrap();
        let decoded = TransportCodec::decode_base64_image(&encoded).unwrap();

        assert_eq!(decoded.to_rgba8().as_raw(), source.as_raw());
    }

    #[test]
    fn test_data_url_prefix_stripped() {
        let source = RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 255]));
        let encoded = TransportCodec::encode_png_base64(&source).unwrap();
        let with_prefix = format!("data:image/png;base64,{encoded}");

        let decoded = TransportCodec::decode_base64_image(&with_prefix).unwrap();
        assert_eq!(decoded.to_rgba8().as_raw(), source.as_raw());
    }

    #[test]
    fn test_invalid_base64_rejected() {
        let err = TransportCodec::decode_base64_image("!!! not base64 !!!").unwrap_err();
        assert!(matches!(err, VisionError::Processing(_)));
    }

    #[test]
    fn test_non_image_bytes_rejected() {
        let encoded = STANDARD.encode(b"plain text, not a PNG");
        let err = TransportCodec::decode_base64_image(&encoded).unwrap_err();
        assert!(matches!(err, VisionError::Image(_)));
    }
}
