//! # Image Transform Module
//!
//! Questo modulo gestisce la ricompressione in-memory delle immagini raster.
//!
//! ## Responsabilità:
//! - Decodifica i byte di input come immagine raster (JPEG/PNG)
//! - Ricodifica come JPEG alla qualità fissata dalla policy
//! - Scarta i metadati non essenziali (EXIF, profili colore): la pipeline
//!   decode/re-encode non li trasporta mai nell'output
//!
//! Nessun I/O su disco: la trasformazione è pura e senza stato condiviso,
//! quindi è sicura da invocare concorrentemente su input indipendenti.
//! L'orchestratore dei package dipende solo dal trait [`ImageTransform`],
//! così nei test può essere pilotato con stub al posto dei codec reali.

use crate::config::CompressionPolicy;
use crate::error::CompressError;
use image::codecs::jpeg::JpegEncoder;
use tracing::debug;

/// Single-method interface for raster recompression.
///
/// Implementations must be pure: bytes in, recompressed bytes out, no
/// partial output on failure.
pub trait ImageTransform {
    fn compress(&self, input: &[u8]) -> Result<Vec<u8>, CompressError>;
}

/// Production transform: decode, flatten, re-encode as policy-quality JPEG
#[derive(Debug, Clone)]
pub struct ImageCompressor {
    policy: CompressionPolicy,
}

impl ImageCompressor {
    pub fn new(policy: CompressionPolicy) -> Self {
        Self { policy }
    }
}

impl ImageTransform for ImageCompressor {
    fn compress(&self, input: &[u8]) -> Result<Vec<u8>, CompressError> {
        let decoded = image::load_from_memory(input)
            .map_err(|e| CompressError::Transform(format!("image compress failed: {}", e)))?;

        // JPEG has no alpha channel; flatten before encoding
        let rgb = decoded.to_rgb8();

        let mut output = Vec::new();
        let mut encoder = JpegEncoder::new_with_quality(&mut output, self.policy.image_quality);
        encoder
            .encode_image(&rgb)
            .map_err(|e| CompressError::Transform(format!("image compress failed: {}", e)))?;

        debug!(
            "Image recompressed: {} -> {} bytes (quality {})",
            input.len(),
            output.len(),
            self.policy.image_quality
        );

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::noise_png;

    #[test]
    fn test_compress_png_to_smaller_jpeg() {
        let compressor = ImageCompressor::new(CompressionPolicy::default());
        let original = noise_png(96, 96);

        let compressed = compressor.compress(&original).unwrap();

        assert!(compressed.len() < original.len());
        assert_eq!(
            image::guess_format(&compressed).unwrap(),
            image::ImageFormat::Jpeg
        );
    }

    #[test]
    fn test_compress_is_repeatable_on_own_output() {
        let compressor = ImageCompressor::new(CompressionPolicy::default());
        let first = compressor.compress(&noise_png(64, 64)).unwrap();

        // Output must itself be a decodable image part
        let second = compressor.compress(&first).unwrap();
        assert!(!second.is_empty());
    }

    #[test]
    fn test_undecodable_input_fails_with_transform_error() {
        let compressor = ImageCompressor::new(CompressionPolicy::default());

        let result = compressor.compress(b"definitely not an image");
        assert!(matches!(result, Err(CompressError::Transform(_))));
    }
}
