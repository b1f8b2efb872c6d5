//! # Media Compressor Facade
//!
//! Punto di ingresso unico della libreria: valida staging root e policy una
//! sola volta alla costruzione e instrada ogni payload verso il transform
//! appropriato (immagine, video o package).

use crate::config::CompressionPolicy;
use crate::error::CompressError;
use crate::image_transform::{ImageCompressor, ImageTransform};
use crate::recompressor::PackageCompressor;
use crate::staging::StagingArea;
use crate::video_transform::VideoCompressor;
use std::path::PathBuf;

/// Compresses images, videos and slide-deck packages under one fixed policy
pub struct MediaCompressor {
    images: ImageCompressor,
    videos: VideoCompressor,
    packages: PackageCompressor<ImageCompressor>,
}

impl MediaCompressor {
    /// Build a compressor over an existing staging root.
    ///
    /// Fails fast with a configuration error if the root directory does not
    /// exist or the policy is invalid; no filesystem writes happen here.
    pub fn new(
        staging_root: impl Into<PathBuf>,
        policy: CompressionPolicy,
    ) -> Result<Self, CompressError> {
        policy.validate()?;
        let staging = StagingArea::new(staging_root)?;

        Ok(Self {
            images: ImageCompressor::new(policy.clone()),
            videos: VideoCompressor::new(staging.clone(), policy.clone()),
            packages: PackageCompressor::new(staging, ImageCompressor::new(policy)),
        })
    }

    /// Recompress a raster image in memory.
    pub fn compress_image(&self, input: &[u8]) -> Result<Vec<u8>, CompressError> {
        self.images.compress(input)
    }

    /// Transcode a video through the external transcoder.
    pub async fn compress_video(&self, input: &[u8]) -> Result<Vec<u8>, CompressError> {
        self.videos.compress(input).await
    }

    /// Rewrite the embedded images of a slide-deck package.
    pub async fn compress_package(&self, input: &[u8]) -> Result<Vec<u8>, CompressError> {
        self.packages.compress(input).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::noise_png;
    use tempfile::TempDir;

    #[test]
    fn test_missing_staging_root_fails_construction() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope");

        let result = MediaCompressor::new(&missing, CompressionPolicy::default());
        assert!(matches!(result, Err(CompressError::Configuration(_))));
        assert!(!missing.exists());
    }

    #[test]
    fn test_invalid_policy_fails_construction() {
        let temp_dir = TempDir::new().unwrap();
        let policy = CompressionPolicy {
            image_quality: 0,
            ..Default::default()
        };

        let result = MediaCompressor::new(temp_dir.path(), policy);
        assert!(matches!(result, Err(CompressError::Configuration(_))));
    }

    #[test]
    fn test_image_compression_through_facade() {
        let temp_dir = TempDir::new().unwrap();
        let compressor =
            MediaCompressor::new(temp_dir.path(), CompressionPolicy::default()).unwrap();

        let original = noise_png(96, 96);
        let compressed = compressor.compress_image(&original).unwrap();
        assert!(compressed.len() < original.len());
    }
}
