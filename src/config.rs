//! # Compression Policy Module
//!
//! Questo modulo gestisce la configurazione di compressione dell'applicazione.
//!
//! ## Parametri:
//! - `image_quality`: Qualità JPEG per le immagini ricodificate (1-100, default: 30)
//! - `video_codec`: Codec video per il transcoding (default: "libx264")
//! - `video_crf`: CRF video (0-51, default: 28, più basso = migliore qualità)
//! - `video_preset`: Preset di encoding FFmpeg (default: "slow")
//! - `audio_codec`: Codec audio (default: "aac")
//! - `audio_bitrate`: Bitrate audio (default: "128k")
//!
//! La policy è fissa per tutta la durata di un'operazione: viene validata una
//! volta alla costruzione del compressore e mai modificata per singola chiamata.
//!
//! ## Esempio:
//! ```
//! use simple_media_compress::{CompressError, CompressionPolicy};
//!
//! # fn main() -> Result<(), CompressError> {
//! let policy = CompressionPolicy {
//!     image_quality: 40,
//!     video_crf: 24,
//!     ..Default::default()
//! };
//! policy.validate()?;
//! # Ok(())
//! # }
//! ```

use crate::error::CompressError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Fixed quality/format parameters applied uniformly to all compress calls
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionPolicy {
    /// JPEG quality for re-encoded images (1-100)
    pub image_quality: u8,
    /// Video codec passed to the transcoder
    pub video_codec: String,
    /// Video CRF value (0-51, lower = better quality)
    pub video_crf: u8,
    /// Transcoder encoding preset
    pub video_preset: String,
    /// Audio codec passed to the transcoder
    pub audio_codec: String,
    /// Audio bitrate passed to the transcoder
    pub audio_bitrate: String,
}

impl Default for CompressionPolicy {
    fn default() -> Self {
        Self {
            image_quality: 30,
            video_codec: "libx264".to_string(),
            video_crf: 28,
            video_preset: "slow".to_string(),
            audio_codec: "aac".to_string(),
            audio_bitrate: "128k".to_string(),
        }
    }
}

impl CompressionPolicy {
    /// Validate policy parameters
    pub fn validate(&self) -> Result<(), CompressError> {
        if self.image_quality == 0 || self.image_quality > 100 {
            return Err(CompressError::Configuration(
                "image quality must be between 1 and 100".to_string(),
            ));
        }

        if self.video_crf > 51 {
            return Err(CompressError::Configuration(
                "video CRF must be between 0 and 51".to_string(),
            ));
        }

        if self.video_codec.is_empty() || self.audio_codec.is_empty() {
            return Err(CompressError::Configuration(
                "video and audio codecs must not be empty".to_string(),
            ));
        }

        if self.video_preset.is_empty() {
            return Err(CompressError::Configuration(
                "video preset must not be empty".to_string(),
            ));
        }

        if self.audio_bitrate.is_empty() {
            return Err(CompressError::Configuration(
                "audio bitrate must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Load a policy from a JSON file, falling back to defaults if absent
    pub async fn from_file(path: &Path) -> Result<Self, CompressError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path).await?;
        let policy: CompressionPolicy = serde_json::from_str(&content)
            .map_err(|e| CompressError::Configuration(format!("invalid policy file: {}", e)))?;
        policy.validate()?;
        Ok(policy)
    }

    /// Save the policy to a JSON file
    pub async fn save_to_file(&self, path: &Path) -> Result<(), CompressError> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| CompressError::Configuration(format!("policy serialization: {}", e)))?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }
}
