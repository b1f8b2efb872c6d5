//! # Video Transform Module
//!
//! Questo modulo gestisce la compressione video tramite transcoder esterno.
//!
//! ## Pipeline:
//! 1. Persiste i byte di input su un temp file univoco (staging area)
//! 2. Analizza il sorgente con ffprobe (durata, risoluzione, codec)
//! 3. Transcodifica con ffmpeg verso un secondo temp file univoco:
//!    `-i <in> -vcodec <codec> -crf <q> -preset <p> -acodec <ac> -b:a <ab> <out>`
//! 4. Verifica che l'output esista e non sia vuoto, poi lo rilegge in memoria
//!
//! ## Controllo qualità (CRF):
//! - 18-23: alta qualità (file più grandi)
//! - 24-28: buona qualità (default 28, bilanciato)
//! - 29+: qualità ridotta
//!
//! Entrambi i temp file vengono rilasciati prima del ritorno, sia in caso di
//! successo che di fallimento del processo esterno: è l'obbligo principale di
//! questo componente. Nessun timeout sul processo esterno: un hang del
//! transcoder blocca la chiamata.

use crate::config::CompressionPolicy;
use crate::error::CompressError;
use crate::platform::PlatformCommands;
use crate::staging::StagingArea;
use crate::utils::to_string_vec;
use std::path::Path;
use tokio::process::Command;
use tracing::debug;

/// Handles video compression through an external transcoder
pub struct VideoCompressor {
    staging: StagingArea,
    policy: CompressionPolicy,
    ffmpeg: String,
    ffprobe: String,
}

impl VideoCompressor {
    pub fn new(staging: StagingArea, policy: CompressionPolicy) -> Self {
        let platform = PlatformCommands::instance();
        Self {
            staging,
            policy,
            ffmpeg: platform.get_command("ffmpeg").to_string(),
            ffprobe: platform.get_command("ffprobe").to_string(),
        }
    }

    /// Compress a video payload and return the transcoded bytes.
    ///
    /// Fails with a transform error if the external process exits
    /// abnormally, metadata probing fails, or no output materializes. No
    /// partial output is ever returned; temp files are cleaned up on every
    /// exit path.
    pub async fn compress(&self, input: &[u8]) -> Result<Vec<u8>, CompressError> {
        self.run(input).await.map_err(|e| match e {
            CompressError::Transform(_) => e,
            other => CompressError::Transform(format!("video compress failed: {}", other)),
        })
    }

    async fn run(&self, input: &[u8]) -> Result<Vec<u8>, CompressError> {
        let staged_in = self.staging.allocate(".mp4")?;
        let staged_out = self.staging.allocate("_cmp.mp4")?;

        self.staging.persist(staged_in.path(), input).await?;

        let info = self.probe(staged_in.path()).await?;
        debug!(
            "Source video: {:.1}s {}x{} ({})",
            info.duration, info.width, info.height, info.codec
        );

        self.transcode(staged_in.path(), staged_out.path()).await?;

        let metadata = tokio::fs::metadata(staged_out.path()).await.map_err(|e| {
            CompressError::Transform(format!("transcoder produced no output file: {}", e))
        })?;
        if metadata.len() == 0 {
            return Err(CompressError::Transform(
                "transcoder produced an empty output file".to_string(),
            ));
        }

        let bytes = self.staging.harvest(staged_out.path()).await?;

        // Happy path releases explicitly; the guards' Drop covers every
        // earlier return above.
        staged_in.release().await?;
        staged_out.release().await?;

        Ok(bytes)
    }

    /// Extract source metadata with ffprobe
    async fn probe(&self, path: &Path) -> Result<VideoInfo, CompressError> {
        let path_str = path.display().to_string();
        let args = to_string_vec([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
            path_str.as_str(),
        ]);

        let output = Command::new(&self.ffprobe)
            .args(&args)
            .output()
            .await
            .map_err(|e| {
                CompressError::Transform(format!("failed to execute {}: {}", self.ffprobe, e))
            })?;

        if !output.status.success() {
            return Err(CompressError::Transform(format!(
                "video metadata probe failed: {}",
                String::from_utf8_lossy(&output.stderr)
            )));
        }

        let info: serde_json::Value = serde_json::from_slice(&output.stdout)
            .map_err(|e| CompressError::Transform(format!("video metadata probe failed: {}", e)))?;

        let duration = info["format"]["duration"]
            .as_str()
            .and_then(|d| d.parse::<f64>().ok())
            .unwrap_or(0.0);

        let empty_vec = vec![];
        let streams = info["streams"].as_array().unwrap_or(&empty_vec);
        let video_stream = streams
            .iter()
            .find(|s| s["codec_type"] == "video")
            .unwrap_or(&serde_json::Value::Null);

        Ok(VideoInfo {
            duration,
            width: video_stream["width"].as_u64().unwrap_or(0) as u32,
            height: video_stream["height"].as_u64().unwrap_or(0) as u32,
            codec: video_stream["codec_name"]
                .as_str()
                .unwrap_or("unknown")
                .to_string(),
        })
    }

    /// Run the external transcoder with the fixed policy argument set
    async fn transcode(&self, input: &Path, output: &Path) -> Result<(), CompressError> {
        let input_str = input.display().to_string();
        let output_str = output.display().to_string();
        let crf = self.policy.video_crf.to_string();

        let mut cmd = Command::new(&self.ffmpeg);
        cmd.args(to_string_vec([
            "-i",
            input_str.as_str(),
            "-vcodec",
            self.policy.video_codec.as_str(),
            "-crf",
            crf.as_str(),
            "-preset",
            self.policy.video_preset.as_str(),
            "-acodec",
            self.policy.audio_codec.as_str(),
            "-b:a",
            self.policy.audio_bitrate.as_str(),
            "-y",
            output_str.as_str(),
        ]));

        // Suppress transcoder chatter unless in debug mode
        if !tracing::enabled!(tracing::Level::DEBUG) {
            cmd.args(["-loglevel", "error"]);
        }

        debug!(
            "Transcoding {} (codec: {}, CRF: {}, preset: {})",
            input.display(),
            self.policy.video_codec,
            self.policy.video_crf,
            self.policy.video_preset
        );

        let result = cmd.output().await.map_err(|e| {
            CompressError::Transform(format!("failed to execute {}: {}", self.ffmpeg, e))
        })?;

        if !result.status.success() {
            return Err(CompressError::Transform(format!(
                "video compress failed: {}",
                String::from_utf8_lossy(&result.stderr)
            )));
        }

        Ok(())
    }

    /// Check if required external tools are available
    pub async fn check_dependencies() -> Result<(), CompressError> {
        let platform = PlatformCommands::instance();

        for tool in ["ffmpeg", "ffprobe"] {
            if !platform.is_command_available(tool).await {
                return Err(CompressError::Configuration(format!(
                    "{} is required for video compression",
                    tool
                )));
            }
        }

        Ok(())
    }
}

/// Source video information extracted by the metadata probe
#[derive(Debug, Clone)]
pub struct VideoInfo {
    pub duration: f64,
    pub width: u32,
    pub height: u32,
    pub codec: String,
}
