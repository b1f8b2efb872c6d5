//! # Simple Media Compress - Main Entry Point
//!
//! Punto di ingresso dell'applicazione.
//!
//! ## Flusso di esecuzione:
//! 1. Parsa gli argomenti CLI (file di input, output, policy, staging dir)
//! 2. Configura il logging (INFO o DEBUG a seconda del flag verbose)
//! 3. Determina il tipo di media dall'estensione del file
//! 4. Comprime tramite [`MediaCompressor`] e scrive il risultato
//!
//! ## Esempio di utilizzo:
//! ```bash
//! media-compress deck.pptx --output deck_small.pptx --quality 30 --verbose
//! ```

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use simple_media_compress::{utils, CompressionPolicy, MediaCompressor, VideoCompressor};

#[derive(Parser)]
#[command(name = "media-compress")]
#[command(about = "Compress images, videos and slide-deck packages")]
struct Args {
    /// Media file to compress (image, video, or slide-deck package)
    input: PathBuf,

    /// Output path (defaults to <input>_compressed.<ext>)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Staging directory for temp files (must already exist)
    #[arg(long)]
    staging_dir: Option<PathBuf>,

    /// JPEG quality for images (1-100)
    #[arg(short, long, default_value = "30")]
    quality: u8,

    /// Video CRF value (0-51, lower = better quality)
    #[arg(long, default_value = "28")]
    crf: u8,

    /// Transcoder encoding preset
    #[arg(long, default_value = "slow")]
    preset: String,

    /// Audio bitrate for transcoded videos
    #[arg(long, default_value = "128k")]
    audio_bitrate: String,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    if !args.input.is_file() {
        return Err(anyhow::anyhow!(
            "Input file does not exist: {}",
            args.input.display()
        ));
    }

    let policy = CompressionPolicy {
        image_quality: args.quality,
        video_crf: args.crf,
        video_preset: args.preset,
        audio_bitrate: args.audio_bitrate,
        ..Default::default()
    };

    let staging_root = args.staging_dir.unwrap_or_else(std::env::temp_dir);
    let compressor = MediaCompressor::new(staging_root, policy)?;

    let extension = args
        .input
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default();

    let input_bytes = tokio::fs::read(&args.input).await?;

    let (output_bytes, output_extension) = match extension.as_str() {
        "jpg" | "jpeg" | "png" => (compressor.compress_image(&input_bytes)?, "jpg"),
        "mp4" | "mov" | "avi" | "mkv" | "webm" => {
            VideoCompressor::check_dependencies().await?;
            (compressor.compress_video(&input_bytes).await?, "mp4")
        }
        "pptx" => (compressor.compress_package(&input_bytes).await?, "pptx"),
        other => {
            return Err(anyhow::anyhow!(
                "Unsupported media format: {:?}. Supported: jpg, jpeg, png, mp4, mov, avi, mkv, webm, pptx",
                other
            ))
        }
    };

    let output_path = args.output.unwrap_or_else(|| {
        let stem = args.input.file_stem().unwrap_or_default().to_string_lossy();
        args.input
            .with_file_name(format!("{}_compressed.{}", stem, output_extension))
    });

    tokio::fs::write(&output_path, &output_bytes).await?;

    info!(
        "✅ {} -> {} ({} -> {}, {:.1}% smaller)",
        args.input.display(),
        output_path.display(),
        utils::format_size(input_bytes.len() as u64),
        utils::format_size(output_bytes.len() as u64),
        utils::reduction_percent(input_bytes.len() as u64, output_bytes.len() as u64)
    );

    Ok(())
}
