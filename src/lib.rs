//! # Simple Media Compress Library
//!
//! Questo è il modulo principale della libreria che espone tutte le API pubbliche.
//!
//! ## Architettura dei moduli:
//! - `config`: Policy di compressione fissa e relativa validazione
//! - `error`: Tipi di errore custom per le diverse operazioni
//! - `staging`: File temporanei con cleanup garantito su ogni exit path
//! - `platform`: Risoluzione cross-platform dei tool esterni
//! - `image_transform`: Ricompressione in-memory delle immagini (JPEG)
//! - `video_transform`: Transcoding video tramite processo esterno
//! - `package`: Backend del container slide-deck (zip + content type + rels)
//! - `recompressor`: Riscrittura in-place delle immagini embedded nei package
//! - `compressor`: Facade che instrada i payload verso i transform
//!
//! ## Utilizzo:
//! ```no_run
//! use simple_media_compress::{CompressError, CompressionPolicy, MediaCompressor};
//!
//! # async fn demo(deck_bytes: &[u8]) -> Result<(), CompressError> {
//! let compressor = MediaCompressor::new("/tmp/staging", CompressionPolicy::default())?;
//! let smaller_deck = compressor.compress_package(deck_bytes).await?;
//! # Ok(())
//! # }
//! ```

pub mod compressor;
pub mod config;
pub mod error;
pub mod image_transform;
pub mod package;
pub mod platform;
pub mod recompressor;
pub mod staging;
pub mod utils;
pub mod video_transform;

#[cfg(test)]
pub(crate) mod test_support;

pub use compressor::MediaCompressor;
pub use config::CompressionPolicy;
pub use error::CompressError;
pub use image_transform::{ImageCompressor, ImageTransform};
pub use recompressor::PackageCompressor;
pub use staging::{StagedFile, StagingArea};
pub use video_transform::VideoCompressor;
