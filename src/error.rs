//! # Error Types Module
//!
//! Questo modulo definisce tutti i tipi di errore custom dell'applicazione.
//!
//! ## Categorie di errori:
//! - `Configuration`: staging root mancante o policy non valida (fail fast)
//! - `Transform`: fallimento di una singola compressione immagine/video
//! - `Recompression`: qualsiasi fallimento durante la riscrittura di un package
//! - `Malformed`: struttura del package non valida (parti o relazioni mancanti)
//! - `Io` / `Zip` / `Xml`: conversioni automatiche dagli errori sottostanti
//!
//! Ogni errore viene propagato una sola volta, arricchito con il messaggio
//! della causa originale. Il cleanup dei file temporanei non sostituisce mai
//! l'errore originale.

/// Custom error types for media compression
#[derive(thiserror::Error, Debug)]
pub enum CompressError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("container error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML error: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("malformed package: {0}")]
    Malformed(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("transform error: {0}")]
    Transform(String),

    #[error("package compress failed: {0}")]
    Recompression(String),
}
