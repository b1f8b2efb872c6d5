//! # Package Recompressor Module
//!
//! Questo è l'orchestratore centrale: riscrive in-place le immagini embedded
//! in un package slide-deck.
//!
//! ## Algoritmo:
//! 1. Persiste i byte del package su un temp file univoco
//! 2. Apre il container per mutazione dal path di staging
//! 3. Enumera le parti immagine raggiungibili dal grafo di presentazione
//! 4. Per ogni parte con content type eleggibile (`image/jpeg`, `image/png`,
//!    `image/jpg`, confronto esatto): legge i byte, li ricomprime con il
//!    transform immagine, riscrive lo stream della parte
//! 5. Chiude il container finalizzando tutte le riscritture nel file staged
//! 6. Rilegge i byte del file staged come risultato
//! 7. Rilascia il temp file, incondizionatamente
//!
//! ## Politica degli errori:
//! Tutto o niente: qualsiasi fallimento (container malformato, transform di
//! una singola parte, I/O) abortisce l'intera operazione con un errore di
//! ricompressione che avvolge la causa. I byte originali del chiamante non
//! vengono mai restituiti come fallback né mutati; le parti non-immagine
//! restano byte-identiche. Il rilascio del temp file avviene comunque, su
//! ogni percorso di uscita.

use crate::error::CompressError;
use crate::image_transform::ImageTransform;
use crate::package::OpcPackage;
use crate::staging::StagingArea;
use tracing::debug;

/// Content types rewritten by the recompressor; exact match, no wildcards.
pub fn is_compressible_image(content_type: &str) -> bool {
    matches!(content_type, "image/jpeg" | "image/png" | "image/jpg")
}

/// Rewrites eligible image parts of a slide-deck package in place
pub struct PackageCompressor<T: ImageTransform> {
    staging: StagingArea,
    transform: T,
}

impl<T: ImageTransform> PackageCompressor<T> {
    pub fn new(staging: StagingArea, transform: T) -> Self {
        Self { staging, transform }
    }

    /// Recompress every eligible image part and return the mutated package.
    ///
    /// The operation either fully succeeds or fully fails; a half-rewritten
    /// package is never returned because the whole staged copy is discarded
    /// on any failure.
    pub async fn compress(&self, input: &[u8]) -> Result<Vec<u8>, CompressError> {
        self.run(input).await.map_err(|e| match e {
            CompressError::Recompression(_) => e,
            other => CompressError::Recompression(other.to_string()),
        })
    }

    async fn run(&self, input: &[u8]) -> Result<Vec<u8>, CompressError> {
        let staged = self.staging.allocate(".pptx")?;
        self.staging.persist(staged.path(), input).await?;

        let mut package = OpcPackage::open(staged.path())?;
        let image_parts = package.presentation_image_parts()?;
        debug!("Package exposes {} image parts", image_parts.len());

        for part in image_parts {
            if !is_compressible_image(&part.content_type) {
                debug!(
                    "Part {} left untouched ({})",
                    part.name, part.content_type
                );
                continue;
            }

            let original = package.part_bytes(&part.name)?.to_vec();
            let compressed = self.transform.compress(&original)?;
            debug!(
                "Part {} recompressed: {} -> {} bytes",
                part.name,
                original.len(),
                compressed.len()
            );
            package.put_part_bytes(&part.name, compressed)?;
        }

        package.close(staged.path())?;
        let bytes = self.staging.harvest(staged.path()).await?;

        // Happy path releases explicitly; the guard's Drop covers every
        // earlier return above.
        staged.release().await?;

        Ok(bytes)
    }
}
