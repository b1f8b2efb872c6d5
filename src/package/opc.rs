//! # OPC Package Backend
//!
//! Questo modulo incapsula l'archivio zip di un package OPC (es. `.pptx`).
//!
//! ## Ciclo di vita:
//! - `open()` legge tutte le parti in memoria preservando l'ordine delle
//!   entry dell'archivio
//! - le parti vengono lette e riscritte per nome mentre il package è aperto
//! - `close()` riscrive l'archivio sul file di staging, finalizzando tutte
//!   le mutazioni esattamente una volta; una rilettura successiva riflette
//!   ogni riscrittura
//!
//! L'enumerazione delle immagini parte dalla relazione `officeDocument`
//! della root e attraversa slide e relative immagini in ordine di documento,
//! deduplicando le parti referenziate da più slide alla prima occorrenza.

use super::content_types::ContentTypes;
use super::relationships::{Relationship, Relationships};
use crate::error::CompressError;
use std::collections::{HashMap, HashSet};
use std::io::{Read, Write};
use std::path::Path;
use tracing::debug;

const CONTENT_TYPES_PART: &str = "[Content_Types].xml";

const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
const REL_SLIDE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
const REL_IMAGE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";

/// One image part reachable from the presentation graph
#[derive(Debug, Clone)]
pub struct ImagePart {
    /// Archive-style part name, e.g. `ppt/media/image1.png`
    pub name: String,
    /// Content type declared in `[Content_Types].xml`
    pub content_type: String,
}

/// An OPC package opened for in-place mutation
pub struct OpcPackage {
    /// Part names in original archive order
    order: Vec<String>,
    parts: HashMap<String, Vec<u8>>,
    content_types: ContentTypes,
}

impl OpcPackage {
    /// Open a package from a staged file, loading every part into memory.
    pub fn open(path: &Path) -> Result<Self, CompressError> {
        let file = std::fs::File::open(path)?;
        let mut archive = zip::ZipArchive::new(file)?;

        let mut order = Vec::new();
        let mut parts = HashMap::new();
        for index in 0..archive.len() {
            let mut entry = archive.by_index(index)?;
            if entry.is_dir() {
                continue;
            }
            let name = entry.name().to_string();
            let mut bytes = Vec::with_capacity(entry.size() as usize);
            entry.read_to_end(&mut bytes)?;
            order.push(name.clone());
            parts.insert(name, bytes);
        }

        let type_xml = parts.get(CONTENT_TYPES_PART).ok_or_else(|| {
            CompressError::Malformed("package has no [Content_Types].xml".to_string())
        })?;
        let type_src = String::from_utf8_lossy(type_xml);
        let content_types = ContentTypes::parse(&type_src)?;

        debug!("Opened package with {} parts", order.len());

        Ok(Self {
            order,
            parts,
            content_types,
        })
    }

    /// The declared content type of a part, if any.
    pub fn content_type_of(&self, name: &str) -> Option<&str> {
        self.content_types.content_type_of(name)
    }

    /// Full contents of a part.
    pub fn part_bytes(&self, name: &str) -> Result<&[u8], CompressError> {
        self.parts
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| CompressError::Malformed(format!("missing part: {}", name)))
    }

    /// Overwrite the contents of an existing part.
    pub fn put_part_bytes(&mut self, name: &str, bytes: Vec<u8>) -> Result<(), CompressError> {
        match self.parts.get_mut(name) {
            Some(slot) => {
                *slot = bytes;
                Ok(())
            }
            None => Err(CompressError::Malformed(format!("missing part: {}", name))),
        }
    }

    /// Relationships of a part (`None` for the package root). A part with
    /// no `.rels` file has no relationships.
    pub fn relationships_of(&self, part: Option<&str>) -> Result<Relationships, CompressError> {
        let rels_name = Self::rels_name(part);
        match self.parts.get(&rels_name) {
            Some(bytes) => {
                let src = String::from_utf8_lossy(bytes);
                Relationships::parse(&src)
            }
            None => Ok(Relationships::empty()),
        }
    }

    /// Image parts reachable from the presentation graph, in deterministic
    /// traversal order, deduplicated at first sight.
    pub fn presentation_image_parts(&self) -> Result<Vec<ImagePart>, CompressError> {
        let root_rels = self.relationships_of(None)?;
        let office = root_rels.first_of_type(REL_OFFICE_DOCUMENT).ok_or_else(|| {
            CompressError::Malformed("package has no officeDocument relationship".to_string())
        })?;
        let presentation = Self::resolve_target(None, office);

        let presentation_rels = self.relationships_of(Some(&presentation))?;
        let mut seen = HashSet::new();
        let mut images = Vec::new();

        for slide_rel in presentation_rels.of_type(REL_SLIDE) {
            if slide_rel.external {
                continue;
            }
            let slide = Self::resolve_target(Some(&presentation), slide_rel);
            let slide_rels = self.relationships_of(Some(&slide))?;

            for image_rel in slide_rels.of_type(REL_IMAGE) {
                if image_rel.external {
                    continue;
                }
                let name = Self::resolve_target(Some(&slide), image_rel);
                if !seen.insert(name.clone()) {
                    continue;
                }
                match self.content_types.content_type_of(&name) {
                    Some(content_type) => images.push(ImagePart {
                        name,
                        content_type: content_type.to_string(),
                    }),
                    None => {
                        // Undeclared parts cannot be classified, leave them be
                        debug!("Part {} has no declared content type, skipping", name);
                    }
                }
            }
        }

        Ok(images)
    }

    /// Finalize all part rewrites back into the staged file.
    pub fn close(self, path: &Path) -> Result<(), CompressError> {
        let file = std::fs::File::create(path)?;
        let mut writer = zip::ZipWriter::new(file);
        let options = zip::write::FileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated);

        for name in &self.order {
            writer.start_file(name.as_str(), options)?;
            writer.write_all(&self.parts[name])?;
        }
        writer.finish()?;

        debug!("Closed package at {}", path.display());
        Ok(())
    }

    /// `.rels` file name for a part (`None` = package root).
    fn rels_name(part: Option<&str>) -> String {
        match part {
            None => "_rels/.rels".to_string(),
            Some(name) => match name.rsplit_once('/') {
                Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
                None => format!("_rels/{}.rels", name),
            },
        }
    }

    /// Resolve a relationship target against its source part's directory,
    /// normalizing `.` and `..` segments.
    fn resolve_target(source: Option<&str>, rel: &Relationship) -> String {
        if let Some(absolute) = rel.target.strip_prefix('/') {
            return Self::normalize(absolute);
        }

        let base_dir = source
            .and_then(|s| s.rsplit_once('/'))
            .map(|(dir, _)| dir)
            .unwrap_or("");
        if base_dir.is_empty() {
            Self::normalize(&rel.target)
        } else {
            Self::normalize(&format!("{}/{}", base_dir, rel.target))
        }
    }

    fn normalize(path: &str) -> String {
        let mut segments: Vec<&str> = Vec::new();
        for segment in path.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                other => segments.push(other),
            }
        }
        segments.join("/")
    }
}
