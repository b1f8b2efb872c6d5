//! Declared content types of package parts, from `[Content_Types].xml`.
//!
//! The map is read-only: recompressed parts keep the content type the
//! package declared for them.

use crate::error::CompressError;
use std::collections::HashMap;

/// Content type lookup: `Override` by part name, then `Default` by extension
#[derive(Debug, Clone)]
pub struct ContentTypes {
    /// extension (lowercase) -> content type
    defaults: HashMap<String, String>,
    /// part name (no leading slash) -> content type
    overrides: HashMap<String, String>,
}

impl ContentTypes {
    pub fn parse(xml: &str) -> Result<Self, CompressError> {
        let doc = roxmltree::Document::parse(xml)?;
        let mut defaults = HashMap::new();
        let mut overrides = HashMap::new();

        for node in doc.root_element().children().filter(|n| n.is_element()) {
            match node.tag_name().name() {
                "Default" => {
                    let extension = node.attribute("Extension").ok_or_else(|| {
                        CompressError::Malformed(
                            "content type Default without Extension".to_string(),
                        )
                    })?;
                    let content_type = node.attribute("ContentType").ok_or_else(|| {
                        CompressError::Malformed(
                            "content type Default without ContentType".to_string(),
                        )
                    })?;
                    defaults.insert(extension.to_ascii_lowercase(), content_type.to_string());
                }
                "Override" => {
                    let part_name = node.attribute("PartName").ok_or_else(|| {
                        CompressError::Malformed(
                            "content type Override without PartName".to_string(),
                        )
                    })?;
                    let content_type = node.attribute("ContentType").ok_or_else(|| {
                        CompressError::Malformed(
                            "content type Override without ContentType".to_string(),
                        )
                    })?;
                    overrides.insert(
                        part_name.trim_start_matches('/').to_string(),
                        content_type.to_string(),
                    );
                }
                _ => {}
            }
        }

        Ok(Self {
            defaults,
            overrides,
        })
    }

    /// The declared content type of a part, if any.
    pub fn content_type_of(&self, part_name: &str) -> Option<&str> {
        let name = part_name.trim_start_matches('/');
        if let Some(content_type) = self.overrides.get(name) {
            return Some(content_type);
        }

        let file_name = name.rsplit('/').next().unwrap_or(name);
        let extension = file_name.rsplit_once('.').map(|(_, ext)| ext)?;
        self.defaults
            .get(&extension.to_ascii_lowercase())
            .map(String::as_str)
    }
}
