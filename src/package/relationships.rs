//! Part relationships, parsed from `_rels/*.rels` files.
//!
//! Relationships are kept in document order so the part graph traversal is
//! deterministic for a given input.

use crate::error::CompressError;

/// One relationship entry of a source part
#[derive(Debug, Clone)]
pub struct Relationship {
    pub id: String,
    pub rel_type: String,
    pub target: String,
    /// `TargetMode="External"` targets point outside the package and are
    /// never resolved to parts.
    pub external: bool,
}

/// All relationships of one source part, in document order
#[derive(Debug, Clone)]
pub struct Relationships {
    items: Vec<Relationship>,
}

impl Relationships {
    pub fn parse(xml: &str) -> Result<Self, CompressError> {
        let doc = roxmltree::Document::parse(xml)?;
        let mut items = Vec::new();

        for node in doc
            .root_element()
            .children()
            .filter(|n| n.is_element() && n.tag_name().name() == "Relationship")
        {
            let id = node.attribute("Id").ok_or_else(|| {
                CompressError::Malformed("relationship without Id".to_string())
            })?;
            let rel_type = node.attribute("Type").ok_or_else(|| {
                CompressError::Malformed(format!("relationship {} without Type", id))
            })?;
            let target = node.attribute("Target").ok_or_else(|| {
                CompressError::Malformed(format!("relationship {} without Target", id))
            })?;
            let external = node
                .attribute("TargetMode")
                .map(|mode| mode.eq_ignore_ascii_case("External"))
                .unwrap_or(false);

            items.push(Relationship {
                id: id.to_string(),
                rel_type: rel_type.to_string(),
                target: target.to_string(),
                external,
            });
        }

        Ok(Self { items })
    }

    pub fn empty() -> Self {
        Self { items: Vec::new() }
    }

    /// Relationships of one type, in document order.
    pub fn of_type<'a>(&'a self, rel_type: &'a str) -> impl Iterator<Item = &'a Relationship> {
        self.items.iter().filter(move |r| r.rel_type == rel_type)
    }

    pub fn first_of_type(&self, rel_type: &str) -> Option<&Relationship> {
        self.items.iter().find(|r| r.rel_type == rel_type)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
