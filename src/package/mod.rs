//! # Slide-deck Container Module
//!
//! Questo modulo implementa il backend Open Packaging Conventions usato dal
//! ricompressore di package.
//!
//! ## Architettura (dal basso verso l'alto):
//! - `content_types`: mappa estensioni/part name ai content type dichiarati
//!   in `[Content_Types].xml`
//! - `relationships`: parsing dei file `_rels/*.rels` in ordine di documento
//! - `opc`: l'archivio zip vero e proprio, con apertura per mutazione,
//!   accesso alle parti e chiusura che finalizza tutte le riscritture
//!
//! Il grafo di presentazione (root → officeDocument → slide → immagini) è
//! attraversato in ordine deterministico, quindi due esecuzioni sullo stesso
//! input producono lo stesso risultato.

pub mod content_types;
pub mod opc;
pub mod relationships;

pub use content_types::ContentTypes;
pub use opc::{ImagePart, OpcPackage};
pub use relationships::{Relationship, Relationships};
