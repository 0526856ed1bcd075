//! Document data model.
//!
//! This module contains:
//! - The content tree (nodes, kinds, attributes, annotations)
//! - Document-level collections (metadata, bibliographies, apparatuses, sigla)
//! - Template/layout configuration and section identities

mod document;
mod node;

pub use document::{
    ApparatusEntry, Bibliography, BibReference, DocumentApparatus, DocumentData, DocumentSiglum,
    Layout, Metadata, Section, SectionLayout, Template,
};
pub use node::{Annotation, ContentNode, NodeAttrs, NodeKind};
