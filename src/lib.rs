//! # lectio
//!
//! A compiler from an in-memory critical-edition document model to a single
//! TEI-namespaced XML document.
//!
//! ## Features
//!
//! - Multi-pass tree compilation: apparatus index, note aggregation,
//!   tree-to-markup conversion, table-of-contents reconstruction
//! - Apparatus criticus generation (lemmas, readings, sigla, notes)
//! - Placed notes (footnote, margins, section end) and cross-references
//! - Verbatim-region-aware XML escaping
//!
//! ## Quick Start
//!
//! ```
//! use lectio::{compile_tei, ContentNode, DocumentData, Metadata};
//!
//! let mut document = DocumentData::default();
//! document.metadata = Metadata::new("Carmina").with_author("Catullus");
//! document.main_text = vec![
//!     ContentNode::heading(1, vec![ContentNode::text("Liber I")]),
//!     ContentNode::paragraph(vec![ContentNode::text("Cui dono lepidum novum libellum?")]),
//! ];
//!
//! let xml = compile_tei("Table of contents", &document).unwrap();
//! assert!(xml.starts_with("<?xml"));
//! ```
//!
//! The compiler degrades defensively: blank metadata renders placeholders,
//! unrecognized node kinds pass their children through, and the only hard
//! failures are trees whose nodes carry both text and children, and
//! apparatus entry ids registered twice.

pub mod error;
pub mod model;
pub mod tei;

pub use error::{Error, Result};
pub use model::{
    Annotation, ApparatusEntry, Bibliography, BibReference, ContentNode, DocumentApparatus,
    DocumentData, DocumentSiglum, Layout, Metadata, NodeAttrs, NodeKind, Section, SectionLayout,
    Template,
};
pub use tei::compile_tei;
