//! Content tree node types.

use super::document::{BibReference, Section};

/// Kind of a content tree node.
///
/// This is a closed set: every consumer matches exhaustively, so adding a
/// kind forces a decision at each match site. Input with an unrecognized
/// kind maps to [`NodeKind::Other`], which renders as a transparent
/// container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "cli", derive(serde::Deserialize))]
#[cfg_attr(feature = "cli", serde(from = "String"))]
pub enum NodeKind {
    /// Block-level text container (`<p>`).
    Paragraph,
    /// Section heading; level lives in [`NodeAttrs::level`].
    Heading,
    /// Leaf text run carrying the actual string data.
    #[default]
    Text,
    /// Divider that opens a new document section; the target section lives
    /// in [`NodeAttrs::section`].
    SectionBreak,
    /// Apparatus lemma; payload in [`NodeAttrs::lemma`].
    Lemma,
    /// Witness siglum; payload in [`NodeAttrs::siglum`].
    Siglum,
    /// Separator between variant readings in an apparatus entry.
    ReadingSeparator,
    /// Reading-type marker (om., add., transp., ...); payload in
    /// [`NodeAttrs::reading`].
    ReadingType,
    /// Unrecognized kind. Children pass through, nothing else renders.
    Other,
}

impl NodeKind {
    /// Map a serialized tag to a kind. Unknown tags degrade to
    /// [`NodeKind::Other`] rather than failing the whole document.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "paragraph" => NodeKind::Paragraph,
            "heading" => NodeKind::Heading,
            "text" => NodeKind::Text,
            "section-break" => NodeKind::SectionBreak,
            "lemma" => NodeKind::Lemma,
            "siglum" => NodeKind::Siglum,
            "reading-separator" => NodeKind::ReadingSeparator,
            "reading-type" => NodeKind::ReadingType,
            _ => NodeKind::Other,
        }
    }
}

impl From<String> for NodeKind {
    fn from(tag: String) -> Self {
        NodeKind::from_tag(&tag)
    }
}

/// Attribute bag for a content node.
///
/// Only the attributes meaningful for the node's kind are consulted; the
/// rest are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(serde::Deserialize))]
#[cfg_attr(feature = "cli", serde(default))]
pub struct NodeAttrs {
    /// Heading level (>= 1). Missing defaults to 1.
    pub level: Option<u8>,
    /// Section opened by a section break.
    pub section: Option<Section>,
    /// Lemma text payload.
    pub lemma: Option<String>,
    /// Siglum text payload.
    pub siglum: Option<String>,
    /// Reading-type text payload.
    pub reading: Option<String>,
}

/// Annotation attached to a text run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "cli", derive(serde::Deserialize))]
#[cfg_attr(feature = "cli", serde(tag = "kind", rename_all = "kebab-case"))]
pub enum Annotation {
    /// Reference to an apparatus entry, resolved against the apparatus index
    /// and the note table.
    NoteRef { id: String },
    /// Inline bibliography citation. Replaces the run's rendering entirely.
    Citation { reference: BibReference },
    /// Unrecognized annotation kind; ignored, the run still renders.
    #[cfg_attr(feature = "cli", serde(other))]
    Other,
}

/// A node in the document content tree.
///
/// A node carries either `text` (leaf) or `children` (interior), never both;
/// the compiler rejects trees that violate this up front.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "cli", derive(serde::Deserialize))]
pub struct ContentNode {
    pub kind: NodeKind,
    #[cfg_attr(feature = "cli", serde(default))]
    pub text: Option<String>,
    #[cfg_attr(feature = "cli", serde(default))]
    pub children: Option<Vec<ContentNode>>,
    #[cfg_attr(feature = "cli", serde(default))]
    pub attrs: NodeAttrs,
    #[cfg_attr(feature = "cli", serde(default))]
    pub annotations: Vec<Annotation>,
}

impl ContentNode {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }

    /// Leaf text run.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Text,
            text: Some(text.into()),
            ..Default::default()
        }
    }

    /// Paragraph with the given inline children.
    pub fn paragraph(children: Vec<ContentNode>) -> Self {
        Self {
            kind: NodeKind::Paragraph,
            children: Some(children),
            ..Default::default()
        }
    }

    /// Heading at `level` with the given inline children.
    pub fn heading(level: u8, children: Vec<ContentNode>) -> Self {
        let mut node = Self {
            kind: NodeKind::Heading,
            children: Some(children),
            ..Default::default()
        };
        node.attrs.level = Some(level);
        node
    }

    /// Divider opening `section`.
    pub fn section_break(section: Section) -> Self {
        let mut node = Self::new(NodeKind::SectionBreak);
        node.attrs.section = Some(section);
        node
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn with_children(mut self, children: Vec<ContentNode>) -> Self {
        self.children = Some(children);
        self
    }
}
