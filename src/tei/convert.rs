//! Content tree to TEI markup conversion.
//!
//! The converter walks the tree recursively, accumulating markup fragments.
//! Note annotations resolve against the apparatus index and the note table;
//! headings are reported to a side-channel sink for the table of contents.

use std::fmt::Write;

use crate::model::{Annotation, ContentNode, NodeKind};

use super::escape::escape_tei;
use super::header::render_bibl;
use super::index::ApparatusIndex;
use super::notes::NoteTable;

/// A heading encountered during conversion, in document order.
#[derive(Debug, Clone)]
pub struct HeadingEvent {
    /// Rendered inline content of the heading.
    pub content: String,
    /// Heading level (>= 1).
    pub level: u8,
    /// Anchor id carried by the emitted heading element.
    pub anchor: String,
}

/// Converter state for one section.
///
/// Borrows the per-compile apparatus index and note table; never ambient.
pub struct Renderer<'a> {
    section_id: &'a str,
    index: &'a ApparatusIndex,
    notes: &'a mut NoteTable,
    headings: &'a mut Vec<HeadingEvent>,
}

impl<'a> Renderer<'a> {
    pub fn new(
        section_id: &'a str,
        index: &'a ApparatusIndex,
        notes: &'a mut NoteTable,
        headings: &'a mut Vec<HeadingEvent>,
    ) -> Self {
        Self {
            section_id,
            index,
            notes,
            headings,
        }
    }

    /// Render an ordered list of nodes.
    ///
    /// With wrapping enabled, each heading opens a `<div>` scoped to its
    /// level: a later heading at an equal or shallower level closes every
    /// container at that depth or deeper, and whatever remains open closes
    /// at list end. With wrapping disabled the fragments concatenate as-is.
    pub fn render_nodes<'n, I>(&mut self, nodes: I, wrap: bool) -> String
    where
        I: IntoIterator<Item = &'n ContentNode>,
    {
        if !wrap {
            let mut out = String::new();
            for node in nodes {
                out.push_str(&self.render_node(node, false));
            }
            return out;
        }

        let mut out = String::new();
        let mut open: Vec<u8> = Vec::new();
        for node in nodes {
            let fragment = self.render_node(node, true);
            // A heading that actually rendered opens a container at its
            // level; skipped (empty) headings open nothing.
            if node.kind == NodeKind::Heading && !fragment.trim().is_empty() {
                let level = node.attrs.level.unwrap_or(1);
                while open.last().is_some_and(|&top| top >= level) {
                    out.push_str("</div>");
                    open.pop();
                }
                out.push_str("<div>");
                open.push(level);
            }
            out.push_str(&fragment);
        }
        for _ in open.drain(..) {
            out.push_str("</div>");
        }
        out
    }

    /// Render a single node to a markup fragment.
    pub(crate) fn render_node(&mut self, node: &ContentNode, wrap: bool) -> String {
        match node.kind {
            NodeKind::Heading => {
                let content = self.render_children(node, false);
                if !wrap || content.trim().is_empty() {
                    return content;
                }
                let anchor = format!("{}-h{}", self.section_id, self.headings.len() + 1);
                self.headings.push(HeadingEvent {
                    content: content.clone(),
                    level: node.attrs.level.unwrap_or(1),
                    anchor: anchor.clone(),
                });
                format!("<head xml:id=\"{}\">{}</head>", escape_tei(&anchor), content)
            }

            NodeKind::Paragraph => {
                let content = self.render_children(node, false);
                if !wrap || content.trim().is_empty() {
                    content
                } else {
                    format!("<p>{content}</p>")
                }
            }

            NodeKind::Text => {
                let raw = node.text.as_deref().unwrap_or("");
                if node.annotations.is_empty() {
                    if wrap && raw.trim().is_empty() {
                        String::new()
                    } else {
                        escape_tei(raw)
                    }
                } else {
                    self.render_annotated(raw, &node.annotations)
                }
            }

            // Section breaks only steer the partitioner.
            NodeKind::SectionBreak => String::new(),

            // Transparent containers: apparatus-structural kinds get their
            // meaning from the apparatus criticus generator, everything
            // unrecognized degrades to its children.
            NodeKind::Lemma
            | NodeKind::Siglum
            | NodeKind::ReadingSeparator
            | NodeKind::ReadingType
            | NodeKind::Other => self.render_children(node, wrap),
        }
    }

    fn render_children(&mut self, node: &ContentNode, wrap: bool) -> String {
        match node.children.as_deref() {
            Some(children) => self.render_nodes(children.iter(), wrap),
            None => String::new(),
        }
    }

    /// Apply a run's annotations in array order over its rendering.
    fn render_annotated(&mut self, raw: &str, annotations: &[Annotation]) -> String {
        let mut out = escape_tei(raw);
        for annotation in annotations {
            match annotation {
                Annotation::NoteRef { id } => {
                    let entry = self.index.get(id);
                    match entry.and_then(|e| e.placement) {
                        Some(placement) => {
                            if let Some(entry) = entry
                                && let Some(body) = self.notes.consume(id)
                            {
                                write!(
                                    out,
                                    "<note n=\"{}\" place=\"{}\">{}</note>",
                                    entry.number,
                                    placement.as_str(),
                                    escape_tei(&body)
                                )
                                .unwrap();
                            }
                            // Already consumed (or never collected): the
                            // bare run stands alone.
                        }
                        // Critical entries, and ids missing from the index
                        // entirely, resolve to a cross-reference; the run
                        // doubles as the link text.
                        None => {
                            let mut linked = String::with_capacity(out.len() * 2 + 32);
                            linked.push_str(&out);
                            write!(
                                linked,
                                "<ref target=\"#{}\">{}</ref>",
                                escape_tei(id),
                                out
                            )
                            .unwrap();
                            out = linked;
                        }
                    }
                }
                Annotation::Citation { reference } => {
                    out = render_bibl(reference);
                }
                Annotation::Other => {}
            }
        }
        out
    }
}
