//! Note aggregation.
//!
//! One depth-first pass over the whole main-text tree collects, per note id,
//! the concatenation of every text run annotated with that id. The converter
//! consumes each id at most once while rendering; consumption is tracked in
//! a separate set so the collected bodies stay inspectable afterwards.

use std::collections::{HashMap, HashSet};

use crate::model::{Annotation, ContentNode, NodeKind};

/// Id-keyed table of aggregated note bodies.
#[derive(Debug, Default)]
pub struct NoteTable {
    bodies: HashMap<String, String>,
    consumed: HashSet<String>,
}

impl NoteTable {
    /// Consume the body for `id`. Returns `None` when the id was never
    /// collected or has already been consumed; each id yields its body
    /// exactly once.
    pub fn consume(&mut self, id: &str) -> Option<String> {
        if self.consumed.contains(id) {
            return None;
        }
        let body = self.bodies.get(id)?.clone();
        self.consumed.insert(id.to_string());
        Some(body)
    }

    /// Look at a collected body without consuming it.
    pub fn body(&self, id: &str) -> Option<&str> {
        self.bodies.get(id).map(String::as_str)
    }

    /// Number of note ids collected.
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Ids that were collected but never consumed by the converter.
    pub fn unconsumed(&self) -> impl Iterator<Item = &str> {
        self.bodies
            .keys()
            .filter(|id| !self.consumed.contains(*id))
            .map(String::as_str)
    }

    fn record(&mut self, id: &str, text: &str) {
        self.bodies.entry(id.to_string()).or_default().push_str(text);
    }
}

/// Collect note bodies from the whole content tree, in document order.
///
/// Must run once per compile, before the converter: the converter consumes
/// entries as it renders note elements.
pub fn collect_notes(nodes: &[ContentNode]) -> NoteTable {
    let mut table = NoteTable::default();
    collect_into(nodes, &mut table);
    table
}

fn collect_into(nodes: &[ContentNode], table: &mut NoteTable) {
    for node in nodes {
        if node.kind == NodeKind::Text
            && let Some(text) = node.text.as_deref()
        {
            for annotation in &node.annotations {
                if let Annotation::NoteRef { id } = annotation {
                    table.record(id, text);
                }
            }
        }
        if let Some(children) = node.children.as_deref() {
            collect_into(children, table);
        }
    }
}
