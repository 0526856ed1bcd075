//! Apparatus index.
//!
//! One pass over the apparatus collection produces an id-keyed table the
//! converter consults when resolving note annotations. The index is built
//! fresh for every compile call and passed by reference, never held in
//! shared state.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::model::{ApparatusEntry, DocumentApparatus};

use super::convert::Renderer;
use super::notes::NoteTable;

/// Physical placement of a placed note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Footnote,
    InnerMargin,
    OuterMargin,
    SectionNote,
}

impl Placement {
    /// Map an entry category to a placement. `None` covers the `critical`
    /// category, missing categories, and anything unmapped: those entries
    /// resolve to cross-references instead of placed notes.
    pub fn from_category(category: &str) -> Option<Placement> {
        match category {
            "footnote" => Some(Placement::Footnote),
            "inner-margin" => Some(Placement::InnerMargin),
            "outer-margin" => Some(Placement::OuterMargin),
            "section-note" => Some(Placement::SectionNote),
            _ => None,
        }
    }

    /// Value of the `place` attribute on emitted note elements.
    pub fn as_str(self) -> &'static str {
        match self {
            Placement::Footnote => "bottom",
            Placement::InnerMargin => "margin-inner",
            Placement::OuterMargin => "margin-outer",
            Placement::SectionNote => "end",
        }
    }
}

/// Indexed data for one apparatus entry.
#[derive(Debug, Clone)]
pub struct IndexedEntry {
    /// `None` marks a critical (cross-reference) entry.
    pub placement: Option<Placement>,
    /// Inline rendering of the entry content; absent for critical entries.
    pub rendered: Option<String>,
    /// 1-based position within the owning apparatus; numbering restarts
    /// for each apparatus.
    pub number: usize,
}

/// Id-keyed index over every apparatus entry.
pub type ApparatusIndex = HashMap<String, IndexedEntry>;

/// Build the apparatus index from the full apparatus collection.
///
/// An entry id registered twice would silently corrupt the index, so it is
/// rejected outright.
pub fn build_apparatus_index(apparatuses: &[DocumentApparatus]) -> Result<ApparatusIndex> {
    let mut index = ApparatusIndex::new();
    for apparatus in apparatuses {
        for (position, entry) in apparatus.entries.iter().enumerate() {
            let indexed = index_entry(entry, position + 1);
            if index.insert(entry.id.clone(), indexed).is_some() {
                return Err(Error::DuplicateEntryId(entry.id.clone()));
            }
        }
    }
    Ok(index)
}

fn index_entry(entry: &ApparatusEntry, number: usize) -> IndexedEntry {
    let placement = entry
        .category
        .as_deref()
        .and_then(Placement::from_category);

    // Critical entries carry no inline rendering; their content feeds the
    // apparatus criticus instead.
    let rendered = placement.map(|_| {
        // The index is built before the note table exists, so entry content
        // renders against empty scratch state.
        let empty = ApparatusIndex::new();
        let mut notes = NoteTable::default();
        let mut headings = Vec::new();
        let mut renderer = Renderer::new("apparatus", &empty, &mut notes, &mut headings);
        renderer.render_nodes(entry.content.iter(), false)
    });

    IndexedEntry {
        placement,
        rendered,
        number,
    }
}
