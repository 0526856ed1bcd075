//! Apparatus criticus generation.
//!
//! Entries of critical apparatuses render as grouped lemma/reading/note
//! markup. Each entry's structured children are folded through two parallel
//! buffers: the reading buffer accumulates the variant currently being
//! described, the note buffer accumulates everything the entry's note will
//! carry.

use std::fmt::Write;

use crate::model::{ContentNode, DocumentApparatus, NodeKind};

use super::convert::Renderer;
use super::escape::escape_tei;

/// Render every critical apparatus in the collection.
///
/// Non-critical apparatuses feed the placed-note machinery instead and are
/// skipped here.
pub fn render_apparatus_criticus(
    apparatuses: &[DocumentApparatus],
    renderer: &mut Renderer,
) -> String {
    let mut out = String::new();
    for apparatus in apparatuses {
        if apparatus.category.as_deref() != Some("critical") {
            continue;
        }
        out.push_str(&render_apparatus(apparatus, renderer));
    }
    out
}

/// Render one apparatus as a `<listApp>`.
///
/// An apparatus whose entries all come up empty collapses to the empty
/// fragment, with no wrapper.
fn render_apparatus(apparatus: &DocumentApparatus, renderer: &mut Renderer) -> String {
    let mut entries = String::new();
    for entry in &apparatus.entries {
        let markup = render_entry_content(&entry.content, renderer);
        if markup.is_empty() {
            continue;
        }
        write!(
            entries,
            "<app xml:id=\"{}\">{}</app>",
            escape_tei(&entry.id),
            markup
        )
        .unwrap();
    }
    if entries.is_empty() {
        String::new()
    } else {
        format!("<listApp>{entries}</listApp>")
    }
}

/// Fold an entry's structured children into lemma/reading/note markup.
fn render_entry_content(children: &[ContentNode], renderer: &mut Renderer) -> String {
    // Lemma elements and the final reading form the leading sequence; the
    // note element carries everything accumulated alongside.
    let mut sequence = String::new();
    let mut note = String::new();
    let mut reading = String::new();

    for child in children {
        match child.kind {
            NodeKind::Lemma => {
                let payload = child
                    .attrs
                    .lemma
                    .as_deref()
                    .or(child.text.as_deref())
                    .unwrap_or("");
                write!(sequence, "<lem>{}</lem>", escape_tei(payload)).unwrap();
            }
            NodeKind::Siglum => {
                let sigla = collect_sigla(child);
                note.push_str(&sigla);
                reading.push_str(&sigla);
            }
            NodeKind::ReadingType => {
                let payload = child
                    .attrs
                    .reading
                    .as_deref()
                    .or(child.text.as_deref())
                    .unwrap_or("");
                let rendered = escape_tei(payload);
                note.push_str(&rendered);
                reading.push_str(&rendered);
            }
            NodeKind::ReadingSeparator => {
                if !reading.is_empty() {
                    write!(note, "<rdg>{reading}</rdg>").unwrap();
                    reading.clear();
                }
            }
            // Anything else (text runs, resolved citations, unrecognized
            // kinds) contributes its inline rendering to both buffers.
            _ => {
                let rendered = renderer.render_node(child, false);
                note.push_str(&rendered);
                reading.push_str(&rendered);
            }
        }
    }

    if !reading.is_empty() {
        write!(sequence, "<rdg>{reading}</rdg>").unwrap();
    }
    if !note.is_empty() {
        write!(sequence, "<note>{note}</note>").unwrap();
    }
    sequence
}

/// Collect the siglum texts of a node and its descendants, space-separated.
fn collect_sigla(node: &ContentNode) -> String {
    let mut sigla = Vec::new();
    collect_sigla_into(node, &mut sigla);
    sigla.join(" ")
}

fn collect_sigla_into(node: &ContentNode, sigla: &mut Vec<String>) {
    if node.kind == NodeKind::Siglum {
        let payload = node.attrs.siglum.as_deref().or(node.text.as_deref());
        if let Some(text) = payload
            && !text.is_empty()
        {
            sigla.push(escape_tei(text));
        }
    }
    if let Some(children) = node.children.as_deref() {
        for child in children {
            collect_sigla_into(child, sigla);
        }
    }
}
