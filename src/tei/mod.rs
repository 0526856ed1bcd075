//! Compilation of a document model into a TEI XML string.
//!
//! The pipeline is a fixed sequence of synchronous passes:
//!
//! 1. Validate the content trees (leaf xor container).
//! 2. Build the apparatus index over the full apparatus collection.
//! 3. Partition the main text into sections at section breaks.
//! 4. Aggregate note bodies over the whole main text.
//! 5. Render each visible body section, collecting heading events.
//! 6. Build the table of contents, header, witness list, and apparatus
//!    criticus fragments.
//! 7. Assemble front, body, and back matter into the final document.
//!
//! Every table built here lives for exactly one [`compile_tei`] call and is
//! passed by reference; concurrent compiles never share state.

mod convert;
mod criticus;
mod escape;
mod header;
mod index;
mod notes;
mod toc;

use std::fmt::Write;

use crate::error::{Error, Result};
use crate::model::{ContentNode, DocumentData, NodeKind, Section};

pub use convert::{HeadingEvent, Renderer};
pub use criticus::render_apparatus_criticus;
pub use escape::{VERBATIM_END, VERBATIM_START, escape_tei};
pub use header::{PLACEHOLDER, render_tei_header, render_witness_list};
pub use index::{ApparatusIndex, IndexedEntry, Placement, build_apparatus_index};
pub use notes::{NoteTable, collect_notes};
pub use toc::{TocNode, build_toc, nest_headings, render_toc_list};

/// Compile a document to a TEI XML string.
///
/// `title` is the human-readable heading of the generated table of
/// contents. The call is deterministic and holds no state across
/// invocations.
///
/// # Examples
///
/// ```
/// use lectio::{compile_tei, ContentNode, DocumentData};
///
/// let mut document = DocumentData::default();
/// document.main_text = vec![
///     ContentNode::heading(1, vec![ContentNode::text("Intro")]),
///     ContentNode::paragraph(vec![ContentNode::text("Hello")]),
/// ];
/// let xml = compile_tei("Contents", &document)?;
/// assert!(xml.contains("<p>Hello</p>"));
/// # Ok::<(), lectio::Error>(())
/// ```
pub fn compile_tei(title: &str, document: &DocumentData) -> Result<String> {
    validate_nodes(&document.main_text)?;
    for apparatus in &document.apparatuses {
        for entry in &apparatus.entries {
            validate_nodes(&entry.content)?;
        }
    }

    let apparatus_index = build_apparatus_index(&document.apparatuses)?;
    log::debug!("indexed {} apparatus entries", apparatus_index.len());

    let sections = partition_sections(&document.main_text);
    if !sections.bucket(Section::Contents).is_empty() {
        log::debug!(
            "{} nodes in the contents section are superseded by the generated table of contents",
            sections.bucket(Section::Contents).len()
        );
    }

    let mut note_table = collect_notes(&document.main_text);
    log::debug!("aggregated {} note bodies", note_table.len());

    // Body sections, in fixed order; a section renders only when visible
    // and non-empty.
    let layout = &document.template.layout;
    let mut body = String::new();
    let mut heading_buckets: Vec<Vec<HeadingEvent>> = Vec::new();
    for section in Section::BODY {
        if !layout.section(section).visible {
            continue;
        }
        let mut events = Vec::new();
        let mut renderer =
            Renderer::new(section.as_str(), &apparatus_index, &mut note_table, &mut events);
        let content = renderer.render_nodes(sections.bucket(section).iter().copied(), true);
        if content.trim().is_empty() {
            continue;
        }
        write!(
            body,
            "<div type=\"{name}\" xml:id=\"{name}\">{content}</div>",
            name = section.as_str()
        )
        .unwrap();
        heading_buckets.push(events);
    }

    let toc = if layout.section(Section::Contents).visible {
        build_toc(title, &heading_buckets)
    } else {
        String::new()
    };

    // Back matter: witnesses, then the apparatus criticus.
    let witnesses = render_witness_list(&document.sigla);
    let criticus = {
        let mut scratch = Vec::new();
        let mut renderer = Renderer::new(
            "apparatus",
            &apparatus_index,
            &mut note_table,
            &mut scratch,
        );
        render_apparatus_criticus(&document.apparatuses, &mut renderer)
    };

    let orphans: Vec<&str> = note_table.unconsumed().collect();
    if !orphans.is_empty() {
        log::debug!("note ids aggregated but never referenced: {orphans:?}");
    }

    let header = render_tei_header(&document.metadata, &document.bibliographies);
    Ok(assemble(&header, &toc, &body, &witnesses, &criticus))
}

fn assemble(header: &str, toc: &str, body: &str, witnesses: &str, criticus: &str) -> String {
    let mut xml = String::with_capacity(
        128 + header.len() + toc.len() + body.len() + witnesses.len() + criticus.len(),
    );
    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str("<TEI xmlns=\"http://www.tei-c.org/ns/1.0\">\n");
    xml.push_str(header);
    xml.push_str("\n<text>\n");

    if toc.is_empty() {
        xml.push_str("<front />\n");
    } else {
        writeln!(xml, "<front>{toc}</front>").unwrap();
    }

    if body.is_empty() {
        xml.push_str("<body><p/></body>\n");
    } else {
        writeln!(xml, "<body>{body}</body>").unwrap();
    }

    let mut back = String::new();
    if !witnesses.is_empty() {
        write!(
            back,
            "<div type=\"witnesses\" xml:id=\"witnesses\">{witnesses}</div>"
        )
        .unwrap();
    }
    if !criticus.is_empty() {
        write!(
            back,
            "<div type=\"apparatus\" xml:id=\"apparatus\">{criticus}</div>"
        )
        .unwrap();
    }
    if !back.is_empty() {
        writeln!(xml, "<back>{back}</back>").unwrap();
    }

    xml.push_str("</text>\n</TEI>\n");
    xml
}

/// The main text split into section buckets.
///
/// A single left-to-right scan over the top-level nodes; each section break
/// switches the current bucket and lands in the bucket it opens. Nodes
/// before the first break belong to the edition.
struct SectionMap<'a> {
    introduction: Vec<&'a ContentNode>,
    edition: Vec<&'a ContentNode>,
    bibliography: Vec<&'a ContentNode>,
    contents: Vec<&'a ContentNode>,
}

impl<'a> SectionMap<'a> {
    fn bucket(&self, section: Section) -> &[&'a ContentNode] {
        match section {
            Section::Introduction => &self.introduction,
            Section::Edition => &self.edition,
            Section::Bibliography => &self.bibliography,
            Section::Contents => &self.contents,
        }
    }
}

fn partition_sections(nodes: &[ContentNode]) -> SectionMap<'_> {
    let mut sections = SectionMap {
        introduction: Vec::new(),
        edition: Vec::new(),
        bibliography: Vec::new(),
        contents: Vec::new(),
    };
    let mut current = Section::Edition;
    for node in nodes {
        if node.kind == NodeKind::SectionBreak {
            // A break without a target keeps the current bucket.
            if let Some(section) = node.attrs.section {
                current = section;
            }
        }
        match current {
            Section::Introduction => sections.introduction.push(node),
            Section::Edition => sections.edition.push(node),
            Section::Bibliography => sections.bibliography.push(node),
            Section::Contents => sections.contents.push(node),
        }
    }
    sections
}

/// Reject trees where a node carries both text and child content; either
/// would have to win, so neither does.
fn validate_nodes(nodes: &[ContentNode]) -> Result<()> {
    for node in nodes {
        if let Some(children) = node.children.as_deref() {
            if node.text.is_some() && !children.is_empty() {
                return Err(Error::ConflictingContent(node.kind));
            }
            validate_nodes(children)?;
        }
    }
    Ok(())
}
