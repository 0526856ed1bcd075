//! TEI header, bibliography, and witness-list builders.
//!
//! Pure functions from the document's auxiliary collections to markup
//! fragments. Blank scalar fields render a fixed placeholder; nothing here
//! cross-references or mutates.

use std::fmt::Write;

use crate::model::{Bibliography, BibReference, DocumentSiglum, Metadata};

use super::escape::escape_tei;

/// Substituted for any missing or empty scalar field.
pub const PLACEHOLDER: &str = "N.A.";

fn field(value: &str) -> &str {
    if value.trim().is_empty() { PLACEHOLDER } else { value }
}

/// Render a bibliography reference.
///
/// Also used by citation annotations, which replace their text run with
/// this fragment.
pub(crate) fn render_bibl(reference: &BibReference) -> String {
    let authors: Vec<&str> = reference
        .authors
        .iter()
        .map(String::as_str)
        .filter(|author| !author.trim().is_empty())
        .collect();
    let authors = if authors.is_empty() {
        PLACEHOLDER.to_string()
    } else {
        authors.join(", ")
    };
    format!(
        "<bibl><author>{}</author>, <title>{}</title>, <date>{}</date></bibl>",
        escape_tei(&authors),
        escape_tei(field(&reference.title)),
        escape_tei(field(&reference.date))
    )
}

/// Render the `teiHeader` for the document.
pub fn render_tei_header(metadata: &Metadata, bibliographies: &[Bibliography]) -> String {
    let mut header = String::from("<teiHeader><fileDesc>");

    write!(
        header,
        "<titleStmt><title>{}</title><author>{}</author></titleStmt>",
        escape_tei(field(&metadata.title)),
        escape_tei(field(&metadata.author))
    )
    .unwrap();
    write!(
        header,
        "<editionStmt><edition>{}</edition></editionStmt>",
        escape_tei(field(&metadata.edition))
    )
    .unwrap();
    write!(
        header,
        "<publicationStmt><publisher>{}</publisher>\
         <availability><licence>{}</licence></availability></publicationStmt>",
        escape_tei(field(&metadata.publisher)),
        escape_tei(field(&metadata.licence))
    )
    .unwrap();

    let mut bibls = String::new();
    for bibliography in bibliographies {
        for reference in &bibliography.references {
            bibls.push_str(&render_bibl(reference));
        }
    }
    if bibls.is_empty() {
        write!(header, "<sourceDesc><p>{PLACEHOLDER}</p></sourceDesc>").unwrap();
    } else {
        write!(header, "<sourceDesc><listBibl>{bibls}</listBibl></sourceDesc>").unwrap();
    }

    header.push_str("</fileDesc></teiHeader>");
    header
}

/// Render the witness list, or the empty fragment when there are no sigla.
pub fn render_witness_list(sigla: &[DocumentSiglum]) -> String {
    if sigla.is_empty() {
        return String::new();
    }
    let mut out = String::from("<listWit>");
    for siglum in sigla {
        write!(
            out,
            "<witness xml:id=\"{}\"><abbr type=\"siglum\">{}</abbr> <desc>{}</desc></witness>",
            escape_tei(field(&siglum.id)),
            escape_tei(field(&siglum.siglum)),
            escape_tei(field(&siglum.description))
        )
        .unwrap();
    }
    out.push_str("</listWit>");
    out
}
