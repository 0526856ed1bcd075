//! End-to-end compilation tests.
//!
//! These exercise the whole pipeline: section partitioning, apparatus
//! indexing, note aggregation, conversion, table-of-contents construction,
//! and final document assembly.

use lectio::{
    compile_tei, Annotation, ApparatusEntry, Bibliography, BibReference, ContentNode,
    DocumentApparatus, DocumentData, DocumentSiglum, Error, Metadata, NodeKind, Section,
};

fn noted(text: &str, id: &str) -> ContentNode {
    ContentNode::text(text).with_annotation(Annotation::NoteRef { id: id.into() })
}

fn footnote_apparatus(entries: Vec<(&str, &str)>) -> DocumentApparatus {
    DocumentApparatus {
        category: Some("footnotes".into()),
        entries: entries
            .into_iter()
            .map(|(id, text)| ApparatusEntry {
                id: id.into(),
                category: Some("footnote".into()),
                content: vec![ContentNode::text(text)],
            })
            .collect(),
    }
}

fn critical_apparatus(entries: Vec<ApparatusEntry>) -> DocumentApparatus {
    DocumentApparatus {
        category: Some("critical".into()),
        entries,
    }
}

/// Assert the document parses cleanly as XML.
fn assert_well_formed(xml: &str) {
    let mut reader = quick_xml::Reader::from_str(xml);
    loop {
        match reader.read_event() {
            Ok(quick_xml::events::Event::Eof) => break,
            Ok(_) => {}
            Err(e) => panic!("compiled document is not well-formed: {e}\n{xml}"),
        }
    }
}

// ============================================================================
// Basic document shape
// ============================================================================

#[test]
fn minimal_document() {
    let mut document = DocumentData::default();
    document.main_text = vec![
        ContentNode::heading(1, vec![ContentNode::text("Intro")]),
        ContentNode::paragraph(vec![ContentNode::text("Hello")]),
    ];

    let xml = compile_tei("Contents", &document).unwrap();
    assert_well_formed(&xml);

    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(xml.contains("<TEI xmlns=\"http://www.tei-c.org/ns/1.0\">"));

    // Heading then paragraph, inside the edition division.
    let head = xml.find("<head xml:id=\"edition-h1\">Intro</head>").unwrap();
    let para = xml.find("<p>Hello</p>").unwrap();
    assert!(head < para);
    assert!(xml.contains("<div type=\"edition\" xml:id=\"edition\">"));

    // No TOC by default, no back matter at all.
    assert!(xml.contains("<front />"));
    assert!(!xml.contains("<back>"));
}

#[test]
fn empty_document_gets_a_placeholder_paragraph() {
    let document = DocumentData::default();
    let xml = compile_tei("Contents", &document).unwrap();
    assert_well_formed(&xml);
    assert!(xml.contains("<body><p/></body>"));
    assert!(xml.contains("<front />"));
    assert!(!xml.contains("<back>"));
}

#[test]
fn header_carries_metadata_and_bibliography() {
    let mut document = DocumentData::default();
    document.metadata = Metadata::new("Carmina")
        .with_author("Catullus")
        .with_publisher("Teubner");
    document.bibliographies = vec![Bibliography {
        references: vec![BibReference::new("Catulli Veronensis liber")
            .with_author("Mynors")
            .with_date("1958")],
    }];

    let xml = compile_tei("Contents", &document).unwrap();
    assert_well_formed(&xml);
    assert!(xml.contains("<title>Carmina</title>"));
    assert!(xml.contains("<author>Catullus</author>"));
    assert!(xml.contains("<listBibl><bibl><author>Mynors</author>"));
    // Blank fields degrade to the placeholder.
    assert!(xml.contains("<edition>N.A.</edition>"));
}

// ============================================================================
// Sections
// ============================================================================

#[test]
fn sections_partition_and_carry_type_attributes() {
    let mut document = DocumentData::default();
    document.main_text = vec![
        ContentNode::section_break(Section::Introduction),
        ContentNode::paragraph(vec![ContentNode::text("praefatio")]),
        ContentNode::section_break(Section::Edition),
        ContentNode::paragraph(vec![ContentNode::text("textus")]),
        ContentNode::section_break(Section::Bibliography),
        ContentNode::paragraph(vec![ContentNode::text("libri")]),
    ];

    let xml = compile_tei("Contents", &document).unwrap();
    assert_well_formed(&xml);
    let intro = xml
        .find("<div type=\"introduction\" xml:id=\"introduction\"><p>praefatio</p></div>")
        .unwrap();
    let edition = xml
        .find("<div type=\"edition\" xml:id=\"edition\"><p>textus</p></div>")
        .unwrap();
    let bibliography = xml
        .find("<div type=\"bibliography\" xml:id=\"bibliography\"><p>libri</p></div>")
        .unwrap();
    assert!(intro < edition && edition < bibliography);
}

#[test]
fn hidden_sections_are_suppressed() {
    let mut document = DocumentData::default();
    document.template.layout.introduction.visible = false;
    document.main_text = vec![
        ContentNode::section_break(Section::Introduction),
        ContentNode::paragraph(vec![ContentNode::text("praefatio")]),
        ContentNode::section_break(Section::Edition),
        ContentNode::paragraph(vec![ContentNode::text("textus")]),
    ];

    let xml = compile_tei("Contents", &document).unwrap();
    assert!(!xml.contains("praefatio"));
    assert!(xml.contains("textus"));
}

#[test]
fn empty_sections_contribute_no_wrapper() {
    let mut document = DocumentData::default();
    document.main_text = vec![
        ContentNode::section_break(Section::Introduction),
        ContentNode::paragraph(vec![ContentNode::text("   ")]),
        ContentNode::section_break(Section::Edition),
        ContentNode::paragraph(vec![ContentNode::text("textus")]),
    ];

    let xml = compile_tei("Contents", &document).unwrap();
    assert!(!xml.contains("type=\"introduction\""));
}

// ============================================================================
// Table of contents
// ============================================================================

#[test]
fn toc_renders_nested_navigation() {
    let mut document = DocumentData::default();
    document.template.layout.contents.visible = true;
    document.main_text = vec![
        ContentNode::heading(1, vec![ContentNode::text("Liber I")]),
        ContentNode::heading(2, vec![ContentNode::text("Carmen 1")]),
        ContentNode::heading(2, vec![ContentNode::text("Carmen 2")]),
        ContentNode::heading(1, vec![ContentNode::text("Liber II")]),
    ];

    let xml = compile_tei("Index", &document).unwrap();
    assert_well_formed(&xml);
    assert!(xml.contains("<front><div type=\"contents\" xml:id=\"contents\">"));
    assert!(xml.contains("<head>Index</head>"));
    assert!(xml.contains(
        "<item><ref target=\"#edition-h1\">Liber I</ref>\
         <list><item><ref target=\"#edition-h2\">Carmen 1</ref></item>\
         <item><ref target=\"#edition-h3\">Carmen 2</ref></item></list></item>"
    ));
    assert!(xml.contains("<item><ref target=\"#edition-h4\">Liber II</ref></item>"));
}

#[test]
fn toc_suppressed_without_headings_even_when_visible() {
    let mut document = DocumentData::default();
    document.template.layout.contents.visible = true;
    document.main_text = vec![ContentNode::paragraph(vec![ContentNode::text("prose")])];

    let xml = compile_tei("Index", &document).unwrap();
    assert!(xml.contains("<front />"));
    assert!(!xml.contains("Index"));
}

// ============================================================================
// Notes and cross-references
// ============================================================================

#[test]
fn note_bodies_merge_and_consume_once() {
    let mut document = DocumentData::default();
    document.apparatuses = vec![footnote_apparatus(vec![("n1", "entry content")])];
    document.main_text = vec![
        ContentNode::paragraph(vec![noted("prima ", "n1")]),
        ContentNode::paragraph(vec![noted("secunda", "n1")]),
        ContentNode::paragraph(vec![noted("tertia", "n1")]),
    ];

    let xml = compile_tei("Contents", &document).unwrap();
    assert_well_formed(&xml);

    // The first reference carries the merged body of all three runs.
    assert!(xml.contains(
        "<p>prima <note n=\"1\" place=\"bottom\">prima secundatertia</note></p>"
    ));
    // Later references render bare runs: no second note, no ref.
    assert!(xml.contains("<p>secunda</p>"));
    assert!(xml.contains("<p>tertia</p>"));
    assert_eq!(xml.matches("<note ").count(), 1);
}

#[test]
fn critical_references_duplicate_the_run_into_a_link() {
    let mut document = DocumentData::default();
    document.apparatuses = vec![critical_apparatus(vec![ApparatusEntry {
        id: "app-1".into(),
        category: Some("critical".into()),
        content: vec![],
    }])];
    document.main_text = vec![ContentNode::paragraph(vec![noted("lectio", "app-1")])];

    let xml = compile_tei("Contents", &document).unwrap();
    assert!(xml.contains("<p>lectio<ref target=\"#app-1\">lectio</ref></p>"));
}

#[test]
fn unknown_note_id_renders_a_bare_cross_reference() {
    let mut document = DocumentData::default();
    document.main_text = vec![ContentNode::paragraph(vec![noted("vox", "nowhere")])];

    let xml = compile_tei("Contents", &document).unwrap();
    assert_well_formed(&xml);
    assert!(xml.contains("<p>vox<ref target=\"#nowhere\">vox</ref></p>"));
}

#[test]
fn citations_replace_their_run() {
    let mut document = DocumentData::default();
    document.main_text = vec![ContentNode::paragraph(vec![ContentNode::text("cf. ")
        .with_annotation(Annotation::Citation {
            reference: BibReference::new("Aeneis").with_author("Vergilius"),
        })])];

    let xml = compile_tei("Contents", &document).unwrap();
    assert_well_formed(&xml);
    assert!(xml.contains("<p><bibl><author>Vergilius</author>, <title>Aeneis</title>"));
    assert!(!xml.contains("cf. "));
}

// ============================================================================
// Back matter
// ============================================================================

#[test]
fn witnesses_and_apparatus_fill_the_back() {
    let mut document = DocumentData::default();
    document.sigla = vec![DocumentSiglum::new("wit-a", "A", "Codex Ambrosianus")];
    document.apparatuses = vec![critical_apparatus(vec![ApparatusEntry {
        id: "app-1".into(),
        category: Some("critical".into()),
        content: {
            let mut lemma = ContentNode::new(NodeKind::Lemma);
            lemma.attrs.lemma = Some("arma".into());
            let mut siglum = ContentNode::new(NodeKind::Siglum);
            siglum.attrs.siglum = Some("A".into());
            vec![lemma, siglum]
        },
    }])];
    document.main_text = vec![ContentNode::paragraph(vec![ContentNode::text("arma")])];

    let xml = compile_tei("Contents", &document).unwrap();
    assert_well_formed(&xml);
    assert!(xml.contains(
        "<back><div type=\"witnesses\" xml:id=\"witnesses\"><listWit>\
         <witness xml:id=\"wit-a\">"
    ));
    assert!(xml.contains(
        "<div type=\"apparatus\" xml:id=\"apparatus\"><listApp>\
         <app xml:id=\"app-1\"><lem>arma</lem><rdg>A</rdg><note>A</note></app></listApp></div>"
    ));
}

#[test]
fn empty_critical_entries_collapse_the_apparatus() {
    let mut document = DocumentData::default();
    document.apparatuses = vec![critical_apparatus(vec![ApparatusEntry {
        id: "app-1".into(),
        category: Some("critical".into()),
        content: vec![],
    }])];

    let xml = compile_tei("Contents", &document).unwrap();
    assert!(!xml.contains("<back>"));
    assert!(!xml.contains("<listApp>"));
}

// ============================================================================
// Escaping
// ============================================================================

#[test]
fn reserved_characters_escape_but_verbatim_regions_pass_through() {
    let mut document = DocumentData::default();
    document.main_text = vec![
        ContentNode::paragraph(vec![ContentNode::text("a < b & c")]),
        ContentNode::paragraph(vec![ContentNode::text("<![CDATA[<raw & unescaped>]]>")]),
    ];

    let xml = compile_tei("Contents", &document).unwrap();
    assert!(xml.contains("<p>a &lt; b &amp; c</p>"));
    assert!(xml.contains("<p><![CDATA[<raw & unescaped>]]></p>"));
    assert_well_formed(&xml);
}

// ============================================================================
// Hard errors
// ============================================================================

#[test]
fn conflicting_node_content_is_an_error() {
    let mut document = DocumentData::default();
    let mut node = ContentNode::paragraph(vec![ContentNode::text("child")]);
    node.text = Some("also text".into());
    document.main_text = vec![node];

    assert!(matches!(
        compile_tei("Contents", &document),
        Err(Error::ConflictingContent(_))
    ));
}

#[test]
fn duplicate_apparatus_ids_are_an_error() {
    let mut document = DocumentData::default();
    document.apparatuses = vec![
        footnote_apparatus(vec![("dup", "x")]),
        footnote_apparatus(vec![("dup", "y")]),
    ];

    assert!(matches!(
        compile_tei("Contents", &document),
        Err(Error::DuplicateEntryId(id)) if id == "dup"
    ));
}
