//! Document-level collections and layout configuration.

use super::node::ContentNode;

/// A complete critical-edition document as supplied by the editing layer.
///
/// Everything here is read-only input to the compiler; nothing persists
/// across compile calls.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "cli", derive(serde::Deserialize))]
#[cfg_attr(feature = "cli", serde(rename_all = "camelCase", default))]
pub struct DocumentData {
    pub metadata: Metadata,
    pub bibliographies: Vec<Bibliography>,
    pub apparatuses: Vec<DocumentApparatus>,
    pub main_text: Vec<ContentNode>,
    pub sigla: Vec<DocumentSiglum>,
    pub template: Template,
}

/// Edition metadata rendered into the TEI header.
///
/// Blank fields render as a fixed placeholder rather than failing.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "cli", derive(serde::Deserialize))]
#[cfg_attr(feature = "cli", serde(default))]
pub struct Metadata {
    pub title: String,
    pub author: String,
    pub edition: String,
    pub publisher: String,
    pub licence: String,
}

impl Metadata {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn with_publisher(mut self, publisher: impl Into<String>) -> Self {
        self.publisher = publisher.into();
        self
    }
}

/// A named group of bibliography references.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "cli", derive(serde::Deserialize))]
#[cfg_attr(feature = "cli", serde(default))]
pub struct Bibliography {
    pub references: Vec<BibReference>,
}

/// A single bibliography reference (also carried by citation annotations).
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "cli", derive(serde::Deserialize))]
#[cfg_attr(feature = "cli", serde(default))]
pub struct BibReference {
    pub authors: Vec<String>,
    pub title: String,
    pub date: String,
}

impl BibReference {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.authors.push(author.into());
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = date.into();
        self
    }
}

/// An apparatus: an ordered list of entries keyed to the base text.
///
/// The apparatus-level category decides whether its entries feed the
/// apparatus criticus (`"critical"`) or the placed-note machinery.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "cli", derive(serde::Deserialize))]
#[cfg_attr(feature = "cli", serde(default))]
pub struct DocumentApparatus {
    pub category: Option<String>,
    pub entries: Vec<ApparatusEntry>,
}

/// One apparatus entry: an id referenced from note annotations in the main
/// text, an optional per-entry category, and structured content.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "cli", derive(serde::Deserialize))]
#[cfg_attr(feature = "cli", serde(default))]
pub struct ApparatusEntry {
    pub id: String,
    pub category: Option<String>,
    pub content: Vec<ContentNode>,
}

/// A witness siglum and its description.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "cli", derive(serde::Deserialize))]
#[cfg_attr(feature = "cli", serde(default))]
pub struct DocumentSiglum {
    pub id: String,
    pub siglum: String,
    pub description: String,
}

impl DocumentSiglum {
    pub fn new(
        id: impl Into<String>,
        siglum: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            siglum: siglum.into(),
            description: description.into(),
        }
    }
}

/// Template configuration supplied with the document.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "cli", derive(serde::Deserialize))]
#[cfg_attr(feature = "cli", serde(default))]
pub struct Template {
    pub layout: Layout,
}

/// Per-section layout switches.
///
/// Body sections are visible unless switched off; the generated table of
/// contents is opt-in.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "cli", derive(serde::Deserialize))]
#[cfg_attr(feature = "cli", serde(default))]
pub struct Layout {
    pub introduction: SectionLayout,
    pub edition: SectionLayout,
    pub bibliography: SectionLayout,
    pub contents: SectionLayout,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            introduction: SectionLayout::default(),
            edition: SectionLayout::default(),
            bibliography: SectionLayout::default(),
            contents: SectionLayout { visible: false },
        }
    }
}

impl Layout {
    pub fn section(&self, section: Section) -> &SectionLayout {
        match section {
            Section::Introduction => &self.introduction,
            Section::Edition => &self.edition,
            Section::Bibliography => &self.bibliography,
            Section::Contents => &self.contents,
        }
    }
}

/// Visibility switch for one section.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "cli", derive(serde::Deserialize))]
#[cfg_attr(feature = "cli", serde(default))]
pub struct SectionLayout {
    pub visible: bool,
}

impl Default for SectionLayout {
    fn default() -> Self {
        Self { visible: true }
    }
}

/// Identity of a document section.
///
/// The value doubles as the `type` attribute and the `xml:id` of the
/// section's division in the compiled document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cli", derive(serde::Deserialize))]
#[cfg_attr(feature = "cli", serde(rename_all = "lowercase"))]
pub enum Section {
    Introduction,
    Edition,
    Bibliography,
    Contents,
}

impl Section {
    /// The three sections that render into the document body, in order.
    pub const BODY: [Section; 3] = [
        Section::Introduction,
        Section::Edition,
        Section::Bibliography,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Section::Introduction => "introduction",
            Section::Edition => "edition",
            Section::Bibliography => "bibliography",
            Section::Contents => "contents",
        }
    }
}
