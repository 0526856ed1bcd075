//! Error types for TEI compilation.

use thiserror::Error;

use crate::model::NodeKind;

/// Errors that can occur while compiling a document to TEI.
///
/// Most input anomalies degrade locally (placeholders, defaults, pass-through
/// nodes); only conditions that would silently corrupt the compiled document
/// are surfaced here.
#[derive(Error, Debug)]
pub enum Error {
    #[error("malformed content tree: {0:?} node carries both text and child content")]
    ConflictingContent(NodeKind),

    #[error("apparatus entry id {0:?} is registered more than once")]
    DuplicateEntryId(String),
}

pub type Result<T> = std::result::Result<T, Error>;
