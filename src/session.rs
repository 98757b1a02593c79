//! The page currently open for editing.

use crate::document::EditableDocument;
use crate::field::{EditError, FieldMap, Markers};
use crate::registry::Selection;
use std::sync::Arc;

/// Everything known about one loaded page.
///
/// A session is built in one piece by the loader and replaced in one piece
/// by the next load; fields and document never come from different fetches.
#[derive(Debug, Clone)]
pub struct Session {
    pub selection: Selection,
    /// Site path the page was fetched from.
    pub path: String,
    /// Page source exactly as fetched.
    pub html: Arc<str>,
    pub document: EditableDocument,
    pub fields: FieldMap,
    /// Load number given by the admin server; edits made against another
    /// load are refused. Always 0 outside the server.
    pub generation: u64,
}

impl Session {
    /// Parse fetched HTML and extract its fields.
    pub fn from_html(
        selection: Selection,
        path: impl Into<String>,
        html: &str,
        markers: &Markers,
    ) -> Self {
        let document = EditableDocument::parse(html, &markers.names());
        let fields = FieldMap::extract(&document, markers);
        Self {
            selection,
            path: path.into(),
            html: Arc::from(html),
            document,
            fields,
            generation: 0,
        }
    }

    /// Apply one field edit to this session.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), EditError> {
        self.fields.apply(&mut self.document, key, value)
    }

    /// A copy of this session with one more edit applied.
    pub fn with_edit(&self, key: &str, value: &str) -> Result<Self, EditError> {
        let mut next = self.clone();
        next.apply(key, value)?;
        Ok(next)
    }

    /// Serialized document, as exported and published.
    pub fn to_html(&self) -> String {
        self.document.to_html()
    }
}
