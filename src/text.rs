use dashmap::DashMap;

/// One open editor buffer: the full text from the most recent sync plus a
/// line index for slicing by LSP position.
#[derive(Debug, Clone)]
pub struct Document {
    text: String,
    line_starts: Vec<usize>,
}

impl Document {
    pub fn new(text: String) -> Self {
        let line_starts = line_starts(&text);
        Self { text, line_starts }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// The content of `line` without its trailing newline, or `None` when
    /// the document has no such line.
    pub fn line(&self, line: u32) -> Option<&str> {
        let line = line as usize;
        let start = *self.line_starts.get(line)?;
        let end = self
            .line_starts
            .get(line + 1)
            .copied()
            .unwrap_or(self.text.len());
        let mut slice = &self.text[start..end];
        if let Some(stripped) = slice.strip_suffix('\n') {
            slice = stripped;
        }
        Some(slice)
    }
}

fn line_starts(text: &str) -> Vec<usize> {
    let mut starts = vec![0];
    for (idx, ch) in text.char_indices() {
        if ch == '\n' {
            starts.push(idx + 1);
        }
    }
    starts
}

/// Session-wide map from document URI to its current content. Every handler
/// goes through these methods; the map itself is never handed out, so all
/// concurrent access shares one synchronization discipline.
///
/// There is no close/removal path: documents persist for the life of the
/// process.
#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: DashMap<String, Document>,
}

impl DocumentStore {
    /// Inserts a freshly opened document, overwriting any previous entry
    /// under the same URI.
    pub fn open(&self, uri: String, text: String) {
        self.documents.insert(uri, Document::new(text));
    }

    /// Wholesale text replacement. Incremental range metadata on the change
    /// event is not honored; callers pass the first change's full text.
    pub fn replace(&self, uri: String, text: String) {
        self.documents.insert(uri, Document::new(text));
    }

    pub fn get(&self, uri: &str) -> Option<Document> {
        self.documents.get(uri).map(|entry| entry.value().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::{Document, DocumentStore};
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn replace_overwrites_open() {
        let store = DocumentStore::default();
        store.open("file:///d1".to_string(), "a".to_string());
        store.replace("file:///d1".to_string(), "b".to_string());
        assert_eq!(store.get("file:///d1").unwrap().text(), "b");
    }

    #[test]
    fn open_overwrites_existing_entry() {
        let store = DocumentStore::default();
        store.open("file:///d1".to_string(), "first".to_string());
        store.open("file:///d1".to_string(), "second".to_string());
        assert_eq!(store.get("file:///d1").unwrap().text(), "second");
    }

    #[test]
    fn get_missing_document() {
        let store = DocumentStore::default();
        assert!(store.get("file:///absent").is_none());
    }

    #[test]
    fn line_slicing() {
        let doc = Document::new("first\nsecond\n".to_string());
        assert_eq!(doc.line(0), Some("first"));
        assert_eq!(doc.line(1), Some("second"));
        // A trailing newline leaves an empty final line.
        assert_eq!(doc.line(2), Some(""));
        assert_eq!(doc.line(3), None);
    }

    #[test]
    fn line_without_trailing_newline() {
        let doc = Document::new("only".to_string());
        assert_eq!(doc.line(0), Some("only"));
        assert_eq!(doc.line(1), None);
    }

    #[test]
    fn empty_document_has_one_empty_line() {
        let doc = Document::new(String::new());
        assert_eq!(doc.line(0), Some(""));
        assert_eq!(doc.line(1), None);
    }

    #[test]
    fn concurrent_access_keeps_entries_consistent() {
        let store = Arc::new(DocumentStore::default());
        let mut handles = Vec::new();

        for worker in 0..8u32 {
            let store = Arc::clone(&store);
            handles.push(thread::spawn(move || {
                let uri = format!("file:///doc{}", worker % 4);
                for round in 0..200u32 {
                    store.open(uri.clone(), format!("open {worker} {round}"));
                    store.replace(uri.clone(), format!("replace {worker} {round}"));
                    let doc = store.get(&uri).expect("document vanished");
                    let text = doc.text();
                    assert!(
                        text.starts_with("open ") || text.starts_with("replace "),
                        "corrupt entry: {text}"
                    );
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        for doc_index in 0..4 {
            assert!(store.get(&format!("file:///doc{doc_index}")).is_some());
        }
    }
}
