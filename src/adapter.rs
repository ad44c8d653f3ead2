//! # Structural Adapter Module
//!
//! ## Purpose
//! Bridges the gap between the raw source documents and the uniform
//! logical view the rest of the crate consumes. A raw document wraps its
//! real content one level down, under a key whose NAME varies per
//! collection but whose POSITION does not: the first top-level key is a
//! metadata marker, the second holds the content. This module selects that
//! key positionally and then classifies the content into one of the two
//! legal nesting shapes.
//!
//! Positional key access is a known fragility of the source data (a fixed
//! content-root key would be the real fix, but needs a data migration).
//! It is the reason `serde_json` is built with `preserve_order`: every
//! `Map` must keep its keys in document order.

use serde_json::{Map, Value};

/// The two legal nesting structures a content root may take, plus the
/// catch-all for anything that matches neither. Absence of the expected
/// keys means "zero items", never an error.
#[derive(Debug, Clone, Copy)]
pub enum Shape<'a> {
    /// `books_or_chapters.books`: section level present, each section
    /// carrying its own `chapters_and_hadiths` list.
    Sections(&'a [Value]),
    /// `books_or_chapters.chapters_and_hadiths`: chapters hang directly
    /// off the collection, no section level.
    Chapters(&'a [Value]),
    /// Neither list present.
    Empty,
}

/// Locate the content root inside a raw collection document.
///
/// Returns `None` when the document is not an object, has fewer than two
/// top-level keys, or the second key's value is not an object — callers
/// surface that as "Invalid book structure" or an empty result, never as
/// a panic.
pub fn content_root(document: &Value) -> Option<&Map<String, Value>> {
    let top = document.as_object()?;
    let (_, value) = top.iter().nth(1)?;
    value.as_object()
}

/// Classify a content root into its nesting shape.
pub fn classify(root: &Map<String, Value>) -> Shape<'_> {
    let Some(wrapper) = root.get("books_or_chapters").and_then(Value::as_object) else {
        return Shape::Empty;
    };
    if let Some(books) = wrapper.get("books").and_then(Value::as_array) {
        Shape::Sections(books)
    } else if let Some(chapters) = wrapper.get("chapters_and_hadiths").and_then(Value::as_array) {
        Shape::Chapters(chapters)
    } else {
        Shape::Empty
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_content_root_is_second_key_regardless_of_name() {
        for name_key in ["Sahih Muslim", "Riyad as-Salihin", "anything at all"] {
            let document = json!({
                "metadata": {"scraped": true},
                name_key: {"english_name": "X", "books_or_chapters": {}}
            });
            let root = content_root(&document).unwrap();
            assert_eq!(root.get("english_name"), Some(&json!("X")));
        }
    }

    #[test]
    fn test_content_root_rejects_malformed_documents() {
        assert!(content_root(&json!("not an object")).is_none());
        assert!(content_root(&json!({"only_one_key": {}})).is_none());
        assert!(content_root(&json!({"meta": {}, "name": "not an object"})).is_none());
    }

    #[test]
    fn test_classify_sections() {
        let document = json!({
            "meta": {},
            "Book": {"books_or_chapters": {"books": [{"book_number": "1"}]}}
        });
        let root = content_root(&document).unwrap();
        assert!(matches!(classify(root), Shape::Sections(books) if books.len() == 1));
    }

    #[test]
    fn test_classify_chapters() {
        let document = json!({
            "meta": {},
            "Book": {"books_or_chapters": {"chapters_and_hadiths": [{}, {}]}}
        });
        let root = content_root(&document).unwrap();
        assert!(matches!(classify(root), Shape::Chapters(chapters) if chapters.len() == 2));
    }

    #[test]
    fn test_classify_anything_else_is_empty() {
        let no_wrapper = json!({"meta": {}, "Book": {"english_name": "X"}});
        let root = content_root(&no_wrapper).unwrap();
        assert!(matches!(classify(root), Shape::Empty));

        let empty_wrapper = json!({"meta": {}, "Book": {"books_or_chapters": {}}});
        let root = content_root(&empty_wrapper).unwrap();
        assert!(matches!(classify(root), Shape::Empty));
    }
}
