//! # Search Engine Module
//!
//! ## Purpose
//! Linear keyword scan across every loaded collection. Matching is plain
//! case-insensitive substring containment against each hadith's English or
//! Arabic text; results come back in corpus order, unranked.
//!
//! Only sectioned (Shape A) collections are scanned: the source system
//! never searched flat collections, and that behavior is kept (see
//! DESIGN.md for the open question).

use crate::adapter::{classify, content_root, Shape};
use crate::errors::{ApiError, Result};
use crate::flatten::{NO_ARABIC_TEXT, NO_ENGLISH_TEXT, NO_REFERENCE};
use crate::loader::CollectionRegistry;
use serde::Serialize;
use serde_json::Value;

/// One search match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub book_name: String,
    pub reference: String,
    pub text: String,
    pub arabic_text: String,
}

fn string_of<'a>(hadith: &'a Value, key: &str) -> &'a str {
    hadith.get(key).and_then(Value::as_str).unwrap_or("")
}

/// Scan all collections for hadiths whose English or Arabic text contains
/// `keyword`, case-insensitively. An empty or whitespace-only keyword is
/// rejected rather than matching everything.
pub fn search(registry: &CollectionRegistry, keyword: &str) -> Result<Vec<SearchHit>> {
    if keyword.trim().is_empty() {
        return Err(ApiError::EmptyKeyword);
    }
    let keyword = keyword.to_lowercase();

    let mut results = Vec::new();
    for (book_name, document) in registry.iter() {
        let Some(root) = content_root(document) else {
            continue;
        };
        let Shape::Sections(sections) = classify(root) else {
            continue;
        };
        for section in sections {
            let chapters = section
                .get("chapters_and_hadiths")
                .and_then(Value::as_array)
                .map_or(&[][..], Vec::as_slice);
            for chapter in chapters {
                let hadiths = chapter
                    .get("hadiths")
                    .and_then(Value::as_array)
                    .map_or(&[][..], Vec::as_slice);
                for hadith in hadiths {
                    let english = string_of(hadith, "english_text").to_lowercase();
                    // lowercasing is a no-op on Arabic script
                    let arabic = string_of(hadith, "arabic_text").to_lowercase();

                    if english.contains(&keyword) || arabic.contains(&keyword) {
                        results.push(SearchHit {
                            book_name: book_name.to_string(),
                            reference: hadith
                                .get("reference")
                                .and_then(Value::as_str)
                                .unwrap_or(NO_REFERENCE)
                                .to_string(),
                            text: hadith
                                .get("english_text")
                                .and_then(Value::as_str)
                                .unwrap_or(NO_ENGLISH_TEXT)
                                .to_string(),
                            arabic_text: hadith
                                .get("arabic_text")
                                .and_then(Value::as_str)
                                .unwrap_or(NO_ARABIC_TEXT)
                                .to_string(),
                        });
                    }
                }
            }
        }
    }

    tracing::debug!(keyword = %keyword, hits = results.len(), "search completed");
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map};

    fn registry() -> CollectionRegistry {
        let mut collections = Map::new();
        collections.insert(
            "sahih-muslim".to_string(),
            json!({
                "meta": {},
                "Sahih Muslim": {
                    "books_or_chapters": {
                        "books": [{
                            "book_number": "1",
                            "chapters_and_hadiths": [{
                                "chapter_no": "1",
                                "hadiths": [
                                    {"reference": "1", "english_text": "Actions are by Intentions",
                                     "arabic_text": "إنما الأعمال بالنيات"},
                                    {"reference": "2", "english_text": "On charity"}
                                ]
                            }]
                        }]
                    }
                }
            }),
        );
        collections.insert(
            "forty-hadith".to_string(),
            json!({
                "meta": {},
                "Forty Hadith": {
                    "books_or_chapters": {
                        "chapters_and_hadiths": [{
                            "chapter_no": "1",
                            "hadiths": [
                                {"reference": "1", "english_text": "Intentions matter"}
                            ]
                        }]
                    }
                }
            }),
        );
        CollectionRegistry::new(collections)
    }

    #[test]
    fn test_empty_keyword_rejected() {
        let registry = registry();
        assert!(matches!(
            search(&registry, "").unwrap_err(),
            ApiError::EmptyKeyword
        ));
        assert!(matches!(
            search(&registry, "   ").unwrap_err(),
            ApiError::EmptyKeyword
        ));
    }

    #[test]
    fn test_case_insensitive_english_match() {
        let registry = registry();
        let hits = search(&registry, "INTENTIONS").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].book_name, "sahih-muslim");
        assert_eq!(hits[0].reference, "1");
    }

    #[test]
    fn test_arabic_substring_match() {
        let registry = registry();
        let hits = search(&registry, "الأعمال").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].arabic_text, "إنما الأعمال بالنيات");
    }

    #[test]
    fn test_flat_collections_excluded() {
        // "Intentions matter" lives in the flat collection and never shows up.
        let registry = registry();
        let hits = search(&registry, "matter").unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn test_results_preserve_corpus_order() {
        let registry = registry();
        let hits = search(&registry, "on").unwrap();
        let refs: Vec<_> = hits.iter().map(|h| h.reference.as_str()).collect();
        assert_eq!(refs, vec!["1", "2"]);
    }
}
