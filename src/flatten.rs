//! # Traversal/Flattener Module
//!
//! ## Purpose
//! Walks an adapted content root and produces the uniform record types the
//! API serves: flat hadith lists, section summaries, and chapter-grouped
//! section listings.
//!
//! ## Input/Output Specification
//! - **Input**: A content root from [`crate::adapter`]
//! - **Output**: Ordered record sequences in source-document order
//!
//! Every textual field is a `String` with a documented placeholder when
//! the source omits it — never null, never absent — so every emitted
//! record has the same shape regardless of source completeness.

use crate::adapter::{classify, Shape};
use crate::errors::{ApiError, Result};
use crate::normalize::{normalize, NormalizeMode};
use serde::Serialize;
use serde_json::{Map, Value};

pub const NO_REFERENCE: &str = "No Reference";
pub const NO_NARRATOR: &str = "No Narrator";
pub const NO_ENGLISH_TEXT: &str = "No English Text Available";
pub const NO_ARABIC_TEXT: &str = "No Arabic Text Available";
pub const NO_ARABIC_TEXT_AR: &str = "لا يوجد نص باللغة العربية";
pub const NO_BOOK_NUMBER: &str = "No Book Number";
pub const NO_CHAPTER_NUMBER: &str = "No Chapter Number";
pub const NO_CHAPTER_TITLE: &str = "No Chapter Title";
pub const NO_CHAPTER_TITLE_AR: &str = "No Chapter Title Arabic";
pub const NO_CHAPTER_INTRO: &str = "No Introduction";
/// Section-level fields on records from flat (no-section) collections.
pub const NOT_APPLICABLE: &str = "N/A";

/// One hadith annotated with its enclosing section and chapter metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HadithRecord {
    pub reference: String,
    pub narrator: String,
    pub english_text: String,
    pub arabic_text: String,
    pub book_number: String,
    pub chapter_no: String,
    pub chapter_title_english: String,
    pub chapter_title_arabic: String,
}

/// Section metadata as listed by `/books/{book}/sections`.
///
/// Missing fields default to empty strings here, unlike the hadith-record
/// placeholders; this mirrors the source documents' own conventions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionSummary {
    pub book_number: String,
    pub english_book_name: String,
    pub arabic_book_name: String,
    pub book_range: String,
}

/// Chapter metadata heading a [`ChapterGroup`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChapterInfo {
    pub chapter_no: String,
    pub chapter_title_english: String,
    pub chapter_title_arabic: String,
    pub chapter_intro: String,
}

/// One hadith inside a section listing, with its cross-references.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionHadith {
    pub reference: String,
    pub narrator: String,
    pub english_text: String,
    pub arabic_text: String,
    pub references: Vec<Value>,
}

/// One chapter of a section with its hadiths, as served by
/// `/books/{book}/hadiths/{section}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChapterGroup {
    pub chapter_info: ChapterInfo,
    pub hadiths: Vec<SectionHadith>,
}

/// Read a field as display text, falling back to `default` when missing
/// or null. Non-string scalars (chapter numbers are sometimes integers in
/// the source) are rendered through their JSON form.
fn field_or(map: &Map<String, Value>, key: &str, default: &str) -> String {
    match map.get(key) {
        Some(Value::String(s)) => s.clone(),
        None | Some(Value::Null) => default.to_string(),
        Some(other) => other.to_string(),
    }
}

fn array_of<'a>(map: &'a Map<String, Value>, key: &str) -> &'a [Value] {
    map.get(key).and_then(Value::as_array).map_or(&[], Vec::as_slice)
}

fn as_object(value: &Value) -> Option<&Map<String, Value>> {
    value.as_object()
}

fn hadith_record(
    hadith: &Map<String, Value>,
    section: Option<&Map<String, Value>>,
    chapter: &Map<String, Value>,
) -> HadithRecord {
    HadithRecord {
        reference: field_or(hadith, "reference", NO_REFERENCE),
        narrator: field_or(hadith, "narrator", NO_NARRATOR),
        english_text: field_or(hadith, "english_text", NO_ENGLISH_TEXT),
        arabic_text: field_or(hadith, "arabic_text", NO_ARABIC_TEXT),
        book_number: section.map_or(NOT_APPLICABLE.to_string(), |s| {
            field_or(s, "book_number", NO_BOOK_NUMBER)
        }),
        chapter_no: field_or(chapter, "chapter_no", NO_CHAPTER_NUMBER),
        chapter_title_english: field_or(chapter, "chapter_title_english", NO_CHAPTER_TITLE),
        chapter_title_arabic: field_or(chapter, "chapter_title_arabic", NO_CHAPTER_TITLE_AR),
    }
}

/// Flatten a content root into hadith records in source order.
///
/// Shape A: sections → chapters → hadiths, each record annotated with its
/// section's book number and its chapter's number/titles. Shape B:
/// chapters → hadiths with `"N/A"` section fields. Anything else: empty.
pub fn flatten(root: &Map<String, Value>) -> Vec<HadithRecord> {
    let mut records = Vec::new();
    match classify(root) {
        Shape::Sections(sections) => {
            for section in sections.iter().filter_map(as_object) {
                for chapter in array_of(section, "chapters_and_hadiths")
                    .iter()
                    .filter_map(as_object)
                {
                    for hadith in array_of(chapter, "hadiths").iter().filter_map(as_object) {
                        records.push(hadith_record(hadith, Some(section), chapter));
                    }
                }
            }
        }
        Shape::Chapters(chapters) => {
            for chapter in chapters.iter().filter_map(as_object) {
                for hadith in array_of(chapter, "hadiths").iter().filter_map(as_object) {
                    records.push(hadith_record(hadith, None, chapter));
                }
            }
        }
        Shape::Empty => {}
    }
    records
}

/// List section summaries in source order. Flat (Shape B) and shapeless
/// collections simply have no sections.
pub fn list_sections(root: &Map<String, Value>) -> Vec<SectionSummary> {
    let Shape::Sections(sections) = classify(root) else {
        return Vec::new();
    };
    sections
        .iter()
        .filter_map(as_object)
        .map(|section| SectionSummary {
            book_number: field_or(section, "book_number", ""),
            english_book_name: field_or(section, "english_book_name", ""),
            arabic_book_name: field_or(section, "arabic_book_name", ""),
            book_range: field_or(section, "book_range", ""),
        })
        .collect()
}

/// Chapter-grouped hadiths for one section, resolved by strict-normalized
/// English OR Arabic section name; the first matching section wins.
pub fn hadiths_in_section(
    root: &Map<String, Value>,
    book_key: &str,
    section_name: &str,
) -> Result<Vec<ChapterGroup>> {
    let wanted = normalize(section_name, NormalizeMode::Strict);

    let Shape::Sections(sections) = classify(root) else {
        return Err(ApiError::SectionNotFound {
            section: wanted,
            book: book_key.to_string(),
        });
    };

    let section = sections
        .iter()
        .filter_map(as_object)
        .find(|section| {
            let english = field_or(section, "english_book_name", "");
            let arabic = field_or(section, "arabic_book_name", "");
            normalize(english.trim(), NormalizeMode::Strict) == wanted
                || normalize(arabic.trim(), NormalizeMode::Strict) == wanted
        })
        .ok_or_else(|| ApiError::SectionNotFound {
            section: wanted.clone(),
            book: book_key.to_string(),
        })?;

    let groups = array_of(section, "chapters_and_hadiths")
        .iter()
        .filter_map(as_object)
        .map(|chapter| ChapterGroup {
            chapter_info: ChapterInfo {
                chapter_no: field_or(chapter, "chapter_no", NO_CHAPTER_NUMBER),
                chapter_title_english: field_or(chapter, "chapter_title_english", "No English Title"),
                chapter_title_arabic: field_or(chapter, "chapter_title_arabic", "No Arabic Title"),
                chapter_intro: field_or(chapter, "chapter_intro", NO_CHAPTER_INTRO),
            },
            hadiths: array_of(chapter, "hadiths")
                .iter()
                .filter_map(as_object)
                .map(|hadith| SectionHadith {
                    reference: field_or(hadith, "reference", NO_REFERENCE),
                    narrator: field_or(hadith, "narrator", NO_NARRATOR),
                    english_text: field_or(hadith, "english_text", NO_ENGLISH_TEXT),
                    arabic_text: field_or(hadith, "arabic_text", NO_ARABIC_TEXT_AR),
                    references: array_of(hadith, "references").to_vec(),
                })
                .collect(),
        })
        .collect();

    Ok(groups)
}
