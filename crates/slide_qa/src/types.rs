//! Shared data types: resolution context, QA records and caller overrides.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

// ============================================================================
// Context
// ============================================================================

/// Optional catalog context for one identifier.
///
/// `book_id` and `unit_id` accept either bare numbers (`"7"`, `"4"`) or
/// tagged forms (`"book7"`, `"unit4"`, `"book7/unit4"`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveContext {
    #[serde(default)]
    pub book_id: Option<String>,
    #[serde(default)]
    pub unit_id: Option<String>,
    /// Human-readable title, used by the title-parse fallback
    #[serde(default)]
    pub title: Option<String>,
    /// Human-readable description, paired with a "?"-terminated title
    #[serde(default)]
    pub description: Option<String>,
}

impl ResolveContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_book(mut self, book: impl Into<String>) -> Self {
        self.book_id = Some(book.into());
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit_id = Some(unit.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Unit number, from `unit_id`.
    pub fn unit_number(&self) -> Option<u32> {
        self.unit_id.as_deref().and_then(|u| number_after(u, "unit"))
    }

    /// Book number, from `book_id`, or a `bookN` segment inside `unit_id`.
    pub fn book_number(&self) -> Option<u32> {
        self.book_id
            .as_deref()
            .and_then(|b| number_after(b, "book"))
            .or_else(|| {
                self.unit_id
                    .as_deref()
                    .filter(|u| u.to_lowercase().contains("book"))
                    .and_then(|u| number_after(u, "book"))
            })
    }
}

/// Digits following `key` (case-insensitive), or the whole string when it is
/// a bare number.
fn number_after(text: &str, key: &str) -> Option<u32> {
    let lower = text.trim().to_lowercase();
    if let Some(pos) = lower.find(key) {
        let digits: String = lower[pos + key.len()..]
            .trim_start()
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        return digits.parse().ok();
    }
    if !lower.is_empty() && lower.chars().all(|c| c.is_ascii_digit()) {
        return lower.parse().ok();
    }
    None
}

// ============================================================================
// Resolution output
// ============================================================================

/// Which strategy produced a record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResolutionSource {
    /// Override keyed by the identifier itself
    DirectMatch,
    /// Override keyed by the extracted short code
    SectionMatch,
    CodeExact,
    CodePrefix,
    Keyword,
    Generated,
    TitleParse,
    #[default]
    Fallback,
}

impl ResolutionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DirectMatch => "direct-match",
            Self::SectionMatch => "section-match",
            Self::CodeExact => "code-exact",
            Self::CodePrefix => "code-prefix",
            Self::Keyword => "keyword",
            Self::Generated => "generated",
            Self::TitleParse => "title-parse",
            Self::Fallback => "fallback",
        }
    }

    /// Authored data, as opposed to text produced by a heuristic.
    pub fn is_authored(&self) -> bool {
        matches!(
            self,
            Self::DirectMatch | Self::SectionMatch | Self::CodeExact | Self::CodePrefix
        )
    }
}

impl std::fmt::Display for ResolutionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved question/answer pair.
///
/// `has_data` is false exactly when question and answer are both empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QaRecord {
    pub question: String,
    pub answer: String,
    /// Country or category, may be empty
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub source: ResolutionSource,
    #[serde(default)]
    pub has_data: bool,
}

impl QaRecord {
    pub fn new(
        question: impl Into<String>,
        answer: impl Into<String>,
        label: impl Into<String>,
        source: ResolutionSource,
    ) -> Self {
        let question = question.into();
        let answer = answer.into();
        let has_data = !(question.is_empty() && answer.is_empty());
        Self {
            question,
            answer,
            label: label.into(),
            source,
            has_data,
        }
    }

    /// The terminal "nothing to display" record.
    pub fn blank() -> Self {
        Self::new("", "", "", ResolutionSource::Fallback)
    }

    /// Re-stamp with a new source, recomputing `has_data`.
    pub fn restamped(&self, source: ResolutionSource) -> Self {
        Self::new(
            self.question.clone(),
            self.answer.clone(),
            self.label.clone(),
            source,
        )
    }

    /// Empty question and answer. Read off the text rather than `has_data`,
    /// which deserialized records may leave at its default.
    pub fn is_blank(&self) -> bool {
        self.question.is_empty() && self.answer.is_empty()
    }
}

// ============================================================================
// Overrides
// ============================================================================

/// Caller-owned, human-authored corrections, keyed by identifier or by
/// normalized short code (`"01 r a"`). Read-only to the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Overrides {
    entries: HashMap<String, QaRecord>,
}

impl Overrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, key: impl Into<String>, record: QaRecord) -> Self {
        self.insert(key, record);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, record: QaRecord) {
        self.entries.insert(key.into(), record);
    }

    pub fn get(&self, key: &str) -> Option<&QaRecord> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse a JSON object of `{ key: {question, answer, label?} }`.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}

impl FromIterator<(String, QaRecord)> for Overrides {
    fn from_iter<I: IntoIterator<Item = (String, QaRecord)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_and_book_parsing() {
        let ctx = ResolveContext::new().with_book("7").with_unit("4");
        assert_eq!(ctx.book_number(), Some(7));
        assert_eq!(ctx.unit_number(), Some(4));

        let ctx = ResolveContext::new().with_book("book7").with_unit("unit17");
        assert_eq!(ctx.book_number(), Some(7));
        assert_eq!(ctx.unit_number(), Some(17));

        let ctx = ResolveContext::new().with_unit("book7/unit4");
        assert_eq!(ctx.book_number(), Some(7));
        assert_eq!(ctx.unit_number(), Some(4));
    }

    #[test]
    fn test_unparseable_context() {
        let ctx = ResolveContext::new().with_book("grammar").with_unit("intro");
        assert_eq!(ctx.book_number(), None);
        assert_eq!(ctx.unit_number(), None);
        assert_eq!(ResolveContext::new().unit_number(), None);
    }

    #[test]
    fn test_has_data_tracks_content() {
        assert!(!QaRecord::blank().has_data);
        assert!(QaRecord::new("Q?", "", "", ResolutionSource::Generated).has_data);
        assert!(QaRecord::new("", "A.", "", ResolutionSource::Generated).has_data);
    }

    #[test]
    fn test_blank_reads_content() {
        let record: QaRecord =
            serde_json::from_str(r#"{"question": "Q?", "answer": "A."}"#).unwrap();
        assert!(!record.is_blank());
        assert!(QaRecord::blank().is_blank());
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let record = QaRecord::new("Q?", "A.", "POLAND", ResolutionSource::CodeExact);
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"hasData\":true"));
        assert!(json.contains("\"source\":\"code-exact\""));
    }

    #[test]
    fn test_overrides_from_json() {
        let json = r#"{
            "01 r a": {"question": "Which country?", "answer": "Poland.", "label": "POLAND"},
            "slide.png": {"question": "What is it?", "answer": "It is a slide."}
        }"#;
        let overrides = Overrides::from_json_str(json).unwrap();
        assert_eq!(overrides.len(), 2);
        assert_eq!(overrides.get("01 r a").unwrap().label, "POLAND");
        assert_eq!(overrides.get("slide.png").unwrap().label, "");
    }

    #[test]
    fn test_overrides_bad_json() {
        assert!(Overrides::from_json_str("[1, 2]").is_err());
    }
}
