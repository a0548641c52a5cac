//! Knowledge Tables - static reference data for resolution.
//!
//! Colour vocabulary, typical colours, unit rules, regions and the short-code
//! database. Tables are parsed from TOML, validated once, and are read-only
//! afterwards. The built-in tables are embedded in the binary and shared.

use crate::classifier::ContentTag;
use crate::error::{QaError, Result};
use crate::types::{QaRecord, ResolutionSource};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

const BUILTIN_TOML: &str = include_str!("../data/knowledge.toml");

static BUILTIN: Lazy<Result<Arc<KnowledgeTables>>> =
    Lazy::new(|| KnowledgeTables::from_toml_str(BUILTIN_TOML).map(Arc::new));

static CODE_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{2} [a-z]( [a-z]{1,2})?$").unwrap());

// ============================================================================
// Table entries
// ============================================================================

/// Maps a unit (optionally within one book) to its topic and implied tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitRule {
    pub unit: u32,
    #[serde(default)]
    pub book: Option<u32>,
    pub topic: String,
    #[serde(default)]
    pub tag: Option<ContentTag>,
}

/// A country label with its naming keywords and side facts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    /// Display label, e.g. "BRITAIN / UK"
    pub label: String,
    /// Name used inside sentences, e.g. "Britain", "the USA"
    pub name: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub nationality: Option<String>,
    #[serde(default)]
    pub capital: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelKind {
    Region,
    Category,
}

/// One row of the short-code database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeEntry {
    pub code: String,
    pub label: String,
    pub label_kind: LabelKind,
    pub question: String,
    pub answer: String,
}

impl CodeEntry {
    pub fn to_record(&self, source: ResolutionSource) -> QaRecord {
        QaRecord::new(
            self.question.clone(),
            self.answer.clone(),
            self.label.clone(),
            source,
        )
    }
}

#[derive(Debug, Deserialize)]
struct RawCode {
    code: String,
    #[serde(default)]
    region: Option<String>,
    #[serde(default)]
    category: Option<String>,
    question: String,
    answer: String,
}

#[derive(Debug, Deserialize)]
struct RawTables {
    colors: Vec<String>,
    #[serde(default)]
    typical_colors: BTreeMap<String, String>,
    #[serde(default)]
    units: Vec<UnitRule>,
    #[serde(default)]
    regions: Vec<Region>,
    #[serde(default)]
    codes: Vec<RawCode>,
}

/// Entry counts, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TableStats {
    pub colors: usize,
    pub typical_colors: usize,
    pub units: usize,
    pub regions: usize,
    pub codes: usize,
}

// ============================================================================
// Tables
// ============================================================================

#[derive(Debug)]
pub struct KnowledgeTables {
    colors: Vec<String>,
    color_set: HashSet<String>,
    typical_colors: HashMap<String, String>,
    units: Vec<UnitRule>,
    regions: Vec<Region>,
    region_patterns: Vec<Option<Regex>>,
    codes: Vec<CodeEntry>,
    code_index: HashMap<String, usize>,
}

impl KnowledgeTables {
    /// The embedded tables, parsed on first use and shared afterwards.
    pub fn builtin() -> Result<Arc<KnowledgeTables>> {
        BUILTIN
            .as_ref()
            .map(Arc::clone)
            .map_err(|e| QaError::Builtin(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let tables = Self::from_toml_str(&content)?;
        info!("Loaded knowledge tables from {}", path.display());
        Ok(tables)
    }

    /// Parse and validate. Any invalid entry rejects the whole document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let raw: RawTables = toml::from_str(content)?;

        let mut color_set = HashSet::new();
        for color in &raw.colors {
            let well_formed =
                !color.is_empty() && color.chars().all(|c| c.is_ascii_lowercase());
            if !well_formed || !color_set.insert(color.clone()) {
                return Err(QaError::MalformedColor(color.clone()));
            }
        }

        let mut typical_colors = HashMap::new();
        for (object, color) in raw.typical_colors {
            if !color_set.contains(&color) {
                return Err(QaError::UnknownColor { object, color });
            }
            typical_colors.insert(object.to_lowercase(), color);
        }

        let mut seen_units = HashSet::new();
        for rule in &raw.units {
            if !seen_units.insert((rule.unit, rule.book)) {
                return Err(QaError::DuplicateUnit {
                    unit: rule.unit,
                    book: rule
                        .book
                        .map(|b| b.to_string())
                        .unwrap_or_else(|| "any".to_string()),
                });
            }
        }

        let region_patterns = raw
            .regions
            .iter()
            .map(|region| region_pattern(&region.keywords))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| QaError::MalformedKeyword(e.to_string()))?;
        let region_labels: HashSet<&str> =
            raw.regions.iter().map(|r| r.label.as_str()).collect();

        let mut codes = Vec::with_capacity(raw.codes.len());
        let mut code_index = HashMap::with_capacity(raw.codes.len());
        for entry in raw.codes {
            let code = entry.code.trim().to_string();
            if !CODE_SHAPE.is_match(&code) {
                return Err(QaError::MalformedCode(entry.code));
            }
            if code_index.contains_key(&code) {
                return Err(QaError::DuplicateCode(code));
            }
            if entry.question.trim().is_empty() || entry.answer.trim().is_empty() {
                return Err(QaError::EmptyEntry(code));
            }
            let (label, label_kind) = match (entry.region, entry.category) {
                (Some(region), None) => {
                    if !region_labels.contains(region.as_str()) {
                        return Err(QaError::UnknownRegion { code, region });
                    }
                    (region, LabelKind::Region)
                }
                (None, Some(category)) => (category, LabelKind::Category),
                _ => return Err(QaError::AmbiguousLabel(code)),
            };
            code_index.insert(code.clone(), codes.len());
            codes.push(CodeEntry {
                code,
                label,
                label_kind,
                question: entry.question,
                answer: entry.answer,
            });
        }

        let tables = Self {
            colors: raw.colors,
            color_set,
            typical_colors,
            units: raw.units,
            regions: raw.regions,
            region_patterns,
            codes,
            code_index,
        };
        let stats = tables.stats();
        info!(
            "Knowledge tables ready: {} codes, {} regions, {} units, {} colours",
            stats.codes, stats.regions, stats.units, stats.colors
        );
        Ok(tables)
    }

    // ------------------------------------------------------------------------
    // Code database
    // ------------------------------------------------------------------------

    pub fn code(&self, code: &str) -> Option<&CodeEntry> {
        self.code_index.get(code).map(|&i| &self.codes[i])
    }

    /// First entry in table order whose code starts with `prefix`.
    pub fn first_with_prefix(&self, prefix: &str) -> Option<&CodeEntry> {
        if prefix.is_empty() {
            return None;
        }
        self.codes.iter().find(|entry| entry.code.starts_with(prefix))
    }

    pub fn codes(&self) -> &[CodeEntry] {
        &self.codes
    }

    // ------------------------------------------------------------------------
    // Colours
    // ------------------------------------------------------------------------

    /// Vocabulary in table order.
    pub fn colors(&self) -> &[String] {
        &self.colors
    }

    pub fn is_color(&self, word: &str) -> bool {
        self.color_set.contains(word)
    }

    pub fn typical_color(&self, object: &str) -> Option<&str> {
        self.typical_colors
            .get(&object.trim().to_lowercase())
            .map(String::as_str)
    }

    // ------------------------------------------------------------------------
    // Units and regions
    // ------------------------------------------------------------------------

    /// Book-specific rule first, then the book-less rule for the unit.
    pub fn unit_rule(&self, unit: u32, book: Option<u32>) -> Option<&UnitRule> {
        let specific = book.and_then(|b| {
            self.units
                .iter()
                .find(|r| r.unit == unit && r.book == Some(b))
        });
        specific.or_else(|| self.units.iter().find(|r| r.unit == unit && r.book.is_none()))
    }

    pub fn region(&self, label: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.label == label)
    }

    /// First region (table order) with a keyword appearing as a whole word.
    pub fn region_for_text(&self, text: &str) -> Option<&Region> {
        self.regions
            .iter()
            .zip(&self.region_patterns)
            .find(|(_, pattern)| pattern.as_ref().is_some_and(|p| p.is_match(text)))
            .map(|(region, _)| region)
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn stats(&self) -> TableStats {
        TableStats {
            colors: self.colors.len(),
            typical_colors: self.typical_colors.len(),
            units: self.units.len(),
            regions: self.regions.len(),
            codes: self.codes.len(),
        }
    }
}

/// Whole-word, case-insensitive alternation over a region's keywords.
/// A region without keywords is never matched by text.
fn region_pattern(keywords: &[String]) -> std::result::Result<Option<Regex>, regex::Error> {
    let words: Vec<String> = keywords
        .iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .map(regex::escape)
        .collect();
    if words.is_empty() {
        return Ok(None);
    }
    Regex::new(&format!(r"(?i)\b(?:{})\b", words.join("|"))).map(Some)
}
