//! Entity Extractors - pull structured fields out of an identifier.
//!
//! Every extractor is an ordered chain of patterns compiled once; the first
//! pattern that matches wins and no match is a normal `None`.

use crate::knowledge::KnowledgeTables;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

// ============================================================================
// Compiled patterns
// ============================================================================

static MEDIA_EXTENSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\.(png|jpg|jpeg|gif|webp|mp4)$").unwrap());

/// Where a short code was found. Earlier forms are less ambiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodeForm {
    /// "(01 r a)"
    Parenthesized,
    /// "01 r a ..." at the start
    Anchored,
    /// "... 01 r a what ..." followed by a question word or the end
    Inline,
}

static SHORT_CODE_PATTERNS: Lazy<Vec<(Regex, CodeForm)>> = Lazy::new(|| {
    vec![
        (
            Regex::new(r"(?i)\((\d{2})\s*([a-z])\s*([a-z]a?)\)").unwrap(),
            CodeForm::Parenthesized,
        ),
        (
            Regex::new(r"(?i)^(\d{2})\s+([a-z])\s+([a-z]a?)\s").unwrap(),
            CodeForm::Anchored,
        ),
        (
            Regex::new(
                r"(?i)\b(\d{2})\s+([a-z])\s+([a-z]a?)(?:\s*$|\.[a-z0-9]{2,4}$|\s+(?:what|do|is|are|how|where|who)\b)",
            )
            .unwrap(),
            CodeForm::Inline,
        ),
    ]
});

/// Phrase patterns for the object noun, run on lowercased text with the
/// media extension removed.
static OBJECT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"what is it[\s?\-–]+it is an?\s+([a-z][a-z\s]*?)\s*(?:[.?!–-]|$)").unwrap(),
        Regex::new(r"what colou?r is the\s+([a-z][a-z\s]*?)\s*(?:[.?!–-]|$)").unwrap(),
        Regex::new(r"what colou?r are the\s+([a-z][a-z\s]*?)\s*(?:[.?!–-]|$)").unwrap(),
    ]
});

/// "NN X Word Word" base filenames.
static OBJECT_TAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{2}\s+[A-Z]\s+([A-Za-z]+\s+[A-Za-z]+)$").unwrap());

static COLOR_PHRASE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"it is an?\s+([a-z]+)\s+([a-z]+)").unwrap());

/// Which vacation phrasing an identifier used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VacationPhrase {
    /// "what vacation is it – it is a beach vacation"
    WhatVacation,
    /// "i think beach vacations are interesting"
    InterestingOrBoring,
    /// "do you go on beach vacations"
    GoOn,
    /// "would you like to go on a beach vacation"
    WouldLike,
}

static VACATION_PATTERNS: Lazy<Vec<(Regex, VacationPhrase)>> = Lazy::new(|| {
    vec![
        (
            Regex::new(
                r"what vacation is it[^a-z]*(?:it is\s+)?(?:an?\s+)?([a-z][a-z\s]*?)\s*(?:vacation)?\s*$",
            )
            .unwrap(),
            VacationPhrase::WhatVacation,
        ),
        (
            Regex::new(r"i think ([a-z][a-z\s]*?) vacations are interesting").unwrap(),
            VacationPhrase::InterestingOrBoring,
        ),
        (
            Regex::new(r"do you go on ([a-z][a-z\s]*?) vacations").unwrap(),
            VacationPhrase::GoOn,
        ),
        (
            Regex::new(r"would you like to go on an? ([a-z][a-z\s]*?) vacation").unwrap(),
            VacationPhrase::WouldLike,
        ),
    ]
});

static ACCOMMODATION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"what is it.*?\bit is an?\s+([a-z][a-z\s]*?)\s*$").unwrap());

/// Device keywords and the category label they imply. "headphone" must
/// precede "phone".
const GADGET_CATEGORIES: &[(&str, &str)] = &[
    ("headphone", "HEADPHONES & EARPHONES"),
    ("earphone", "HEADPHONES & EARPHONES"),
    ("charger", "CHARGERS & BATTERIES"),
    ("phone", "MOBILE PHONES"),
    ("speaker", "SPEAKERS"),
    ("laptop", "COMPUTERS & LAPTOPS"),
    ("console", "GAME CONSOLES"),
    ("camera", "CAMERAS"),
    ("gadget", "OTHER GADGETS"),
];

// ============================================================================
// Entities
// ============================================================================

/// Structured fields pulled from one identifier. Built once per resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedEntities {
    pub object: Option<String>,
    pub color: Option<String>,
    /// Region label, e.g. "POLAND"
    pub country: Option<String>,
    /// Gadget category, e.g. "MOBILE PHONES"
    pub category: Option<String>,
    pub short_code: Option<String>,
    pub vacation_type: Option<String>,
    pub vacation_phrase: Option<VacationPhrase>,
    pub accommodation_type: Option<String>,
}

/// Run every extractor. Vacation and accommodation extractors only run when
/// the context is the hotels unit.
pub fn extract_entities(
    identifier: &str,
    tables: &KnowledgeTables,
    hotels_context: bool,
) -> ExtractedEntities {
    let object = extract_object(identifier, tables);
    let color = extract_color(identifier, object.as_deref(), tables);
    let (vacation_type, vacation_phrase) = if hotels_context {
        match extract_vacation(identifier) {
            Some((phrase, kind)) => (Some(kind), Some(phrase)),
            None => (None, None),
        }
    } else {
        (None, None)
    };

    ExtractedEntities {
        object,
        color,
        country: tables
            .region_for_text(identifier)
            .map(|region| region.label.clone()),
        category: extract_category(identifier).map(str::to_string),
        short_code: extract_short_code(identifier),
        vacation_type,
        vacation_phrase,
        accommodation_type: if hotels_context {
            extract_accommodation(identifier)
        } else {
            None
        },
    }
}

// ============================================================================
// Individual extractors
// ============================================================================

/// Remove a trailing media extension.
pub fn strip_extension(text: &str) -> &str {
    match MEDIA_EXTENSION.find(text) {
        Some(m) => &text[..m.start()],
        None => text,
    }
}

/// Normalized short code (`"01 r a"`), trying the less ambiguous forms first.
pub fn extract_short_code(identifier: &str) -> Option<String> {
    extract_short_code_form(identifier).map(|(code, _)| code)
}

pub fn extract_short_code_form(identifier: &str) -> Option<(String, CodeForm)> {
    SHORT_CODE_PATTERNS.iter().find_map(|(pattern, form)| {
        pattern.captures(identifier).map(|caps| {
            let code = format!(
                "{} {} {}",
                &caps[1],
                caps[2].to_lowercase(),
                caps[3].to_lowercase()
            );
            (code, *form)
        })
    })
}

/// Lowercased object noun, without a leading colour word.
pub fn extract_object(identifier: &str, tables: &KnowledgeTables) -> Option<String> {
    let base = strip_extension(identifier.trim());
    let lower = base.to_lowercase();

    let phrase = OBJECT_PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(&lower).map(|caps| caps[1].trim().to_string()));

    let found = phrase.or_else(|| {
        let file = base.rsplit('/').next().unwrap_or(base);
        OBJECT_TAIL
            .captures(file)
            .map(|caps| caps[1].trim().to_lowercase())
    })?;

    let object = strip_leading_color(&found, tables);
    (!object.is_empty()).then(|| object.to_string())
}

/// "black cat" -> "cat" when the first word is a vocabulary colour.
fn strip_leading_color<'a>(phrase: &'a str, tables: &KnowledgeTables) -> &'a str {
    match phrase.split_once(' ') {
        Some((first, rest)) if tables.is_color(first) && !rest.trim().is_empty() => rest.trim(),
        _ => phrase,
    }
}

/// Colour word in the identifier, else the typical colour of `object`.
pub fn extract_color(
    identifier: &str,
    object: Option<&str>,
    tables: &KnowledgeTables,
) -> Option<String> {
    let lower = identifier.to_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| !c.is_ascii_alphabetic())
        .filter(|w| !w.is_empty())
        .collect();

    if let Some(color) = tables
        .colors()
        .iter()
        .find(|color| words.contains(&color.as_str()))
    {
        return Some(color.clone());
    }

    if let Some(caps) = COLOR_PHRASE.captures(&lower) {
        if tables.is_color(&caps[1]) {
            return Some(caps[1].to_string());
        }
    }

    object
        .and_then(|o| tables.typical_color(o))
        .map(str::to_string)
}

/// Vacation type and the phrasing it came from.
pub fn extract_vacation(identifier: &str) -> Option<(VacationPhrase, String)> {
    let lower = strip_extension(identifier.trim()).to_lowercase();
    VACATION_PATTERNS.iter().find_map(|(pattern, phrase)| {
        pattern
            .captures(&lower)
            .map(|caps| caps[1].trim().to_string())
            .filter(|kind| !kind.is_empty())
            .map(|kind| (*phrase, kind))
    })
}

/// Accommodation type from "what is it ... accommodation ... it is a <type>".
pub fn extract_accommodation(identifier: &str) -> Option<String> {
    let lower = strip_extension(identifier.trim()).to_lowercase();
    if !lower.contains("accommodation") {
        return None;
    }
    let caps = ACCOMMODATION_PATTERN.captures(&lower)?;
    let kind = caps[1].trim();
    let kind = kind.strip_suffix("accommodation").unwrap_or(kind).trim();
    (!kind.is_empty()).then(|| kind.to_string())
}

/// Category label implied by a device keyword. Labelling only; the gadget
/// rules that override country cues key on their own trigger words.
pub fn extract_category(identifier: &str) -> Option<&'static str> {
    let lower = identifier.to_lowercase();
    GADGET_CATEGORIES
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, category)| *category)
}
