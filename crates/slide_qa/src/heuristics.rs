//! Keyword Heuristics - topic-specific substring rules.
//!
//! Gadget rules run first. A phone, charger or gadget mention suppresses the
//! country cues, even when no gadget rule produced a record: device content
//! often carries a country-like word that is not its topic.

use crate::extract::ExtractedEntities;
use crate::knowledge::{KnowledgeTables, Region};
use crate::types::{QaRecord, ResolutionSource};

/// Words that put an identifier on the gadget path.
const GADGET_TRIGGERS: &[&str] = &["phone", "charger", "gadget"];

struct GadgetRule {
    /// Extra word the identifier must contain, if any
    requires: Option<&'static str>,
    phrases: &'static [&'static str],
    label: &'static str,
    question: &'static str,
    answer: &'static str,
}

const WHAT_IS_THIS: &[&str] = &["what is it", "what is this"];

/// Checked in order; the bare phone answer covers every non-charger gadget.
const GADGET_RULES: &[GadgetRule] = &[
    GadgetRule {
        requires: Some("charger"),
        phrases: WHAT_IS_THIS,
        label: "CHARGERS & BATTERIES",
        question: "What is this?",
        answer: "It is a charger.",
    },
    GadgetRule {
        requires: None,
        phrases: WHAT_IS_THIS,
        label: "MOBILE PHONES",
        question: "What is this?",
        answer: "It is a phone.",
    },
    GadgetRule {
        requires: None,
        phrases: &["have a phone"],
        label: "MOBILE PHONES",
        question: "Do you have a phone?",
        answer: "Yes, I have a phone / No, I do not have a phone.",
    },
    GadgetRule {
        requires: None,
        phrases: &["have a charger"],
        label: "CHARGERS & BATTERIES",
        question: "Do you have a charger?",
        answer: "Yes, I have a charger / No, I do not.",
    },
];

/// First keyword rule that applies, in fixed order.
pub fn keyword_record(
    identifier: &str,
    entities: &ExtractedEntities,
    tables: &KnowledgeTables,
) -> Option<QaRecord> {
    let lower = identifier.to_lowercase();

    if GADGET_TRIGGERS.iter().any(|t| lower.contains(t)) {
        return gadget_record(&lower);
    }

    let region = entities
        .country
        .as_deref()
        .and_then(|label| tables.region(label))?;
    country_record(&lower, region)
}

fn gadget_record(lower: &str) -> Option<QaRecord> {
    GADGET_RULES
        .iter()
        .filter(|rule| rule.requires.map_or(true, |word| lower.contains(word)))
        .find(|rule| rule.phrases.iter().any(|p| lower.contains(p)))
        .map(|rule| {
            QaRecord::new(
                rule.question,
                rule.answer,
                rule.label,
                ResolutionSource::Keyword,
            )
        })
}

/// Flag, capital and nationality phrasing, answered from the region table.
fn country_record(lower: &str, region: &Region) -> Option<QaRecord> {
    let keyword = |question: String, answer: String| {
        QaRecord::new(question, answer, region.label.clone(), ResolutionSource::Keyword)
    };

    if lower.contains("flag") {
        return Some(keyword(
            "Where is this flag from?".to_string(),
            format!("It is from {}.", region.name),
        ));
    }
    if lower.contains("capital") {
        if let Some(capital) = &region.capital {
            return Some(keyword(
                format!("What is the capital of {}?", region.name),
                format!("It is {}.", capital),
            ));
        }
    }
    if lower.contains("nationality") {
        if let Some(nationality) = &region.nationality {
            return Some(keyword(
                "What nationality is he?".to_string(),
                format!("He is {}.", nationality),
            ));
        }
    }
    None
}
