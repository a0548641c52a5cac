//! Title Parsing - last-resort QA pairs read off human-readable text.
//!
//! Identifier forms:
//! - "What is it – A cat" dash split, when the left side opens like a question
//! - "Do you have a pen" and similar yes/no openings, answered both ways
//!
//! Title forms:
//! - "Q → A"
//! - "Q? A" or "Q?" plus the description
//! - "POLAND (Files)" ALL-CAPS country label

use crate::extract::strip_extension;
use crate::knowledge::KnowledgeTables;
use crate::types::{QaRecord, ResolutionSource};
use once_cell::sync::Lazy;
use regex::Regex;

static LEADING_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*\(?\d{2}\s+[a-z]\s+[a-z]a?\)?\s+").unwrap());

static DASH_SPLIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([^\-–]+?)\s*[\-–]\s*(.+)$").unwrap());

static QUESTION_OPENING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:what|where|how|why|when|who|which|is|are|do|does|can|could|has|have)\b")
        .unwrap()
});

static CAPS_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Z][A-Z\s]*?)\s*\(").unwrap());

/// Yes/no openings and their two-sided answers. `{0}` is the complement.
static YES_NO_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    vec![
        (
            Regex::new(r"^do you have (.+)$").unwrap(),
            "Yes, I have {0}. / No, I don't have {0}.",
        ),
        (
            Regex::new(r"^does he have (.+)$").unwrap(),
            "Yes, he has {0}. / No, he doesn't have {0}.",
        ),
        (
            Regex::new(r"^does she have (.+)$").unwrap(),
            "Yes, she has {0}. / No, she doesn't have {0}.",
        ),
        (
            Regex::new(r"^is it (.+)$").unwrap(),
            "Yes, it is {0}. / No, it isn't {0}.",
        ),
        (
            Regex::new(r"^is he (.+)$").unwrap(),
            "Yes, he is {0}. / No, he isn't {0}.",
        ),
        (
            Regex::new(r"^is she (.+)$").unwrap(),
            "Yes, she is {0}. / No, she isn't {0}.",
        ),
        (
            Regex::new(r"^is this (.+)$").unwrap(),
            "Yes, it is {0}. / No, it isn't {0}.",
        ),
        (
            Regex::new(r"^are you (.+)$").unwrap(),
            "Yes, I am {0}. / No, I'm not {0}.",
        ),
        (
            Regex::new(r"^are (?:they|these) (.+)$").unwrap(),
            "Yes, they are {0}. / No, they aren't {0}.",
        ),
    ]
});

/// Identifier without media extension or leading short code.
pub fn clean_identifier(identifier: &str) -> &str {
    let base = strip_extension(identifier.trim());
    match LEADING_CODE.find(base) {
        Some(m) => &base[m.end()..],
        None => base,
    }
}

/// Dash split, then yes/no synthesis, over the cleaned identifier.
pub fn parse_identifier(identifier: &str) -> Option<QaRecord> {
    let cleaned = clean_identifier(identifier).trim();
    if cleaned.is_empty() {
        return None;
    }

    if let Some(caps) = DASH_SPLIT.captures(cleaned) {
        let (before, after) = (caps[1].trim(), caps[2].trim());
        if QUESTION_OPENING.is_match(before) && !after.is_empty() {
            return Some(title_record(
                with_ending(before, '?'),
                with_ending(after, '.'),
                "",
            ));
        }
    }

    let lower = cleaned.trim_end_matches('?').trim().to_lowercase();
    YES_NO_PATTERNS.iter().find_map(|(pattern, template)| {
        pattern.captures(&lower).map(|caps| {
            let complement = caps[1].trim();
            title_record(
                with_ending(cleaned.trim_end_matches('?').trim(), '?'),
                template.replace("{0}", complement),
                "",
            )
        })
    })
}

/// Arrow, question-mark and ALL-CAPS forms over a title.
pub fn parse_title(
    title: &str,
    description: Option<&str>,
    tables: &KnowledgeTables,
) -> Option<QaRecord> {
    let title = strip_extension(title.trim());
    if title.is_empty() {
        return None;
    }

    if let Some((question, answer)) = title.split_once('→') {
        let (question, answer) = (question.trim(), answer.trim());
        if !question.is_empty() || !answer.is_empty() {
            return Some(title_record(question.to_string(), answer.to_string(), ""));
        }
    }

    if let Some(pos) = title.find('?') {
        let question = title[..=pos].trim();
        let inline = title[pos + 1..].trim();
        let answer = if inline.is_empty() {
            description.map(str::trim).unwrap_or("")
        } else {
            inline
        };
        if !answer.is_empty() {
            return Some(title_record(question.to_string(), answer.to_string(), ""));
        }
    }

    if let Some(caps) = CAPS_LABEL.captures(title) {
        let label = caps[1].trim();
        if !label.is_empty() {
            let name = tables
                .region(label)
                .map(|region| region.name.clone())
                .unwrap_or_else(|| title_case(label));
            return Some(title_record(
                "What country is this?".to_string(),
                format!("It is {}.", name),
                label,
            ));
        }
    }

    None
}

fn title_record(question: String, answer: String, label: &str) -> QaRecord {
    QaRecord::new(question, answer, label, ResolutionSource::TitleParse)
}

/// Capitalize the first letter and make sure the text ends with `ending`.
fn with_ending(text: &str, ending: char) -> String {
    let mut chars = text.chars();
    let mut out: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };
    if !out.ends_with(['.', '?', '!']) {
        out.push(ending);
    }
    out
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let lower = word.to_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_identifier() {
        assert_eq!(clean_identifier("09 N I Do You Have A School Bag.jpg"), "Do You Have A School Bag");
        assert_eq!(clean_identifier("02 A Black Cat"), "02 A Black Cat");
    }

    #[test]
    fn test_dash_split() {
        let record = parse_identifier("02 N A Is the Dog Happy or Sad – Happy.gif").unwrap();
        assert_eq!(record.question, "Is the Dog Happy or Sad?");
        assert_eq!(record.answer, "Happy.");
        assert_eq!(record.source, ResolutionSource::TitleParse);

        assert!(parse_identifier("Unit 5 – Family tree").is_none());
    }

    #[test]
    fn test_yes_no_synthesis() {
        let record = parse_identifier("09 N I Do You Have A School Bag").unwrap();
        assert_eq!(record.question, "Do You Have A School Bag?");
        assert_eq!(
            record.answer,
            "Yes, I have a school bag. / No, I don't have a school bag."
        );

        let record = parse_identifier("Are these your shoes?").unwrap();
        assert_eq!(record.answer, "Yes, they are your shoes. / No, they aren't your shoes.");

        let record = parse_identifier("03 b c Is She Happy.gif").unwrap();
        assert_eq!(record.question, "Is She Happy?");
        assert_eq!(record.answer, "Yes, she is happy. / No, she isn't happy.");
    }

    #[test]
    fn test_identifier_without_pattern() {
        assert!(parse_identifier("random_unmatched_string_123").is_none());
        assert!(parse_identifier("").is_none());
    }

    #[test]
    fn test_arrow_title() {
        let tables = KnowledgeTables::builtin().unwrap();
        let record = parse_title("Where is Big Ben? → It is in London.", None, &tables).unwrap();
        assert_eq!(record.question, "Where is Big Ben?");
        assert_eq!(record.answer, "It is in London.");
    }

    #[test]
    fn test_question_mark_title() {
        let tables = KnowledgeTables::builtin().unwrap();
        let record =
            parse_title("What animal is this?", Some("It is a kangaroo."), &tables).unwrap();
        assert_eq!(record.question, "What animal is this?");
        assert_eq!(record.answer, "It is a kangaroo.");

        assert!(parse_title("What animal is this?", None, &tables).is_none());
    }

    #[test]
    fn test_caps_country_title() {
        let tables = KnowledgeTables::builtin().unwrap();
        let record = parse_title("POLAND (Files)", None, &tables).unwrap();
        assert_eq!(record.label, "POLAND");
        assert_eq!(record.answer, "It is Poland.");

        let record = parse_title("NEW ZEALAND (Files)", None, &tables).unwrap();
        assert_eq!(record.answer, "It is New Zealand.");
    }
}
