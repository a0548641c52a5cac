//! Content Classifier - maps an identifier to one content tag.
//!
//! A fixed decision list, first match wins:
//! - colour words -> ColorQuestion
//! - "what is it" -> WhatIsIt
//! - "fake or real" -> FakeOrReal
//! - "worksheet" / "game" / "video" as whole words, not naming a device
//! - meal and time-of-day phrasing -> DailyRoutine
//! - the unit rule from the context
//! - otherwise Unknown

use crate::knowledge::KnowledgeTables;
use crate::types::ResolveContext;
use serde::{Deserialize, Serialize};

// ============================================================================
// Content tags
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentTag {
    ColorQuestion,
    WhatIsIt,
    FakeOrReal,
    Weather,
    Emotions,
    Numbers,
    Shapes,
    Family,
    Classroom,
    Animals,
    Food,
    Fruits,
    Vegetables,
    BodyParts,
    Worksheet,
    Game,
    Video,
    CanDo,
    Hotels,
    DailyRoutine,
    Unknown,
}

impl ContentTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ColorQuestion => "color-question",
            Self::WhatIsIt => "what-is-it",
            Self::FakeOrReal => "fake-or-real",
            Self::Weather => "weather",
            Self::Emotions => "emotions",
            Self::Numbers => "numbers",
            Self::Shapes => "shapes",
            Self::Family => "family",
            Self::Classroom => "classroom",
            Self::Animals => "animals",
            Self::Food => "food",
            Self::Fruits => "fruits",
            Self::Vegetables => "vegetables",
            Self::BodyParts => "body-parts",
            Self::Worksheet => "worksheet",
            Self::Game => "game",
            Self::Video => "video",
            Self::CanDo => "can-do",
            Self::Hotels => "hotels",
            Self::DailyRoutine => "daily-routine",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ContentTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Classifier
// ============================================================================

pub struct ContentClassifier {
    /// Activity keywords, checked in this order
    activity_keywords: Vec<(&'static str, ContentTag)>,
    /// A keyword directly followed by one of these names a device
    device_nouns: Vec<&'static str>,
    /// Meal and time-of-day phrases
    routine_phrases: Vec<&'static str>,
}

impl ContentClassifier {
    pub fn new() -> Self {
        Self {
            activity_keywords: vec![
                ("worksheet", ContentTag::Worksheet),
                ("game", ContentTag::Game),
                ("video", ContentTag::Video),
            ],
            device_nouns: vec!["console", "camera"],
            routine_phrases: vec![
                "what do you eat",
                "what do you have for",
                "what time do you",
                "in the morning",
                "in the afternoon",
                "in the evening",
                "at night",
                "for breakfast",
                "for lunch",
                "for dinner",
            ],
        }
    }

    pub fn classify(
        &self,
        identifier: &str,
        context: &ResolveContext,
        tables: &KnowledgeTables,
    ) -> ContentTag {
        let lower = identifier.to_lowercase();

        if mentions_color(&lower, tables) {
            return ContentTag::ColorQuestion;
        }
        if lower.contains("what is it") {
            return ContentTag::WhatIsIt;
        }
        if lower.contains("fake or real") {
            return ContentTag::FakeOrReal;
        }
        let words: Vec<&str> = lower
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();
        if let Some((_, tag)) = self
            .activity_keywords
            .iter()
            .find(|(keyword, _)| self.mentions_activity(&words, keyword))
        {
            return *tag;
        }
        if self.routine_phrases.iter().any(|p| lower.contains(p)) {
            return ContentTag::DailyRoutine;
        }

        context_tag(context, tables).unwrap_or(ContentTag::Unknown)
    }

    /// `keyword` (or its plural) as a whole word, not naming a device
    /// ("game console").
    fn mentions_activity(&self, words: &[&str], keyword: &str) -> bool {
        words.iter().enumerate().any(|(i, word)| {
            let matches = *word == keyword || word.strip_suffix('s') == Some(keyword);
            let device = words
                .get(i + 1)
                .is_some_and(|next| self.device_nouns.iter().any(|d| next.starts_with(d)));
            matches && !device
        })
    }
}

impl Default for ContentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Tag implied by the context's unit (and book) alone.
pub fn context_tag(context: &ResolveContext, tables: &KnowledgeTables) -> Option<ContentTag> {
    let unit = context.unit_number()?;
    tables
        .unit_rule(unit, context.book_number())
        .and_then(|rule| rule.tag)
}

/// "colour"/"color", or any vocabulary colour as a whole word.
fn mentions_color(lower: &str, tables: &KnowledgeTables) -> bool {
    if lower.contains("colour") || lower.contains("color") {
        return true;
    }
    lower
        .split(|c: char| !c.is_ascii_alphabetic())
        .any(|word| tables.is_color(word))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(identifier: &str, context: &ResolveContext) -> ContentTag {
        let tables = KnowledgeTables::builtin().unwrap();
        ContentClassifier::new().classify(identifier, context, &tables)
    }

    #[test]
    fn test_color_first() {
        let none = ResolveContext::new();
        assert_eq!(classify("What Colour is the Banana", &none), ContentTag::ColorQuestion);
        assert_eq!(classify("What is it – It is a red car", &none), ContentTag::ColorQuestion);
        assert_eq!(classify("Is it Red – Fake or Real", &none), ContentTag::ColorQuestion);
    }

    #[test]
    fn test_phrase_tags() {
        let none = ResolveContext::new();
        assert_eq!(classify("What is it – It is a dog", &none), ContentTag::WhatIsIt);
        assert_eq!(classify("Dragon Fake or Real.png", &none), ContentTag::FakeOrReal);
        assert_eq!(classify("Unit 3 Worksheet video", &none), ContentTag::Worksheet);
        assert_eq!(classify("Memory Game", &none), ContentTag::Game);
        assert_eq!(classify("Song video.mp4", &none), ContentTag::Video);
        assert_eq!(classify("Board games", &none), ContentTag::Game);
    }

    #[test]
    fn test_activity_keywords_are_whole_words() {
        let none = ResolveContext::new();
        assert_eq!(classify("What is this game console", &none), ContentTag::Unknown);
        assert_eq!(classify("Video camera", &none), ContentTag::Unknown);
        assert_eq!(classify("Endgame poster", &none), ContentTag::Unknown);
    }

    #[test]
    fn test_daily_routine() {
        let none = ResolveContext::new();
        assert_eq!(
            classify("What do you eat for breakfast in the morning", &none),
            ContentTag::DailyRoutine
        );
        assert_eq!(
            classify("What time do you go to sleep at night", &none),
            ContentTag::DailyRoutine
        );
    }

    #[test]
    fn test_unit_context() {
        let unit8 = ResolveContext::new().with_unit("unit8");
        assert_eq!(classify("Slide 3", &unit8), ContentTag::Shapes);

        let unit4 = ResolveContext::new().with_book("3").with_unit("4");
        assert_eq!(classify("Slide 3", &unit4), ContentTag::Emotions);

        let hotels = ResolveContext::new().with_book("7").with_unit("4");
        assert_eq!(
            classify("What Vacation Is It – It Is A Beach Vacation", &hotels),
            ContentTag::Hotels
        );
    }

    #[test]
    fn test_unknown() {
        assert_eq!(
            classify("random_unmatched_string_123", &ResolveContext::new()),
            ContentTag::Unknown
        );
        let unmapped = ResolveContext::new().with_unit("6");
        assert_eq!(classify("Slide 3", &unmapped), ContentTag::Unknown);
    }

    #[test]
    fn test_color_words_are_whole_words() {
        assert_eq!(
            classify("Are you bored", &ResolveContext::new()),
            ContentTag::Unknown
        );
    }

    #[test]
    fn test_tag_names() {
        assert_eq!(ContentTag::CanDo.as_str(), "can-do");
        assert_eq!(
            serde_json::to_string(&ContentTag::BodyParts).unwrap(),
            "\"body-parts\""
        );
    }
}
