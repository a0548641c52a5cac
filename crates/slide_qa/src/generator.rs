//! Question Generator - synthesizes a QA pair from a tag and entities.
//!
//! Templates that need an entity decline when it is missing; tags without a
//! template always decline. A declined pair is never replaced by a guess.

use crate::classifier::ContentTag;
use crate::extract::{ExtractedEntities, VacationPhrase};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPair {
    pub question: String,
    pub answer: String,
}

impl GeneratedPair {
    fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// Build the pair for `tag`, or `None` when the template cannot be filled.
pub fn generate(
    tag: ContentTag,
    identifier: &str,
    entities: &ExtractedEntities,
) -> Option<GeneratedPair> {
    let lower = identifier.to_lowercase();

    match tag {
        ContentTag::ColorQuestion => generate_color_question(&lower, entities),
        ContentTag::WhatIsIt => generate_what_is_it(entities),
        ContentTag::Hotels => Some(generate_hotels(entities)),
        ContentTag::DailyRoutine => generate_daily_routine(&lower),
        ContentTag::FakeOrReal => Some(GeneratedPair::new(
            "Is the picture fake or real?",
            "The picture is fake. / The picture is real.",
        )),
        ContentTag::Weather => Some(GeneratedPair::new(
            "How is the weather today?",
            "The weather is sunny/rainy/cloudy/snowy/windy.",
        )),
        ContentTag::Emotions => Some(GeneratedPair::new(
            "How are you today?",
            "I am happy/sad/angry/tired/excited.",
        )),
        ContentTag::CanDo => Some(GeneratedPair::new(
            "Can you do this activity?",
            "Yes, I can. / No, I can't.",
        )),
        ContentTag::Worksheet => Some(GeneratedPair::new(
            "This is a worksheet activity.",
            "Complete the worksheet according to the instructions.",
        )),
        ContentTag::Game => Some(GeneratedPair::new(
            "This is an interactive game.",
            "Play the game according to the instructions.",
        )),
        ContentTag::Video => Some(GeneratedPair::new(
            "This is a video activity.",
            "Watch the video and follow along.",
        )),
        ContentTag::Numbers
        | ContentTag::Shapes
        | ContentTag::Family
        | ContentTag::Classroom
        | ContentTag::Animals
        | ContentTag::Food
        | ContentTag::Fruits
        | ContentTag::Vegetables
        | ContentTag::BodyParts
        | ContentTag::Unknown => None,
    }
}

// ============================================================================
// Agreement helpers
// ============================================================================

/// "a" or "an" for the word that follows.
pub fn article(word: &str) -> &'static str {
    match word.trim().chars().next().map(|c| c.to_ascii_lowercase()) {
        Some('a' | 'e' | 'i' | 'o' | 'u') => "an",
        _ => "a",
    }
}

/// Ends in "s" but not "ss".
pub fn is_plural(object: &str) -> bool {
    let object = object.trim();
    object.ends_with('s') && !object.ends_with("ss")
}

// ============================================================================
// Templates
// ============================================================================

fn generate_color_question(lower: &str, entities: &ExtractedEntities) -> Option<GeneratedPair> {
    let object = entities.object.as_deref()?;
    let color = entities.color.as_deref()?;
    let verb = if is_plural(object) { "are" } else { "is" };

    if lower.contains("fake or real") {
        return Some(GeneratedPair::new(
            format!("What colour {} the {}? Is the picture fake or real?", verb, object),
            format!(
                "The {o} {v} {c}. The picture is fake. / The {o} {v} {c}. The picture is real.",
                o = object,
                v = verb,
                c = color
            ),
        ));
    }

    Some(GeneratedPair::new(
        format!("What colour {} the {}?", verb, object),
        format!("The {} {} {}.", object, verb, color),
    ))
}

fn generate_what_is_it(entities: &ExtractedEntities) -> Option<GeneratedPair> {
    if let Some(kind) = entities.accommodation_type.as_deref() {
        return Some(GeneratedPair::new(
            "What is it?",
            format!("It is {} {}.", article(kind), kind),
        ));
    }

    let object = entities.object.as_deref()?;
    let described = match entities.color.as_deref() {
        Some(color) => format!("{} {}", color, object),
        None => object.to_string(),
    };
    Some(GeneratedPair::new(
        "What is it?",
        format!("It is {} {}.", article(&described), described),
    ))
}

fn generate_hotels(entities: &ExtractedEntities) -> GeneratedPair {
    if let (Some(phrase), Some(kind)) = (entities.vacation_phrase, entities.vacation_type.as_deref())
    {
        let a = article(kind);
        return match phrase {
            VacationPhrase::WhatVacation => GeneratedPair::new(
                "What vacation is it?",
                format!("It is {} {} vacation.", a, kind),
            ),
            VacationPhrase::InterestingOrBoring => GeneratedPair::new(
                format!("Do you think {} vacations are interesting or boring?", kind),
                format!("I think {} vacations are interesting.", kind),
            ),
            VacationPhrase::GoOn => GeneratedPair::new(
                format!("Do you go on {} vacations?", kind),
                format!(
                    "Yes, I do. I go on {k} vacations. / No, I don't. I don't go on {k} vacations.",
                    k = kind
                ),
            ),
            VacationPhrase::WouldLike => GeneratedPair::new(
                format!("Would you like to go on {} {} vacation?", a, kind),
                format!(
                    "Yes, I would like to go on {} {} vacation. / No, I wouldn't.",
                    a, kind
                ),
            ),
        };
    }

    if let Some(kind) = entities.accommodation_type.as_deref() {
        return GeneratedPair::new("What is it?", format!("It is {} {}.", article(kind), kind));
    }

    GeneratedPair::new(
        "What type of accommodation is shown in the picture?",
        "This is a [type of accommodation].",
    )
}

fn generate_daily_routine(lower: &str) -> Option<GeneratedPair> {
    if lower.contains("afternoon") && lower.contains("eat") {
        return Some(GeneratedPair::new(
            "What do you eat in the afternoon?",
            "I eat lunch in the afternoon.",
        ));
    }
    if lower.contains("dinner") && lower.contains("evening") {
        return Some(GeneratedPair::new(
            "What do you have for dinner in the evening?",
            "I have pasta/rice/meat/vegetables for dinner in the evening.",
        ));
    }
    if lower.contains("sleep") && lower.contains("night") {
        return Some(GeneratedPair::new(
            "What time do you go to sleep at night?",
            "I go to sleep at 9/10/11 o'clock at night.",
        ));
    }
    if lower.contains("breakfast") {
        return Some(GeneratedPair::new(
            "What do you eat for breakfast in the morning?",
            "I eat cereal/toast/eggs for breakfast in the morning.",
        ));
    }
    None
}
