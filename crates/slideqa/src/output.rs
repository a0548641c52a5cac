//! Output formatting - plain terminal rendering of records.

use owo_colors::OwoColorize;
use slide_qa::{ContentTag, ExtractedEntities, QaRecord};

/// Display a resolved record
pub fn display_record(identifier: &str, record: &QaRecord) {
    println!();
    println!("{} {}", "[IDENTIFIER]".dimmed(), identifier);

    if !record.has_data {
        println!("{}", "[NO DATA] nothing to display".yellow());
        println!();
        return;
    }

    let source = if record.source.is_authored() {
        record.source.as_str().bright_green().to_string()
    } else {
        record.source.as_str().yellow().to_string()
    };
    println!("{} {}", "[SOURCE]".dimmed(), source);
    if !record.label.is_empty() {
        println!("{} {}", "[LABEL]".dimmed(), record.label.cyan());
    }
    println!();
    println!("  Q: {}", record.question.bold());
    println!("  A: {}", record.answer);
    println!();
}

/// Display a classification with its entities
pub fn display_classification(identifier: &str, tag: ContentTag, entities: &ExtractedEntities) {
    println!();
    println!("{} {}", "[IDENTIFIER]".dimmed(), identifier);
    println!("{} {}", "[TAG]".dimmed(), tag.as_str().cyan());

    let fields = [
        ("short code", entities.short_code.as_deref()),
        ("object", entities.object.as_deref()),
        ("colour", entities.color.as_deref()),
        ("country", entities.country.as_deref()),
        ("category", entities.category.as_deref()),
        ("vacation", entities.vacation_type.as_deref()),
        ("accommodation", entities.accommodation_type.as_deref()),
    ];
    for (name, value) in fields {
        if let Some(value) = value {
            println!("  {:<14} {}", name, value);
        }
    }
    println!();
}
