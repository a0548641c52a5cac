//! Command handlers for slideqa.

use anyhow::{Context, Result};
use serde::Serialize;
use slide_qa::{
    normalize_answer, KnowledgeTables, Overrides, QaRecord, ResolveContext, Resolver,
    ResolverConfig,
};
use std::fs;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;
use tracing::info;

use crate::cli::ContextArgs;
use crate::output;

/// One JSON Lines row of batch output
#[derive(Serialize)]
struct BatchLine<'a> {
    identifier: &'a str,
    #[serde(flatten)]
    record: &'a QaRecord,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ClassifyOutput<'a> {
    identifier: &'a str,
    tag: slide_qa::ContentTag,
    entities: &'a slide_qa::ExtractedEntities,
}

fn load_overrides(path: Option<&Path>) -> Result<Overrides> {
    match path {
        Some(path) => Overrides::load(path)
            .with_context(|| format!("Failed to load overrides from {}", path.display())),
        None => Ok(Overrides::new()),
    }
}

/// Handle resolve command
pub fn handle_resolve(
    resolver: &Resolver,
    identifier: &str,
    context: &ContextArgs,
    overrides: Option<&Path>,
    json: bool,
) -> Result<()> {
    let overrides = load_overrides(overrides)?;
    let record = resolver.resolve(identifier, &context.to_context(), &overrides);

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        output::display_record(identifier, &record);
    }
    Ok(())
}

/// Handle batch command
pub fn handle_batch(
    resolver: &Resolver,
    file: Option<&Path>,
    context: &ContextArgs,
    overrides: Option<&Path>,
) -> Result<()> {
    let overrides = load_overrides(overrides)?;
    let context: ResolveContext = context.to_context();

    let reader: Box<dyn BufRead> = match file {
        Some(path) => Box::new(BufReader::new(
            fs::File::open(path).with_context(|| format!("Failed to open {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut count = 0usize;
    let mut resolved = 0usize;
    for line in reader.lines() {
        let line = line.context("Failed to read input")?;
        let identifier = line.trim();
        if identifier.is_empty() {
            continue;
        }
        let record = resolver.resolve(identifier, &context, &overrides);
        count += 1;
        if record.has_data {
            resolved += 1;
        }
        serde_json::to_writer(&mut out, &BatchLine { identifier, record: &record })?;
        writeln!(out)?;
    }
    info!("Batch resolved {} of {} identifiers", resolved, count);
    Ok(())
}

/// Handle classify command
pub fn handle_classify(
    resolver: &Resolver,
    identifier: &str,
    context: &ContextArgs,
    json: bool,
) -> Result<()> {
    let context = context.to_context();
    let tag = resolver.classify(identifier, &context);
    let entities = resolver.extract(identifier, &context);

    if json {
        let output = ClassifyOutput {
            identifier,
            tag,
            entities: &entities,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        output::display_classification(identifier, tag, &entities);
    }
    Ok(())
}

/// Handle normalize command
pub fn handle_normalize(question: &str, answer: &str) -> Result<()> {
    println!("{}", normalize_answer(question, answer));
    Ok(())
}

/// Handle check command
pub fn handle_check(config: &ResolverConfig, knowledge: Option<&Path>) -> Result<()> {
    let path = knowledge.or(config.knowledge_path.as_deref());
    let stats = match path {
        Some(path) => KnowledgeTables::load(path)
            .with_context(|| format!("Invalid knowledge tables in {}", path.display()))?
            .stats(),
        None => KnowledgeTables::builtin()
            .context("Invalid built-in knowledge tables")?
            .stats(),
    };

    let source = path
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "built-in".to_string());
    println!("knowledge tables OK ({})", source);
    println!("  codes           {}", stats.codes);
    println!("  regions         {}", stats.regions);
    println!("  units           {}", stats.units);
    println!("  colours         {}", stats.colors);
    println!("  typical colours {}", stats.typical_colors);
    Ok(())
}

/// Handle config command
pub fn handle_config(config: &ResolverConfig) -> Result<()> {
    print!("{}", config.to_toml_string()?);
    Ok(())
}
