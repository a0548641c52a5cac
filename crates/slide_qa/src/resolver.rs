//! Resolver - the ordered strategy chain.
//!
//! 1. override keyed by identifier        -> DirectMatch
//! 2. override keyed by short code        -> SectionMatch
//! 3. code database, exact code           -> CodeExact
//! 4. code database, first "NN x" prefix  -> CodePrefix
//! 5. keyword heuristics                  -> Keyword
//! 6. classifier + generator              -> Generated
//! 7. dash / question / title parsing     -> TitleParse
//! 8. blank record                        -> Fallback
//!
//! Each step returns a record or declines. The first record wins and, unless
//! it came from an override, goes through the answer normalizer.

use crate::classifier::{context_tag, ContentClassifier, ContentTag};
use crate::config::ResolverConfig;
use crate::error::Result;
use crate::extract::{extract_entities, strip_extension, ExtractedEntities};
use crate::generator::generate;
use crate::heuristics::keyword_record;
use crate::knowledge::KnowledgeTables;
use crate::normalizer::normalize_answer;
use crate::title_parse::{parse_identifier, parse_title};
use crate::types::{Overrides, QaRecord, ResolutionSource, ResolveContext};
use once_cell::sync::Lazy;
use std::sync::Arc;
use tracing::{debug, error, trace};

/// Length of the "NN x" section prefix of a short code.
const SECTION_PREFIX_LEN: usize = 4;

static DEFAULT_RESOLVER: Lazy<Option<Resolver>> = Lazy::new(|| match Resolver::builtin() {
    Ok(resolver) => Some(resolver),
    Err(e) => {
        error!("Built-in knowledge tables failed to load: {}", e);
        None
    }
});

/// Resolve with the built-in tables and default configuration.
pub fn resolve(
    identifier: &str,
    context: Option<&ResolveContext>,
    overrides: Option<&Overrides>,
) -> QaRecord {
    let Some(resolver) = DEFAULT_RESOLVER.as_ref() else {
        return QaRecord::blank();
    };
    let empty_context = ResolveContext::default();
    let empty_overrides = Overrides::default();
    resolver.resolve(
        identifier,
        context.unwrap_or(&empty_context),
        overrides.unwrap_or(&empty_overrides),
    )
}

pub struct Resolver {
    tables: Arc<KnowledgeTables>,
    classifier: ContentClassifier,
    config: ResolverConfig,
}

impl Resolver {
    pub fn new(tables: Arc<KnowledgeTables>) -> Self {
        Self {
            tables,
            classifier: ContentClassifier::new(),
            config: ResolverConfig::default(),
        }
    }

    /// Resolver over the embedded tables.
    pub fn builtin() -> Result<Self> {
        Ok(Self::new(KnowledgeTables::builtin()?))
    }

    /// Resolver over the tables named by `config`, or the embedded ones.
    pub fn from_config(config: &ResolverConfig) -> Result<Self> {
        let tables = match &config.knowledge_path {
            Some(path) => Arc::new(KnowledgeTables::load(path)?),
            None => KnowledgeTables::builtin()?,
        };
        Ok(Self::new(tables).with_config(config.clone()))
    }

    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn tables(&self) -> &KnowledgeTables {
        &self.tables
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn classify(&self, identifier: &str, context: &ResolveContext) -> ContentTag {
        self.classifier.classify(identifier, context, &self.tables)
    }

    pub fn extract(&self, identifier: &str, context: &ResolveContext) -> ExtractedEntities {
        let hotels = context_tag(context, &self.tables) == Some(ContentTag::Hotels);
        extract_entities(identifier, &self.tables, hotels)
    }

    /// Resolve one identifier. Never fails; the worst case is a blank record.
    pub fn resolve(
        &self,
        identifier: &str,
        context: &ResolveContext,
        overrides: &Overrides,
    ) -> QaRecord {
        let entities = self.extract(identifier, context);
        let record = self.run_strategies(identifier, context, overrides, &entities);

        debug!(
            "Resolved {:?} via {} (code: {})",
            identifier,
            record.source,
            entities.short_code.as_deref().unwrap_or("-")
        );

        let authored_override = matches!(
            record.source,
            ResolutionSource::DirectMatch | ResolutionSource::SectionMatch
        );
        if self.config.normalize_answers && record.has_data && !authored_override {
            let answer = normalize_answer(&record.question, &record.answer);
            return QaRecord::new(record.question, answer, record.label, record.source);
        }
        record
    }

    /// Resolve many identifiers sharing one context, preserving order.
    pub fn resolve_batch<'a, I>(
        &self,
        identifiers: I,
        context: &ResolveContext,
        overrides: &Overrides,
    ) -> Vec<QaRecord>
    where
        I: IntoIterator<Item = &'a str>,
    {
        identifiers
            .into_iter()
            .map(|identifier| self.resolve(identifier, context, overrides))
            .collect()
    }

    fn run_strategies(
        &self,
        identifier: &str,
        context: &ResolveContext,
        overrides: &Overrides,
        entities: &ExtractedEntities,
    ) -> QaRecord {
        // Overrides without content decline
        let authored = |key: &str| overrides.get(key).filter(|record| !record.is_blank());

        // 1. Override by identifier, with or without media extension
        let direct = authored(identifier).or_else(|| authored(strip_extension(identifier)));
        if let Some(record) = direct {
            return record.restamped(ResolutionSource::DirectMatch);
        }

        if let Some(code) = entities.short_code.as_deref() {
            let section = code.get(..SECTION_PREFIX_LEN).unwrap_or(code);

            // 2. Override by code, then by "NN x" section
            if let Some(record) = authored(code).or_else(|| authored(section)) {
                return record.restamped(ResolutionSource::SectionMatch);
            }

            // 3. Exact code
            if let Some(entry) = self.tables.code(code) {
                return entry.to_record(ResolutionSource::CodeExact);
            }

            // 4. Section prefix, first in table order
            if let Some(entry) = self.tables.first_with_prefix(section) {
                return entry.to_record(ResolutionSource::CodePrefix);
            }
            trace!("No code entry for {}", code);
        }

        // 5. Keyword heuristics
        if let Some(record) = keyword_record(identifier, entities, &self.tables) {
            return record;
        }

        // 6. Classifier + generator
        let tag = self.classify(identifier, context);
        if let Some(pair) = generate(tag, identifier, entities) {
            let label = context
                .unit_number()
                .and_then(|unit| self.tables.unit_rule(unit, context.book_number()))
                .map(|rule| rule.topic.clone())
                .unwrap_or_default();
            return QaRecord::new(pair.question, pair.answer, label, ResolutionSource::Generated);
        }
        trace!("Generator declined {:?} (tag {})", identifier, tag);

        // 7. Title parsing
        if self.config.title_fallback {
            let description = context.description.as_deref();
            let parsed = parse_identifier(identifier)
                .or_else(|| {
                    context
                        .title
                        .as_deref()
                        .and_then(|title| parse_title(title, description, &self.tables))
                })
                .or_else(|| parse_title(identifier, description, &self.tables));
            if let Some(record) = parsed {
                return record;
            }
        }

        // 8. Nothing applies
        QaRecord::blank()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> Resolver {
        Resolver::builtin().unwrap()
    }

    fn none() -> (ResolveContext, Overrides) {
        (ResolveContext::new(), Overrides::new())
    }

    #[test]
    fn test_code_exact() {
        let (ctx, ov) = none();
        let record = resolver().resolve("01 r a", &ctx, &ov);
        assert_eq!(record.label, "POLAND");
        assert_eq!(record.question, "What country is this?");
        assert_eq!(record.answer, "It is Poland.");
        assert_eq!(record.source, ResolutionSource::CodeExact);
        assert!(record.has_data);
    }

    #[test]
    fn test_code_prefix() {
        let (ctx, ov) = none();
        let record = resolver().resolve("01 R Z What is this", &ctx, &ov);
        assert_eq!(record.source, ResolutionSource::CodePrefix);
        assert_eq!(record.answer, "It is Poland.");
    }

    #[test]
    fn test_override_section_key() {
        let ov = Overrides::new().with_entry(
            "05 l",
            QaRecord::new("Custom?", "Custom.", "ENGLAND", ResolutionSource::Fallback),
        );
        let record = resolver().resolve("05 L C What is England's capital", &ResolveContext::new(), &ov);
        assert_eq!(record.source, ResolutionSource::SectionMatch);
        assert_eq!(record.question, "Custom?");
    }

    #[test]
    fn test_override_without_extension() {
        let ov = Overrides::new().with_entry(
            "Slide 4",
            QaRecord::new("Q?", "A.", "", ResolutionSource::Fallback),
        );
        let record = resolver().resolve("Slide 4.png", &ResolveContext::new(), &ov);
        assert_eq!(record.source, ResolutionSource::DirectMatch);
    }

    #[test]
    fn test_empty_override_declines() {
        let empty = QaRecord::new("", "", "", ResolutionSource::Fallback);
        let ov = Overrides::new()
            .with_entry("01 r a", empty.clone())
            .with_entry("01 r", empty);
        let record = resolver().resolve("01 r a", &ResolveContext::new(), &ov);
        assert_eq!(record.source, ResolutionSource::CodeExact);
        assert_eq!(record.answer, "It is Poland.");
        assert!(record.has_data);
    }

    #[test]
    fn test_overrides_are_not_normalized() {
        let ov = Overrides::new().with_entry(
            "dog.gif",
            QaRecord::new("Do you have a dog?", "Yes", "", ResolutionSource::Fallback),
        );
        let record = resolver().resolve("dog.gif", &ResolveContext::new(), &ov);
        assert_eq!(record.answer, "Yes");
    }

    #[test]
    fn test_generated_label_uses_unit_topic() {
        let ctx = ResolveContext::new().with_unit("17");
        let record = resolver().resolve("Slide 2", &ctx, &Overrides::new());
        assert_eq!(record.source, ResolutionSource::Generated);
        assert_eq!(record.question, "How is the weather today?");
        assert_eq!(record.label, "HOW IS THE WEATHER");
    }

    #[test]
    fn test_generated_answers_are_normalized() {
        let (ctx, ov) = none();
        let record = resolver().resolve("09 N I Do You Have A School Bag", &ctx, &ov);
        assert_eq!(record.source, ResolutionSource::TitleParse);
        assert_eq!(
            record.answer,
            "Yes, I do. I have a school bag. / No, I don't have a school bag."
        );
    }

    #[test]
    fn test_normalization_can_be_disabled() {
        let config = ResolverConfig {
            normalize_answers: false,
            ..ResolverConfig::default()
        };
        let resolver = resolver().with_config(config);
        let record = resolver.resolve(
            "09 N I Do You Have A School Bag",
            &ResolveContext::new(),
            &Overrides::new(),
        );
        assert!(record.answer.starts_with("Yes, I have a school bag."));
    }

    #[test]
    fn test_title_fallback_can_be_disabled() {
        let config = ResolverConfig {
            title_fallback: false,
            ..ResolverConfig::default()
        };
        let record = resolver().with_config(config).resolve(
            "POLAND (Files)",
            &ResolveContext::new(),
            &Overrides::new(),
        );
        assert!(!record.has_data);
    }

    #[test]
    fn test_context_title() {
        let ctx = ResolveContext::new()
            .with_title("What animal is this?")
            .with_description("It is a kangaroo.");
        let record = resolver().resolve("IMG_0042", &ctx, &Overrides::new());
        assert_eq!(record.source, ResolutionSource::TitleParse);
        assert_eq!(record.answer, "It is a kangaroo.");
    }

    #[test]
    fn test_batch_preserves_order() {
        let (ctx, ov) = none();
        let records = resolver().resolve_batch(
            ["01 r a", "random_unmatched_string_123", "04 l c"],
            &ctx,
            &ov,
        );
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].label, "POLAND");
        assert!(!records[1].has_data);
        assert_eq!(records[2].answer, "It is Edinburgh.");
    }

    #[test]
    fn test_free_function_defaults() {
        let record = resolve("01 r a", None, None);
        assert_eq!(record.source, ResolutionSource::CodeExact);
        let record = resolve("random_unmatched_string_123", None, None);
        assert_eq!(record, QaRecord::blank());
    }
}
