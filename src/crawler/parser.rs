//! HTML parser for extracting tournaments from the schedule page
//!
//! Extraction is driven by an [`ExtractionSchema`]: a row selector, one
//! selector per field and an ordered chain of places to read the key from.
//! The schema is compiled once into a [`CompiledSchema`].
//!
//! Extraction never fails. Missing fields are left empty, rows without a name
//! are dropped, and a page without rows yields an empty list.

use crate::config::ExtractionSchema;
use crate::state::Tournament;
use crate::ConfigError;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;

/// One compiled step of the key fallback chain
#[derive(Debug, Clone)]
struct CompiledKeyRule {
    selector: Option<Selector>,
    attribute: String,
}

/// An [`ExtractionSchema`] with every selector parsed
#[derive(Debug, Clone)]
pub struct CompiledSchema {
    row: Selector,
    key: Vec<CompiledKeyRule>,
    name: Selector,
    date: Selector,
    location: Selector,
    fallback_key_prefix: String,
}

impl CompiledSchema {
    /// Parses every selector in the schema
    ///
    /// # Returns
    ///
    /// * `Ok(CompiledSchema)` - All selectors are valid
    /// * `Err(ConfigError::InvalidSelector)` - The first selector that failed to parse
    pub fn compile(schema: &ExtractionSchema) -> Result<Self, ConfigError> {
        let key = schema
            .key
            .iter()
            .map(|rule| -> Result<CompiledKeyRule, ConfigError> {
                Ok(CompiledKeyRule {
                    selector: rule.selector.as_deref().map(parse_selector).transpose()?,
                    attribute: rule.attribute.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            row: parse_selector(&schema.row)?,
            key,
            name: parse_selector(&schema.name)?,
            date: parse_selector(&schema.date)?,
            location: parse_selector(&schema.location)?,
            fallback_key_prefix: schema.fallback_key_prefix.clone(),
        })
    }
}

fn parse_selector(selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector).map_err(|e| ConfigError::InvalidSelector {
        selector: selector.to_string(),
        message: format!("{:?}", e),
    })
}

/// Extracts tournaments from schedule pages
#[derive(Debug, Clone)]
pub struct Extractor {
    schema: CompiledSchema,
}

impl Extractor {
    /// Creates an extractor for the given schema
    pub fn new(schema: &ExtractionSchema) -> Result<Self, ConfigError> {
        Ok(Self {
            schema: CompiledSchema::compile(schema)?,
        })
    }

    /// Extracts every named tournament from `html`, in document order
    ///
    /// When two rows resolve to the same key only the first is kept, so keys
    /// are unique within the result.
    pub fn extract(&self, html: &str) -> Vec<Tournament> {
        let document = Html::parse_document(html);
        let rows: Vec<ElementRef> = document.select(&self.schema.row).collect();

        tracing::info!("Found {} tournament rows", rows.len());

        let mut seen = HashSet::new();
        let mut tournaments = Vec::new();

        for (index, row) in rows.into_iter().enumerate() {
            let Some(tournament) = self.extract_row(row, index) else {
                tracing::debug!("Skipping row {}: no name found", index + 1);
                continue;
            };

            if !seen.insert(tournament.key.clone()) {
                tracing::debug!(
                    "Skipping row {}: duplicate key '{}'",
                    index + 1,
                    tournament.key
                );
                continue;
            }

            tracing::debug!("Tournament {}: {}", index + 1, tournament);
            tournaments.push(tournament);
        }

        tracing::info!("Extracted {} tournaments", tournaments.len());
        tournaments
    }

    /// Builds a tournament from one row, or `None` when it has no name
    fn extract_row(&self, row: ElementRef<'_>, index: usize) -> Option<Tournament> {
        let name = first_text(row, &self.schema.name);
        if name.is_empty() {
            return None;
        }

        Some(Tournament {
            key: self.extract_key(row, index),
            name,
            date: first_text(row, &self.schema.date),
            location: first_text(row, &self.schema.location),
        })
    }

    /// Walks the key chain, falling back to a positional key
    fn extract_key(&self, row: ElementRef<'_>, index: usize) -> String {
        self.schema
            .key
            .iter()
            .find_map(|rule| {
                let element = match &rule.selector {
                    Some(selector) => row.select(selector).next()?,
                    None => row,
                };
                element
                    .value()
                    .attr(&rule.attribute)
                    .map(str::trim)
                    .filter(|value| !value.is_empty())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| format!("{}-{}", self.schema.fallback_key_prefix, index))
    }
}

/// Trimmed text of the first element matching `selector` inside `row`
fn first_text(row: ElementRef<'_>, selector: &Selector) -> String {
    row.select(selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

/// Convenience function for extracting tournaments with the default schema
pub fn extract_tournaments(html: &str) -> Vec<Tournament> {
    Extractor::new(&ExtractionSchema::default())
        .map(|extractor| extractor.extract(html))
        .unwrap_or_default()
}
