//! Metadata normalization
//!
//! Turns one catalog row into the single lower-cased feature document the
//! vectorizer consumes: synopsis, genre names, keyword names, the first three
//! billed cast members and the director, joined by single spaces.
//!
//! Each structured column is parsed on its own. A column that does not parse
//! contributes nothing; it never takes the rest of the item down with it.

use rayon::prelude::*;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::models::{CastMember, CrewMember, FeatureDocument, NamedEntry, RawItem};

/// Number of billed cast members kept per item
pub const TOP_CAST: usize = 3;

const DIRECTOR_JOB: &str = "Director";

/// A structured column that could not be read as its typed schema
#[derive(Debug, Error)]
#[error("failed to parse {field} field: {source}")]
pub struct FieldParseError {
    pub field: &'static str,
    #[source]
    pub source: serde_json::Error,
}

fn parse_field<T: DeserializeOwned>(field: &'static str, raw: &str) -> Result<Vec<T>, FieldParseError> {
    serde_json::from_str(raw).map_err(|source| FieldParseError { field, source })
}

pub fn parse_genres(raw: &str) -> Result<Vec<NamedEntry>, FieldParseError> {
    parse_field("genres", raw)
}

pub fn parse_keywords(raw: &str) -> Result<Vec<NamedEntry>, FieldParseError> {
    parse_field("keywords", raw)
}

pub fn parse_cast(raw: &str) -> Result<Vec<CastMember>, FieldParseError> {
    parse_field("cast", raw)
}

pub fn parse_crew(raw: &str) -> Result<Vec<CrewMember>, FieldParseError> {
    parse_field("crew", raw)
}

fn join_names(entries: &[NamedEntry]) -> String {
    entries
        .iter()
        .map(|entry| entry.name.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Space-joined names of the first `TOP_CAST` cast entries in listing order
pub fn top_cast(cast: &[CastMember]) -> String {
    cast.iter()
        .take(TOP_CAST)
        .map(|member| member.name.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Name of the first crew entry whose job is exactly "Director"
pub fn director(crew: &[CrewMember]) -> Option<&str> {
    crew.iter()
        .find(|member| member.job == DIRECTOR_JOB)
        .map(|member| member.name.as_str())
}

/// Resolves a field parse into its text contribution, logging what was lost
fn or_empty(item: &RawItem, parsed: Result<String, FieldParseError>) -> String {
    match parsed {
        Ok(text) => text,
        Err(e) => {
            tracing::debug!(item_id = item.id, title = %item.title, error = %e, "Field ignored");
            String::new()
        }
    }
}

/// Builds the feature document for one item, `None` when it has no text at all
pub fn normalize(item: &RawItem) -> Option<FeatureDocument> {
    let genres = or_empty(item, parse_genres(&item.genres).map(|g| join_names(&g)));
    let keywords = or_empty(item, parse_keywords(&item.keywords).map(|k| join_names(&k)));
    let cast = or_empty(item, parse_cast(&item.cast).map(|c| top_cast(&c)));
    let director = or_empty(
        item,
        parse_crew(&item.crew).map(|c| director(&c).unwrap_or_default().to_string()),
    );

    let text = [
        item.synopsis.as_str(),
        genres.as_str(),
        keywords.as_str(),
        cast.as_str(),
        director.as_str(),
    ]
    .join(" ")
    .to_lowercase();

    FeatureDocument::new(text)
}

/// Documents that survived normalization, aligned with their source rows
#[derive(Debug, Default)]
pub struct NormalizedCorpus {
    /// Index into the input slice for each document
    pub positions: Vec<usize>,
    pub documents: Vec<FeatureDocument>,
    pub dropped: usize,
}

/// Normalizes every item in parallel, preserving input order
pub fn normalize_all(items: &[RawItem]) -> NormalizedCorpus {
    let normalized: Vec<Option<FeatureDocument>> = items.par_iter().map(normalize).collect();

    let mut corpus = NormalizedCorpus::default();
    for (position, document) in normalized.into_iter().enumerate() {
        match document {
            Some(document) => {
                corpus.positions.push(position);
                corpus.documents.push(document);
            }
            None => corpus.dropped += 1,
        }
    }

    if corpus.dropped > 0 {
        tracing::info!(dropped = corpus.dropped, "Dropped items with empty feature documents");
    }

    corpus
}
