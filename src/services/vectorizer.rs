//! Bag-of-words vocabulary and term-count vectors
//!
//! The vocabulary keeps the `max_features` most frequent non-stop-word terms
//! across the whole corpus. Terms with equal frequency keep the order in
//! which they were first seen, so the same corpus always yields the same
//! vocabulary.

use std::collections::HashMap;

use rayon::prelude::*;

use super::stop_words::StopWords;

/// Minimum token length, in characters
const MIN_TOKEN_LEN: usize = 2;

/// Splits text into lower-cased word tokens
///
/// A token is a maximal run of alphanumeric characters or `_` at least two
/// characters long. Building and counting both go through this function.
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| token.chars().count() >= MIN_TOKEN_LEN)
        .map(str::to_lowercase)
}

/// Ordered set of terms used as vector dimensions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    terms: Vec<String>,
    index: HashMap<String, usize>,
}

impl Vocabulary {
    fn from_terms(terms: Vec<String>) -> Self {
        let index = terms
            .iter()
            .enumerate()
            .map(|(i, term)| (term.clone(), i))
            .collect();
        Self { terms, index }
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Term counts for one document over a fixed vocabulary
///
/// Only non-zero components are stored, sorted by term index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureVector {
    dimension: usize,
    entries: Vec<(usize, u32)>,
}

impl FeatureVector {
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Count for the term at `term_index`, zero when absent or out of range
    pub fn count(&self, term_index: usize) -> u32 {
        self.entries
            .binary_search_by_key(&term_index, |&(i, _)| i)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0)
    }

    /// Non-zero `(term_index, count)` pairs in term order
    pub fn entries(&self) -> &[(usize, u32)] {
        &self.entries
    }

    pub fn to_dense(&self) -> Vec<u32> {
        let mut dense = vec![0; self.dimension];
        for &(i, count) in &self.entries {
            dense[i] = count;
        }
        dense
    }

    pub fn magnitude(&self) -> f64 {
        self.entries
            .iter()
            .map(|&(_, c)| f64::from(c) * f64::from(c))
            .sum::<f64>()
            .sqrt()
    }

    pub fn dot(&self, other: &FeatureVector) -> f64 {
        let (a, b) = (&self.entries, &other.entries);
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < a.len() && j < b.len() {
            match a[i].0.cmp(&b[j].0) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += f64::from(a[i].1) * f64::from(b[j].1);
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }
}

/// Count vectorizer with a bounded vocabulary
#[derive(Debug, Clone)]
pub struct CountVectorizer {
    max_features: usize,
    stop_words: StopWords,
}

impl Default for CountVectorizer {
    fn default() -> Self {
        Self::new(5000, StopWords::english())
    }
}

impl CountVectorizer {
    pub fn new(max_features: usize, stop_words: StopWords) -> Self {
        Self {
            max_features,
            stop_words,
        }
    }

    fn terms<'a>(&'a self, document: &'a str) -> impl Iterator<Item = String> + 'a {
        tokenize(document).filter(|token| !self.stop_words.contains(token))
    }

    /// Ranks terms by total corpus frequency and keeps the top `max_features`
    pub fn build_vocabulary<S: AsRef<str>>(&self, documents: &[S]) -> Vocabulary {
        if self.max_features == 0 {
            return Vocabulary::default();
        }

        // (first seen, total count) per term
        let mut frequencies: HashMap<String, (usize, u64)> = HashMap::new();
        for document in documents {
            for term in self.terms(document.as_ref()) {
                let next_rank = frequencies.len();
                frequencies.entry(term).or_insert((next_rank, 0)).1 += 1;
            }
        }

        let mut ranked: Vec<(String, usize, u64)> = frequencies
            .into_iter()
            .map(|(term, (first_seen, count))| (term, first_seen, count))
            .collect();
        ranked.sort_by(|a, b| b.2.cmp(&a.2).then(a.1.cmp(&b.1)));
        ranked.truncate(self.max_features);

        Vocabulary::from_terms(ranked.into_iter().map(|(term, _, _)| term).collect())
    }

    /// Counts vocabulary terms in one document
    pub fn vectorize(&self, vocabulary: &Vocabulary, document: &str) -> FeatureVector {
        let mut counts: HashMap<usize, u32> = HashMap::new();
        for term in self.terms(document) {
            if let Some(i) = vocabulary.index_of(&term) {
                *counts.entry(i).or_insert(0) += 1;
            }
        }

        let mut entries: Vec<(usize, u32)> = counts.into_iter().collect();
        entries.sort_unstable_by_key(|&(i, _)| i);

        FeatureVector {
            dimension: vocabulary.len(),
            entries,
        }
    }

    /// Builds the vocabulary, then one vector per document in input order
    pub fn fit_transform<S: AsRef<str> + Sync>(
        &self,
        documents: &[S],
    ) -> (Vocabulary, Vec<FeatureVector>) {
        let vocabulary = self.build_vocabulary(documents);
        let vectors = documents
            .par_iter()
            .map(|document| self.vectorize(&vocabulary, document.as_ref()))
            .collect();

        tracing::debug!(
            documents = documents.len(),
            vocabulary_size = vocabulary.len(),
            "Vectorized corpus"
        );

        (vocabulary, vectors)
    }
}
