//! Corpus snapshots and the store that serves them
//!
//! A snapshot bundles the surviving items with the vocabulary, vectors and
//! similarity matrix derived from them. It is built in one pass, never
//! mutated afterwards, and replaced wholesale on rebuild.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Instant;

use crate::models::{RawItem, SnapshotStats};

use super::normalizer;
use super::similarity::SimilarityMatrix;
use super::stop_words::StopWords;
use super::vectorizer::{CountVectorizer, FeatureVector, Vocabulary};

static NEXT_VERSION: AtomicU64 = AtomicU64::new(1);

/// Knobs for a snapshot build
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub max_features: usize,
    pub stop_words: StopWords,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            max_features: 5000,
            stop_words: StopWords::english(),
        }
    }
}

impl BuildOptions {
    pub fn with_max_features(mut self, max_features: usize) -> Self {
        self.max_features = max_features;
        self
    }
}

/// An item that made it into the corpus
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusItem {
    pub id: u64,
    pub title: String,
}

#[derive(Debug)]
pub struct CorpusSnapshot {
    version: u64,
    items: Vec<CorpusItem>,
    /// First corpus position per title
    positions: HashMap<String, usize>,
    vocabulary: Vocabulary,
    vectors: Vec<FeatureVector>,
    matrix: SimilarityMatrix,
    dropped: usize,
}

impl CorpusSnapshot {
    /// Runs normalization, vectorization and the similarity pass over `items`
    pub fn build(items: &[RawItem], options: &BuildOptions) -> Self {
        let started = Instant::now();
        let version = NEXT_VERSION.fetch_add(1, Ordering::Relaxed);

        let normalized = normalizer::normalize_all(items);
        let vectorizer = CountVectorizer::new(options.max_features, options.stop_words.clone());
        let (vocabulary, vectors) = vectorizer.fit_transform(&normalized.documents);
        let matrix = SimilarityMatrix::build(&vectors);

        let corpus_items: Vec<CorpusItem> = normalized
            .positions
            .iter()
            .map(|&p| CorpusItem {
                id: items[p].id,
                title: items[p].title.clone(),
            })
            .collect();

        let mut positions = HashMap::with_capacity(corpus_items.len());
        for (i, item) in corpus_items.iter().enumerate() {
            positions.entry(item.title.clone()).or_insert(i);
        }

        tracing::info!(
            version,
            items = corpus_items.len(),
            dropped = normalized.dropped,
            vocabulary_size = vocabulary.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Corpus snapshot built"
        );

        Self {
            version,
            items: corpus_items,
            positions,
            vocabulary,
            vectors,
            matrix,
            dropped: normalized.dropped,
        }
    }

    /// Snapshot with no items, used before the first build completes
    pub fn empty() -> Self {
        Self::build(&[], &BuildOptions::default())
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn items(&self) -> &[CorpusItem] {
        &self.items
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|item| item.title.as_str())
    }

    pub fn title_at(&self, index: usize) -> Option<&str> {
        self.items.get(index).map(|item| item.title.as_str())
    }

    /// Corpus position of `title`, the first one when titles repeat
    pub fn position_of(&self, title: &str) -> Option<usize> {
        self.positions.get(title).copied()
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn vectors(&self) -> &[FeatureVector] {
        &self.vectors
    }

    pub fn matrix(&self) -> &SimilarityMatrix {
        &self.matrix
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn stats(&self) -> SnapshotStats {
        SnapshotStats {
            version: self.version,
            item_count: self.items.len(),
            dropped_count: self.dropped,
            vocabulary_size: self.vocabulary.len(),
        }
    }
}

/// Shared handle to the snapshot currently serving queries
///
/// Readers take a cheap `Arc` clone and query it lock-free; the lock only
/// guards the pointer swap.
#[derive(Clone)]
pub struct SnapshotStore {
    current: Arc<RwLock<Arc<CorpusSnapshot>>>,
}

impl SnapshotStore {
    pub fn new(snapshot: CorpusSnapshot) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(snapshot))),
        }
    }

    pub fn current(&self) -> Arc<CorpusSnapshot> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&*guard),
            Err(poisoned) => Arc::clone(&*poisoned.into_inner()),
        }
    }

    /// Installs `snapshot`, returning the one it replaced
    pub fn replace(&self, snapshot: CorpusSnapshot) -> Arc<CorpusSnapshot> {
        let next = Arc::new(snapshot);
        let mut guard = match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let previous = std::mem::replace(&mut *guard, next);

        tracing::info!(
            previous_version = previous.version(),
            version = guard.version(),
            "Snapshot swapped"
        );

        previous
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items() -> Vec<RawItem> {
        vec![
            RawItem::new(1, "A", "space adventure war"),
            RawItem::new(2, "Blank", " "),
            RawItem::new(3, "B", "space war drama"),
            RawItem::new(4, "C", "romance drama family"),
            RawItem::new(5, "A", "romance"),
        ]
    }

    #[test]
    fn test_build_aligns_items_vectors_and_matrix() {
        let snapshot = CorpusSnapshot::build(&items(), &BuildOptions::default());
        assert_eq!(snapshot.len(), 4);
        assert_eq!(snapshot.vectors().len(), 4);
        assert_eq!(snapshot.matrix().len(), 4);
        assert_eq!(snapshot.titles().collect::<Vec<_>>(), vec!["A", "B", "C", "A"]);
        assert_eq!(snapshot.items()[1].id, 3);
        assert_eq!(snapshot.stats().dropped_count, 1);
        assert_eq!(snapshot.stats().vocabulary_size, 6);
    }

    #[test]
    fn test_duplicate_title_resolves_to_first() {
        let snapshot = CorpusSnapshot::build(&items(), &BuildOptions::default());
        assert_eq!(snapshot.position_of("A"), Some(0));
        assert_eq!(snapshot.position_of("missing"), None);
    }

    #[test]
    fn test_versions_increase() {
        let first = CorpusSnapshot::empty();
        let second = CorpusSnapshot::empty();
        assert!(second.version() > first.version());
        assert!(first.is_empty());
    }

    #[test]
    fn test_store_swaps_atomically() {
        let store = SnapshotStore::new(CorpusSnapshot::empty());
        let before = store.current();

        let rebuilt = CorpusSnapshot::build(&items(), &BuildOptions::default());
        let version = rebuilt.version();
        let previous = store.replace(rebuilt);

        assert_eq!(previous.version(), before.version());
        assert_eq!(store.current().version(), version);
        // Readers holding the old snapshot keep a consistent view
        assert!(before.is_empty());
        assert_eq!(store.current().len(), 4);
    }
}
