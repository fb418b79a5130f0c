use std::collections::BTreeSet;

use crate::models::Recommendation;

use super::similarity::cosine;
use super::snapshot::{CorpusSnapshot, SnapshotStore};

/// Number of similar titles returned when the caller does not say
pub const DEFAULT_RECOMMENDATIONS: usize = 10;

/// Finds the `k` titles most similar to `title` within one snapshot
///
/// An unknown title yields an empty list. When titles repeat, the first one
/// in corpus order is the query item. Ranking uses the stored matrix; the
/// reported scores are recomputed at full precision for the returned items.
pub fn recommend(snapshot: &CorpusSnapshot, title: &str, k: usize) -> Vec<Recommendation> {
    let Some(index) = snapshot.position_of(title) else {
        tracing::debug!(title = %title, "Unknown title");
        return vec![];
    };

    match snapshot.matrix().neighbors(index, k) {
        Ok(neighbors) => {
            let vectors = snapshot.vectors();
            neighbors
                .into_iter()
                .filter_map(|n| {
                    let score = cosine(&vectors[index], &vectors[n.index]);
                    snapshot
                        .title_at(n.index)
                        .map(|title| Recommendation::new(title, score))
                })
                .collect()
        }
        Err(e) => {
            tracing::error!(
                title = %title,
                version = snapshot.version(),
                error = %e,
                "Snapshot lookup failed"
            );
            vec![]
        }
    }
}

/// Sorted, de-duplicated titles, capped at `limit`
pub fn list_titles(snapshot: &CorpusSnapshot, limit: usize) -> Vec<String> {
    snapshot
        .titles()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .take(limit)
        .map(str::to_string)
        .collect()
}

/// Query entry point bound to whatever snapshot is current
#[derive(Clone)]
pub struct Recommender {
    store: SnapshotStore,
    count: usize,
}

impl Recommender {
    pub fn new(store: SnapshotStore, count: usize) -> Self {
        Self { store, count }
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    /// Top similar titles using the configured count
    pub fn recommend(&self, title: &str) -> Vec<Recommendation> {
        recommend(&self.store.current(), title, self.count)
    }

    pub fn list_titles(&self, limit: usize) -> Vec<String> {
        list_titles(&self.store.current(), limit)
    }
}
