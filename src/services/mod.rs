pub mod catalog;
pub mod normalizer;
pub mod rebuild;
pub mod recommendations;
pub mod similarity;
pub mod snapshot;
pub mod stop_words;
pub mod vectorizer;

pub use recommendations::Recommender;
pub use snapshot::{BuildOptions, CorpusSnapshot, SnapshotStore};
