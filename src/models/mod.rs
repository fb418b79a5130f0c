pub mod item;
pub mod recommendation;

pub use item::{CastMember, CrewMember, FeatureDocument, NamedEntry, RawItem};
pub use recommendation::{Recommendation, SnapshotStats};
