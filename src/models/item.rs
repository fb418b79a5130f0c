use serde::{Deserialize, Serialize};

/// One catalog row as supplied by ingestion
///
/// Structured columns keep their source representation (JSON arrays of
/// objects); the normalizer owns parsing them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawItem {
    pub id: u64,
    pub title: String,
    pub synopsis: String,
    pub genres: String,
    pub keywords: String,
    pub cast: String,
    pub crew: String,
}

impl RawItem {
    /// Creates an item with a synopsis and no structured metadata
    pub fn new(id: u64, title: impl Into<String>, synopsis: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            synopsis: synopsis.into(),
            genres: "[]".to_string(),
            keywords: "[]".to_string(),
            cast: "[]".to_string(),
            crew: "[]".to_string(),
        }
    }
}

/// Genre or keyword entry: `{"id": 28, "name": "Action"}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NamedEntry {
    pub name: String,
}

/// Billed cast member; listing order is billing order, other keys are ignored
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CastMember {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CrewMember {
    pub name: String,
    pub job: String,
}

/// Lower-cased text blob a single item contributes to the corpus
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureDocument(String);

impl FeatureDocument {
    /// Wraps already-normalized text, `None` when nothing but whitespace remains
    pub fn new(text: String) -> Option<Self> {
        if text.trim().is_empty() {
            None
        } else {
            Some(Self(text))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for FeatureDocument {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
