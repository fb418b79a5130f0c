use serde::{Deserialize, Serialize};

/// A similar title with its cosine score rendered to two decimals
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Recommendation {
    pub title: String,
    pub score: String,
}

impl Recommendation {
    pub fn new(title: impl Into<String>, score: f64) -> Self {
        Self {
            title: title.into(),
            score: format_score(score),
        }
    }
}

/// Formats a similarity as "0.00".."1.00"
///
/// Takes `f64`: rounding an `f32` score can land on the other side of a
/// half-cent tie (123/200 gives "0.62" instead of "0.61").
pub fn format_score(score: f64) -> String {
    format!("{:.2}", score.clamp(0.0, 1.0))
}

/// Summary of the snapshot currently serving queries
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SnapshotStats {
    pub version: u64,
    pub item_count: usize,
    pub dropped_count: usize,
    pub vocabulary_size: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(0.8164966), "0.82");
        assert_eq!(format_score(0.0), "0.00");
        assert_eq!(format_score(1.0), "1.00");
        assert_eq!(format_score(1.0000001), "1.00");
    }

    #[test]
    fn test_format_score_rounds_half_cent_ties_at_full_precision() {
        assert_eq!(format_score(123.0 / 200.0), "0.61");
    }

    #[test]
    fn test_recommendation_serialization() {
        let rec = Recommendation::new("Avatar", 0.408);
        let json = serde_json::to_string(&rec).unwrap();
        assert_eq!(json, r#"{"title":"Avatar","score":"0.41"}"#);
    }
}
