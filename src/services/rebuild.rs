use super::catalog::{CatalogError, CatalogSource};
use super::snapshot::{BuildOptions, CorpusSnapshot};

/// Loads the catalog and builds a fresh snapshot from it
///
/// CPU-bound and quadratic in the item count; run it off the request path.
pub fn build_snapshot(
    source: &dyn CatalogSource,
    options: &BuildOptions,
) -> Result<CorpusSnapshot, CatalogError> {
    tracing::info!(source = source.name(), max_features = options.max_features, "Rebuilding corpus");
    let items = source.load()?;
    Ok(CorpusSnapshot::build(&items, options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawItem;
    use crate::services::catalog::MockCatalogSource;

    #[test]
    fn test_build_snapshot_from_source() {
        let mut source = MockCatalogSource::new();
        source.expect_name().return_const("mock");
        source.expect_load().times(1).returning(|| {
            Ok(vec![
                RawItem::new(1, "A", "space adventure war"),
                RawItem::new(2, "B", "space war drama"),
            ])
        });

        let snapshot = build_snapshot(&source, &BuildOptions::default()).unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.position_of("B"), Some(1));
    }

    #[test]
    fn test_build_snapshot_propagates_load_failure() {
        let mut source = MockCatalogSource::new();
        source.expect_name().return_const("mock");
        source
            .expect_load()
            .returning(|| Err(CatalogError::Unavailable("disk gone".to_string())));

        let err = build_snapshot(&source, &BuildOptions::default()).unwrap_err();
        assert_eq!(err.to_string(), "catalog unavailable: disk gone");
    }
}
