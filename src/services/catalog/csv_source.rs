use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::{CatalogError, CatalogSource};
use crate::models::RawItem;

const MOVIE_COLUMNS: [&str; 5] = ["id", "title", "overview", "genres", "keywords"];
const CREDIT_COLUMNS: [&str; 3] = ["title", "cast", "crew"];

#[derive(Debug, Deserialize)]
struct MovieRow {
    id: u64,
    title: Option<String>,
    overview: Option<String>,
    genres: Option<String>,
    keywords: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct CreditRow {
    title: Option<String>,
    cast: Option<String>,
    crew: Option<String>,
}

/// TMDB movies and credits tables joined on title
///
/// Every movie row pairs with each credits row sharing its title, in movies
/// order. Rows with any empty text column are left out.
#[derive(Debug, Clone)]
pub struct CsvCatalog {
    movies_path: PathBuf,
    credits_path: PathBuf,
}

impl CsvCatalog {
    pub fn new(movies_path: impl Into<PathBuf>, credits_path: impl Into<PathBuf>) -> Self {
        Self {
            movies_path: movies_path.into(),
            credits_path: credits_path.into(),
        }
    }
}

fn read_rows<T: DeserializeOwned>(
    path: &Path,
    columns: &[&'static str],
) -> Result<Vec<T>, CatalogError> {
    let path_name = path.display().to_string();
    let csv_error = |source: csv::Error| CatalogError::Csv {
        path: path_name.clone(),
        source,
    };

    let mut reader = csv::Reader::from_path(path).map_err(csv_error)?;
    let headers = reader.headers().map_err(csv_error)?.clone();
    if let Some(column) = columns.iter().find(|c| !headers.iter().any(|h| h == **c)) {
        return Err(CatalogError::MissingColumn {
            path: path_name,
            column: *column,
        });
    }

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for record in reader.deserialize::<T>() {
        match record {
            Ok(row) => rows.push(row),
            Err(e) => {
                skipped += 1;
                tracing::debug!(path = %path_name, error = %e, "Skipping unreadable row");
            }
        }
    }

    if skipped > 0 {
        tracing::warn!(path = %path_name, skipped, "Unreadable rows skipped");
    }

    Ok(rows)
}

fn present(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.is_empty())
}

fn join(movies: Vec<MovieRow>, credits: Vec<CreditRow>) -> Vec<RawItem> {
    let mut credits_by_title: HashMap<String, Vec<CreditRow>> = HashMap::new();
    for credit in credits {
        if let Some(title) = credit.title.clone() {
            credits_by_title.entry(title).or_default().push(credit);
        }
    }

    let mut items = Vec::new();
    for movie in movies {
        let Some(title) = present(movie.title) else {
            continue;
        };
        let Some(matches) = credits_by_title.get(&title) else {
            continue;
        };
        for credit in matches {
            let fields = (
                present(movie.overview.clone()),
                present(movie.genres.clone()),
                present(movie.keywords.clone()),
                present(credit.cast.clone()),
                present(credit.crew.clone()),
            );
            if let (Some(synopsis), Some(genres), Some(keywords), Some(cast), Some(crew)) = fields {
                items.push(RawItem {
                    id: movie.id,
                    title: title.clone(),
                    synopsis,
                    genres,
                    keywords,
                    cast,
                    crew,
                });
            }
        }
    }

    items
}

impl CatalogSource for CsvCatalog {
    fn load(&self) -> Result<Vec<RawItem>, CatalogError> {
        let movies: Vec<MovieRow> = read_rows(&self.movies_path, &MOVIE_COLUMNS)?;
        let credits: Vec<CreditRow> = read_rows(&self.credits_path, &CREDIT_COLUMNS)?;
        let (movie_count, credit_count) = (movies.len(), credits.len());

        let items = join(movies, credits);

        tracing::info!(
            movies = movie_count,
            credits = credit_count,
            items = items.len(),
            "Catalog loaded"
        );

        Ok(items)
    }

    fn name(&self) -> &'static str {
        "tmdb-csv"
    }
}
