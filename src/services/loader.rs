//! Loading of the precomputed movie artifacts.
//!
//! The movie table is JSON in one of two layouts:
//! - records: `[{"title": "...", "poster_url": "..."}, ...]`
//! - columns, as produced by a dataframe's `to_dict()`:
//!   `{"title": {"0": "..."}, "Poster_URL": {"0": "..."}, ...}`
//!
//! The similarity matrix is a bincode-encoded `Vec<Vec<f64>>`, or a nested
//! JSON array when the file has a `.json` extension.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use serde_json::{Map, Value};
use tokio::sync::OnceCell;

use crate::error::LoadError;
use crate::models::{Movie, MovieTable, SimilarityMatrix};

/// Column names accepted for the poster URL
const POSTER_COLUMNS: [&str; 3] = ["poster_url", "Poster_URL", "posterUrl"];

static CATALOG: OnceCell<Arc<Catalog>> = OnceCell::const_new();

/// Locations of the two artifacts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub movies: PathBuf,
    pub similarity: PathBuf,
}

/// The movie table together with its similarity matrix
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    table: MovieTable,
    matrix: SimilarityMatrix,
}

impl Catalog {
    /// Pairs a table with a matrix, checking that they index the same movies
    pub fn new(table: MovieTable, matrix: SimilarityMatrix) -> Result<Self, LoadError> {
        if table.len() != matrix.rows() || matrix.rows() != matrix.cols() {
            return Err(LoadError::SizeMismatch {
                movies: table.len(),
                rows: matrix.rows(),
            });
        }
        Ok(Self { table, matrix })
    }

    /// Reads and validates both artifacts from disk
    pub fn load(paths: &ArtifactPaths) -> Result<Self, LoadError> {
        let started = Instant::now();

        let table = load_movie_table(&paths.movies)?;
        tracing::info!(
            path = %paths.movies.display(),
            movies = table.len(),
            "Loaded movie table"
        );

        let matrix = load_similarity_matrix(&paths.similarity)?;
        tracing::info!(
            path = %paths.similarity.display(),
            rows = matrix.rows(),
            "Loaded similarity matrix"
        );

        let catalog = Self::new(table, matrix)?;
        tracing::info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Catalog ready"
        );
        Ok(catalog)
    }

    pub fn table(&self) -> &MovieTable {
        &self.table
    }

    pub fn matrix(&self) -> &SimilarityMatrix {
        &self.matrix
    }
}

/// Returns the process-wide catalog, loading it on first use.
///
/// Concurrent callers wait on the same load. A failed load is not cached, and
/// once a catalog is stored later calls return it regardless of `paths`.
pub async fn shared(paths: &ArtifactPaths) -> Result<Arc<Catalog>, LoadError> {
    CATALOG
        .get_or_try_init(|| async {
            let paths = paths.clone();
            tokio::task::spawn_blocking(move || Catalog::load(&paths))
                .await
                .map_err(|e| LoadError::Aborted(e.to_string()))?
                .map(Arc::new)
        })
        .await
        .cloned()
}

pub fn load_movie_table(path: &Path) -> Result<MovieTable, LoadError> {
    let bytes = read(path)?;
    let value: Value = serde_json::from_slice(&bytes).map_err(|e| LoadError::Decode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let movies = match value {
        Value::Array(rows) => movies_from_records(&rows)?,
        Value::Object(columns) => movies_from_columns(&columns)?,
        _ => {
            return Err(LoadError::Schema(
                "movie table must be a list of records or a map of columns".to_string(),
            ))
        }
    };

    Ok(MovieTable::new(movies))
}

pub fn load_similarity_matrix(path: &Path) -> Result<SimilarityMatrix, LoadError> {
    let bytes = read(path)?;
    let is_json = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let rows: Vec<Vec<f64>> = if is_json {
        serde_json::from_slice(&bytes).map_err(|e| LoadError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
    } else {
        bincode::deserialize(&bytes).map_err(|e| LoadError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
    };

    SimilarityMatrix::from_rows(rows)
}

fn read(path: &Path) -> Result<Vec<u8>, LoadError> {
    std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn movies_from_records(rows: &[Value]) -> Result<Vec<Movie>, LoadError> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let record = row
                .as_object()
                .ok_or_else(|| LoadError::Schema(format!("row {} is not an object", i)))?;

            let title = record
                .get("title")
                .ok_or_else(|| LoadError::Schema(format!("row {} has no `title`", i)))
                .and_then(|v| title_value(v, i))?;

            let poster = POSTER_COLUMNS
                .iter()
                .find_map(|name| record.get(*name))
                .ok_or_else(|| LoadError::Schema(format!("row {} has no poster URL", i)))
                .and_then(|v| poster_value(v, i))?;

            Ok(Movie::new(title, poster))
        })
        .collect()
}

fn movies_from_columns(columns: &Map<String, Value>) -> Result<Vec<Movie>, LoadError> {
    let titles = column(columns, "title")
        .ok_or_else(|| LoadError::Schema("missing `title` column".to_string()))??;
    let posters = POSTER_COLUMNS
        .iter()
        .find_map(|name| column(columns, name))
        .ok_or_else(|| LoadError::Schema("missing poster URL column".to_string()))??;

    if !titles.keys().eq(posters.keys()) {
        return Err(LoadError::Schema(
            "`title` and poster URL columns cover different rows".to_string(),
        ));
    }

    titles
        .iter()
        .zip(posters.values())
        .map(|((row, title), poster)| {
            Ok(Movie::new(
                title_value(title, *row)?,
                poster_value(poster, *row)?,
            ))
        })
        .collect()
}

/// Reads a `{"<row>": value}` column, ordered by numeric row label
fn column<'a>(
    columns: &'a Map<String, Value>,
    name: &str,
) -> Option<Result<BTreeMap<usize, &'a Value>, LoadError>> {
    let cells = columns.get(name)?;
    let Some(cells) = cells.as_object() else {
        return Some(Err(LoadError::Schema(format!(
            "column `{}` is not a map of rows",
            name
        ))));
    };

    let mut rows = BTreeMap::new();
    for (label, value) in cells {
        let Ok(row) = label.parse::<usize>() else {
            return Some(Err(LoadError::Schema(format!(
                "column `{}` has non-numeric row label `{}`",
                name, label
            ))));
        };
        if rows.insert(row, value).is_some() {
            return Some(Err(LoadError::Schema(format!(
                "column `{}` has more than one label for row {}",
                name, row
            ))));
        }
    }
    Some(Ok(rows))
}

fn title_value(value: &Value, row: usize) -> Result<String, LoadError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| LoadError::Schema(format!("title in row {} is not a string", row)))
}

/// Poster URLs may be null; those rows get the placeholder
fn poster_value(value: &Value, row: usize) -> Result<String, LoadError> {
    match value {
        Value::String(url) => Ok(url.clone()),
        Value::Null => Ok(String::new()),
        _ => Err(LoadError::Schema(format!(
            "poster URL in row {} is not a string",
            row
        ))),
    }
}
