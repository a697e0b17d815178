use serde::{Deserialize, Serialize};

use crate::error::LoadError;

/// Shown in place of a missing poster
pub const PLACEHOLDER_POSTER_URL: &str =
    "https://via.placeholder.com/300x450/cccccc/666666?text=No+Image";

/// A single row of the movie table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    pub title: String,
    pub poster_url: String,
}

impl Movie {
    pub fn new(title: impl Into<String>, poster_url: impl Into<String>) -> Self {
        let poster_url = poster_url.into();
        Self {
            title: title.into(),
            poster_url: if poster_url.trim().is_empty() {
                PLACEHOLDER_POSTER_URL.to_string()
            } else {
                poster_url
            },
        }
    }
}

/// Ordered movie records. Row position is the movie's index into the
/// similarity matrix.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovieTable {
    movies: Vec<Movie>,
}

impl MovieTable {
    pub fn new(movies: Vec<Movie>) -> Self {
        Self { movies }
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Movie> {
        self.movies.get(index)
    }

    /// Row index of the first movie whose title matches exactly
    pub fn position(&self, title: &str) -> Option<usize> {
        self.movies.iter().position(|m| m.title == title)
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.movies.iter().map(|m| m.title.as_str())
    }
}

/// Dense N×N similarity scores, stored row-major.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimilarityMatrix {
    size: usize,
    scores: Vec<f64>,
}

impl SimilarityMatrix {
    /// Builds a matrix from nested rows, rejecting ragged, non-square and
    /// non-finite input.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, LoadError> {
        let size = rows.len();
        let mut scores = Vec::with_capacity(size * size);

        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != size {
                return Err(LoadError::Schema(format!(
                    "similarity matrix is not square: row {} has {} columns, expected {}",
                    i,
                    row.len(),
                    size
                )));
            }
            if let Some(j) = row.iter().position(|s| !s.is_finite()) {
                return Err(LoadError::Schema(format!(
                    "similarity score at ({}, {}) is not finite",
                    i, j
                )));
            }
            scores.extend(row);
        }

        Ok(Self { size, scores })
    }

    pub fn rows(&self) -> usize {
        self.size
    }

    pub fn cols(&self) -> usize {
        self.size
    }

    pub fn row(&self, index: usize) -> Option<&[f64]> {
        if index >= self.size {
            return None;
        }
        let start = index * self.size;
        Some(&self.scores[start..start + self.size])
    }
}

/// One recommended movie, as shown on a result card
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub title: String,
    pub poster_url: String,
}

impl From<&Movie> for Recommendation {
    fn from(movie: &Movie) -> Self {
        Self {
            title: movie.title.clone(),
            poster_url: movie.poster_url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_poster_falls_back_to_placeholder() {
        let movie = Movie::new("Avatar", "  ");
        assert_eq!(movie.poster_url, PLACEHOLDER_POSTER_URL);
    }

    #[test]
    fn test_position_returns_first_match() {
        let table = MovieTable::new(vec![
            Movie::new("A", "a"),
            Movie::new("B", "b"),
            Movie::new("A", "a2"),
        ]);
        assert_eq!(table.position("A"), Some(0));
        assert_eq!(table.position("a"), None);
    }

    #[test]
    fn test_matrix_rejects_ragged_rows() {
        let err = SimilarityMatrix::from_rows(vec![vec![1.0, 0.5], vec![0.5]]).unwrap_err();
        assert!(matches!(err, LoadError::Schema(ref msg) if msg.contains("row 1 has 1 columns")));
    }

    #[test]
    fn test_matrix_rejects_nan() {
        let err = SimilarityMatrix::from_rows(vec![vec![1.0, f64::NAN], vec![0.5, 1.0]])
            .unwrap_err();
        assert!(matches!(err, LoadError::Schema(ref msg) if msg.contains("(0, 1)")));
    }

    #[test]
    fn test_matrix_row_access() {
        let matrix =
            SimilarityMatrix::from_rows(vec![vec![1.0, 0.2], vec![0.2, 1.0]]).unwrap();
        assert_eq!(matrix.row(1), Some(&[0.2, 1.0][..]));
        assert_eq!(matrix.row(2), None);
    }
}
