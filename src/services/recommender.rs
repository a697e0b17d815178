use std::cmp::Ordering;
use std::sync::Arc;

use crate::{
    error::LookupError,
    models::{MovieTable, Recommendation, SimilarityMatrix},
    services::loader::Catalog,
};

/// Number of movies returned per lookup
pub const RECOMMENDATION_COUNT: usize = 5;

/// Returns the movies most similar to `title`, best first.
///
/// The matrix row for the first movie titled exactly `title` is sorted by
/// descending score with a stable sort, so equal scores keep row order. The
/// top entry is dropped by position (it is assumed to be the movie itself)
/// and the next [`RECOMMENDATION_COUNT`] are returned. Catalogs with fewer
/// movies yield fewer results.
pub fn recommend(
    title: &str,
    table: &MovieTable,
    matrix: &SimilarityMatrix,
) -> Result<Vec<Recommendation>, LookupError> {
    let index = table
        .position(title)
        .ok_or_else(|| LookupError::TitleNotFound(title.to_string()))?;
    let scores = matrix
        .row(index)
        .ok_or(LookupError::RowOutOfRange(index))?;

    let mut ranked: Vec<(usize, f64)> = scores.iter().copied().enumerate().collect();
    // partial_cmp ties -0.0 with 0.0; scores are finite, so it never yields None.
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    ranked
        .into_iter()
        .skip(1)
        .take(RECOMMENDATION_COUNT)
        .map(|(k, _)| {
            table
                .get(k)
                .map(Recommendation::from)
                .ok_or(LookupError::RowOutOfRange(k))
        })
        .collect()
}

/// Read-only handle over the shared catalog
#[derive(Debug, Clone)]
pub struct Recommender {
    catalog: Arc<Catalog>,
}

impl Recommender {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    pub fn recommend(&self, title: &str) -> Result<Vec<Recommendation>, LookupError> {
        let result = recommend(title, self.catalog.table(), self.catalog.matrix());
        match &result {
            Ok(recommendations) => tracing::debug!(
                title = %title,
                count = recommendations.len(),
                "Recommendations resolved"
            ),
            Err(e) => tracing::warn!(title = %title, error = %e, "Recommendation lookup failed"),
        }
        result
    }

    /// All titles in table order, for the selection control
    pub fn titles(&self) -> Vec<String> {
        self.catalog.table().titles().map(str::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Movie;

    fn catalog(titles: &[&str], rows: Vec<Vec<f64>>) -> (MovieTable, SimilarityMatrix) {
        let table = MovieTable::new(
            titles
                .iter()
                .map(|t| Movie::new(*t, format!("http://img/{}.jpg", t)))
                .collect(),
        );
        (table, SimilarityMatrix::from_rows(rows).unwrap())
    }

    fn titles(result: &[Recommendation]) -> Vec<&str> {
        result.iter().map(|r| r.title.as_str()).collect()
    }

    /// Seven movies where row i scores movie k as 1 / (1 + |i - k|)
    fn seven() -> (MovieTable, SimilarityMatrix) {
        let names = ["A", "B", "C", "D", "E", "F", "G"];
        let rows = (0..7)
            .map(|i: i32| (0..7).map(|k: i32| 1.0 / (1.0 + (i - k).abs() as f64)).collect())
            .collect();
        catalog(&names, rows)
    }

    #[test]
    fn test_three_movie_example() {
        let (table, matrix) = catalog(
            &["A", "B", "C"],
            vec![
                vec![1.0, 0.5, 0.9],
                vec![0.5, 1.0, 0.1],
                vec![0.9, 0.1, 1.0],
            ],
        );
        let result = recommend("A", &table, &matrix).unwrap();
        assert_eq!(titles(&result), vec!["C", "B"]);
        assert_eq!(result[0].poster_url, "http://img/C.jpg");
    }

    #[test]
    fn test_at_most_five_results_sorted_descending() {
        let (table, matrix) = seven();
        let result = recommend("A", &table, &matrix).unwrap();
        assert_eq!(titles(&result), vec!["B", "C", "D", "E", "F"]);

        let row = matrix.row(0).unwrap();
        let scores: Vec<f64> = result
            .iter()
            .map(|r| row[table.position(&r.title).unwrap()])
            .collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_never_returns_query_row() {
        let (table, matrix) = seven();
        for title in table.titles() {
            let result = recommend(title, &table, &matrix).unwrap();
            assert_eq!(result.len(), RECOMMENDATION_COUNT);
            assert!(result.iter().all(|r| r.title != title));
        }
    }

    #[test]
    fn test_equal_scores_keep_row_order() {
        let (table, matrix) = seven();
        // Row D scores C/E, B/F and A/G equally; the lower row wins each tie.
        let result = recommend("D", &table, &matrix).unwrap();
        assert_eq!(titles(&result), vec!["C", "E", "B", "F", "A"]);
    }

    #[test]
    fn test_signed_zeros_tie_in_row_order() {
        let (table, matrix) = catalog(
            &["A", "B", "C"],
            vec![
                vec![1.0, -0.0, 0.0],
                vec![-0.0, 1.0, 0.3],
                vec![0.0, 0.3, 1.0],
            ],
        );
        let result = recommend("A", &table, &matrix).unwrap();
        assert_eq!(titles(&result), vec!["B", "C"]);
    }

    #[test]
    fn test_small_catalog_is_not_padded() {
        let (table, matrix) = catalog(
            &["A", "B", "C", "D"],
            vec![
                vec![1.0, 0.2, 0.3, 0.4],
                vec![0.2, 1.0, 0.5, 0.6],
                vec![0.3, 0.5, 1.0, 0.7],
                vec![0.4, 0.6, 0.7, 1.0],
            ],
        );
        let result = recommend("B", &table, &matrix).unwrap();
        assert_eq!(titles(&result), vec!["D", "C", "A"]);
    }

    #[test]
    fn test_single_movie_yields_nothing() {
        let (table, matrix) = catalog(&["Solo"], vec![vec![1.0]]);
        assert!(recommend("Solo", &table, &matrix).unwrap().is_empty());
    }

    #[test]
    fn test_exclusion_is_positional() {
        // B outscores A's self-similarity, so B is dropped and A is returned.
        let (table, matrix) = catalog(
            &["A", "B", "C"],
            vec![
                vec![0.8, 0.9, 0.1],
                vec![0.9, 1.0, 0.2],
                vec![0.1, 0.2, 1.0],
            ],
        );
        let result = recommend("A", &table, &matrix).unwrap();
        assert_eq!(titles(&result), vec!["A", "C"]);
    }

    #[test]
    fn test_unknown_title_is_lookup_error() {
        let (table, matrix) = seven();
        let err = recommend("__not_a_real_title__", &table, &matrix).unwrap_err();
        assert_eq!(
            err,
            LookupError::TitleNotFound("__not_a_real_title__".to_string())
        );
    }

    #[test]
    fn test_title_match_is_case_sensitive() {
        let (table, matrix) = seven();
        assert!(recommend("a", &table, &matrix).is_err());
    }

    #[test]
    fn test_empty_catalog_is_lookup_error() {
        let err = recommend("A", &MovieTable::default(), &SimilarityMatrix::default()).unwrap_err();
        assert!(matches!(err, LookupError::TitleNotFound(_)));
    }

    #[test]
    fn test_recommender_lists_titles_in_order() {
        let (table, matrix) = seven();
        let recommender = Recommender::new(Arc::new(Catalog::new(table, matrix).unwrap()));
        assert_eq!(recommender.titles().first().map(String::as_str), Some("A"));
        assert_eq!(recommender.titles().len(), 7);
        assert_eq!(recommender.recommend("G").unwrap().len(), 5);
    }
}
