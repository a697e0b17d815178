pub mod movie;
pub mod session;

pub use movie::{Movie, MovieTable, Recommendation, SimilarityMatrix, PLACEHOLDER_POSTER_URL};
pub use session::{Feedback, SessionState};
