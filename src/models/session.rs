use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Recommendation;

/// Fixed-choice reaction to a set of recommendations
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Feedback {
    Great,
    Good,
    CouldBeBetter,
}

impl Feedback {
    /// Acknowledgment shown to the user
    pub fn message(self) -> &'static str {
        match self {
            Feedback::Great => {
                "Fantastic! We're thrilled you loved our recommendations! Happy watching!"
            }
            Feedback::Good => {
                "Great to hear! We're always working to make our suggestions even better!"
            }
            Feedback::CouldBeBetter => {
                "Thanks for the honest feedback! We'll use this to improve our recommendation engine!"
            }
        }
    }

    pub fn celebrate(self) -> bool {
        matches!(self, Feedback::Great)
    }
}

/// Per-user interaction state
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionState {
    pub selected_movie: Option<String>,
    pub show_recommendations: bool,
    pub recommendations: Vec<Recommendation>,
    pub last_feedback: Option<Feedback>,
    pub updated_at: DateTime<Utc>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            selected_movie: None,
            show_recommendations: false,
            recommendations: Vec::new(),
            last_feedback: None,
            updated_at: Utc::now(),
        }
    }

    /// Records a successful lookup
    pub fn show(&mut self, title: String, recommendations: Vec<Recommendation>) {
        self.selected_movie = Some(title);
        self.show_recommendations = true;
        self.recommendations = recommendations;
        self.touch();
    }

    /// Records a failed lookup. Results from an earlier selection are dropped
    /// so that an error is never displayed alongside stale cards.
    pub fn clear(&mut self, title: String) {
        self.selected_movie = Some(title);
        self.show_recommendations = false;
        self.recommendations.clear();
        self.touch();
    }

    pub fn record_feedback(&mut self, feedback: Feedback) {
        self.last_feedback = Some(feedback);
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
