use axum::{
    extract::State,
    http::StatusCode,
    response::Html,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::middleware::session::SessionId;
use crate::models::{Feedback, Recommendation, SessionState};

use super::AppState;

const INDEX_HTML: &str = include_str!("../../static/index.html");

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    pub title: String,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub based_on: String,
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Serialize)]
pub struct MoviesResponse {
    pub titles: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: SessionId,
    #[serde(flatten)]
    pub state: SessionState,
}

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub choice: Feedback,
}

#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    pub message: &'static str,
    pub celebrate: bool,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Browser page
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// All movie titles, in table order
pub async fn list_movies(State(state): State<AppState>) -> Json<MoviesResponse> {
    Json(MoviesResponse {
        titles: state.recommender.titles(),
    })
}

/// Recommends movies similar to the selected title and stores them in the
/// caller's session
pub async fn recommend(
    State(state): State<AppState>,
    Extension(session_id): Extension<SessionId>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<RecommendationResponse>> {
    if request.title.is_empty() {
        return Err(AppError::InvalidInput("title must not be empty".to_string()));
    }

    tracing::info!(
        session_id = %session_id,
        title = %request.title,
        "Processing recommendation request"
    );

    match state.recommender.recommend(&request.title) {
        Ok(recommendations) => {
            state.sessions.update(session_id, |session| {
                session.show(request.title.clone(), recommendations.clone())
            });
            Ok(Json(RecommendationResponse {
                based_on: request.title,
                recommendations,
            }))
        }
        Err(e) => {
            state
                .sessions
                .update(session_id, |session| session.clear(request.title));
            Err(e.into())
        }
    }
}

/// The caller's current session state
pub async fn get_session(
    State(state): State<AppState>,
    Extension(session_id): Extension<SessionId>,
) -> Json<SessionResponse> {
    let session = state.sessions.get(&session_id);
    Json(SessionResponse {
        session_id,
        state: session,
    })
}

/// Acknowledges a feedback choice. Feedback has no effect on recommendations.
pub async fn submit_feedback(
    State(state): State<AppState>,
    Extension(session_id): Extension<SessionId>,
    Json(request): Json<FeedbackRequest>,
) -> Json<FeedbackResponse> {
    tracing::info!(session_id = %session_id, choice = ?request.choice, "Feedback received");

    state
        .sessions
        .update(session_id, |session| session.record_feedback(request.choice));

    Json(FeedbackResponse {
        message: request.choice.message(),
        celebrate: request.choice.celebrate(),
    })
}
