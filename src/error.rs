use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Which of the two candidate lists an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateKind {
    Place,
    Accommodation,
}

impl fmt::Display for CandidateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CandidateKind::Place => write!(f, "place"),
            CandidateKind::Accommodation => write!(f, "accommodation"),
        }
    }
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generation backend is not configured: {0}")]
    Config(String),
    #[error("network error calling generation backend: {0}")]
    Network(#[from] reqwest::Error),
    #[error("generation backend timed out after {0:?}")]
    Timeout(Duration),
    #[error("generation backend returned status {status}: {body}")]
    Backend { status: u16, body: String },
    #[error("generation backend returned no text")]
    EmptyResponse,
}

/// Every failure that can end a planning run. None of them are retried.
#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("invalid input: {0}")]
    InputValidation(String),
    #[error("no catalog entries found for region '{0}'")]
    RegionNotFound(String),
    #[error("no {kind} candidates found in region '{region}' for theme '{theme}'")]
    EmptyCandidates {
        kind: CandidateKind,
        region: String,
        theme: String,
    },
    #[error("failed to parse generated plan: {message}")]
    Parse { message: String, raw: String },
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error("day {day}: {kind} '{name}' is not in the supplied candidate list")]
    CandidateMismatch {
        day: i64,
        kind: CandidateKind,
        name: String,
    },
    #[error("generated plan is invalid: {0}")]
    InvalidPlan(String),
    #[error("catalog error: {0}")]
    Catalog(String),
    #[error("storage error: {0}")]
    Storage(#[from] mongodb::error::Error),
}

impl ResponseError for PlannerError {
    fn status_code(&self) -> StatusCode {
        match self {
            PlannerError::InputValidation(_) => StatusCode::BAD_REQUEST,
            PlannerError::RegionNotFound(_) => StatusCode::NOT_FOUND,
            PlannerError::EmptyCandidates { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            PlannerError::Parse { .. }
            | PlannerError::Generation(_)
            | PlannerError::CandidateMismatch { .. }
            | PlannerError::InvalidPlan(_) => StatusCode::BAD_GATEWAY,
            PlannerError::Catalog(_) | PlannerError::Storage(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}
