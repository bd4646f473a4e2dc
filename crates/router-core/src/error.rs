//! Error taxonomy for the router core, unified behind [`HttpError`] so the
//! HTTP layer (`router-server`) never matches on domain variants directly.

use http::StatusCode;

use crate::backend::BackendClientError;

/// Trait for domain errors that can be converted to HTTP responses.
/// Implemented by [`RouterError`]; `router-server` converts any `HttpError`
/// into a JSON body without knowing the concrete error type.
pub trait HttpError: std::error::Error {
    fn status_code(&self) -> StatusCode;
    fn error_type(&self) -> &str;
    fn client_message(&self) -> String;
}

#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    /// Missing/invalid prompt, unknown preset. Non-retriable, reported to
    /// the caller as-is.
    #[error("invalid input: {0}")]
    Input(String),

    /// Model classifier network/parse failure. Never escapes the router
    /// service — always downgraded to `UNKNOWN`/0.5 or `heuristic_fallback`
    /// inside the hybrid classifier. Kept as a variant for completeness and
    /// for classifier-level unit tests.
    #[error("classification failed: {0}")]
    Classification(String),

    /// Candidate filtering in the routing engine yielded zero models.
    #[error("no candidate models available for category {category}")]
    NoCandidateModels { category: String },

    /// A backend call failed (timeout, HTTP error, empty reply, auth
    /// failure). Triggers mark-unavailable plus one fallback attempt.
    #[error("backend error: {0}")]
    Backend(#[from] BackendClientError),

    /// Both the selected model and the static fallback failed.
    #[error("routing failed: {original_error}")]
    FallbackExhausted { original_error: String },

    /// Missing required credential for a referenced model. Scoped to the
    /// construction of that one backend client — other models remain
    /// usable.
    #[error("configuration error for model {model_key}: {message}")]
    Config { model_key: String, message: String },
}

impl HttpError for RouterError {
    fn status_code(&self) -> StatusCode {
        match self {
            RouterError::Input(_) => StatusCode::BAD_REQUEST,
            RouterError::Classification(_) => StatusCode::INTERNAL_SERVER_ERROR,
            RouterError::NoCandidateModels { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            RouterError::Backend(_) => StatusCode::BAD_GATEWAY,
            RouterError::FallbackExhausted { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            RouterError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_type(&self) -> &str {
        match self {
            RouterError::Input(_) => "invalid_request_error",
            RouterError::Classification(_) => "classification_error",
            RouterError::NoCandidateModels { .. } => "no_candidate_models_error",
            RouterError::Backend(_) => "backend_error",
            RouterError::FallbackExhausted { .. } => "fallback_exhausted_error",
            RouterError::Config { .. } => "config_error",
        }
    }

    fn client_message(&self) -> String {
        self.to_string()
    }
}
