use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::{EngineError, MutationOutcome, ViolationKind};

pub use server::{router, run, run_with_listener, spawn_with_listener};

mod clubs;
mod coaches;
mod players;
mod server;
mod views;

pub mod types {
    pub mod club {
        pub use api_types::club::{ClubDetail, ClubNew, ClubUpdate, ClubView};
    }

    pub mod player {
        pub use api_types::player::{PlayerNew, PlayerUpdate, PlayerView};
    }

    pub mod coach {
        pub use api_types::coach::{CoachNew, CoachUpdate, CoachView};
    }

    pub mod ledger {
        pub use api_types::ledger::LedgerView;
    }

    pub mod listing {
        pub use api_types::listing::{ListQuery, Listing, Pagination};
    }

    pub mod mutation {
        pub use api_types::mutation::{ErrorResponse, MutationResponse};
    }
}

use types::mutation::ErrorResponse;

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::Rejected(violations) if violations.all_of_kind(ViolationKind::Uniqueness) => {
            StatusCode::CONFLICT
        }
        EngineError::Rejected(_) | EngineError::InvalidAmount(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        EngineError::KeyNotFound(_) | EngineError::InvalidId(_) => StatusCode::NOT_FOUND,
        EngineError::Conflict(_) => StatusCode::CONFLICT,
        EngineError::Corrupted(_) | EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        EngineError::Corrupted(detail) => {
            tracing::error!("corrupted data: {detail}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ServerError::Engine(err) => {
                let status = status_for_engine_error(&err);
                match err {
                    EngineError::Rejected(violations) => {
                        let body = MutationOutcome::<()>::rejected(violations.messages());
                        (status, Json(views::mutation(body))).into_response()
                    }
                    err => {
                        let retryable = err.is_retryable();
                        let error = message_for_engine_error(err);
                        (status, Json(ErrorResponse { error, retryable })).into_response()
                    }
                }
            }
            ServerError::Generic(error) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error,
                    retryable: false,
                }),
            )
                .into_response(),
        }
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}
