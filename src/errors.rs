use anyhow::Error;
use axum::{
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::{debug, error};

#[derive(Debug)]
pub enum ServerError {
    /// Malformed id, malformed body, or a missing required field.
    BadRequest(String),
    NotFound(i64),
    NoRoute(String),
    MethodNotAllowed(Method),
    /// Anything the storage layer (or serialization) threw at us. Clients
    /// only ever see a generic 500 for these.
    Internal(Error),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(message) => {
                debug!(%message, "bad request");
                (StatusCode::BAD_REQUEST, message)
            }
            Self::NotFound(id) => {
                debug!(id, "note not found");
                (StatusCode::NOT_FOUND, format!("Note {id} not found."))
            }
            Self::NoRoute(path) => {
                (StatusCode::NOT_FOUND, format!("No route for {path}."))
            }
            Self::MethodNotAllowed(method) => (
                StatusCode::METHOD_NOT_ALLOWED,
                format!("Method {method} not allowed."),
            ),
            Self::Internal(err) => {
                error!("{:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong".to_string(),
                )
            }
        };
        let mut body =
            serde_json::to_string_pretty(&ErrorBody { error: message })
                .unwrap_or_default();
        body.push('\n');

        (status, body).into_response()
    }
}

// This enables using `?` on functions that return `Result<_, anyhow::Error>`
// (or any std error, like `StoreError`) to turn them into a 500. Client
// errors are always built explicitly.
impl<E> From<E> for ServerError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::Internal(err.into())
    }
}
