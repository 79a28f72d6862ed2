use super::{
    errors::ServerError,
    models::{AppState, Mutation, NoteForm},
    store,
};
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

/// Pretty-print `value` with a trailing newline. The content-type header is
/// set by `middleware::json_headers`.
fn render<T: Serialize + ?Sized>(
    status: StatusCode,
    value: &T,
) -> Result<Response, ServerError> {
    let mut body = serde_json::to_string_pretty(value)?;
    body.push('\n');
    Ok((status, body).into_response())
}

fn parse_id(raw: &str) -> Result<i64, ServerError> {
    raw.parse().map_err(|_| {
        ServerError::BadRequest(format!("Error converting {raw:?} to an int"))
    })
}

/// Decode the first JSON value in `body` and ignore whatever follows it.
/// Keys match case-insensitively, and a bare `null` leaves every field
/// unset.
fn parse_form(body: &[u8]) -> Result<NoteForm, ServerError> {
    let invalid = |e: serde_json::Error| {
        ServerError::BadRequest(format!("Error invalid JSON payload: {e}"))
    };
    let value = match serde_json::Deserializer::from_slice(body)
        .into_iter::<Value>()
        .next()
    {
        Some(value) => value.map_err(invalid)?,
        None => {
            return Err(ServerError::BadRequest(
                "Error invalid JSON payload: empty body".to_string(),
            ))
        }
    };
    let value = match value {
        Value::Null => return Ok(NoteForm::default()),
        Value::Object(fields) => Value::Object(
            fields
                .into_iter()
                .map(|(key, v)| (key.to_lowercase(), v))
                .collect(),
        ),
        other => other,
    };
    serde_json::from_value(value).map_err(invalid)
}

pub async fn no_route(uri: Uri) -> ServerError {
    ServerError::NoRoute(uri.path().to_string())
}

pub async fn method_not_allowed(method: Method) -> ServerError {
    ServerError::MethodNotAllowed(method)
}

pub async fn list_notes(
    State(AppState { store }): State<AppState>,
) -> Result<Response, ServerError> {
    let notes = store
        .read(|notes| Ok::<_, ServerError>(notes.to_vec()))
        .await?;
    render(StatusCode::OK, &notes)
}

pub async fn get_note(
    State(AppState { store }): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ServerError> {
    let id = parse_id(&id)?;
    let note = store
        .read(|notes| {
            store::find_by_id(notes, id)
                .map(|index| notes[index].clone())
                .ok_or(ServerError::NotFound(id))
        })
        .await?;
    render(StatusCode::OK, &note)
}

pub async fn create_note(
    State(AppState { store }): State<AppState>,
    body: Bytes,
) -> Result<Response, ServerError> {
    let form = parse_form(&body)?;
    let title = form.title.unwrap_or_default();
    let description = form.description.unwrap_or_default();
    if title.is_empty() || description.is_empty() {
        return Err(ServerError::BadRequest(
            "Invalid title or description".to_string(),
        ));
    }

    let id = store
        .write(|notes| {
            store::insert(notes, title, description).map_err(ServerError::from)
        })
        .await?;
    info!(id, "created note");

    render(
        StatusCode::CREATED,
        &Mutation {
            message: "Note created successfully.",
            id: id.to_string(),
        },
    )
}

/// Unlike create, empty strings are accepted here and written as-is.
pub async fn update_note(
    State(AppState { store }): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Response, ServerError> {
    let form = parse_form(&body)?;
    let id = parse_id(&id)?;
    if let Some(body_id) = form.id.filter(|body_id| *body_id != id) {
        debug!(id, body_id, "ignoring id in request body");
    }
    let title = form.title.unwrap_or_default();
    let description = form.description.unwrap_or_default();

    store
        .write(|notes| {
            let index =
                store::find_by_id(notes, id).ok_or(ServerError::NotFound(id))?;
            store::update_at(notes, index, title, description);
            Ok::<_, ServerError>(())
        })
        .await?;
    info!(id, "updated note");

    render(
        StatusCode::OK,
        &Mutation {
            message: "Note updated successfully.",
            id: id.to_string(),
        },
    )
}

pub async fn delete_note(
    State(AppState { store }): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ServerError> {
    let id = parse_id(&id)?;
    store
        .write(|notes| {
            let index =
                store::find_by_id(notes, id).ok_or(ServerError::NotFound(id))?;
            store::delete_at(notes, index);
            Ok::<_, ServerError>(())
        })
        .await?;
    info!(id, "deleted note");

    render(
        StatusCode::OK,
        &Mutation {
            message: "Note deleted successfully.",
            id: id.to_string(),
        },
    )
}
