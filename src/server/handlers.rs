//! Endpoint handlers.
//!
//! Each write handler takes the store lock for its whole
//! load-mutate-save cycle; see `server::AppState::store`.

use super::AppState;
use crate::error::{Error, Result};
use crate::photos::PhotoManager;
use crate::search;
use crate::store::{self, Record, RecordPatch};
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

/// Path and form IDs arrive as strings; records are keyed by `u64`.
/// A value that does not parse cannot match any record.
fn parse_id(raw: &str) -> Result<u64> {
    raw.trim().parse().map_err(|_| Error::NotFound)
}

pub async fn list_records(State(state): State<AppState>) -> Json<Vec<Record>> {
    let store = state.store().await;
    Json(store.load())
}

pub async fn get_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Record>> {
    let id = parse_id(&id)?;
    let store = state.store().await;
    let records = store.load();
    let record = store::find_by_id(&records, id).ok_or(Error::NotFound)?;
    Ok(Json(record.clone()))
}

pub async fn get_photo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response> {
    let id = parse_id(&id)?;
    let path = {
        let store = state.store().await;
        let records = store.load();
        store::find_by_id(&records, id)
            .and_then(|r| r.photo_path.clone())
            .ok_or(Error::NotFound)?
    };

    let bytes = tokio::fs::read(&path).await.map_err(|_| Error::NotFound)?;

    let content_type = match path.extension().and_then(|e| e.to_str()) {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    };

    Ok(([(header::CONTENT_TYPE, content_type)], bytes).into_response())
}

pub async fn register(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Record>)> {
    let mut name: Option<String> = None;
    let mut description: Option<String> = None;
    let mut photo: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await? {
        match field.name() {
            Some("inventory_name") => name = Some(field.text().await?),
            Some("description") => description = Some(field.text().await?),
            Some("photo") => {
                let file_name = field
                    .file_name()
                    .map(str::to_string)
                    .unwrap_or_else(|| "photo".to_string());
                let bytes = field.bytes().await?;
                // An empty file input still submits the field; treat it
                // as no photo at all.
                if !bytes.is_empty() {
                    photo = Some((file_name, bytes.to_vec()));
                }
            }
            _ => {}
        }
    }

    let name = name
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| Error::Validation("inventory_name is required".to_string()))?;
    let description = description.filter(|d| !d.is_empty());

    let store = state.store().await;
    let mut records = store.load();
    let id = store::next_id(&records);

    // The public URL is derived from the final ID, under the store lock,
    // so it always points at the record it was attached to.
    let (photo_path, photo_url) = match photo {
        Some((file_name, bytes)) => {
            let path = state
                .photos()
                .attach(&file_name, &bytes)
                .map_err(|e| Error::Io(std::io::Error::other(e)))?;
            let url = PhotoManager::public_url(state.host(), state.port(), id);
            (Some(path), Some(url))
        }
        None => (None, None),
    };

    let record = Record {
        id,
        name,
        description,
        photo_path,
        photo_url,
    };
    store::insert(&mut records, record.clone());
    store.save(&records)?;

    info!("Registered inventory record {} ({})", record.id, record.name);
    Ok((StatusCode::CREATED, Json(record)))
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    id: Option<String>,
    include_photo: Option<String>,
}

async fn run_search(state: &AppState, params: SearchParams) -> Result<Json<Record>> {
    let id = parse_id(params.id.as_deref().unwrap_or_default())?;
    let include_photo = search::include_photo_requested(params.include_photo.as_deref());

    let store = state.store().await;
    let records = store.load();
    let record = search::search(&records, id, include_photo)?;
    Ok(Json(record))
}

pub async fn search_query(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Record>> {
    run_search(&state, params).await
}

pub async fn search_form(
    State(state): State<AppState>,
    Form(params): Form<SearchParams>,
) -> Result<Json<Record>> {
    run_search(&state, params).await
}

pub async fn update_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<RecordPatch>,
) -> Result<Json<Record>> {
    let id = parse_id(&id)?;

    let store = state.store().await;
    let mut records = store.load();
    let updated = store::update(&mut records, id, patch)?.clone();
    store.save(&records)?;

    Ok(Json(updated))
}

pub async fn delete_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let id = parse_id(&id)?;

    let store = state.store().await;
    let mut records = store.load();
    let removed = store::remove(&mut records, id)?;
    store.save(&records)?;

    // Fire-and-forget cleanup; a failed unlink never rolls back the delete.
    if let Some(path) = &removed.photo_path {
        state.photos().release(path);
    }

    info!("Deleted inventory record {}", id);
    Ok(Json(json!({ "deleted": id })))
}
