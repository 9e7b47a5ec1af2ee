use anyhow::Context;
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use super::auth::RequireApiKey;
use crate::error::ApiError;
use crate::i18n::{Locale, LocaleStrings};
use crate::query::{build_list_query, ListRequest, Paginated};
use crate::resources::{validate_payload, PayloadError, PayloadMode, Related, ResourceKind};
use crate::state::AppState;
use crate::store::{record_id, Record};

/// `{ "data": ... }` wrapper of single-record responses.
#[derive(Debug, Serialize)]
pub struct DataEnvelope {
    pub data: Value,
}

fn resolve_kind(segment: &str) -> Result<ResourceKind, ApiError> {
    ResourceKind::from_segment(segment)
        .ok_or_else(|| ApiError::NotFound(format!("unknown resource '{}'", segment)))
}

fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::NotFound(format!("invalid id '{}'", raw)))
}

fn missing(kind: ResourceKind, id: i64) -> ApiError {
    ApiError::NotFound(format!("{} #{}", kind.descriptor().name, id))
}

fn parse_body(bytes: &Bytes) -> Result<Value, ApiError> {
    serde_json::from_slice(bytes).map_err(|e| ApiError::BadRequest(format!("Invalid JSON body: {}", e)))
}

fn validated(
    kind: ResourceKind,
    body: &Value,
    mode: PayloadMode,
    locale: Locale,
) -> Result<Record, ApiError> {
    validate_payload(kind.descriptor(), body, mode, LocaleStrings::for_locale(locale)).map_err(|err| match err {
        PayloadError::NotAnObject => ApiError::BadRequest("Request body must be a JSON object".to_string()),
        PayloadError::Invalid(errors) => ApiError::Validation(errors),
    })
}

/// Child collections of one record, keyed by relation name.
async fn load_related(state: &AppState, kind: ResourceKind, id: i64) -> Result<Related, ApiError> {
    let mut related = Related::new();
    for relation in kind.descriptor().relations {
        let rows = state
            .store
            .related(relation, id)
            .await
            .with_context(|| format!("Failed to load {} of {} #{}", relation.name, kind.descriptor().name, id))?;
        related.insert(relation.name, rows);
    }
    Ok(related)
}

async fn render(state: &AppState, kind: ResourceKind, record: &Record) -> Result<DataEnvelope, ApiError> {
    let related = match record_id(record) {
        Some(id) => load_related(state, kind, id).await?,
        None => Related::new(),
    };
    Ok(DataEnvelope {
        data: kind.transform(record, &related)?,
    })
}

/// `GET /api/{resource}`
pub async fn index(
    State(state): State<AppState>,
    Path(segment): Path<String>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Paginated<Value>>, ApiError> {
    let kind = resolve_kind(&segment)?;
    let request = ListRequest::from_pairs(pairs);
    let query = build_list_query(kind.descriptor(), &request);

    let page = state
        .store
        .fetch_page(&query, request.page)
        .await
        .with_context(|| format!("Failed to list {}", kind.descriptor().name))?;

    // Lists carry no nested collections; those keys render empty
    let related = Related::new();
    let data = page
        .records
        .iter()
        .map(|record| kind.transform(record, &related))
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(Json(Paginated::new(data, request.page, page.total)))
}

/// `GET /api/{resource}/{id}`
pub async fn show(
    State(state): State<AppState>,
    Path((segment, raw_id)): Path<(String, String)>,
) -> Result<Json<DataEnvelope>, ApiError> {
    let kind = resolve_kind(&segment)?;
    let id = parse_id(&raw_id)?;

    let record = state
        .store
        .find(kind.descriptor().table, id)
        .await
        .with_context(|| format!("Failed to load {} #{}", kind.descriptor().name, id))?
        .ok_or_else(|| missing(kind, id))?;

    Ok(Json(render(&state, kind, &record).await?))
}

/// `POST /api/{resource}`
pub async fn store(
    _auth: RequireApiKey,
    State(state): State<AppState>,
    Extension(locale): Extension<Locale>,
    Path(segment): Path<String>,
    body: Bytes,
) -> Result<(StatusCode, Json<DataEnvelope>), ApiError> {
    let kind = resolve_kind(&segment)?;
    let record = validated(kind, &parse_body(&body)?, PayloadMode::Create, locale)?;

    let created = state
        .store
        .insert(kind.descriptor().table, record)
        .await
        .with_context(|| format!("Failed to create {}", kind.descriptor().name))?;

    info!(
        "Created {} #{}",
        kind.descriptor().name,
        record_id(&created).unwrap_or_default()
    );

    Ok((StatusCode::CREATED, Json(render(&state, kind, &created).await?)))
}

/// `PUT /api/{resource}/{id}`
pub async fn update(
    _auth: RequireApiKey,
    State(state): State<AppState>,
    Extension(locale): Extension<Locale>,
    Path((segment, raw_id)): Path<(String, String)>,
    body: Bytes,
) -> Result<Json<DataEnvelope>, ApiError> {
    let kind = resolve_kind(&segment)?;
    let id = parse_id(&raw_id)?;
    let patch = validated(kind, &parse_body(&body)?, PayloadMode::Update, locale)?;

    let updated = state
        .store
        .update(kind.descriptor().table, id, patch)
        .await
        .with_context(|| format!("Failed to update {} #{}", kind.descriptor().name, id))?
        .ok_or_else(|| missing(kind, id))?;

    info!("Updated {} #{}", kind.descriptor().name, id);

    Ok(Json(render(&state, kind, &updated).await?))
}

/// `DELETE /api/{resource}/{id}`
pub async fn destroy(
    _auth: RequireApiKey,
    State(state): State<AppState>,
    Path((segment, raw_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let kind = resolve_kind(&segment)?;
    let id = parse_id(&raw_id)?;

    let deleted = state
        .store
        .delete(kind.descriptor().table, id)
        .await
        .with_context(|| format!("Failed to delete {} #{}", kind.descriptor().name, id))?;

    if !deleted {
        return Err(missing(kind, id));
    }

    info!("Deleted {} #{}", kind.descriptor().name, id);
    Ok(StatusCode::NO_CONTENT)
}

/// Unmatched paths under `/api`
pub async fn not_found() -> ApiError {
    ApiError::NotFound("no such endpoint".to_string())
}
