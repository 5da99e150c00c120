//! HTTP routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use eventdesk_domain::{
    EventCategory, EventId, EventStatus, EventType, EventVenue, Speaker, SpeakerId,
};

use crate::app::App;
use crate::use_cases::events::{
    AssignedSpeaker, CreateEventInput, CreatedEvent, EventError, EventView, RetractionReport,
};

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/", get(health))
        .route("/api/health", get(health))
        .route("/api/events", get(list_events).post(create_event))
        .route("/api/events/{id}", delete(delete_event))
        .route("/api/events/{id}/speakers", get(list_event_speakers))
        .route(
            "/api/events/{id}/speakers/{speaker_id}",
            post(assign_speaker),
        )
        .route("/api/speakers", get(list_speakers).post(create_speaker))
        .route(
            "/api/event-types",
            get(list_event_types).post(create_event_type),
        )
        .route(
            "/api/event-categories",
            get(list_event_categories).post(create_event_category),
        )
        .route(
            "/api/event-statuses",
            get(list_event_statuses).post(create_event_status),
        )
        .route(
            "/api/event-venues",
            get(list_event_venues).post(create_event_venue),
        )
}

async fn health() -> &'static str {
    "OK"
}

// =============================================================================
// Events
// =============================================================================

async fn create_event(
    State(app): State<Arc<App>>,
    Json(input): Json<CreateEventInput>,
) -> Result<(StatusCode, Json<CreatedEvent>), ApiError> {
    let created = app.use_cases.create_event.execute(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn list_events(State(app): State<Arc<App>>) -> Result<Json<Vec<EventView>>, ApiError> {
    let views = app.use_cases.list_events.execute().await?;
    Ok(Json(views))
}

async fn delete_event(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<Json<RetractionReport>, ApiError> {
    let report = app
        .use_cases
        .delete_event
        .execute(EventId::from_uuid(id))
        .await?;
    Ok(Json(report))
}

async fn list_event_speakers(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Speaker>>, ApiError> {
    let speakers = app
        .use_cases
        .list_event_speakers
        .execute(EventId::from_uuid(id))
        .await?;
    Ok(Json(speakers))
}

async fn assign_speaker(
    State(app): State<Arc<App>>,
    Path((id, speaker_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<AssignedSpeaker>, ApiError> {
    let assigned = app
        .use_cases
        .assign_speaker
        .execute(EventId::from_uuid(id), SpeakerId::from_uuid(speaker_id))
        .await?;
    Ok(Json(assigned))
}

// =============================================================================
// Speakers
// =============================================================================

#[derive(Debug, Deserialize)]
struct CreateSpeakerRequest {
    name: String,
    profile: Option<String>,
}

async fn create_speaker(
    State(app): State<Arc<App>>,
    Json(req): Json<CreateSpeakerRequest>,
) -> Result<(StatusCode, Json<Speaker>), ApiError> {
    if req.name.trim().is_empty() {
        return Err(ApiError::BadRequest("speaker name cannot be empty".into()));
    }
    let mut speaker = Speaker::new(req.name);
    if let Some(profile) = req.profile {
        speaker = speaker.with_profile(profile);
    }
    app.repositories.speakers.save(&speaker).await?;
    Ok((StatusCode::CREATED, Json(speaker)))
}

async fn list_speakers(State(app): State<Arc<App>>) -> Result<Json<Vec<Speaker>>, ApiError> {
    Ok(Json(app.repositories.speakers.list().await?))
}

// =============================================================================
// Singular parents
// =============================================================================

#[derive(Debug, Deserialize)]
struct CreateLabelRequest {
    name: String,
}

impl CreateLabelRequest {
    fn name(self) -> Result<String, ApiError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(ApiError::BadRequest("name cannot be empty".into()));
        }
        Ok(name)
    }
}

macro_rules! parent_handlers {
    ($create:ident, $list:ident, $entity:ident, $repo:ident) => {
        async fn $create(
            State(app): State<Arc<App>>,
            Json(req): Json<CreateLabelRequest>,
        ) -> Result<(StatusCode, Json<$entity>), ApiError> {
            let parent = $entity::new(req.name()?);
            app.repositories.$repo.save(&parent).await?;
            Ok((StatusCode::CREATED, Json(parent)))
        }

        async fn $list(State(app): State<Arc<App>>) -> Result<Json<Vec<$entity>>, ApiError> {
            Ok(Json(app.repositories.$repo.list().await?))
        }
    };
}

parent_handlers!(create_event_type, list_event_types, EventType, types);
parent_handlers!(
    create_event_category,
    list_event_categories,
    EventCategory,
    categories
);
parent_handlers!(
    create_event_status,
    list_event_statuses,
    EventStatus,
    statuses
);
parent_handlers!(create_event_venue, list_event_venues, EventVenue, venues);

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Internal(String),
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg).into_response(),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response()
            }
        }
    }
}

impl From<EventError> for ApiError {
    fn from(e: EventError) -> Self {
        match e {
            EventError::EventNotFound(_) | EventError::SpeakerNotFound { .. } => {
                ApiError::NotFound(e.to_string())
            }
            EventError::Domain(_) => ApiError::BadRequest(e.to_string()),
            EventError::Repo(repo) if repo.is_not_found() => ApiError::NotFound(repo.to_string()),
            EventError::Repo(repo) => ApiError::Internal(repo.to_string()),
        }
    }
}

impl From<crate::infrastructure::ports::RepoError> for ApiError {
    fn from(e: crate::infrastructure::ports::RepoError) -> Self {
        if e.is_not_found() {
            ApiError::NotFound(e.to_string())
        } else {
            ApiError::Internal(e.to_string())
        }
    }
}
