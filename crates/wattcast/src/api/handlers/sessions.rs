//! Session lifecycle handlers: upload, inspect, reconfigure, delete.
//!
//! Upload-stage failures abort the request with an error status. Forecast
//! failures do not: the dataset upstream of the model is still valid, so the
//! response carries the history presentation with the failure beside it.

use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{PipelineError, Result};
use crate::models::PipelineStage;
use crate::present::{self, Presentation};
use crate::service::Session;

use super::super::state::AppState;

#[derive(Debug, Serialize)]
pub struct SessionView {
    pub id: Uuid,
    pub stage: PipelineStage,
    pub source_name: Option<String>,
    pub horizon_days: u32,
    pub rows: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Session> for SessionView {
    fn from(session: &Session) -> Self {
        Self {
            id: session.id,
            stage: session.stage,
            source_name: session.source_name.clone(),
            horizon_days: session.horizon.get(),
            rows: session.rows(),
            created_at: session.created_at,
            updated_at: session.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub error: String,
    pub stage: String,
    pub message: String,
}

impl From<&PipelineError> for ErrorDetail {
    fn from(err: &PipelineError) -> Self {
        Self {
            error: err.kind().to_string(),
            stage: err.stage().to_string(),
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session: SessionView,
    pub presentation: Presentation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forecast_error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
pub struct HorizonRequest {
    pub days: i64,
}

fn respond(
    state: &AppState,
    session: &Session,
    forecast_error: Option<&PipelineError>,
) -> SessionResponse {
    SessionResponse {
        session: SessionView::from(session),
        presentation: present::build_presentation(
            session.series.as_ref(),
            session.outcome.as_ref(),
            state.config.preview_rows,
        ),
        forecast_error: forecast_error.map(ErrorDetail::from),
    }
}

/// Pulls the `file` part out of a multipart upload.
async fn read_upload(multipart: &mut Multipart) -> Result<(Option<String>, Vec<u8>)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| PipelineError::upload(format!("malformed multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            let file_name = field.file_name().map(str::to_owned);
            let data = field
                .bytes()
                .await
                .map_err(|e| PipelineError::upload(format!("failed to read upload: {e}")))?;
            return Ok((file_name, data.to_vec()));
        }
    }
    Err(PipelineError::upload("multipart field 'file' is required"))
}

/// POST /api/v1/sessions
///
/// A rejected upload creates nothing; the client stays where it was.
pub async fn create_session(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<SessionResponse>)> {
    let (source_name, data) = read_upload(&mut multipart).await?;

    let mut session = Session::new(state.default_horizon);
    state
        .pipeline
        .attach_dataset(&mut session, source_name, &data)?;
    let forecast_error = state.pipeline.run_forecast(&mut session).err();

    let response = respond(&state, &session, forecast_error.as_ref());
    state.sessions.insert(session).await;
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/v1/sessions/:id
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>> {
    let session = state.sessions.get(id).await?;
    Ok(Json(respond(&state, &session, None)))
}

/// DELETE /api/v1/sessions/:id
pub async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state.sessions.remove(id).await?;
    tracing::info!(session = %id, "session deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/sessions/:id/dataset
///
/// Replaces the session's dataset with a new upload. A file that fails to
/// parse leaves the session cleared and awaiting upload, and that cleared
/// state is persisted before the error goes back to the client.
pub async fn replace_dataset(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<SessionResponse>> {
    let (source_name, data) = read_upload(&mut multipart).await?;
    let mut session = state.sessions.get(id).await?;

    if let Err(err) = state
        .pipeline
        .attach_dataset(&mut session, source_name, &data)
    {
        state.sessions.update(session).await;
        return Err(err);
    }

    let forecast_error = state.pipeline.run_forecast(&mut session).err();
    let response = respond(&state, &session, forecast_error.as_ref());
    state.sessions.update(session).await;
    Ok(Json(response))
}

/// PUT /api/v1/sessions/:id/horizon
///
/// An out-of-range horizon is rejected without touching the stored session.
pub async fn update_horizon(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(request): Json<HorizonRequest>,
) -> Result<Json<SessionResponse>> {
    let mut session = state.sessions.get(id).await?;

    match state.pipeline.set_horizon(&mut session, request.days) {
        Ok(()) => {
            let response = respond(&state, &session, None);
            state.sessions.update(session).await;
            Ok(Json(response))
        }
        Err(err @ (PipelineError::InsufficientData { .. } | PipelineError::Engine(_))) => {
            let response = respond(&state, &session, Some(&err));
            state.sessions.update(session).await;
            Ok(Json(response))
        }
        Err(err) => Err(err),
    }
}
