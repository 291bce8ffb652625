//! Per-upload pipeline state and the in-memory store that holds it.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{PipelineError, Result};
use crate::models::{ForecastOutcome, HorizonDays, ObservationSeries, PipelineStage};

/// One user's pipeline: the uploaded series, the chosen horizon, and the
/// latest forecast, tagged with where in the flow the session currently is.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub stage: PipelineStage,
    pub source_name: Option<String>,
    pub series: Option<ObservationSeries>,
    pub horizon: HorizonDays,
    pub outcome: Option<ForecastOutcome>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    pub fn new(horizon: HorizonDays) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            stage: PipelineStage::AwaitingUpload,
            source_name: None,
            series: None,
            horizon,
            outcome: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Moves the session to `next`. Callers only request transitions the
    /// stage machine allows; a disallowed one is a logic bug.
    pub fn advance(&mut self, next: PipelineStage) {
        debug_assert!(
            self.stage.can_advance_to(next),
            "illegal stage transition {} -> {}",
            self.stage,
            next
        );
        tracing::debug!(session = %self.id, from = %self.stage, to = %next, "stage transition");
        self.stage = next;
        self.updated_at = Utc::now();
    }

    /// Drops the dataset and everything derived from it, returning the
    /// session to the initial stage.
    pub fn clear_dataset(&mut self) {
        self.series = None;
        self.outcome = None;
        self.source_name = None;
        self.advance(PipelineStage::AwaitingUpload);
    }

    pub fn rows(&self) -> usize {
        self.series.as_ref().map_or(0, ObservationSeries::len)
    }
}

/// Uuid-keyed session map behind an async lock.
///
/// Reads hand out clones, so the lock is never held while a forecast fits;
/// mutations go through [`SessionStore::update`] afterwards.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, session: Session) {
        self.sessions.write().await.insert(session.id, session);
    }

    pub async fn get(&self, id: Uuid) -> Result<Session> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(PipelineError::SessionNotFound(id))
    }

    pub async fn update(&self, session: Session) {
        self.sessions.write().await.insert(session.id, session);
    }

    pub async fn remove(&self, id: Uuid) -> Result<()> {
        self.sessions
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(PipelineError::SessionNotFound(id))
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}
