use crate::config::Config;
use crate::reference::ReferenceTables;
use crate::types::activity::{DerivedTrack, FileFormat, RideSummary};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Everything derived from one uploaded ride. Owned by a single session.
#[derive(Debug)]
pub struct RideSession {
    pub file_name: String,
    pub file_format: FileFormat,
    pub derived: DerivedTrack,
    pub summary: RideSummary,
    inserted_at: Instant,
}

impl RideSession {
    pub fn new(
        file_name: String,
        file_format: FileFormat,
        derived: DerivedTrack,
        summary: RideSummary,
    ) -> Self {
        Self {
            file_name,
            file_format,
            derived,
            summary,
            inserted_at: Instant::now(),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    sessions: Arc<DashMap<String, Arc<RideSession>>>,
    pub config: Arc<Config>,
    pub references: Arc<ReferenceTables>,
}

impl AppState {
    pub fn new(config: Config, references: ReferenceTables) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            config: Arc::new(config),
            references: Arc::new(references),
        }
    }

    /// Stores `session`, returning true when it replaced an earlier ride.
    pub fn insert(&self, session_id: String, session: RideSession) -> bool {
        self.sessions.insert(session_id, Arc::new(session)).is_some()
    }

    pub fn get(&self, session_id: &str) -> Option<Arc<RideSession>> {
        self.sessions.get(session_id).map(|entry| Arc::clone(entry.value()))
    }

    pub fn contains(&self, session_id: &str) -> bool {
        self.sessions.contains_key(session_id)
    }

    pub fn remove(&self, session_id: &str) -> bool {
        self.sessions.remove(session_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn evict_expired(&self, ttl: Duration) {
        let now = Instant::now();
        self.sessions.retain(|_, session| {
            now.duration_since(session.inserted_at) < ttl
        });
        tracing::info!("Session eviction complete. Current size: {}", self.sessions.len());
    }
}
