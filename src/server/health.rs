//! Liveness and readiness endpoints.

use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::state::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    /// Seconds since the server started
    pub uptime: f64,
    pub service: String,
}

/// Process memory as reported by `/proc/self/status`. Fields are `None` on
/// platforms without procfs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryUsage {
    pub resident_bytes: Option<u64>,
    pub virtual_bytes: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedHealth {
    #[serde(flatten)]
    pub health: HealthStatus,
    pub memory: MemoryUsage,
    pub database: String,
}

impl HealthStatus {
    fn from_state(state: &AppState, status: &str) -> Self {
        Self {
            status: status.to_string(),
            timestamp: Utc::now(),
            uptime: state.started_at.elapsed().as_secs_f64(),
            service: state.service_name.to_string(),
        }
    }
}

pub async fn health_handler(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus::from_state(&state, "OK"))
}

/// Health plus memory and a database round-trip; 503 when the ping fails
pub async fn detailed_health_handler(
    State(state): State<AppState>,
) -> (StatusCode, Json<DetailedHealth>) {
    let (code, status, database) = match state.db.ping().await {
        Ok(()) => (StatusCode::OK, "OK", "connected"),
        Err(e) => {
            tracing::error!(error = %e, "Health check database ping failed");
            (StatusCode::SERVICE_UNAVAILABLE, "ERROR", "disconnected")
        }
    };

    let body = DetailedHealth {
        health: HealthStatus::from_state(&state, status),
        memory: memory_usage(),
        database: database.to_string(),
    };
    (code, Json(body))
}

fn memory_usage() -> MemoryUsage {
    match std::fs::read_to_string("/proc/self/status") {
        Ok(text) => parse_proc_status(&text),
        Err(_) => MemoryUsage::default(),
    }
}

/// Extract VmRSS / VmSize (reported in kB) from a procfs status dump
fn parse_proc_status(text: &str) -> MemoryUsage {
    let field = |name: &str| -> Option<u64> {
        let line = text.lines().find_map(|l| l.strip_prefix(name))?;
        let kb: u64 = line.split_whitespace().next()?.parse().ok()?;
        Some(kb * 1024)
    };

    MemoryUsage {
        resident_bytes: field("VmRSS:"),
        virtual_bytes: field("VmSize:"),
    }
}
