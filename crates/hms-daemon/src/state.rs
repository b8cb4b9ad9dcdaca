//! Shared runtime state for hms-daemon.
//!
//! Handlers receive `State<Arc<AppState>>`. All domain state sits behind a
//! single writer lock: the engine's check-then-commit sequence relies on
//! commits being serialized, and no lock is held across IO.

use std::time::Duration;

use anyhow::Result;
use hms_audit::AuditWriter;
use hms_config::DaemonSettings;
use hms_schemas::DomainEvent;
use hms_store::HospitalState;
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, Mutex, RwLock};
use tracing::error;

// ---------------------------------------------------------------------------
// BusMsg — SSE event bus payload
// ---------------------------------------------------------------------------

/// Messages broadcast over the internal bus and surfaced as SSE events.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BusMsg {
    Heartbeat { ts_millis: i64 },
    Event(DomainEvent),
    LogLine { level: String, msg: String },
}

// ---------------------------------------------------------------------------
// BuildInfo
// ---------------------------------------------------------------------------

/// Static build metadata included in the health response.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BuildInfo {
    pub service: &'static str,
    pub version: &'static str,
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// Shared handle across all handlers.
pub struct AppState {
    /// Broadcast bus for SSE.
    pub bus: broadcast::Sender<BusMsg>,
    pub build: BuildInfo,
    /// The single writer lock over all domain records.
    pub hospital: RwLock<HospitalState>,
    /// Append-only audit trail; its own lock so a slow disk never sits
    /// inside the domain critical section.
    pub audit: Mutex<AuditWriter>,
}

impl AppState {
    pub fn new(settings: &DaemonSettings) -> Result<Self> {
        let (bus, _rx) = broadcast::channel::<BusMsg>(1024);
        let audit = AuditWriter::new(&settings.audit_log_path, settings.audit_hash_chain)?;
        Ok(Self {
            bus,
            build: BuildInfo {
                service: "hms-daemon",
                version: env!("CARGO_PKG_VERSION"),
            },
            hospital: RwLock::new(HospitalState::new()),
            audit: Mutex::new(audit),
        })
    }

    /// Record committed events: audit first, then the SSE bus. An audit
    /// write failure is logged and does not fail the request — the domain
    /// write has already committed.
    pub async fn publish(&self, events: &[DomainEvent]) {
        if events.is_empty() {
            return;
        }
        {
            let mut audit = self.audit.lock().await;
            for event in events {
                if let Err(err) = audit.append(event) {
                    error!(?err, event_id = %event.event_id, "audit append failed");
                }
            }
        }
        for event in events {
            let _ = self.bus.send(BusMsg::Event(event.clone()));
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Spawn a background task that emits a heartbeat SSE every `interval`.
pub fn spawn_heartbeat(bus: broadcast::Sender<BusMsg>, interval: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            let ts = chrono::Utc::now().timestamp_millis();
            let _ = bus.send(BusMsg::Heartbeat { ts_millis: ts });
        }
    });
}
