use crate::activity::{ActivityEntry, ActivityInput, ActivityLog};
use crate::chat::{ChatResponse, ToolCall};
use crate::incident::{IncidentState, IncidentStore};
use crate::normalize::normalize_tool_call;
use crate::roles::Role;
use crate::subscribers::lock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Marks a chat turn in flight. Stale once the session abandons pending turns.
#[derive(Clone, Debug)]
pub struct TurnToken {
    epoch: Arc<AtomicU64>,
    issued: u64,
}

impl TurnToken {
    pub fn is_current(&self) -> bool {
        self.epoch.load(Ordering::SeqCst) == self.issued
    }
}

/// State container handed to every display surface: one incident, one feed.
///
/// Clones share state.
///
/// Recording a turn and abandoning turns are serialized, so a turn is either
/// recorded in full or dropped in full. Feed listeners run while a turn is being
/// recorded and must not call [`Session::abandon_pending_turns`] themselves.
#[derive(Clone, Default)]
pub struct Session {
    incident: IncidentStore,
    activity: ActivityLog,
    epoch: Arc<AtomicU64>,
    turn_gate: Arc<Mutex<()>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stores(incident: IncidentStore, activity: ActivityLog) -> Self {
        Self {
            incident,
            activity,
            epoch: Arc::new(AtomicU64::new(0)),
            turn_gate: Arc::new(Mutex::new(())),
        }
    }

    pub fn incident(&self) -> &IncidentStore {
        &self.incident
    }

    pub fn activity(&self) -> &ActivityLog {
        &self.activity
    }

    /// Raises the demo incident and records it in the feed.
    pub fn trigger_incident(&self) -> IncidentState {
        let state = self.incident.trigger();
        let details = state.headline().unwrap_or_default();
        self.activity
            .append(ActivityInput::system(Role::It, "Incident Created", details));
        tracing::info!(incident = ?state.incident_id, "incident triggered");
        state
    }

    /// Back to a clean demo: no incident, empty feed, no pending turns.
    pub fn reset_demo(&self) -> IncidentState {
        self.abandon_pending_turns();
        let state = self.incident.reset();
        self.activity.clear();
        tracing::info!("demo reset");
        state
    }

    pub fn record_tool_call(&self, role: Role, call: &ToolCall) -> ActivityEntry {
        self.activity
            .append(normalize_tool_call(call).into_activity(role))
    }

    pub fn begin_turn(&self) -> TurnToken {
        TurnToken {
            epoch: Arc::clone(&self.epoch),
            issued: self.epoch.load(Ordering::SeqCst),
        }
    }

    /// Makes every outstanding token stale. Waits for a turn being recorded.
    pub fn abandon_pending_turns(&self) {
        let _gate = lock(&self.turn_gate);
        self.epoch.fetch_add(1, Ordering::SeqCst);
    }

    /// Feeds a turn's tool calls into the log, unless the turn was abandoned.
    pub fn record_turn(
        &self,
        token: &TurnToken,
        role: Role,
        response: &ChatResponse,
    ) -> Option<Vec<ActivityEntry>> {
        let _gate = lock(&self.turn_gate);
        if !token.is_current() || !Arc::ptr_eq(&token.epoch, &self.epoch) {
            tracing::debug!(role = %role, "dropping late chat response");
            return None;
        }
        Some(
            response
                .tool_calls
                .iter()
                .map(|call| self.record_tool_call(role, call))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::ActivityResult;
    use serde_json::json;

    fn response(calls: &[(&str, serde_json::Value)]) -> ChatResponse {
        ChatResponse {
            response: "done".into(),
            tool_calls: calls
                .iter()
                .map(|(name, output)| ToolCall {
                    name: (*name).into(),
                    output: output.clone(),
                })
                .collect(),
            ..ChatResponse::default()
        }
    }

    #[test]
    fn trigger_records_system_entry() {
        let session = Session::new();
        session.trigger_incident();
        let entries = session.activity().entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].action, "Incident Created");
        assert_eq!(entries[0].role_display, "System");
        assert_eq!(entries[0].details, "INC-001 - Production Database Slowdown");
    }

    #[test]
    fn reset_demo_clears_everything() {
        let session = Session::new();
        session.trigger_incident();
        session.record_tool_call(Role::Ops, &ToolCall {
            name: "notify_stakeholders".into(),
            output: json!({"message": "Sent"}),
        });
        let state = session.reset_demo();
        assert_eq!(state, IncidentState::default());
        assert!(session.activity().is_empty());
    }

    #[test]
    fn turn_records_each_tool_call_in_order() {
        let session = Session::new();
        let token = session.begin_turn();
        let recorded = session
            .record_turn(
                &token,
                Role::Finance,
                &response(&[
                    ("calculate_cost_impact", json!({"message": "$25,000"})),
                    ("view_sla_penalties", json!({"error": "denied"})),
                ]),
            )
            .expect("current turn");
        assert_eq!(recorded.len(), 2);

        let entries = session.activity().entries();
        assert_eq!(entries[0].action, "View Sla Penalties");
        assert_eq!(entries[0].result, ActivityResult::Error);
        assert_eq!(entries[1].action, "Calculate Cost Impact");
    }

    #[test]
    fn abandoned_turn_is_noop() {
        let session = Session::new();
        let token = session.begin_turn();
        session.abandon_pending_turns();
        let late = session.record_turn(&token, Role::It, &response(&[("ping", json!({}))]));
        assert!(late.is_none());
        assert!(session.activity().is_empty());

        let fresh = session.begin_turn();
        assert!(fresh.is_current());
    }

    #[test]
    fn reset_invalidates_in_flight_turns() {
        let session = Session::new();
        let token = session.begin_turn();
        session.reset_demo();
        assert!(!token.is_current());
    }

    #[test]
    fn token_from_other_session_is_rejected() {
        let a = Session::new();
        let b = Session::new();
        let token = a.begin_turn();
        assert!(b
            .record_turn(&token, Role::Csm, &response(&[("ping", json!({}))]))
            .is_none());
    }

    #[test]
    fn bounded_feed_session_keeps_latest_entries() {
        let session = Session::with_stores(IncidentStore::new(), ActivityLog::bounded(2));
        session.trigger_incident();
        let token = session.begin_turn();
        session
            .record_turn(
                &token,
                Role::It,
                &response(&[("restart_service", json!({})), ("check_database_status", json!({}))]),
            )
            .expect("current turn");

        let actions: Vec<_> = session.activity().entries().into_iter().map(|e| e.action).collect();
        assert_eq!(actions, ["Check Database Status", "Restart Service"]);
        assert!(session.incident().snapshot().is_active);
    }

    #[test]
    fn abandon_waits_for_turn_being_recorded() {
        use std::sync::atomic::AtomicBool;
        use std::thread::{self, JoinHandle};
        use std::time::Duration;

        let session = Session::new();
        let abandoned = Arc::new(AtomicBool::new(false));
        let worker: Arc<Mutex<Option<JoinHandle<()>>>> = Arc::new(Mutex::new(None));

        let (s2, flag, slot) = (session.clone(), Arc::clone(&abandoned), Arc::clone(&worker));
        let _sub = session.activity().subscribe(move |_| {
            let mut slot = lock(&slot);
            if slot.is_none() {
                let (s3, flag) = (s2.clone(), Arc::clone(&flag));
                *slot = Some(thread::spawn(move || {
                    s3.abandon_pending_turns();
                    flag.store(true, Ordering::SeqCst);
                }));
            }
            drop(slot);
            thread::sleep(Duration::from_millis(50));
            assert!(!flag.load(Ordering::SeqCst), "abandon ran mid-turn");
        });

        let token = session.begin_turn();
        let recorded = session
            .record_turn(
                &token,
                Role::Ops,
                &response(&[("notify_stakeholders", json!({})), ("update_priority", json!({}))]),
            )
            .expect("current turn");
        assert_eq!(recorded.len(), 2);

        let handle = lock(&worker).take().expect("worker spawned");
        handle.join().expect("join");
        assert!(abandoned.load(Ordering::SeqCst));
        assert!(!token.is_current());
        assert_eq!(session.activity().len(), 2);
    }
}
