use crate::subscribers::{lock, Listeners, Subscription};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Mutex};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    P1,
    #[default]
    P2,
    P3,
    P4,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IncidentStatus {
    #[default]
    Open,
    Investigating,
    Resolved,
    Closed,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Priority::P1 => "P1",
            Priority::P2 => "P2",
            Priority::P3 => "P3",
            Priority::P4 => "P4",
        };
        f.write_str(s)
    }
}

impl fmt::Display for IncidentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IncidentStatus::Open => "OPEN",
            IncidentStatus::Investigating => "INVESTIGATING",
            IncidentStatus::Resolved => "RESOLVED",
            IncidentStatus::Closed => "CLOSED",
        };
        f.write_str(s)
    }
}

/// The session's one incident. `Default` is the inactive zero value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentState {
    pub is_active: bool,
    pub incident_id: Option<String>,
    pub title: String,
    pub priority: Priority,
    pub status: IncidentStatus,
    pub start_time: Option<DateTime<Utc>>,
}

impl IncidentState {
    pub fn elapsed(&self, now: DateTime<Utc>) -> Option<Duration> {
        if !self.is_active {
            return None;
        }
        self.start_time.map(|start| (now - start).max(Duration::zero()))
    }

    /// `INC-001 - Production Database Slowdown`
    pub fn headline(&self) -> Option<String> {
        self.incident_id
            .as_ref()
            .map(|id| format!("{id} - {}", self.title))
    }
}

/// Banner clock, `m:ss`.
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.num_seconds().max(0);
    format!("{}:{:02}", secs / 60, secs % 60)
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentTemplate {
    pub incident_id: String,
    pub title: String,
    pub priority: Priority,
}

impl Default for IncidentTemplate {
    fn default() -> Self {
        Self {
            incident_id: "INC-001".into(),
            title: "Production Database Slowdown".into(),
            priority: Priority::P2,
        }
    }
}

struct Inner {
    state: Mutex<IncidentState>,
    commit: Mutex<()>,
    listeners: Listeners<IncidentState>,
    template: IncidentTemplate,
}

/// Owner of the session's incident record.
///
/// Only `trigger` and `reset` mutate it. Listeners run synchronously after
/// each commit and before the mutating call returns.
#[derive(Clone)]
pub struct IncidentStore {
    inner: Arc<Inner>,
}

impl IncidentStore {
    pub fn new() -> Self {
        Self::with_template(IncidentTemplate::default())
    }

    pub fn with_template(template: IncidentTemplate) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(IncidentState::default()),
                commit: Mutex::new(()),
                listeners: Listeners::new(),
                template,
            }),
        }
    }

    pub fn snapshot(&self) -> IncidentState {
        lock(&self.inner.state).clone()
    }

    pub fn trigger(&self) -> IncidentState {
        let template = self.inner.template.clone();
        self.trigger_with(template)
    }

    /// Overwrites whatever is active, including an already active incident.
    pub fn trigger_with(&self, template: IncidentTemplate) -> IncidentState {
        self.commit(IncidentState {
            is_active: true,
            incident_id: Some(template.incident_id),
            title: template.title,
            priority: template.priority,
            status: IncidentStatus::Investigating,
            start_time: Some(Utc::now()),
        })
    }

    pub fn reset(&self) -> IncidentState {
        self.commit(IncidentState::default())
    }

    pub fn subscribe(
        &self,
        listener: impl Fn(&IncidentState) + Send + Sync + 'static,
    ) -> Subscription {
        self.inner.listeners.subscribe(listener)
    }

    fn commit(&self, next: IncidentState) -> IncidentState {
        let _commit = lock(&self.inner.commit);
        {
            let mut state = lock(&self.inner.state);
            if state.is_active && next.is_active {
                tracing::info!(
                    previous = ?state.incident_id,
                    next = ?next.incident_id,
                    "re-triggering active incident"
                );
            }
            *state = next.clone();
        }
        tracing::debug!(active = next.is_active, status = %next.status, "incident state committed");
        self.inner.listeners.notify(&next);
        next
    }
}

impl Default for IncidentStore {
    fn default() -> Self {
        Self::new()
    }
}
