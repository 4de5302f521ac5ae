use crate::roles::Role;
use crate::subscribers::{lock, Listeners, Subscription};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityResult {
    Success,
    Error,
    Pending,
}

/// An activity before the log stamps it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityInput {
    pub role: Role,
    pub role_display: String,
    pub action: String,
    pub result: ActivityResult,
    pub details: String,
}

impl ActivityInput {
    pub fn for_role(
        role: Role,
        action: impl Into<String>,
        result: ActivityResult,
        details: impl Into<String>,
    ) -> Self {
        Self {
            role,
            role_display: role.display_name().to_string(),
            action: action.into(),
            result,
            details: details.into(),
        }
    }

    /// A notice raised by the portal itself rather than by a department.
    pub fn system(role: Role, action: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            role,
            role_display: "System".to_string(),
            action: action.into(),
            result: ActivityResult::Success,
            details: details.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub role: Role,
    pub role_display: String,
    pub action: String,
    pub result: ActivityResult,
    pub details: String,
}

impl ActivityEntry {
    /// Wall-clock time of day in the viewer's local zone, `HH:MM:SS`.
    pub fn time_of_day(&self) -> String {
        self.timestamp
            .with_timezone(&chrono::Local)
            .format("%H:%M:%S")
            .to_string()
    }
}

struct Feed {
    entries: VecDeque<ActivityEntry>,
    next_seq: u64,
}

struct Inner {
    feed: Mutex<Feed>,
    commit: Mutex<()>,
    listeners: Listeners<[ActivityEntry]>,
    capacity: Option<usize>,
}

/// Session activity feed, newest entry first.
///
/// Clones share the same feed. `append` and `clear` are serialized, and their
/// listeners run before the call returns, in commit order.
#[derive(Clone)]
pub struct ActivityLog {
    inner: Arc<Inner>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::with_capacity(None)
    }

    /// Keeps at most `max_entries`, dropping the oldest.
    pub fn bounded(max_entries: usize) -> Self {
        Self::with_capacity(Some(max_entries.max(1)))
    }

    fn with_capacity(capacity: Option<usize>) -> Self {
        Self {
            inner: Arc::new(Inner {
                feed: Mutex::new(Feed {
                    entries: VecDeque::new(),
                    next_seq: 1,
                }),
                commit: Mutex::new(()),
                listeners: Listeners::new(),
                capacity,
            }),
        }
    }

    pub fn append(&self, input: ActivityInput) -> ActivityEntry {
        let _commit = lock(&self.inner.commit);
        let (entry, snapshot) = {
            let mut feed = lock(&self.inner.feed);
            let seq = feed.next_seq;
            feed.next_seq += 1;

            let entry = ActivityEntry {
                id: format!("activity-{seq}"),
                timestamp: Utc::now(),
                role: input.role,
                role_display: input.role_display,
                action: input.action,
                result: input.result,
                details: input.details,
            };
            feed.entries.push_front(entry.clone());
            if let Some(cap) = self.inner.capacity {
                feed.entries.truncate(cap);
            }
            (entry, feed.entries.iter().cloned().collect::<Vec<_>>())
        };

        tracing::debug!(id = %entry.id, role = %entry.role, action = %entry.action, "activity appended");
        self.inner.listeners.notify(&snapshot);
        entry
    }

    pub fn clear(&self) {
        let _commit = lock(&self.inner.commit);
        let removed = {
            let mut feed = lock(&self.inner.feed);
            let n = feed.entries.len();
            feed.entries.clear();
            n
        };
        tracing::debug!(removed, "activity log cleared");
        self.inner.listeners.notify(&[]);
    }

    pub fn entries(&self) -> Vec<ActivityEntry> {
        lock(&self.inner.feed).entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        lock(&self.inner.feed).entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Listener receives the whole feed, newest first, after every append or clear.
    pub fn subscribe(
        &self,
        listener: impl Fn(&[ActivityEntry]) + Send + Sync + 'static,
    ) -> Subscription {
        self.inner.listeners.subscribe(listener)
    }
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn input(n: usize) -> ActivityInput {
        ActivityInput::for_role(Role::Ops, format!("Step {n}"), ActivityResult::Success, "ok")
    }

    #[test]
    fn ids_are_unique_across_clears() {
        let log = ActivityLog::new();
        let mut ids = HashSet::new();
        for n in 0..50 {
            ids.insert(log.append(input(n)).id);
            if n == 25 {
                log.clear();
            }
        }
        assert_eq!(ids.len(), 50);
    }

    #[test]
    fn newest_entry_is_first() {
        let log = ActivityLog::new();
        for n in 0..5 {
            log.append(input(n));
        }
        let actions: Vec<_> = log.entries().into_iter().map(|e| e.action).collect();
        assert_eq!(actions, ["Step 4", "Step 3", "Step 2", "Step 1", "Step 0"]);
    }

    #[test]
    fn clear_leaves_empty_log() {
        let log = ActivityLog::new();
        log.append(input(1));
        log.append(input(2));
        log.clear();
        assert!(log.is_empty());
        assert!(log.entries().is_empty());

        log.clear();
        assert_eq!(log.len(), 0);
    }

    #[test]
    fn role_display_is_frozen_at_append() {
        let log = ActivityLog::new();
        let entry = log.append(ActivityInput::for_role(
            Role::Csm,
            "Notify Customers",
            ActivityResult::Pending,
            "",
        ));
        assert_eq!(entry.role_display, "Customer Service");

        let system = log.append(ActivityInput::system(Role::It, "Incident Created", "INC-001"));
        assert_eq!(system.role_display, "System");
        assert_eq!(system.result, ActivityResult::Success);
    }

    #[test]
    fn bounded_log_drops_oldest() {
        let log = ActivityLog::bounded(3);
        for n in 0..5 {
            log.append(input(n));
        }
        let actions: Vec<_> = log.entries().into_iter().map(|e| e.action).collect();
        assert_eq!(actions, ["Step 4", "Step 3", "Step 2"]);
    }

    #[test]
    fn listeners_see_feed_after_each_commit() {
        let log = ActivityLog::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen2 = Arc::clone(&seen);
        let sub = log.subscribe(move |entries| lock(&seen2).push(entries.len()));

        log.append(input(1));
        log.append(input(2));
        log.clear();
        sub.unsubscribe();
        log.append(input(3));

        assert_eq!(*lock(&seen), vec![1, 2, 0]);
    }

    #[test]
    fn concurrent_appends_keep_ids_distinct() {
        let log = ActivityLog::new();
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let log = log.clone();
                std::thread::spawn(move || {
                    for n in 0..25 {
                        log.append(input(t * 100 + n));
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().expect("join");
        }

        let ids: HashSet<_> = log.entries().into_iter().map(|e| e.id).collect();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn time_of_day_uses_local_zone() {
        use chrono::TimeZone;

        let mut entry = ActivityLog::new().append(input(0));
        entry.timestamp = Utc
            .with_ymd_and_hms(2024, 3, 9, 14, 23, 5)
            .single()
            .expect("valid timestamp");
        let offset = chrono::Local.offset_from_utc_datetime(&entry.timestamp.naive_utc());
        let local = entry.timestamp.naive_utc() + offset;
        assert_eq!(entry.time_of_day(), local.format("%H:%M:%S").to_string());
    }

    #[test]
    fn serializes_with_wire_names() {
        let log = ActivityLog::new();
        let entry = log.append(input(7));
        let v = serde_json::to_value(&entry).expect("serialize");
        assert_eq!(v["roleDisplay"], "Operations");
        assert_eq!(v["result"], "success");
        assert_eq!(v["role"], "OPS");
    }
}
