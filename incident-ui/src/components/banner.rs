use crate::app::use_portal_view;
use chrono::Utc;
use leptos::*;
use portal_core::incident::format_elapsed;
use portal_core::{IncidentStatus, Priority};
use std::time::Duration;

fn priority_class(priority: Priority) -> &'static str {
    match priority {
        Priority::P1 => "p1",
        Priority::P2 => "p2",
        Priority::P3 => "p3",
        Priority::P4 => "p4",
    }
}

fn status_class(status: IncidentStatus) -> &'static str {
    match status {
        IncidentStatus::Open => "open",
        IncidentStatus::Investigating => "investigating",
        IncidentStatus::Resolved => "resolved",
        IncidentStatus::Closed => "closed",
    }
}

#[component]
pub fn IncidentBanner() -> impl IntoView {
    let view_state = use_portal_view();
    let incident = view_state.incident;
    let now = create_rw_signal(Utc::now());

    if let Ok(handle) = set_interval_with_handle(move || now.set(Utc::now()), Duration::from_secs(1)) {
        on_cleanup(move || handle.clear());
    }

    let duration = move || {
        incident
            .get()
            .elapsed(now.get())
            .map(format_elapsed)
            .unwrap_or_default()
    };

    view! {
      <Show when=move || incident.get().is_active fallback=|| ()>
        <div class=move || format!("banner {}", priority_class(incident.get().priority))>
          <div class="row">
            <b>"Active Incident:"</b>
            <span>{move || incident.get().incident_id.unwrap_or_default()}</span>
            <span class="meta">"-"</span>
            <span>{move || incident.get().title}</span>
          </div>
          <div class="row">
            <span class="meta">"Priority:"</span>
            <span class="badge">{move || incident.get().priority.to_string()}</span>
            <span class="meta">"Status:"</span>
            <span class=move || format!("dot {}", status_class(incident.get().status))></span>
            <span>{move || incident.get().status.to_string()}</span>
            <span class="meta">"Duration:"</span>
            <span class="mono">{duration}</span>
          </div>
        </div>
      </Show>
    }
}
