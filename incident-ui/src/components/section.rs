use crate::components::metric_tile::MetricTile;
use leptos::*;
use portal_core::metrics::{AlertLevel, PanelSection};

fn level_class(level: AlertLevel) -> &'static str {
    match level {
        AlertLevel::Critical => "warn",
        AlertLevel::Warning => "pending",
    }
}

#[component]
pub fn Section(section: PanelSection) -> impl IntoView {
    let title = section.title().to_string();
    let body = match section {
        PanelSection::Tiles { tiles, .. } => view! {
          <div class="tiles">
            {tiles.into_iter().map(|tile| view! { <MetricTile tile=tile/> }).collect_view()}
          </div>
        }
        .into_view(),
        PanelSection::Alerts { summary, items, .. } => view! {
          <span class="badge">{summary}</span>
          <ul>
            {items
              .into_iter()
              .map(|a| view! { <li class=level_class(a.level)>{a.text}</li> })
              .collect_view()}
          </ul>
        }
        .into_view(),
        PanelSection::Progress { left, right, percent, markers, footnote, .. } => view! {
          <div class="row meta"><span>{left}</span><span class="spacer"></span><span>{right}</span></div>
          <div class="bar"><div class="fill" style=format!("width: {percent}%")></div></div>
          <div class="row meta">
            {markers.into_iter().map(|m| view! { <span>{m}</span> }).collect_view()}
          </div>
          {footnote.map(|f| view! { <div class="meta">{f}</div> })}
        }
        .into_view(),
        PanelSection::Approvals { items, .. } => view! {
          <span class="badge">{items.len()}</span>
          {items
            .into_iter()
            .map(|a| view! {
              <div class="tile">
                <div class="row"><strong>{a.title}</strong><span class="warn">{a.urgency}</span></div>
                <div class="value">{a.amount}</div>
                <div class="meta">{a.requested_by}</div>
              </div>
            })
            .collect_view()}
        }
        .into_view(),
        PanelSection::Customers { items, .. } => view! {
          <ul>
            {items
              .into_iter()
              .map(|c| view! {
                <li class="row">
                  <span class="badge">{c.initials}</span>
                  <strong>{c.name}</strong>
                  <span class="meta">{c.sla}</span>
                  <span class=level_class(c.level)>{c.status}</span>
                </li>
              })
              .collect_view()}
          </ul>
        }
        .into_view(),
    };

    view! {
      <h3>{title}</h3>
      {body}
    }
}
