use crate::app::use_portal_view;
use leptos::*;
use portal_core::ActivityResult;

fn result_mark(result: ActivityResult) -> (&'static str, &'static str) {
    match result {
        ActivityResult::Success => ("ok", "✔"),
        ActivityResult::Error => ("warn", "✖"),
        ActivityResult::Pending => ("pending", "…"),
    }
}

#[component]
pub fn ActivityFeed() -> impl IntoView {
    let activities = use_portal_view().activities;

    view! {
      <div class="row">
        <h2>"Live Activity Feed"</h2>
        <span class="meta">{move || format!("{} events", activities.get().len())}</span>
      </div>
      <Show
        when=move || !activities.get().is_empty()
        fallback=|| view! {
          <div class="empty">
            <p>"No activity yet"</p>
            <p class="meta">"Trigger an incident to see actions"</p>
          </div>
        }
      >
        <ul>
          <For
            each=move || activities.get()
            key=|a| a.id.clone()
            children=move |a| {
              let cfg = a.role.config();
              let (class, mark) = result_mark(a.result);
              let time = a.time_of_day();
              let details = (!a.details.is_empty()).then(|| a.details.clone());
              view! {
                <li>
                  <div class="row">
                    <span>{cfg.icon}</span>
                    <span class="meta mono">{time}</span>
                    <span class=format!("badge {}", cfg.color_class)>{a.role_display}</span>
                    <b class=class>{mark}</b>
                  </div>
                  <div>{a.action}</div>
                  {details.map(|d| view! { <div class="meta">{d}</div> })}
                </li>
              }
            }
          />
        </ul>
      </Show>
    }
}
