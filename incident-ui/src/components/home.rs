use crate::app::{use_portal_view, use_session};
use leptos::*;
use portal_core::Role;

#[component]
fn TriggerButton() -> impl IntoView {
    let session = use_session();
    let incident = use_portal_view().incident;
    let notice = create_rw_signal(None::<&'static str>);

    let trigger = {
        let session = session.clone();
        move |_: ev::MouseEvent| {
            session.trigger_incident();
            notice.set(None);
        }
    };
    let reset = move |_: ev::MouseEvent| {
        session.reset_demo();
        notice.set(Some("Demo reset successfully"));
    };

    view! {
      <Show
        when=move || incident.get().is_active
        fallback=move || view! {
          <button class="danger" on:click=trigger.clone()>"🚨 Trigger Production Incident"</button>
        }
      >
        <button class="warn" on:click=reset.clone()>"Reset Demo"</button>
      </Show>
      <Show when=move || notice.get().is_some() fallback=|| ()>
        <div class="toast">{move || notice.get().unwrap_or_default()}</div>
      </Show>
    }
}

#[component]
pub fn Home() -> impl IntoView {
    let selected = use_portal_view().selected;

    view! {
      <div class="row">
        <div>
          <h1>"Incident Management Demo"</h1>
          <p class="meta">"Role-based assistants sharing one incident"</p>
        </div>
        <TriggerButton/>
      </div>

      <h2>"Select a Department"</h2>
      <div class="grid">
        {Role::ALL
          .into_iter()
          .map(|role| {
            let cfg = role.config();
            view! {
              <button
                class=format!("role {}", cfg.color_class)
                on:click=move |_| selected.set(Some(role))
              >
                <span class="icon">{cfg.icon}</span>
                <span>{cfg.name}</span>
                <span class="meta">{cfg.persona}</span>
              </button>
            }
          })
          .collect_view()}
      </div>
    }
}
