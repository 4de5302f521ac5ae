use crate::app::{use_portal_view, use_session};
use crate::components::chat_panel::ChatPanel;
use crate::components::section::Section;
use leptos::*;
use portal_core::metrics::portal_sections;
use portal_core::Role;

#[component]
pub fn Portal(role: Role) -> impl IntoView {
    let session = use_session();
    let view_state = use_portal_view();
    let cfg = role.config();

    // Replies that land after leaving the portal must not reach the feed.
    on_cleanup(move || session.abandon_pending_turns());

    view! {
      <div class=format!("portal {}", cfg.color_class)>
        <div class="row">
          <button on:click=move |_| view_state.selected.set(None)>"← Back"</button>
          <h1>{cfg.icon} " " {cfg.portal_title}</h1>
        </div>
        {move || {
          portal_sections(role, &view_state.incident.get())
            .into_iter()
            .map(|section| view! { <Section section=section/> })
            .collect_view()
        }}
        <ChatPanel role=role/>
      </div>
    }
}
