use crate::components::banner::IncidentBanner;
use crate::components::feed::ActivityFeed;
use crate::components::home::Home;
use crate::components::portal::Portal;
use leptos::*;
use portal_core::{ActivityEntry, IncidentState, Role, Session};

/// Reactive mirrors of the session stores, kept current by store subscriptions.
#[derive(Clone, Copy)]
pub struct PortalView {
    pub incident: RwSignal<IncidentState>,
    pub activities: RwSignal<Vec<ActivityEntry>>,
    pub selected: RwSignal<Option<Role>>,
}

pub fn use_session() -> Session {
    use_context::<Session>().expect("use_session must be called within App")
}

pub fn use_portal_view() -> PortalView {
    use_context::<PortalView>().expect("use_portal_view must be called within App")
}

#[component]
pub fn App() -> impl IntoView {
    let session = Session::new();
    let view_state = PortalView {
        incident: create_rw_signal(session.incident().snapshot()),
        activities: create_rw_signal(session.activity().entries()),
        selected: create_rw_signal(None::<Role>),
    };

    let incident_sub = session
        .incident()
        .subscribe(move |state| view_state.incident.set(state.clone()));
    let feed_sub = session
        .activity()
        .subscribe(move |entries| view_state.activities.set(entries.to_vec()));
    on_cleanup(move || {
        incident_sub.unsubscribe();
        feed_sub.unsubscribe();
    });

    provide_context(session);
    provide_context(view_state);

    view! {
      <IncidentBanner/>
      <div class="layout">
        <section class="panel main">
          {move || match view_state.selected.get() {
            Some(role) => view! { <Portal role=role/> }.into_view(),
            None => view! { <Home/> }.into_view(),
          }}
        </section>
        <section class="panel feed">
          <ActivityFeed/>
        </section>
      </div>
    }
}
