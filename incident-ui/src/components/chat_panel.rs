use crate::app::use_session;
use crate::bridge;
use leptos::*;
use portal_core::chat::{ChatRequest, Speaker, Transcript};
use portal_core::Role;
use wasm_bindgen_futures::spawn_local;

#[component]
pub fn ChatPanel(role: Role) -> impl IntoView {
    let session = use_session();
    let cfg = role.config();
    let transcript = create_rw_signal(Transcript::new());
    let input = create_rw_signal(String::new());
    let loading = create_rw_signal(false);

    let send = move || {
        if loading.get_untracked() {
            return;
        }
        let Ok(request) = ChatRequest::new(&input.get_untracked()) else {
            return;
        };
        input.set(String::new());
        transcript.update(|t| t.push_user(request.message.clone()));
        loading.set(true);

        let session = session.clone();
        let token = session.begin_turn();
        spawn_local(async move {
            match bridge::simple_chat(role, &request).await {
                Ok(resp) => {
                    if session.record_turn(&token, role, &resp).is_some() {
                        transcript.try_update(|t| t.push_assistant(resp.response));
                    }
                }
                Err(e) => {
                    logging::warn!("chat error: {e}");
                    if token.is_current() {
                        transcript.try_update(|t| t.push_fallback());
                    }
                }
            }
            loading.try_set(false);
        });
    };
    let send_on_click = send.clone();

    view! {
      <div class="chat">
        <div class="chat-header" style=format!("border-color: {}", cfg.color)>
          <h4>"Agent"</h4>
          <span class="meta">{cfg.persona}</span>
        </div>
        <ul class="messages">
          {move || {
            transcript
              .get()
              .messages()
              .iter()
              .map(|m| {
                let class = match m.speaker {
                  Speaker::User => "msg user",
                  Speaker::Assistant => "msg assistant",
                };
                view! { <li class=class>{m.content.clone()}</li> }
              })
              .collect_view()
          }}
          <Show when=move || loading.get() fallback=|| ()>
            <li class="msg assistant meta">"thinking..."</li>
          </Show>
        </ul>
        <div class="row">
          <input
            prop:value=move || input.get()
            on:input=move |ev| input.set(event_target_value(&ev))
            on:keydown=move |e: ev::KeyboardEvent| {
              if e.key() == "Enter" && !e.shift_key() {
                e.prevent_default();
                send();
              }
            }
            prop:disabled=move || loading.get()
            placeholder="Type a message..."
          />
          <button
            style=format!("background-color: {}", cfg.color)
            prop:disabled=move || loading.get() || input.get().trim().is_empty()
            on:click=move |_| send_on_click()
          >
            "Send"
          </button>
        </div>
      </div>
    }
}
