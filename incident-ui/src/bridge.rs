use portal_core::chat::{identity_headers, ChatRequest, ChatResponse, SIMPLE_CHAT_PATH};
use portal_core::Role;
use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response};

fn js_err(err: JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

pub async fn post<A, R>(path: &str, role: Role, body: &A) -> Result<R, String>
where
    A: Serialize,
    R: DeserializeOwned,
{
    let window = web_sys::window().ok_or_else(|| "window not available".to_string())?;

    let headers = Headers::new().map_err(js_err)?;
    headers
        .set("Content-Type", "application/json")
        .map_err(js_err)?;
    for (name, value) in identity_headers(role) {
        headers.set(name, value).map_err(js_err)?;
    }

    let body = serde_json::to_string(body).map_err(|e| e.to_string())?;
    let init = RequestInit::new();
    init.set_method("POST");
    init.set_headers(&headers);
    init.set_body(&JsValue::from_str(&body));

    let request = Request::new_with_str_and_init(path, &init).map_err(js_err)?;
    let resp: Response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| format!("fetch rejected: {}", js_err(e)))?
        .dyn_into()
        .map_err(|_| "fetch did not return a Response".to_string())?;

    if !resp.ok() {
        return Err(format!("chat backend returned {}", resp.status()));
    }

    let json = JsFuture::from(resp.json().map_err(js_err)?)
        .await
        .map_err(js_err)?;
    serde_wasm_bindgen::from_value(json).map_err(|e| e.to_string())
}

pub async fn simple_chat(role: Role, request: &ChatRequest) -> Result<ChatResponse, String> {
    post(SIMPLE_CHAT_PATH, role, request).await
}
