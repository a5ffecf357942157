//! Browser `fetch` transport

use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

use super::backend::{BackendFuture, GameBackend};
use super::types::{SessionUpdateAck, SessionUpdateRequest, SyncResponse};
use crate::error::{GameError, Result};

#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

impl GameBackend for HttpBackend {
    fn fetch_sync(&self, customer_id: &str) -> BackendFuture<SyncResponse> {
        let url = format!("{}/api/games/sync/{}", self.base_url, customer_id);
        Box::pin(async move {
            let body = send("GET", &url, None).await?;
            Ok(serde_json::from_str(&body)?)
        })
    }

    fn update_session(&self, request: SessionUpdateRequest) -> BackendFuture<SessionUpdateAck> {
        let url = format!("{}/api/games/sessions", self.base_url);
        Box::pin(async move {
            let payload = serde_json::to_string(&request)?;
            let body = send("POST", &url, Some(payload)).await?;
            // Some deployments answer with an empty body
            if body.trim().is_empty() {
                return Ok(SessionUpdateAck::default());
            }
            Ok(serde_json::from_str(&body)?)
        })
    }
}

fn js_error(err: JsValue) -> GameError {
    GameError::NetworkFailure(format!("{err:?}"))
}

/// Perform a JSON request and return the response body
async fn send(method: &str, url: &str, body: Option<String>) -> Result<String> {
    let opts = RequestInit::new();
    opts.set_method(method);
    opts.set_mode(RequestMode::Cors);
    if let Some(body) = body {
        opts.set_body(&JsValue::from_str(&body));
    }

    let request = Request::new_with_str_and_init(url, &opts).map_err(js_error)?;
    request
        .headers()
        .set("Content-Type", "application/json")
        .map_err(js_error)?;

    let window =
        web_sys::window().ok_or_else(|| GameError::NetworkFailure("no window".to_string()))?;
    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(js_error)?
        .dyn_into()
        .map_err(js_error)?;

    if !response.ok() {
        return Err(GameError::NetworkFailure(format!(
            "HTTP error! status: {}",
            response.status()
        )));
    }

    let text = JsFuture::from(response.text().map_err(js_error)?)
        .await
        .map_err(js_error)?;
    text.as_string()
        .ok_or_else(|| GameError::Decode("response body is not text".to_string()))
}
