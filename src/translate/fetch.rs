//! `fetch`-based client for the translation endpoint (wasm32 only).

use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response};

use super::{TranslateRequest, TranslateResponse};

/// POST `request` to `endpoint` and return the translation.
///
/// Any failure (network, non-2xx status, malformed JSON) keeps the source
/// text, so a flaky backend never blanks a cell.
pub(crate) async fn fetch_translation(endpoint: &str, request: &TranslateRequest) -> String {
    match try_fetch(endpoint, request).await {
        Ok(text) => text,
        Err(e) => {
            log::warn!(
                "translation to {} failed, keeping source text: {e:?}",
                request.target
            );
            request.text.clone()
        }
    }
}

async fn try_fetch(endpoint: &str, request: &TranslateRequest) -> Result<String, JsValue> {
    let body =
        serde_json::to_string(request).map_err(|e| JsValue::from_str(&e.to_string()))?;

    let init = RequestInit::new();
    init.set_method("POST");
    init.set_body(&JsValue::from_str(&body));

    let req = Request::new_with_str_and_init(endpoint, &init)?;
    req.headers().set("Content-Type", "application/json")?;

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let resp: Response = JsFuture::from(window.fetch_with_request(&req))
        .await?
        .dyn_into()?;
    if !resp.ok() {
        return Err(JsValue::from_str(&format!("HTTP {}", resp.status())));
    }

    let json = JsFuture::from(resp.json()?).await?;
    let reply: TranslateResponse = serde_wasm_bindgen::from_value(json)?;
    Ok(reply.into_text(&request.text))
}
