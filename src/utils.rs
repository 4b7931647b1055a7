use js_sys::Promise;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlImageElement;

/// Load `src` into a detached `<img>` and wait until it has decoded.
pub async fn load_image(src: &str) -> Result<HtmlImageElement, JsValue> {
    let img = HtmlImageElement::new()?;

    // The promise callbacks double as the element's load/error handlers
    let loaded = Promise::new(&mut |resolve, reject| {
        img.set_onload(Some(&resolve));
        img.set_onerror(Some(&reject));
    });
    img.set_src(src);
    let result = JsFuture::from(loaded).await;

    img.set_onload(None);
    img.set_onerror(None);
    result.map(|_| img)
}

/// Render a `JsValue` error for logs and error types
pub fn js_error_message(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            js_sys::Reflect::get(value, &JsValue::from_str("message"))
                .ok()
                .and_then(|m| m.as_string())
        })
        .unwrap_or_else(|| format!("{:?}", value))
}

pub fn alert(message: &str) {
    if let Err(e) = gloo_utils::window().alert_with_message(message) {
        log::error!("alert failed: {}", js_error_message(&e));
    }
}
