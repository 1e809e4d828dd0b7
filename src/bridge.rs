/// JS bridge to the chrome.* extension APIs (see popup.js)
use wasm_bindgen::prelude::*;

#[wasm_bindgen(module = "/popup.js")]
extern "C" {
    #[wasm_bindgen(js_name = getStorage, catch)]
    pub async fn get_storage(area: &str, key: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_name = setStorage, catch)]
    pub async fn set_storage(area: &str, key: &str, value: JsValue) -> Result<(), JsValue>;

    /// Sends GET_ARTICLE_TEXT to the active tab's content script
    #[wasm_bindgen(js_name = requestArticleText, catch)]
    pub async fn request_article_text() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_name = getActiveTabTitle, catch)]
    pub async fn get_active_tab_title() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_name = copyToClipboard, catch)]
    pub async fn copy_to_clipboard(text: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    pub async fn delay(ms: u32) -> Result<(), JsValue>;
}

/// Render a rejected JS promise value for logs and error messages
pub fn describe_js_error(err: &JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{:?}", err))
}
