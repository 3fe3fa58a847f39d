//! JavaScript bindings
//!
//! Options are plain JS objects using the same keys as the config file, in
//! camelCase, kebab-case or snake_case. Missing keys keep their defaults.

use crate::analysis::analyze_text_format;
use crate::engine::format_text_with;
use crate::language::detect_language;
use crate::options::FormatOverrides;
use crate::rules::{self, FormatRules, FormatRulesOverrides};
use crate::utils::html;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

fn from_js<T: serde::de::DeserializeOwned + Default>(value: JsValue) -> Result<T, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(T::default());
    }
    serde_wasm_bindgen::from_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Language code (`"vi"` or `"en"`) of `text`
#[wasm_bindgen(js_name = detectLanguage)]
pub fn detect_language_js(text: &str) -> String {
    detect_language(text).code().to_string()
}

/// Normalize and reflow `text`; throws on an invalid language hint or zero width
#[wasm_bindgen(js_name = formatText)]
pub fn format_text_js(text: &str, options: JsValue) -> Result<String, JsValue> {
    let overrides: FormatOverrides = from_js(options)?;
    format_text_with(text, &overrides).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Run the rule-based quick formatter with the rules enabled in `rules`
#[wasm_bindgen(js_name = quickFormatText)]
pub fn quick_format_text_js(text: &str, rules: JsValue) -> Result<String, JsValue> {
    let overrides: FormatRulesOverrides = from_js(rules)?;
    Ok(rules::format_text(text, &FormatRules::default().merge(&overrides)))
}

/// Statistics for `text` as a JS object
#[wasm_bindgen(js_name = analyzeTextFormat)]
pub fn analyze_text_format_js(text: &str) -> Result<JsValue, JsValue> {
    let metadata = analyze_text_format(text);
    serde_wasm_bindgen::to_value(&metadata).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// HTML-escape `text` and turn newlines into `<br>`
#[wasm_bindgen(js_name = formatTextForDisplay)]
pub fn format_text_for_display_js(text: &str) -> String {
    html::format_text_for_display(text)
}
