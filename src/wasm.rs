//! WASM bindings for texdown
//!
//! This module provides JavaScript-accessible functions for TexDown → LaTeX
//! conversion.

#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

#[cfg(feature = "wasm")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "wasm")]
use crate::utils::{ConversionResult, TexDownOptions};

/// Safely serialize a value to JsValue, returning an error object on failure.
#[cfg(feature = "wasm")]
fn to_js_value<T: Serialize>(value: &T) -> JsValue {
    serde_wasm_bindgen::to_value(value).unwrap_or_else(|e| {
        let error_obj = ConvertResult::failure(format!("Serialization error: {}", e));
        serde_wasm_bindgen::to_value(&error_obj).unwrap_or(JsValue::NULL)
    })
}

/// Conversion result handed back to JavaScript
#[cfg(feature = "wasm")]
#[derive(Serialize, Deserialize)]
pub struct ConvertResult {
    /// The converted output
    pub output: String,
    /// Whether the conversion was successful
    pub success: bool,
    /// Error message if conversion failed
    pub error: Option<String>,
}

#[cfg(feature = "wasm")]
impl ConvertResult {
    fn failure(message: String) -> Self {
        ConvertResult {
            output: String::new(),
            success: false,
            error: Some(message),
        }
    }
}

#[cfg(feature = "wasm")]
impl From<ConversionResult<String>> for ConvertResult {
    fn from(result: ConversionResult<String>) -> Self {
        match result {
            Ok(output) => ConvertResult {
                output,
                success: true,
                error: None,
            },
            Err(e) => ConvertResult::failure(e.to_string()),
        }
    }
}

/// Initialize panic hook for better error messages in browser console
#[cfg(feature = "wasm")]
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Convert a whole TexDown document to a `.tex` file
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "texdownToLatex")]
pub fn texdown_to_latex_wasm(input: &str) -> JsValue {
    let result: ConvertResult = crate::convert(input).map(|doc| doc.to_latex()).into();
    to_js_value(&result)
}

/// Preamble only
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "texdownHeader")]
pub fn texdown_header_wasm(input: &str) -> JsValue {
    let result: ConvertResult = crate::make_header(input).into();
    to_js_value(&result)
}

/// Body only; body conversion cannot fail
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "texdownBody")]
pub fn texdown_body_wasm(input: &str) -> String {
    crate::make_body(input)
}

/// Convert with options given as a plain JS object; missing fields take
/// their defaults.
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "texdownToLatexWithOptions")]
pub fn texdown_to_latex_with_options_wasm(input: &str, options: JsValue) -> JsValue {
    let options: TexDownOptions = match serde_wasm_bindgen::from_value(options) {
        Ok(options) => options,
        Err(e) => return to_js_value(&ConvertResult::failure(format!("Invalid options: {}", e))),
    };
    let result: ConvertResult = crate::convert_with_options(input, &options)
        .map(|doc| doc.to_latex())
        .into();
    to_js_value(&result)
}

/// Get the version of texdown
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "getVersion")]
pub fn get_version() -> String {
    crate::VERSION.to_string()
}
