use bitshifter::{expr::AnnotatedFragment, serde::FragmentDef};
use wasm_bindgen::JsValue;

pub fn error_to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

pub fn rows_to_js(rows: &[AnnotatedFragment]) -> Result<JsValue, JsValue> {
    let out: Vec<FragmentDef> = rows.iter().map(FragmentDef::from).collect();

    serde_wasm_bindgen::to_value(&out).map_err(error_to_js)
}
