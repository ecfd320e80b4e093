//! WASM bindings for the `bitshifter` layout compiler.
//!
//! This crate exposes a compact API to JavaScript for planning a packed
//! binary layout from a JSON schema definition and retrieving the
//! generated pack/unpack statements.
//!
//! The entry point from JS is the [`WasmLayout`] type:
//!
//! ```text
//! // Pseudo TypeScript example
//! //
//! // const schemaJson = JSON.stringify({
//! //   dialect: "rust",
//! //   fields: [
//! //     { name: "deviceId", bits: 12, kind: "short" },
//! //     { name: "flags", bits: 4, kind: "byte" }
//! //   ]
//! // });
//! //
//! // const layout = new WasmLayout(schemaJson);
//! // layout.bufferLen();        // 2
//! // layout.fragments();        // [{ field: "deviceId", mask: 255, unpack: "...", ... }, ...]
//! // console.log(layout.report());
//! ```
//!
//! Errors are converted to `JsValue` strings holding the error message.

mod convert;

use bitshifter::{expr::Dialect, plan::Layout, report::Report, serde::SchemaDef};
use wasm_bindgen::prelude::*;

/// Planned layout that can be inspected from JavaScript.
#[wasm_bindgen]
pub struct WasmLayout {
    layout: Layout,
    dialect: Dialect,
}

#[wasm_bindgen]
impl WasmLayout {
    /// Plans a layout from a JSON definition.
    ///
    /// The `schema_json` string must deserialize into [`SchemaDef`]: the
    /// ordered fields (name, bit width, kind) and an optional dialect for
    /// the generated statements. Unknown kinds and fields wider than their
    /// kind's capacity are rejected.
    #[wasm_bindgen(constructor)]
    pub fn new(schema_json: &str) -> Result<WasmLayout, JsValue> {
        let def: SchemaDef = serde_json::from_str(schema_json).map_err(convert::error_to_js)?;
        let dialect = def.dialect.map(Into::into).unwrap_or_default();
        let layout = Layout::try_from(def).map_err(convert::error_to_js)?;
        Ok(WasmLayout { layout, dialect })
    }

    /// Overrides the dialect used by [`fragments`](Self::fragments) and [`report`](Self::report).
    #[wasm_bindgen(js_name = setDialect)]
    pub fn set_dialect(&mut self, dialect: &str) -> Result<(), JsValue> {
        self.dialect = dialect.parse::<Dialect>().map_err(convert::error_to_js)?;
        Ok(())
    }

    /// Total packed length in bits.
    #[wasm_bindgen(js_name = totalBits)]
    pub fn total_bits(&self) -> usize {
        self.layout.total_bits()
    }

    /// Bytes needed to hold the packed data.
    #[wasm_bindgen(js_name = bufferLen)]
    pub fn buffer_len(&self) -> usize {
        self.layout.buffer_len()
    }

    /// Every placement fragment with its statements, as an array of plain objects.
    pub fn fragments(&self) -> Result<JsValue, JsValue> {
        convert::rows_to_js(&self.layout.annotate(self.dialect))
    }

    /// The layout table as text.
    pub fn report(&self) -> String {
        Report::new(&self.layout, self.dialect).to_string()
    }
}
