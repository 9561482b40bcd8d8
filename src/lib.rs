pub mod emit;
pub mod format;
pub mod model;
pub mod resolve;

use wasm_bindgen::prelude::*;

pub use format::{Format, generate};
pub use model::{Schema, SchemaError, load_schema};
pub use resolve::Resolution;

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

/// Generate code for an editor snapshot.
///
/// Unknown formats fall back to Prisma. A snapshot that cannot be decoded
/// yields a comment in the selected format rather than an error.
#[wasm_bindgen(js_name = "generateCode")]
pub fn generate_code(schema_json: &str, format: &str) -> String {
    let format = Format::from_str(format).unwrap_or_default();
    match Schema::from_json(schema_json) {
        Ok(schema) => generate(&schema, format),
        Err(e) => format!("{}\n", format.comment(&e.to_string())),
    }
}

/// Ids accepted by `generateCode`, in menu order.
#[wasm_bindgen(js_name = "availableFormats")]
pub fn available_formats() -> js_sys::Array {
    Format::ALL
        .iter()
        .map(|f| JsValue::from_str(f.id()))
        .collect()
}
