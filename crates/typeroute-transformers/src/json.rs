//! JSON text transformers
//!
//! Factory functions in the style of built-in conversions: each returns a
//! ready-to-register transformer between `serde_json::Value` and `String`.
//! Both directions are cheap compared to the default step cost.

use serde_json::Value;
use typeroute_core::{Error, FnTransformer, SharedTransformer};

/// Cost of serializing or parsing in-memory JSON text.
pub const JSON_TEXT_COST: u32 = 10;

/// `serde_json::Value` -> pretty-printed `String`.
pub fn json_to_string() -> SharedTransformer {
    FnTransformer::new(|value: &Value, _| {
        serde_json::to_string_pretty(value).map_err(Error::from)
    })
    .with_cost(JSON_TEXT_COST)
    .into_shared()
}

/// `String` -> parsed `serde_json::Value`.
pub fn string_to_json() -> SharedTransformer {
    FnTransformer::new(|value: &String, _| {
        serde_json::from_str::<Value>(value).map_err(Error::from)
    })
    .with_cost(JSON_TEXT_COST)
    .into_shared()
}
