//! Types exposed to JavaScript via wasm-bindgen.

use serde::{Deserialize, Serialize};
use tsify_next::Tsify;
use wasm_bindgen::prelude::*;

use richtextarea_core::SyncConfig;

/// Optional timing overrides, passed as the second constructor argument.
///
/// Unset fields keep their defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct RichTextAreaConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_fast_ms: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_fast_attempts: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_slow_ms: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height_debounce_ms: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heartbeat_ms: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style_id_prefix: Option<String>,
    /// Hold back host value writes while an IME composition is active.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defer_while_composing: Option<bool>,
}

impl From<RichTextAreaConfig> for SyncConfig {
    fn from(config: RichTextAreaConfig) -> Self {
        let defaults = SyncConfig::default();
        SyncConfig {
            retry_fast_ms: config.retry_fast_ms.unwrap_or(defaults.retry_fast_ms),
            retry_fast_attempts: config
                .retry_fast_attempts
                .unwrap_or(defaults.retry_fast_attempts),
            retry_slow_ms: config.retry_slow_ms.unwrap_or(defaults.retry_slow_ms),
            height_debounce_ms: config
                .height_debounce_ms
                .unwrap_or(defaults.height_debounce_ms),
            heartbeat_ms: config.heartbeat_ms.unwrap_or(defaults.heartbeat_ms),
            style_id_prefix: config.style_id_prefix.unwrap_or(defaults.style_id_prefix),
            defer_while_composing: config
                .defer_while_composing
                .unwrap_or(defaults.defer_while_composing),
        }
    }
}

/// Decode the constructor's config argument. `undefined` and `null` give the
/// defaults.
pub(crate) fn parse_config(value: JsValue) -> Result<SyncConfig, JsError> {
    if value.is_undefined() || value.is_null() {
        return Ok(SyncConfig::default());
    }
    let config: RichTextAreaConfig = serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsError::new(&format!("Invalid config: {}", e)))?;
    Ok(config.into())
}
