//! WASM bindings for the richtextarea editor.
//!
//! Exposes a `RichTextArea` class that hosts an iframe-based rich-text
//! editor and keeps it in sync with props supplied from JavaScript.

mod component;
mod props;
mod types;

pub use component::*;
pub use props::*;
pub use types::*;

use wasm_bindgen::prelude::*;

/// Install the panic hook and console logging.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    init_tracing();
}

fn init_tracing() {
    use tracing::Level;
    use tracing::subscriber::set_global_default;
    use tracing_subscriber::Registry;
    use tracing_subscriber::layer::SubscriberExt;

    let console_level = if cfg!(debug_assertions) {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let wasm_layer = tracing_wasm::WASMLayer::new(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(console_level)
            .build(),
    );

    // A host may have installed its own subscriber already.
    let _ = set_global_default(Registry::default().with(wasm_layer));
}
