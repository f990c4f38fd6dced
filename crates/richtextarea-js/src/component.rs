//! RichTextArea - the editor component exposed to JavaScript.

use std::cell::RefCell;

use wasm_bindgen::prelude::*;
use web_sys::{Document, Element};

use richtextarea_browser::{FrameEditor, render_shell};
use richtextarea_core::{HostProps, SyncConfig};

use crate::props::{JsHandler, parse_props};
use crate::types::parse_config;

struct State {
    props: HostProps<JsHandler>,
    config: SyncConfig,
    editor: Option<FrameEditor<JsHandler>>,
}

/// An iframe-hosted rich-text editor.
///
/// Typical use: `render()` the shell, insert it into the page, `mount()` it,
/// then call `update()` whenever the props change and `unmount()` when done.
///
/// Every method takes `&self` and holds no borrow while calling into the
/// frame, so handlers fired synchronously by `execCommand` or `focus` may
/// call back into the same object.
#[wasm_bindgen]
pub struct RichTextArea {
    state: RefCell<State>,
}

impl RichTextArea {
    fn editor(&self) -> Option<FrameEditor<JsHandler>> {
        self.state.borrow().editor.clone()
    }
}

#[wasm_bindgen]
impl RichTextArea {
    /// Create an editor from a props object (`value`, `placeholder`,
    /// `stylesheet`, `on*` handlers and wrapper attributes) and optional
    /// timing config.
    #[wasm_bindgen(constructor)]
    pub fn new(props: JsValue, config: JsValue) -> Result<RichTextArea, JsError> {
        Ok(Self {
            state: RefCell::new(State {
                props: parse_props(&props)?,
                config: parse_config(config)?,
                editor: None,
            }),
        })
    }

    /// Build the `<richtextarea>` wrapper and its iframe, not yet attached.
    /// Uses the page's document unless one is given.
    #[wasm_bindgen]
    pub fn render(&self, document: Option<Document>) -> Result<Element, JsError> {
        let document = match document {
            Some(document) => document,
            None => web_sys::window()
                .and_then(|w| w.document())
                .ok_or_else(|| JsError::new("No document"))?,
        };
        render_shell(&document, &self.state.borrow().props)
            .map_err(|e| JsError::new(&format!("Failed to render shell: {:?}", e)))
    }

    /// Start syncing into the wrapper `base`, which must hold the iframe.
    /// Mounting again moves the editor to the new wrapper.
    #[wasm_bindgen]
    pub fn mount(&self, base: Element) {
        let previous = self.state.borrow_mut().editor.take();
        if let Some(editor) = previous {
            editor.unmount();
        }
        let (props, config) = {
            let state = self.state.borrow();
            (state.props.clone(), state.config.clone())
        };
        let editor = FrameEditor::mount(base, props, config);
        self.state.borrow_mut().editor = Some(editor);
    }

    /// Apply new props. Returns `true` when wrapper attributes or handlers
    /// changed, so that a host rendering its own markup should re-render it.
    #[wasm_bindgen]
    pub fn update(&self, props: JsValue) -> Result<bool, JsError> {
        let props = parse_props(&props)?;
        let rerender = match self.editor() {
            Some(editor) => editor
                .update(props.clone())
                .map_err(|e| JsError::new(&format!("Failed to update attributes: {:?}", e)))?,
            None => props.requires_rerender(&self.state.borrow().props),
        };
        self.state.borrow_mut().props = props;
        Ok(rerender)
    }

    /// Stop syncing and release timers and listeners.
    #[wasm_bindgen]
    pub fn unmount(&self) {
        let editor = self.state.borrow_mut().editor.take();
        if let Some(editor) = editor {
            editor.unmount();
        }
    }

    /// Move focus into the editable document.
    #[wasm_bindgen]
    pub fn focus(&self) -> bool {
        self.editor().is_some_and(|editor| editor.focus())
    }

    /// Run a native editing command. `undefined` when there is no document.
    #[wasm_bindgen(js_name = execCommand)]
    pub fn exec_command(
        &self,
        name: &str,
        show_ui: Option<bool>,
        value: Option<String>,
    ) -> Option<bool> {
        self.editor()?.exec_command(
            name,
            show_ui.unwrap_or(false),
            value.as_deref().unwrap_or(""),
        )
    }

    #[wasm_bindgen(js_name = queryCommandState)]
    pub fn query_command_state(&self, name: &str) -> Option<bool> {
        self.editor()?.query_command_state(name)
    }

    #[wasm_bindgen(js_name = queryCommandValue)]
    pub fn query_command_value(&self, name: &str) -> Option<String> {
        self.editor()?.query_command_value(name)
    }

    /// Current editable markup; `<br>` when empty or showing the placeholder.
    #[wasm_bindgen(getter)]
    pub fn value(&self) -> Option<String> {
        self.editor()?.value()
    }

    #[wasm_bindgen(getter, js_name = isMounted)]
    pub fn is_mounted(&self) -> bool {
        self.editor().is_some_and(|editor| editor.is_mounted())
    }
}
