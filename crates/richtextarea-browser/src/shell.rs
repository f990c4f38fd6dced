//! The editor's outer markup: a `<richtextarea>` wrapper holding one
//! `<iframe>`.
//!
//! Hosts that render their own markup only need to produce the same shape
//! and hand the wrapper to [`FrameEditor::mount`](crate::FrameEditor::mount).

use smol_str::SmolStr;
use wasm_bindgen::JsValue;
use web_sys::{Document, Element};

use richtextarea_core::HostProps;

use crate::surface::PLACEHOLDER_ATTR;

pub const SHELL_TAG: &str = "richtextarea";

/// Class the wrapper always carries, ahead of any host classes.
pub const SHELL_CLASS: &str = "richtextarea";

/// Build the wrapper and its iframe in `document`, not yet attached.
pub fn render_shell<H>(document: &Document, props: &HostProps<H>) -> Result<Element, JsValue> {
    let wrapper = document.create_element(SHELL_TAG)?;
    wrapper.set_attribute("class", SHELL_CLASS)?;
    apply_attributes(&wrapper, &[], &props.attributes)?;
    wrapper.set_attribute("tabindex", "0")?;
    if props.initially_placeholder() {
        wrapper.set_attribute(PLACEHOLDER_ATTR, "true")?;
    }

    let frame = document.create_element("iframe")?;
    wrapper.append_child(&frame)?;
    Ok(wrapper)
}

/// [`render_shell`] in the current page's document.
pub fn render_shell_in_page<H>(props: &HostProps<H>) -> Result<Element, JsValue> {
    render_shell(&gloo_utils::document(), props)
}

/// Move the wrapper's passthrough attributes from `prev` to `next`.
/// Attributes present in `prev` but not in `next` are removed; a removed
/// class list falls back to [`SHELL_CLASS`].
pub fn apply_attributes(
    wrapper: &Element,
    prev: &[(SmolStr, String)],
    next: &[(SmolStr, String)],
) -> Result<(), JsValue> {
    for (name, _) in prev {
        if !next.iter().any(|(n, _)| n == name) {
            if name.as_str() == "class" {
                wrapper.set_attribute("class", SHELL_CLASS)?;
            } else {
                wrapper.remove_attribute(name)?;
            }
        }
    }
    for (name, value) in next {
        if name.as_str() == "class" {
            wrapper.set_attribute("class", &format!("{SHELL_CLASS} {value}"))?;
        } else {
            wrapper.set_attribute(name, value)?;
        }
    }
    Ok(())
}
