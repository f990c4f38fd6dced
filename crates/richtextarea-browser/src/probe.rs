//! Content height measurement with a layout sentinel.

use std::cell::RefCell;

use wasm_bindgen::JsCast;
use web_sys::{HtmlDocument, HtmlElement};

use richtextarea_core::HeightProbe;

use crate::surface::IframeSurface;

const SENTINEL_STYLE: &str = "position:relative;overflow:hidden;clear:both;";

/// Measures by briefly appending a cleared block after the content and
/// reading where it lands.
///
/// The sentinel's top plus the root's margins (root height minus body
/// height) is the height the frame needs. One sentinel element is kept per
/// document and reused across measurements.
#[derive(Default)]
pub struct SentinelProbe {
    cached: RefCell<Option<(HtmlDocument, HtmlElement)>>,
}

impl SentinelProbe {
    pub fn new() -> Self {
        Self::default()
    }

    fn sentinel_for(&self, doc: &HtmlDocument) -> Option<HtmlElement> {
        let mut cached = self.cached.borrow_mut();
        if let Some((owner, sentinel)) = cached.as_ref() {
            if js_sys::Object::is(owner, doc) {
                return Some(sentinel.clone());
            }
        }
        let sentinel = doc
            .create_element("div")
            .ok()?
            .unchecked_into::<HtmlElement>();
        sentinel.set_attribute("style", SENTINEL_STYLE).ok()?;
        *cached = Some((doc.clone(), sentinel.clone()));
        Some(sentinel)
    }
}

impl HeightProbe<IframeSurface> for SentinelProbe {
    fn measure(&self, surface: &IframeSurface) -> Option<i32> {
        let doc = surface.document()?;
        let body = doc.body()?;
        let root = doc.document_element()?.unchecked_into::<HtmlElement>();
        let sentinel = self.sentinel_for(&doc)?;

        body.append_child(&sentinel).ok()?;
        let height = sentinel.offset_top() + root.offset_height() - body.offset_height();
        sentinel.remove();
        Some(height)
    }
}
