//! [`Surface`] over an `<iframe>` inside the editor's wrapper element.
//!
//! Nothing inside the frame is cached: every call locates the iframe, its
//! document and its body afresh, because the host may swap the frame out
//! between any two calls.
//!
//! Documents and elements inside the frame belong to another JS realm, so
//! `instanceof` checks against this realm's constructors fail for them.
//! Casts use `unchecked_into` for that reason.

use std::cell::Cell;
use std::rc::Rc;

use gloo_events::EventListener;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, EventTarget, HtmlDocument, HtmlElement, HtmlIFrameElement, Node};

use richtextarea_core::{FrameEventKind, Readiness, Surface, SurfaceError};

/// Body property marking a document this editor has configured.
pub const INIT_MARKER: &str = "__richtextareaReady";

/// Wrapper attribute set while the placeholder text is on screen.
pub const PLACEHOLDER_ATTR: &str = "is-placeholder";

/// Minimal document written into a frame whose document has no body.
const BOOTSTRAP_HTML: &str = "<!DOCTYPE html><html><body contenteditable></body></html>";

/// Something that happened inside the frame.
#[derive(Debug, Clone)]
pub enum FrameSignal {
    /// An interaction event the bridge forwards to host handlers.
    Event {
        kind: FrameEventKind,
        target: Option<EventTarget>,
    },
    /// The frame loaded or scrolled; its height may be stale.
    Layout,
}

pub(crate) fn dom_err(err: JsValue) -> SurfaceError {
    SurfaceError::Dom(
        err.as_string()
            .unwrap_or_else(|| format!("{:?}", err)),
    )
}

/// The editor's iframe, located through its wrapper element.
pub struct IframeSurface {
    base: Element,
    sink: Rc<dyn Fn(FrameSignal)>,
    composing: Rc<Cell<bool>>,
    listeners: Vec<EventListener>,
}

impl IframeSurface {
    /// `base` is the wrapper element; the first `<iframe>` below it is the
    /// sandbox. `sink` receives everything the frame's listeners observe.
    pub fn new(base: Element, sink: Rc<dyn Fn(FrameSignal)>) -> Self {
        Self {
            base,
            sink,
            composing: Rc::new(Cell::new(false)),
            listeners: Vec::new(),
        }
    }

    /// A second handle on the same frame without the listeners. Commands and
    /// focus calls go through one of these so that events they trigger
    /// synchronously can reach the owner of the primary handle.
    pub fn share(&self) -> Self {
        Self {
            base: self.base.clone(),
            sink: self.sink.clone(),
            composing: self.composing.clone(),
            listeners: Vec::new(),
        }
    }

    pub fn base(&self) -> &Element {
        &self.base
    }

    pub fn frame(&self) -> Option<HtmlIFrameElement> {
        self.base
            .query_selector("iframe")
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlIFrameElement>().ok())
    }

    pub fn document(&self) -> Option<HtmlDocument> {
        self.frame()?
            .content_document()
            .map(|doc| doc.unchecked_into::<HtmlDocument>())
    }

    /// The editable root.
    pub fn body(&self) -> Option<HtmlElement> {
        self.document()?.body()
    }

    /// Drop all frame listeners.
    pub fn unbind(&mut self) {
        self.listeners.clear();
        self.composing.set(false);
    }

    fn require_document(&self) -> Result<HtmlDocument, SurfaceError> {
        self.document().ok_or(SurfaceError::Detached)
    }

    fn require_body(&self) -> Result<HtmlElement, SurfaceError> {
        self.body().ok_or(SurfaceError::Detached)
    }
}

fn has_marker(body: &HtmlElement) -> bool {
    js_sys::Reflect::get(body, &JsValue::from_str(INIT_MARKER))
        .map(|v| v.is_truthy())
        .unwrap_or(false)
}

fn set_styles(el: &HtmlElement, styles: &[(&str, &str)]) -> Result<(), SurfaceError> {
    let style = el.style();
    for (name, value) in styles {
        style.set_property(name, value).map_err(dom_err)?;
    }
    Ok(())
}

impl Surface for IframeSurface {
    fn readiness(&self) -> Readiness {
        let Some(doc) = self.document() else {
            return Readiness::Detached;
        };
        match doc.body() {
            None => Readiness::Blank,
            Some(body) if has_marker(&body) => Readiness::Ready,
            Some(_) => Readiness::Unconfigured,
        }
    }

    fn bootstrap(&mut self) -> Result<(), SurfaceError> {
        let doc = self.require_document()?;
        doc.open().map_err(dom_err)?;
        doc.write(&js_sys::Array::of1(&JsValue::from_str(BOOTSTRAP_HTML)))
            .map_err(dom_err)?;
        doc.close().map_err(dom_err)?;
        tracing::debug!("wrote bootstrap document into frame");
        Ok(())
    }

    fn configure(&mut self) -> Result<(), SurfaceError> {
        let doc = self.require_document()?;
        let body = self.require_body()?;

        doc.set_design_mode("on");
        if let Some(root) = doc.document_element() {
            set_styles(
                root.unchecked_ref::<HtmlElement>(),
                &[("cursor", "text"), ("overflow-y", "hidden")],
            )?;
        }
        set_styles(
            &body,
            &[
                ("cursor", "text"),
                ("overflow-y", "hidden"),
                ("min-height", "1.2em"),
            ],
        )?;
        body.set_content_editable("true");
        js_sys::Reflect::set(&body, &JsValue::from_str(INIT_MARKER), &JsValue::TRUE)
            .map_err(dom_err)?;
        Ok(())
    }

    fn bind_listeners(&mut self) -> Result<(), SurfaceError> {
        let window = self
            .frame()
            .and_then(|frame| frame.content_window())
            .ok_or(SurfaceError::Detached)?;

        let mut listeners = Vec::with_capacity(8);
        for kind in [
            FrameEventKind::Focus,
            FrameEventKind::Blur,
            FrameEventKind::Input,
            FrameEventKind::Change,
        ] {
            let sink = self.sink.clone();
            listeners.push(EventListener::new(&window, kind.as_str(), move |event| {
                sink(FrameSignal::Event {
                    kind,
                    target: event.target(),
                });
            }));
        }
        for name in ["scroll", "load"] {
            let sink = self.sink.clone();
            listeners.push(EventListener::new(&window, name, move |_| {
                sink(FrameSignal::Layout)
            }));
        }
        for (name, composing) in [("compositionstart", true), ("compositionend", false)] {
            let flag = self.composing.clone();
            listeners.push(EventListener::new(&window, name, move |_| {
                flag.set(composing)
            }));
        }

        // Replacing drops the previous document's listeners.
        self.listeners = listeners;
        self.composing.set(false);
        Ok(())
    }

    fn content(&self) -> Option<String> {
        self.body().map(|body| body.inner_html())
    }

    fn set_content(&mut self, html: &str) -> Result<(), SurfaceError> {
        self.require_body()?.set_inner_html(html);
        Ok(())
    }

    fn remove_element(&mut self, id: &str) -> bool {
        match self.document().and_then(|doc| doc.get_element_by_id(id)) {
            Some(el) => {
                el.remove();
                true
            }
            None => false,
        }
    }

    fn ensure_head(&mut self) -> Result<(), SurfaceError> {
        let doc = self.require_document()?;
        if doc.head().is_some() {
            return Ok(());
        }
        let root = doc.document_element().ok_or(SurfaceError::Detached)?;
        let head = doc.create_element("head").map_err(dom_err)?;
        let body: Option<Node> = doc.body().map(Into::into);
        root.insert_before(&head, body.as_ref()).map_err(dom_err)?;
        Ok(())
    }

    fn append_style(&mut self, id: &str, text: &str) -> Result<(), SurfaceError> {
        let doc = self.require_document()?;
        let head = doc.head().ok_or(SurfaceError::Detached)?;
        let style = doc.create_element("style").map_err(dom_err)?;
        style.set_id(id);
        style.set_text_content(Some(text));
        head.append_child(&style).map_err(dom_err)?;
        Ok(())
    }

    fn frame_height(&self) -> Option<i32> {
        self.frame().map(|frame| frame.offset_height())
    }

    fn set_frame_height(&mut self, px: i32) -> Result<(), SurfaceError> {
        let frame = self.frame().ok_or(SurfaceError::Detached)?;
        frame
            .style()
            .set_property("height", &format!("{px}px"))
            .map_err(dom_err)
    }

    fn set_placeholder_flag(&mut self, showing: bool) -> Result<(), SurfaceError> {
        if showing {
            self.base.set_attribute(PLACEHOLDER_ATTR, "true").map_err(dom_err)
        } else {
            self.base.remove_attribute(PLACEHOLDER_ATTR).map_err(dom_err)
        }
    }

    fn focus_editable(&self) -> bool {
        self.body().is_some_and(|body| body.focus().is_ok())
    }

    fn is_composing(&self) -> bool {
        self.composing.get()
    }

    fn exec_command(&self, name: &str, show_ui: bool, value: &str) -> Result<bool, SurfaceError> {
        self.require_document()?
            .exec_command_with_show_ui_and_value(name, show_ui, value)
            .map_err(dom_err)
    }

    fn query_command_state(&self, name: &str) -> Result<bool, SurfaceError> {
        self.require_document()?
            .query_command_state(name)
            .map_err(dom_err)
    }

    fn query_command_value(&self, name: &str) -> Result<String, SurfaceError> {
        self.require_document()?
            .query_command_value(name)
            .map_err(dom_err)
    }
}
