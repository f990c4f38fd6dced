//! Host props: splitting a flat prop bag into sync state, event handlers,
//! and attributes forwarded to the outer wrapper.

use smol_str::SmolStr;

use crate::events::HandlerSet;
use crate::types::ExternalState;

/// Where a single host prop goes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PropKind {
    Value,
    Placeholder,
    Stylesheet,
    /// An `on*` callback. Never forwarded to the wrapper.
    Handler,
    /// Forwarded to the wrapper under this attribute name.
    Attribute(SmolStr),
}

/// Classify a prop by name and by whether its value is callable.
pub fn classify_prop(name: &str, is_callable: bool) -> PropKind {
    match name {
        "value" => PropKind::Value,
        "placeholder" => PropKind::Placeholder,
        "stylesheet" => PropKind::Stylesheet,
        "class" | "className" => PropKind::Attribute(SmolStr::new_static("class")),
        _ if is_callable && is_handler_name(name) => PropKind::Handler,
        _ => PropKind::Attribute(SmolStr::new(name)),
    }
}

fn is_handler_name(name: &str) -> bool {
    name.get(..2)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("on"))
}

/// Everything a host passes on one render.
#[derive(Clone, Debug, PartialEq)]
pub struct HostProps<H> {
    pub state: ExternalState,
    pub handlers: HandlerSet<H>,
    /// Wrapper attributes in the order the host supplied them.
    pub attributes: Vec<(SmolStr, String)>,
}

impl<H> Default for HostProps<H> {
    fn default() -> Self {
        Self {
            state: ExternalState::default(),
            handlers: HandlerSet::default(),
            attributes: Vec::new(),
        }
    }
}

impl<H> HostProps<H> {
    pub fn new(state: ExternalState) -> Self {
        Self {
            state,
            ..Self::default()
        }
    }

    /// Route one prop. `value` carries the string form for state and
    /// attribute props; `handler` carries the callable for handler props.
    pub fn push(&mut self, name: &str, value: Option<String>, handler: Option<H>) {
        match classify_prop(name, handler.is_some()) {
            PropKind::Value => self.state.value = value,
            PropKind::Placeholder => self.state.placeholder = value,
            PropKind::Stylesheet => self.state.stylesheet = value,
            PropKind::Handler => {
                if let Some(handler) = handler {
                    self.handlers.insert(name, handler);
                }
            }
            PropKind::Attribute(attr) => {
                let Some(value) = value else {
                    return;
                };
                match self.attributes.iter().position(|(existing, _)| *existing == attr) {
                    // `class` and `className` add to one class list.
                    Some(i) if attr.as_str() == "class" => {
                        let existing = &mut self.attributes[i].1;
                        if !existing.is_empty() && !value.is_empty() {
                            existing.push(' ');
                        }
                        existing.push_str(&value);
                    }
                    Some(i) => self.attributes[i].1 = value,
                    None => self.attributes.push((attr, value)),
                }
            }
        }
    }

    /// Whether the wrapper shows the placeholder on first render, before
    /// the sandbox document exists.
    pub fn initially_placeholder(&self) -> bool {
        self.state.value.as_deref().is_none_or(str::is_empty) && self.state.placeholder().is_some()
    }
}

impl<H: PartialEq> HostProps<H> {
    /// Whether moving from `prev` to `self` needs the shell re-rendered.
    ///
    /// Changes confined to value, placeholder and stylesheet are handled by
    /// reconciliation alone.
    pub fn requires_rerender(&self, prev: &Self) -> bool {
        self.attributes != prev.attributes || self.handlers != prev.handlers
    }
}
