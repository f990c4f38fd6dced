//! Event bridge types: host handler lookup and normalized dispatches.
//!
//! Raw events from inside the sandbox are handled by
//! [`SyncSession::handle_event`](crate::SyncSession::handle_event), which
//! updates focus and placeholder state and returns an [`EventOutcome`]. The
//! platform layer performs the outcome (re-focus, handler call) after it has
//! released its hold on the session, since either may re-enter it.

use smol_str::SmolStr;

use crate::types::FrameEventKind;

/// Host-supplied event handlers, keyed by their prop name (`onChange`,
/// `oninput`, ...).
#[derive(Clone, Debug, PartialEq)]
pub struct HandlerSet<H> {
    entries: Vec<(SmolStr, H)>,
}

impl<H> Default for HandlerSet<H> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<H> HandlerSet<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under its prop name. A later handler with the same
    /// name replaces the earlier one.
    pub fn insert(&mut self, name: impl Into<SmolStr>, handler: H) {
        let name = name.into();
        if let Some(entry) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            entry.1 = handler;
        } else {
            self.entries.push((name, handler));
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Handler registered for `kind`, matched case-insensitively against
    /// `"on" + type`.
    pub fn find(&self, kind: FrameEventKind) -> Option<&H> {
        self.find_by_type(kind.as_str())
    }

    pub fn find_by_type(&self, event_type: &str) -> Option<&H> {
        let wanted = format!("on{event_type}");
        self.entries
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(&wanted))
            .map(|(_, handler)| handler)
    }
}

impl<H> FromIterator<(SmolStr, H)> for HandlerSet<H> {
    fn from_iter<I: IntoIterator<Item = (SmolStr, H)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (name, handler) in iter {
            set.insert(name, handler);
        }
        set
    }
}

/// A host handler call the platform should make.
#[derive(Debug)]
pub struct Dispatch<'h, H> {
    pub handler: &'h H,
    pub kind: FrameEventKind,
    /// Editable content at the time of the event, with any placeholder
    /// substitution reported as the empty value.
    pub value: String,
}

/// Follow-up work for the platform after an event was handled.
#[derive(Debug)]
pub struct EventOutcome<'h, H> {
    /// Move input focus to the editable root; focus may have landed on the
    /// frame wrapper instead.
    pub refocus: bool,
    pub dispatch: Option<Dispatch<'h, H>>,
}

impl<H> EventOutcome<'_, H> {
    pub fn none() -> Self {
        Self {
            refocus: false,
            dispatch: None,
        }
    }
}
