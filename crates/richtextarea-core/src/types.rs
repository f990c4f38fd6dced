//! Core sync types: host state, timers, and sandbox event kinds.
//!
//! These types are platform-agnostic and shared by every layer of the editor.

/// Canonical "no content" inside the editable root.
///
/// Editable bodies rarely represent emptiness as an empty string, so a lone
/// line break stands in for it.
pub const EMPTY_VALUE: &str = "<br>";

/// Declarative state supplied by the host on every update.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExternalState {
    /// Desired editable markup.
    pub value: Option<String>,
    /// Text shown while the content is empty and unfocused.
    pub placeholder: Option<String>,
    /// Raw style text injected into the sandbox document.
    pub stylesheet: Option<String>,
}

impl ExternalState {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_stylesheet(mut self, stylesheet: impl Into<String>) -> Self {
        self.stylesheet = Some(stylesheet.into());
        self
    }

    /// Content the editable root should hold; absent or empty values map to
    /// [`EMPTY_VALUE`].
    pub fn desired_content(&self) -> &str {
        match self.value.as_deref() {
            Some(v) if !v.is_empty() => v,
            _ => EMPTY_VALUE,
        }
    }

    /// Placeholder text, treating an empty string as unset.
    pub fn placeholder(&self) -> Option<&str> {
        self.placeholder.as_deref().filter(|p| !p.is_empty())
    }

    pub fn stylesheet(&self) -> Option<&str> {
        self.stylesheet.as_deref()
    }
}

/// The timers a session may have outstanding. At most one of each kind is
/// pending at a time; scheduling a kind replaces its previous handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Timer {
    /// Re-run reconciliation after the surface failed its readiness check.
    Retry,
    /// Coalesced height recompute after interaction, load or scroll.
    HeightDebounce,
    /// Periodic height recompute for the whole mounted lifetime.
    Heartbeat,
}

impl Timer {
    pub const ALL: [Timer; 3] = [Timer::Retry, Timer::HeightDebounce, Timer::Heartbeat];
}

/// Which timers the session believes are outstanding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PendingTimers {
    pub retry: bool,
    pub height_debounce: bool,
    pub heartbeat: bool,
}

impl PendingTimers {
    pub fn is_pending(&self, timer: Timer) -> bool {
        match timer {
            Timer::Retry => self.retry,
            Timer::HeightDebounce => self.height_debounce,
            Timer::Heartbeat => self.heartbeat,
        }
    }

    pub fn set(&mut self, timer: Timer, pending: bool) {
        match timer {
            Timer::Retry => self.retry = pending,
            Timer::HeightDebounce => self.height_debounce = pending,
            Timer::Heartbeat => self.heartbeat = pending,
        }
    }

    pub fn any(&self) -> bool {
        self.retry || self.height_debounce || self.heartbeat
    }
}

/// Interaction events forwarded from inside the sandbox to the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameEventKind {
    Focus,
    Blur,
    Input,
    Change,
}

impl FrameEventKind {
    /// Parse a DOM event type name. Returns `None` for events the bridge
    /// does not forward.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "focus" => Some(Self::Focus),
            "blur" => Some(Self::Blur),
            "input" => Some(Self::Input),
            "change" => Some(Self::Change),
            _ => None,
        }
    }

    /// DOM event type name, as reported to host handlers.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Focus => "focus",
            Self::Blur => "blur",
            Self::Input => "input",
            Self::Change => "change",
        }
    }

    pub fn is_focus_change(&self) -> bool {
        matches!(self, Self::Focus | Self::Blur)
    }
}

impl std::fmt::Display for FrameEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
