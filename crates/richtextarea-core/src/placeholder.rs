//! Placeholder emulation for a document with no native placeholder.
//!
//! The placeholder text is written into the editable root itself while the
//! editor is empty and unfocused, and taken back out as soon as it gains
//! focus or real content arrives. The outer wrapper carries an
//! `is-placeholder` flag while the substitution is on screen so hosts can
//! style it.
//!
//! # States
//!
//! ```text
//!              should show                     placeholder text changed
//!   ShowingContent ───────▶ ShowingPlaceholder ─────────┐
//!         ▲                         │  ▲                │
//!         └─────────────────────────┘  └────────────────┘
//!              focus / real content
//! ```

use std::sync::LazyLock;

use regex_lite::Regex;

use crate::error::SurfaceError;
use crate::surface::Surface;
use crate::types::EMPTY_VALUE;

/// Whitespace around at most one line break counts as "no content".
static EMPTY_CONTENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*(?:<br\s*/?>)?\s*$").unwrap());

/// Collapse content that is only whitespace and a lone line break to `""`.
/// Anything else is returned unchanged.
pub fn normalize_empty(content: &str) -> &str {
    if EMPTY_CONTENT_RE.is_match(content) {
        ""
    } else {
        content
    }
}

/// Whether the placeholder belongs on screen for the given logical content.
pub fn should_show(placeholder: Option<&str>, focused: bool, content: &str) -> bool {
    let Some(placeholder) = placeholder.filter(|p| !p.is_empty()) else {
        return false;
    };
    if focused {
        return false;
    }
    let normalized = normalize_empty(content);
    normalized.is_empty() || normalized == placeholder
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum PlaceholderState {
    /// The editable root shows real content, possibly empty.
    #[default]
    ShowingContent,
    /// The editable root shows the substituted placeholder text.
    ShowingPlaceholder(String),
}

/// Transition taken by [`PlaceholderMachine::sync`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    Show,
    Hide,
    /// The host changed the placeholder text while it was on screen.
    Retext,
}

#[derive(Clone, Debug, Default)]
pub struct PlaceholderMachine {
    state: PlaceholderState,
}

impl PlaceholderMachine {
    pub fn state(&self) -> &PlaceholderState {
        &self.state
    }

    pub fn is_showing(&self) -> bool {
        matches!(self.state, PlaceholderState::ShowingPlaceholder(_))
    }

    /// Drop back to `ShowingContent` without touching the surface. Used when
    /// the document was replaced.
    pub fn reset(&mut self) {
        self.state = PlaceholderState::ShowingContent;
    }

    /// Content as the host should see it: the empty value while the
    /// substitution is on screen, the live content otherwise.
    pub fn logical_content<'a>(&self, live: &'a str) -> &'a str {
        match &self.state {
            PlaceholderState::ShowingPlaceholder(text) if text == live => EMPTY_VALUE,
            _ => live,
        }
    }

    /// Pure transition function: where the machine goes when the wanted
    /// placeholder text is `wanted` (`None` meaning "show content").
    pub fn next(&self, wanted: Option<&str>) -> Option<Transition> {
        match (&self.state, wanted) {
            (PlaceholderState::ShowingContent, None) => None,
            (PlaceholderState::ShowingContent, Some(_)) => Some(Transition::Show),
            (PlaceholderState::ShowingPlaceholder(_), None) => Some(Transition::Hide),
            (PlaceholderState::ShowingPlaceholder(text), Some(wanted)) if text == wanted => None,
            (PlaceholderState::ShowingPlaceholder(_), Some(_)) => Some(Transition::Retext),
        }
    }

    /// Reconcile the surface with the current placeholder and focus state.
    ///
    /// Returns the transition taken, if any. A detached surface is left alone.
    pub fn sync<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        placeholder: Option<&str>,
        focused: bool,
    ) -> Result<Option<Transition>, SurfaceError> {
        let Some(live) = surface.content() else {
            return Ok(None);
        };
        let logical = self.logical_content(&live);
        let wanted = placeholder.filter(|_| should_show(placeholder, focused, logical));

        let Some(transition) = self.next(wanted) else {
            return Ok(None);
        };

        // `next` only yields Hide when nothing is wanted.
        match wanted {
            Some(text) if transition == Transition::Show => {
                if normalize_empty(&live).is_empty() {
                    surface.set_content(text)?;
                }
                surface.set_placeholder_flag(true)?;
                self.state = PlaceholderState::ShowingPlaceholder(text.to_owned());
            }
            Some(text) => {
                if normalize_empty(logical).is_empty() {
                    surface.set_content(text)?;
                }
                self.state = PlaceholderState::ShowingPlaceholder(text.to_owned());
            }
            None => {
                if logical != live {
                    surface.set_content(EMPTY_VALUE)?;
                }
                surface.set_placeholder_flag(false)?;
                self.state = PlaceholderState::ShowingContent;
            }
        }

        tracing::trace!(?transition, focused, "placeholder transition");
        Ok(Some(transition))
    }
}
