//! Stylesheet injection into the sandbox document.
//!
//! The sandbox is isolated from the host page's styles, so the host's
//! stylesheet text is copied into a single `<style>` element inside it. The
//! element is tagged with a per-instance id and replaced wholesale whenever
//! the text changes.

use smol_str::{SmolStr, format_smolstr};

use crate::error::SurfaceError;
use crate::surface::Surface;

/// Identity of the one style element a session owns.
///
/// Generated per component instance so that several editors on one page
/// never touch each other's styles.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StyleId(SmolStr);

impl StyleId {
    pub fn new(prefix: &str, token: &str) -> Self {
        Self(format_smolstr!("{prefix}{token}"))
    }

    /// Build an id from a random seed, rendered in hex.
    pub fn from_seed(prefix: &str, seed: u64) -> Self {
        Self(format_smolstr!("{prefix}{seed:x}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StyleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Keeps the sandbox's style element in step with the host stylesheet.
#[derive(Clone, Debug)]
pub struct StyleInjector {
    id: StyleId,
    applied: Option<String>,
}

impl StyleInjector {
    pub fn new(id: StyleId) -> Self {
        Self { id, applied: None }
    }

    pub fn id(&self) -> &StyleId {
        &self.id
    }

    /// Stylesheet text last injected successfully.
    pub fn applied(&self) -> Option<&str> {
        self.applied.as_deref()
    }

    /// Forget what was injected. Used when the document was replaced and
    /// took the old style element with it.
    pub fn forget(&mut self) {
        self.applied = None;
    }

    /// Inject `text`, replacing any previous element. `None` removes it.
    ///
    /// Returns whether the document was touched.
    pub fn apply<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        text: Option<&str>,
    ) -> Result<bool, SurfaceError> {
        if text == self.applied.as_deref() {
            return Ok(false);
        }

        surface.remove_element(self.id.as_str());

        if let Some(text) = text {
            surface.ensure_head()?;
            surface.append_style(self.id.as_str(), text)?;
        }

        tracing::debug!(
            style_id = %self.id,
            len = text.map(str::len),
            "replaced sandbox stylesheet"
        );
        self.applied = text.map(str::to_owned);
        Ok(true)
    }
}
