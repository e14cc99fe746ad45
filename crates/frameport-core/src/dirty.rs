//! Dirty-state tracking.
//!
//! The host keeps two copies of the notebook content: what the frame last
//! reported (mirrored) and what is known to be durably saved. The dirty flag
//! is derived from the two and never stored independently of them.
//!
//! Every mutator returns `Some(new_flag)` exactly when the flag changed, which
//! the engine turns into a single dirty-change notification. Calls that leave
//! the flag unchanged return `None`.

/// Whether `mirrored` holds unsaved changes relative to `saved`.
pub fn is_dirty(mirrored: &str, saved: &str) -> bool {
    mirrored != saved
}

/// Mirrored content, saved content and the derived dirty flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirtyTracker {
    mirrored: String,
    saved: String,
    dirty: bool,
}

impl DirtyTracker {
    /// Create a clean tracker with empty content.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current mirrored content.
    pub fn mirrored(&self) -> &str {
        &self.mirrored
    }

    /// Last content known to be saved.
    pub fn saved(&self) -> &str {
        &self.saved
    }

    /// Whether mirrored content differs from saved content.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Replace the mirrored content.
    pub fn set_mirrored(&mut self, content: impl Into<String>) -> Option<bool> {
        self.mirrored = content.into();
        self.recompute()
    }

    /// Replace the saved content.
    pub fn set_saved(&mut self, content: impl Into<String>) -> Option<bool> {
        self.saved = content.into();
        self.recompute()
    }

    /// Set both sides to the same content, as when a notebook first loads.
    ///
    /// Recomputes once, so a dirty tracker reports a single `false`
    /// transition rather than a spurious pair.
    pub fn reset_baseline(&mut self, content: impl Into<String>) -> Option<bool> {
        let content = content.into();
        self.saved.clone_from(&content);
        self.mirrored = content;
        self.recompute()
    }

    /// Acknowledge a save made outside the protocol.
    ///
    /// Without explicit content the current mirrored content is assumed to be
    /// what was saved.
    pub fn mark_saved(&mut self, content: Option<String>) -> Option<bool> {
        let content = content.unwrap_or_else(|| self.mirrored.clone());
        self.set_saved(content)
    }

    fn recompute(&mut self) -> Option<bool> {
        let prior = self.dirty;
        self.dirty = is_dirty(&self.mirrored, &self.saved);
        (self.dirty != prior).then_some(self.dirty)
    }
}
