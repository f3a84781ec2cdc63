//! Identity and geometry of rendering targets watched for lazy reveal.

use std::fmt;

use uuid::Uuid;

/// Identity of one rendering target.
///
/// Two targets showing the same image still need distinct keys, so keys are
/// never derived from the source alone.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementKey(pub String);

impl ElementKey {
    /// Creates a new `ElementKey` from any string-like input.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Creates a key no other element shares.
    #[must_use]
    pub fn unique() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Returns the inner string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ElementKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ElementKey {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Vertical placement of an element in document coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ElementBounds {
    /// Offset of the top edge from the document top, in pixels.
    pub top: u32,
    /// Rendered height in pixels.
    pub height: u32,
}

impl ElementBounds {
    /// Creates bounds from a top offset and a height.
    #[must_use]
    pub const fn new(top: u32, height: u32) -> Self {
        Self { top, height }
    }

    /// Offset of the bottom edge.
    #[must_use]
    pub const fn bottom(&self) -> u32 {
        self.top.saturating_add(self.height)
    }
}

/// Opaque token for one registration in a lazy-load manager.
///
/// Created by `observe`, invalidated by `unobserve`, reveal or `disconnect`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObservationHandle(Uuid);

impl ObservationHandle {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ObservationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
