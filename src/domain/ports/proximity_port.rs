//! Proximity-watching port definitions.

use tokio::sync::mpsc;

use crate::domain::entities::{ElementBounds, ElementKey, ObservationHandle};

/// Notification that a watched element changed its viewport proximity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProximityEntry {
    /// The element the entry is about.
    pub key: ElementKey,
    /// Registration the element was watched under.
    pub handle: ObservationHandle,
    /// True when the element is within the root margin of the viewport.
    pub is_near: bool,
}

/// Channel end a proximity observer delivers entries on.
pub type ProximitySender = mpsc::UnboundedSender<ProximityEntry>;

/// A live proximity-watching resource.
///
/// Entries are delivered asynchronously on the sender the observer was
/// created with, never from inside these calls' callers.
#[cfg_attr(test, mockall::automock)]
pub trait ProximityObserverPort: Send {
    /// Starts watching an element for the registration `handle`.
    ///
    /// Entries about the element carry `handle`. Watching a key again with a
    /// different handle starts over, as if the element were new.
    fn observe(&mut self, key: &ElementKey, handle: ObservationHandle, bounds: ElementBounds);

    /// Stops watching an element.
    fn unobserve(&mut self, key: &ElementKey);

    /// Stops watching everything and releases the resource.
    fn disconnect(&mut self);
}

/// Platform facility that hands out proximity observers.
pub trait ProximityPlatform: Send + Sync {
    /// Creates an observer that reports elements within `root_margin` pixels
    /// of the viewport.
    ///
    /// Returns `None` when the platform has no proximity primitive.
    fn create_observer(
        &self,
        root_margin: u32,
        sender: ProximitySender,
    ) -> Option<Box<dyn ProximityObserverPort>>;
}

/// A rendering target that can be revealed once.
pub trait LazyElement: Send + Sync {
    /// Identity used for membership.
    fn key(&self) -> ElementKey;

    /// Current placement of the element.
    fn bounds(&self) -> ElementBounds;

    /// Switches the element from placeholder to its real resource.
    fn reveal(&self);
}
