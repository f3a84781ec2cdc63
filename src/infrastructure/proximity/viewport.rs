//! Geometric proximity watching over a scrollable vertical viewport.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::domain::entities::{ElementBounds, ElementKey, ObservationHandle};
use crate::domain::ports::{ProximityEntry, ProximityObserverPort, ProximityPlatform, ProximitySender};

/// Visible window of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// Scroll offset of the top edge.
    pub scroll_top: u32,
    /// Visible height.
    pub height: u32,
}

impl Viewport {
    /// Returns true if `bounds` lies within `margin` pixels of this viewport.
    #[must_use]
    pub const fn is_near(&self, bounds: ElementBounds, margin: u32) -> bool {
        let top = self.scroll_top.saturating_sub(margin);
        let bottom = self
            .scroll_top
            .saturating_add(self.height)
            .saturating_add(margin);
        bounds.top <= bottom && bounds.bottom() >= top
    }
}

struct Watched {
    handle: ObservationHandle,
    bounds: ElementBounds,
    near: bool,
}

struct Watcher {
    root_margin: u32,
    sender: ProximitySender,
    elements: HashMap<ElementKey, Watched>,
}

impl Watcher {
    fn evaluate(&mut self, viewport: Viewport) {
        for (key, watched) in &mut self.elements {
            Self::update(&self.sender, self.root_margin, viewport, key, watched);
        }
    }

    fn update(
        sender: &ProximitySender,
        root_margin: u32,
        viewport: Viewport,
        key: &ElementKey,
        watched: &mut Watched,
    ) {
        let near = viewport.is_near(watched.bounds, root_margin);
        if near == watched.near {
            return;
        }
        watched.near = near;

        let entry = ProximityEntry {
            key: key.clone(),
            handle: watched.handle,
            is_near: near,
        };
        if sender.send(entry).is_err() {
            trace!(key = %key, "Proximity receiver gone");
        }
    }
}

struct Shared {
    viewport: Viewport,
    watchers: HashMap<u64, Watcher>,
    next_id: u64,
}

/// Proximity platform driven by explicit scroll and resize calls.
#[derive(Clone)]
pub struct ViewportPlatform {
    shared: Arc<Mutex<Shared>>,
}

impl std::fmt::Debug for ViewportPlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let shared = self.shared.lock();
        f.debug_struct("ViewportPlatform")
            .field("viewport", &shared.viewport)
            .field("observers", &shared.watchers.len())
            .finish()
    }
}

impl ViewportPlatform {
    /// Creates a platform with the viewport scrolled to the top.
    #[must_use]
    pub fn new(viewport_height: u32) -> Self {
        Self {
            shared: Arc::new(Mutex::new(Shared {
                viewport: Viewport {
                    scroll_top: 0,
                    height: viewport_height,
                },
                watchers: HashMap::new(),
                next_id: 0,
            })),
        }
    }

    /// Returns the current viewport.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.shared.lock().viewport
    }

    /// Number of connected observers.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.shared.lock().watchers.len()
    }

    /// Scrolls the viewport and notifies observers of proximity changes.
    pub fn scroll_to(&self, scroll_top: u32) {
        let mut shared = self.shared.lock();
        shared.viewport.scroll_top = scroll_top;
        trace!(scroll_top = scroll_top, "Viewport scrolled");
        Self::evaluate_all(&mut shared);
    }

    /// Resizes the viewport and notifies observers of proximity changes.
    pub fn resize(&self, height: u32) {
        let mut shared = self.shared.lock();
        shared.viewport.height = height;
        trace!(height = height, "Viewport resized");
        Self::evaluate_all(&mut shared);
    }

    fn evaluate_all(shared: &mut Shared) {
        let viewport = shared.viewport;
        for watcher in shared.watchers.values_mut() {
            watcher.evaluate(viewport);
        }
    }
}

impl ProximityPlatform for ViewportPlatform {
    fn create_observer(
        &self,
        root_margin: u32,
        sender: ProximitySender,
    ) -> Option<Box<dyn ProximityObserverPort>> {
        let mut shared = self.shared.lock();
        let id = shared.next_id;
        shared.next_id += 1;
        shared.watchers.insert(
            id,
            Watcher {
                root_margin,
                sender,
                elements: HashMap::new(),
            },
        );
        debug!(id = id, root_margin = root_margin, "Created viewport observer");

        Some(Box::new(ViewportObserver {
            id,
            shared: self.shared.clone(),
        }))
    }
}

/// Observer handed out by [`ViewportPlatform`].
pub struct ViewportObserver {
    id: u64,
    shared: Arc<Mutex<Shared>>,
}

impl ProximityObserverPort for ViewportObserver {
    fn observe(&mut self, key: &ElementKey, handle: ObservationHandle, bounds: ElementBounds) {
        let mut shared = self.shared.lock();
        let viewport = shared.viewport;
        let Some(watcher) = shared.watchers.get_mut(&self.id) else {
            return;
        };

        let watched = watcher.elements.entry(key.clone()).or_insert(Watched {
            handle,
            bounds,
            near: false,
        });
        if watched.handle != handle {
            watched.handle = handle;
            watched.near = false;
        }
        watched.bounds = bounds;
        Watcher::update(&watcher.sender, watcher.root_margin, viewport, key, watched);
    }

    fn unobserve(&mut self, key: &ElementKey) {
        if let Some(watcher) = self.shared.lock().watchers.get_mut(&self.id) {
            watcher.elements.remove(key);
        }
    }

    fn disconnect(&mut self) {
        if self.shared.lock().watchers.remove(&self.id).is_some() {
            debug!(id = self.id, "Viewport observer disconnected");
        }
    }
}

impl Drop for ViewportObserver {
    fn drop(&mut self) {
        self.disconnect();
    }
}

/// Platform without a proximity primitive.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedPlatform;

impl ProximityPlatform for UnsupportedPlatform {
    fn create_observer(
        &self,
        _root_margin: u32,
        _sender: ProximitySender,
    ) -> Option<Box<dyn ProximityObserverPort>> {
        None
    }
}
