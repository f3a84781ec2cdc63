//! Viewport-proximity driven lazy reveal.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

use crate::domain::entities::{ElementKey, ObservationHandle};
use crate::domain::ports::{LazyElement, ProximityEntry, ProximityObserverPort, ProximityPlatform};

/// Default distance from the viewport at which elements are revealed.
pub const DEFAULT_ROOT_MARGIN: u32 = 200;

/// Options for a [`LazyLoadManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LazyLoadOptions {
    /// Pixels around the viewport that count as near.
    #[serde(default = "default_root_margin")]
    pub root_margin: u32,
}

fn default_root_margin() -> u32 {
    DEFAULT_ROOT_MARGIN
}

impl Default for LazyLoadOptions {
    fn default() -> Self {
        Self {
            root_margin: DEFAULT_ROOT_MARGIN,
        }
    }
}

/// Lifecycle of a manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManagerState {
    /// Nothing registered.
    Idle,
    /// At least one element registered.
    Observing,
    /// Released; further registrations are ignored.
    Disconnected,
}

struct Membership {
    handle: ObservationHandle,
    element: Arc<dyn LazyElement>,
}

/// Defers reveal of registered elements until they near the viewport.
///
/// Each element is revealed at most once per registration and is dropped from
/// the membership set when revealed. Entries queued for an earlier
/// registration of the same key are discarded. Without a platform proximity primitive
/// every registration is revealed immediately instead.
///
/// Reveals happen when queued proximity entries are processed, through
/// [`LazyLoadManager::process_pending`] or [`LazyLoadManager::next_reveal`].
/// Dropping the manager disconnects it.
pub struct LazyLoadManager {
    observer: Option<Box<dyn ProximityObserverPort>>,
    entries: mpsc::UnboundedReceiver<ProximityEntry>,
    members: HashMap<ElementKey, Membership>,
    disconnected: bool,
}

impl std::fmt::Debug for LazyLoadManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazyLoadManager")
            .field("state", &self.state())
            .field("members", &self.members.len())
            .field("fail_open", &self.is_fail_open())
            .finish_non_exhaustive()
    }
}

impl LazyLoadManager {
    /// Creates a manager backed by an observer from `platform`.
    #[must_use]
    pub fn new(platform: &dyn ProximityPlatform, options: LazyLoadOptions) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let observer = platform.create_observer(options.root_margin, tx);

        if observer.is_none() {
            warn!("No proximity primitive available, images will load eagerly");
        }

        Self {
            observer,
            entries: rx,
            members: HashMap::new(),
            disconnected: false,
        }
    }

    /// Returns the current lifecycle state.
    #[must_use]
    pub fn state(&self) -> ManagerState {
        if self.disconnected {
            ManagerState::Disconnected
        } else if self.members.is_empty() {
            ManagerState::Idle
        } else {
            ManagerState::Observing
        }
    }

    /// Returns true if registrations are revealed immediately.
    #[must_use]
    pub const fn is_fail_open(&self) -> bool {
        self.observer.is_none()
    }

    /// Number of registered, unrevealed elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Returns true if `key` is registered and not yet revealed.
    #[must_use]
    pub fn is_observing(&self, key: &ElementKey) -> bool {
        self.members.contains_key(key)
    }

    /// Returns the handle of a live registration.
    #[must_use]
    pub fn handle_of(&self, key: &ElementKey) -> Option<ObservationHandle> {
        self.members.get(key).map(|m| m.handle)
    }

    /// Registers an element for proximity-triggered reveal.
    ///
    /// Registering an element that is already registered returns its existing
    /// handle. After [`disconnect`](Self::disconnect) this does nothing. In
    /// fail-open mode the element is revealed before this returns and `None`
    /// is returned.
    pub fn observe(&mut self, element: Arc<dyn LazyElement>) -> Option<ObservationHandle> {
        if self.disconnected {
            trace!(key = %element.key(), "Ignoring observe after disconnect");
            return None;
        }

        let key = element.key();
        if let Some(existing) = self.members.get(&key) {
            trace!(key = %key, "Element already observed");
            return Some(existing.handle);
        }

        let Some(observer) = self.observer.as_mut() else {
            debug!(key = %key, "Revealing immediately");
            element.reveal();
            return None;
        };

        let handle = ObservationHandle::new();
        observer.observe(&key, handle, element.bounds());
        debug!(key = %key, handle = %handle, "Observing element");
        self.members.insert(key, Membership { handle, element });
        Some(handle)
    }

    /// Removes an element from the membership set.
    ///
    /// Returns false if it was not registered.
    pub fn unobserve(&mut self, key: &ElementKey) -> bool {
        if self.members.remove(key).is_none() {
            return false;
        }
        if let Some(observer) = self.observer.as_mut() {
            observer.unobserve(key);
        }
        debug!(key = %key, "Unobserved element");
        true
    }

    /// Releases every registration and the underlying proximity resource.
    ///
    /// Later calls have no effect.
    pub fn disconnect(&mut self) {
        if self.disconnected {
            return;
        }
        self.disconnected = true;

        let released = self.members.len();
        self.members.clear();
        if let Some(mut observer) = self.observer.take() {
            observer.disconnect();
        }
        self.entries.close();

        info!(released = released, "Lazy load manager disconnected");
    }

    /// Reveals every element with a queued proximity entry.
    ///
    /// Returns the number of elements revealed.
    pub fn process_pending(&mut self) -> usize {
        let mut revealed = 0;
        while let Ok(entry) = self.entries.try_recv() {
            if self.handle_entry(entry).is_some() {
                revealed += 1;
            }
        }
        revealed
    }

    /// Waits for the next reveal and returns the revealed key.
    ///
    /// Returns `None` once the manager is disconnected or the platform has
    /// stopped delivering entries. Pending forever otherwise, so pair it with
    /// a timeout or `select!` when nothing may come.
    pub async fn next_reveal(&mut self) -> Option<ElementKey> {
        loop {
            if self.disconnected {
                return None;
            }
            let entry = self.entries.recv().await?;
            if let Some(key) = self.handle_entry(entry) {
                return Some(key);
            }
        }
    }

    fn handle_entry(&mut self, entry: ProximityEntry) -> Option<ElementKey> {
        trace!(key = %entry.key, near = entry.is_near, "Proximity entry");
        if !entry.is_near || self.disconnected {
            return None;
        }

        let current = self.members.get(&entry.key)?.handle;
        if current != entry.handle {
            trace!(key = %entry.key, stale = %entry.handle, "Dropping entry for earlier registration");
            return None;
        }

        let membership = self.members.remove(&entry.key)?;
        if let Some(observer) = self.observer.as_mut() {
            observer.unobserve(&entry.key);
        }
        membership.element.reveal();
        debug!(key = %entry.key, handle = %membership.handle, "Revealed element");
        Some(entry.key)
    }
}

impl Drop for LazyLoadManager {
    fn drop(&mut self) {
        self.disconnect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::ElementBounds;
    use crate::domain::ports::{MockProximityObserverPort, ProximitySender};
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingElement {
        key: ElementKey,
        reveals: AtomicUsize,
    }

    impl CountingElement {
        fn new(key: &str) -> Arc<Self> {
            Arc::new(Self {
                key: ElementKey::new(key),
                reveals: AtomicUsize::new(0),
            })
        }

        fn reveals(&self) -> usize {
            self.reveals.load(Ordering::SeqCst)
        }
    }

    impl LazyElement for CountingElement {
        fn key(&self) -> ElementKey {
            self.key.clone()
        }

        fn bounds(&self) -> ElementBounds {
            ElementBounds::new(0, 100)
        }

        fn reveal(&self) {
            self.reveals.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct TestPlatform {
        observer: Mutex<Option<MockProximityObserverPort>>,
        sender: Mutex<Option<ProximitySender>>,
    }

    impl TestPlatform {
        fn new(observer: MockProximityObserverPort) -> Self {
            Self {
                observer: Mutex::new(Some(observer)),
                sender: Mutex::new(None),
            }
        }

        fn unsupported() -> Self {
            Self {
                observer: Mutex::new(None),
                sender: Mutex::new(None),
            }
        }

        fn send(&self, key: &str, handle: ObservationHandle, is_near: bool) {
            if let Some(tx) = self.sender.lock().as_ref() {
                let _ = tx.send(ProximityEntry {
                    key: ElementKey::new(key),
                    handle,
                    is_near,
                });
            }
        }

        fn send_near(&self, key: &str, handle: ObservationHandle) {
            self.send(key, handle, true);
        }
    }

    impl ProximityPlatform for TestPlatform {
        fn create_observer(
            &self,
            _root_margin: u32,
            sender: ProximitySender,
        ) -> Option<Box<dyn ProximityObserverPort>> {
            let observer = self.observer.lock().take()?;
            *self.sender.lock() = Some(sender);
            Some(Box::new(observer))
        }
    }

    fn permissive_observer() -> MockProximityObserverPort {
        let mut observer = MockProximityObserverPort::new();
        observer.expect_observe().returning(|_, _, _| ());
        observer.expect_unobserve().returning(|_| ());
        observer.expect_disconnect().times(1).returning(|| ());
        observer
    }

    #[test]
    fn test_observe_is_idempotent_and_disconnect_clears() {
        let mut observer = MockProximityObserverPort::new();
        observer.expect_observe().times(2).returning(|_, _, _| ());
        observer.expect_disconnect().times(1).returning(|| ());
        let platform = TestPlatform::new(observer);
        let mut manager = LazyLoadManager::new(&platform, LazyLoadOptions::default());

        let a = CountingElement::new("a");
        let b = CountingElement::new("b");
        let first = manager.observe(a.clone());
        let second = manager.observe(a.clone());
        manager.observe(b.clone());

        assert_eq!(first, second);
        assert_eq!(manager.len(), 2);
        assert_eq!(manager.state(), ManagerState::Observing);

        manager.disconnect();
        assert_eq!(manager.len(), 0);
        assert_eq!(manager.state(), ManagerState::Disconnected);

        manager.disconnect();
        assert_eq!(manager.state(), ManagerState::Disconnected);
    }

    #[test]
    fn test_reveal_happens_once_and_unobserves() {
        let platform = TestPlatform::new(permissive_observer());
        let mut manager = LazyLoadManager::new(&platform, LazyLoadOptions::default());
        let a = CountingElement::new("a");
        let handle = manager.observe(a.clone()).unwrap();

        platform.send_near("a", handle);
        platform.send_near("a", handle);

        assert_eq!(manager.process_pending(), 1);
        assert_eq!(a.reveals(), 1);
        assert!(!manager.is_observing(&ElementKey::new("a")));
        assert_eq!(manager.state(), ManagerState::Idle);
    }

    #[test]
    fn test_unobserved_element_not_revealed() {
        let platform = TestPlatform::new(permissive_observer());
        let mut manager = LazyLoadManager::new(&platform, LazyLoadOptions::default());
        let a = CountingElement::new("a");
        let handle = manager.observe(a.clone()).unwrap();

        assert!(manager.unobserve(&ElementKey::new("a")));
        assert!(!manager.unobserve(&ElementKey::new("a")));
        assert!(!manager.unobserve(&ElementKey::new("never")));

        platform.send_near("a", handle);
        assert_eq!(manager.process_pending(), 0);
        assert_eq!(a.reveals(), 0);
    }

    #[test]
    fn test_entry_for_earlier_registration_is_dropped() {
        let platform = TestPlatform::new(permissive_observer());
        let mut manager = LazyLoadManager::new(&platform, LazyLoadOptions::default());

        let first = CountingElement::new("a");
        let old = manager.observe(first.clone()).unwrap();
        platform.send_near("a", old);
        assert!(manager.unobserve(&ElementKey::new("a")));

        let second = CountingElement::new("a");
        let current = manager.observe(second.clone()).unwrap();
        assert_ne!(old, current);

        assert_eq!(manager.process_pending(), 0);
        assert_eq!(first.reveals(), 0);
        assert_eq!(second.reveals(), 0);
        assert!(manager.is_observing(&ElementKey::new("a")));

        platform.send_near("a", current);
        assert_eq!(manager.process_pending(), 1);
        assert_eq!(second.reveals(), 1);
    }

    #[test]
    fn test_observe_after_disconnect_is_ignored() {
        let platform = TestPlatform::new(permissive_observer());
        let mut manager = LazyLoadManager::new(&platform, LazyLoadOptions::default());
        manager.disconnect();

        let a = CountingElement::new("a");
        assert_eq!(manager.observe(a.clone()), None);
        assert_eq!(manager.len(), 0);
        assert_eq!(manager.state(), ManagerState::Disconnected);
        assert_eq!(a.reveals(), 0);
    }

    #[test]
    fn test_far_entries_ignored() {
        let platform = TestPlatform::new(permissive_observer());
        let mut manager = LazyLoadManager::new(&platform, LazyLoadOptions::default());
        let a = CountingElement::new("a");
        let handle = manager.observe(a.clone()).unwrap();

        platform.send("a", handle, false);

        assert_eq!(manager.process_pending(), 0);
        assert!(manager.is_observing(&ElementKey::new("a")));
    }

    #[test]
    fn test_fail_open_reveals_synchronously() {
        let platform = TestPlatform::unsupported();
        let mut manager = LazyLoadManager::new(&platform, LazyLoadOptions::default());
        assert!(manager.is_fail_open());

        let a = CountingElement::new("a");
        let b = CountingElement::new("b");
        assert_eq!(manager.observe(a.clone()), None);
        assert_eq!(manager.observe(b.clone()), None);

        assert_eq!(a.reveals(), 1);
        assert_eq!(b.reveals(), 1);
        assert!(manager.is_empty());
    }

    #[test]
    fn test_drop_disconnects_observer() {
        let mut observer = MockProximityObserverPort::new();
        observer.expect_observe().returning(|_, _, _| ());
        observer.expect_disconnect().times(1).returning(|| ());
        let platform = TestPlatform::new(observer);

        {
            let mut manager = LazyLoadManager::new(&platform, LazyLoadOptions::default());
            manager.observe(CountingElement::new("a"));
        }
    }

    #[tokio::test]
    async fn test_next_reveal_returns_key() {
        let platform = TestPlatform::new(permissive_observer());
        let mut manager = LazyLoadManager::new(&platform, LazyLoadOptions::default());
        let a = CountingElement::new("a");
        let b = CountingElement::new("b");
        manager.observe(a.clone());
        let handle = manager.observe(b.clone()).unwrap();

        platform.send_near("unknown", ObservationHandle::new());
        platform.send_near("b", handle);

        assert_eq!(manager.next_reveal().await, Some(ElementKey::new("b")));
        assert_eq!(b.reveals(), 1);
        assert_eq!(a.reveals(), 0);

        manager.disconnect();
        assert_eq!(manager.next_reveal().await, None);
    }
}
