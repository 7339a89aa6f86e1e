use crate::coordinator::Coordinator;
use crate::events::{GuideEvent, SubscriptionId};
use serde_json::Value;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

// ---------------------------------------------------------------------------
// SharedCoordinator
// ---------------------------------------------------------------------------

/// Shared ownership of one coordinator for a single-threaded UI loop.
/// Cloning is cheap; every clone points at the same store. Subscribers run
/// while the coordinator is borrowed — read the snapshot carried on the
/// event instead of calling back in.
#[derive(Clone)]
pub struct SharedCoordinator {
    inner: Rc<RefCell<Coordinator>>,
}

impl SharedCoordinator {
    pub fn new(coordinator: Coordinator) -> Self {
        Self {
            inner: Rc::new(RefCell::new(coordinator)),
        }
    }

    /// Register an anchor and hold it registered for the guard's lifetime.
    /// The guard unregisters on drop on every exit path, including unwinds.
    pub fn acquire_anchor(&self, id: &str) -> AnchorGuard {
        self.inner.borrow_mut().register_anchor(id);
        AnchorGuard {
            coordinator: Rc::downgrade(&self.inner),
            id: id.to_string(),
        }
    }

    pub fn fetch_succeeded(&self, payload: &Value) {
        self.inner.borrow_mut().fetch_succeeded(payload);
    }

    pub fn next_step(&self) {
        self.inner.borrow_mut().next_step();
    }

    pub fn close_guide(&self, useful: Option<bool>) {
        self.inner.borrow_mut().close_guide(useful);
    }

    pub fn navigate(&self, url: &str) {
        self.inner.borrow_mut().navigate(url);
    }

    pub fn subscribe(&self, callback: impl Fn(&GuideEvent) + 'static) -> SubscriptionId {
        self.inner.borrow_mut().subscribe(callback)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.inner.borrow_mut().unsubscribe(id);
    }

    /// Read access to the underlying store.
    pub fn with<R>(&self, f: impl FnOnce(&Coordinator) -> R) -> R {
        f(&self.inner.borrow())
    }
}

impl std::fmt::Debug for SharedCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.inner.borrow().fmt(f)
    }
}

// ---------------------------------------------------------------------------
// AnchorGuard
// ---------------------------------------------------------------------------

/// Scoped anchor registration. Holds a weak reference so a guard outliving
/// the coordinator drops silently.
pub struct AnchorGuard {
    coordinator: Weak<RefCell<Coordinator>>,
    id: String,
}

impl AnchorGuard {
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl Drop for AnchorGuard {
    fn drop(&mut self) {
        if let Some(coordinator) = self.coordinator.upgrade() {
            coordinator.borrow_mut().unregister_anchor(&self.id);
        }
    }
}

impl std::fmt::Debug for AnchorGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnchorGuard").field("id", &self.id).finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
