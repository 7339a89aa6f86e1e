// ---------------------------------------------------------------------------
// GuideEvent
// ---------------------------------------------------------------------------

/// Snapshot of the coordinator's visible state, carried on every event so
/// subscribers never need to call back into the coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSnapshot {
    pub active_tour: Option<String>,
    pub step: usize,
    pub force_show: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuideEvent {
    StateChanged(StateSnapshot),
}

// ---------------------------------------------------------------------------
// Subscribers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn Fn(&GuideEvent)>;

/// Synchronous subscriber list. Callbacks run in registration order on the
/// caller's thread; the engine is single-threaded by design.
#[derive(Default)]
pub struct Subscribers {
    next_id: u64,
    entries: Vec<(SubscriptionId, Callback)>,
}

impl Subscribers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, callback: impl Fn(&GuideEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, Box::new(callback)));
        id
    }

    /// Remove a subscriber. No-op for unknown ids.
    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.entries.retain(|(sid, _)| *sid != id);
    }

    pub fn emit(&self, event: &GuideEvent) {
        for (_, callback) in &self.entries {
            callback(event);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscribers")
            .field("count", &self.entries.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
