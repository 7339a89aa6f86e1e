use crate::analytics::{AnalyticsSink, TourActivated};
use crate::anchors::AnchorSet;
use crate::catalog::Catalog;
use crate::events::{GuideEvent, StateSnapshot, SubscriptionId, Subscribers};
use crate::ledger::{self, Ledger};
use crate::selector::{select, TourRuntimeState};
use crate::types::CompletionStatus;
use crate::user::Session;
use serde_json::Value;
use tracing::debug;

/// URL fragment that forces the seen/eligibility filter off for the session.
pub const FORCE_SHOW_FRAGMENT: &str = "assistant";

// ---------------------------------------------------------------------------
// CompletionSink
// ---------------------------------------------------------------------------

/// Best-effort persistence of seen/dismissed status. The coordinator calls
/// this fire-and-forget after its in-memory ledger is already updated, so a
/// failed write only risks the tour reappearing on the next full reload.
pub trait CompletionSink {
    fn record(&self, tour: &str, status: CompletionStatus, useful: Option<bool>);
}

/// Sink that drops writes. For tests and embedders without persistence.
#[derive(Debug, Default)]
pub struct NullCompletionSink;

impl CompletionSink for NullCompletionSink {
    fn record(&self, _tour: &str, _status: CompletionStatus, _useful: Option<bool>) {}
}

// ---------------------------------------------------------------------------
// ActiveTour
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct ActiveTour {
    tour: TourRuntimeState,
    step: usize,
}

// ---------------------------------------------------------------------------
// Coordinator
// ---------------------------------------------------------------------------

/// The process-wide tour store: owns the catalog, the server-reported
/// completion ledger, the mounted-anchor set, and the single active tour.
/// One instance per application, constructor-injected into whatever
/// composition root owns it. All mutations go through the action methods
/// below; each re-runs selection where the contract requires it and then
/// notifies subscribers.
pub struct Coordinator {
    catalog: Catalog,
    ledger: Ledger,
    anchors: AnchorSet,
    session: Session,
    force_show: bool,
    active: Option<ActiveTour>,
    previous_tour: Option<String>,
    subscribers: Subscribers,
    sink: Box<dyn CompletionSink>,
    analytics: Box<dyn AnalyticsSink>,
}

impl Coordinator {
    pub fn new(
        catalog: Catalog,
        session: Session,
        sink: Box<dyn CompletionSink>,
        analytics: Box<dyn AnalyticsSink>,
    ) -> Self {
        Self {
            catalog,
            ledger: Ledger::new(),
            anchors: AnchorSet::new(),
            session,
            force_show: false,
            active: None,
            previous_tour: None,
            subscribers: Subscribers::new(),
            sink,
            analytics,
        }
    }

    // -----------------------------------------------------------------------
    // Read surface
    // -----------------------------------------------------------------------

    pub fn active_tour(&self) -> Option<&TourRuntimeState> {
        self.active.as_ref().map(|a| &a.tour)
    }

    /// Step index into the active tour, `None` when idle. Advancing past the
    /// last step is not clamped; compare against `step_count` to detect the
    /// end.
    pub fn current_step(&self) -> Option<usize> {
        self.active.as_ref().map(|a| a.step)
    }

    /// Number of steps the active tour renders right now (0 when idle).
    pub fn step_count(&self) -> usize {
        self.active.as_ref().map_or(0, |a| a.tour.steps.len())
    }

    pub fn is_idle(&self) -> bool {
        self.active.is_none()
    }

    pub fn force_show(&self) -> bool {
        self.force_show
    }

    pub fn anchors(&self) -> &AnchorSet {
        &self.anchors
    }

    // -----------------------------------------------------------------------
    // Subscriptions
    // -----------------------------------------------------------------------

    pub fn subscribe(&mut self, callback: impl Fn(&GuideEvent) + 'static) -> SubscriptionId {
        self.subscribers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.subscribers.unsubscribe(id);
    }

    // -----------------------------------------------------------------------
    // Actions
    // -----------------------------------------------------------------------

    /// Apply the assistant fetch response. The payload must be an array of
    /// `{guide, seen}` records; anything else is dropped without touching
    /// state. The server is authoritative for which tours exist this
    /// session, so a valid payload replaces the ledger wholesale.
    pub fn fetch_succeeded(&mut self, payload: &Value) {
        let Some(records) = ledger::parse_payload(payload) else {
            debug!("ignoring malformed assistant payload");
            return;
        };
        self.ledger.replace(records);
        self.reselect();
        self.notify();
    }

    /// Mount an anchor. Idempotent; still re-runs selection.
    pub fn register_anchor(&mut self, id: &str) {
        self.anchors.register(id);
        self.reselect();
        self.notify();
    }

    /// Unmount an anchor. No-op on the set if absent; still re-runs
    /// selection.
    pub fn unregister_anchor(&mut self, id: &str) {
        self.anchors.unregister(id);
        self.reselect();
        self.notify();
    }

    /// Advance the active tour by exactly one step. Does not re-run
    /// selection, so progress survives until the next selector run. There is
    /// no upper bound: the caller hides its advance control on the last step.
    pub fn next_step(&mut self) {
        if let Some(active) = self.active.as_mut() {
            active.step += 1;
            self.notify();
        }
    }

    /// Dismissal or natural completion of the active tour. `Some(useful)`
    /// records a completed viewing with the feedback flag; `None` records a
    /// dismissal. The in-memory ledger is updated first, then the write goes
    /// out fire-and-forget, then selection re-runs (which skips the
    /// just-seen tour unless a bypass applies).
    pub fn close_guide(&mut self, useful: Option<bool>) {
        let Some(active) = self.active.as_ref() else {
            return;
        };
        let id = active.tour.id.clone();
        let status = match useful {
            Some(_) => CompletionStatus::Viewed,
            None => CompletionStatus::Dismissed,
        };
        self.ledger
            .mark_seen(&id, status == CompletionStatus::Dismissed);
        self.force_show = false;
        self.sink.record(&id, status, useful);
        self.reselect();
        self.notify();
    }

    /// Route change. Recomputes force-show from the URL fragment, then
    /// re-runs selection — which resets the step index, so tours restart
    /// their step counter on every navigation by design.
    pub fn navigate(&mut self, url: &str) {
        self.force_show = has_force_show_fragment(url);
        self.reselect();
        self.notify();
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn reselect(&mut self) {
        let selected = select(
            &self.catalog,
            &self.ledger,
            &self.anchors,
            &self.session.user,
            self.force_show,
        );
        if let Some(tour) = &selected {
            if self.previous_tour.as_deref() != Some(tour.id.as_str()) {
                self.analytics.tour_activated(&TourActivated {
                    tour: tour.id.clone(),
                    org_slug: self.session.org_slug.clone(),
                    user_id: self.session.user.id,
                });
                self.previous_tour = Some(tour.id.clone());
            }
        }
        self.active = selected.map(|tour| ActiveTour { tour, step: 0 });
    }

    fn notify(&self) {
        let snapshot = StateSnapshot {
            active_tour: self.active_tour().map(|t| t.id.clone()),
            step: self.current_step().unwrap_or(0),
            force_show: self.force_show,
        };
        self.subscribers.emit(&GuideEvent::StateChanged(snapshot));
    }
}

impl std::fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coordinator")
            .field("active", &self.active_tour().map(|t| t.id.as_str()))
            .field("step", &self.current_step())
            .field("anchors", &self.anchors.len())
            .field("force_show", &self.force_show)
            .finish()
    }
}

fn has_force_show_fragment(url: &str) -> bool {
    url.split_once('#')
        .map(|(_, fragment)| fragment == FORCE_SHOW_FRAGMENT)
        .unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
