use serde::Serialize;
use tracing::info;

// ---------------------------------------------------------------------------
// TourActivated
// ---------------------------------------------------------------------------

/// Fired once per "a new tour became active" transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TourActivated {
    pub tour: String,
    pub org_slug: Option<String>,
    pub user_id: u64,
}

// ---------------------------------------------------------------------------
// AnalyticsSink
// ---------------------------------------------------------------------------

pub trait AnalyticsSink {
    fn tour_activated(&self, event: &TourActivated);
}

/// Default sink: structured log line per activation.
#[derive(Debug, Default)]
pub struct LogSink;

impl AnalyticsSink for LogSink {
    fn tour_activated(&self, event: &TourActivated) {
        info!(
            tour = %event.tour,
            org = event.org_slug.as_deref().unwrap_or("-"),
            user = event.user_id,
            "tour activated"
        );
    }
}

/// Sink that drops everything. For tests and embedders without analytics.
#[derive(Debug, Default)]
pub struct NullSink;

impl AnalyticsSink for NullSink {
    fn tour_activated(&self, _event: &TourActivated) {}
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
