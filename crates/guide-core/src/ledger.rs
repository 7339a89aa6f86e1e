use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

/// One entry of the `GET /assistant/` response. Unknown fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerRecord {
    pub guide: String,
    #[serde(default)]
    pub seen: bool,
}

/// Decode the assistant payload. The endpoint promises an array; anything
/// else (or an array with undecodable entries) yields `None` and the caller
/// leaves its state untouched.
pub fn parse_payload(payload: &Value) -> Option<Vec<ServerRecord>> {
    if !payload.is_array() {
        return None;
    }
    serde_json::from_value(payload.clone()).ok()
}

// ---------------------------------------------------------------------------
// TourRecord / Ledger
// ---------------------------------------------------------------------------

/// Per-tour completion status. `dismissed` is session-local and never read
/// back from the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TourRecord {
    pub seen: bool,
    pub dismissed: bool,
}

/// Server-reported completion state, keyed by tour id. The server is
/// authoritative for which tours exist this session: each successful fetch
/// replaces the ledger wholesale. `close_guide` mutates it optimistically
/// ahead of the best-effort write.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    records: BTreeMap<String, TourRecord>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all records with the given server payload.
    pub fn replace(&mut self, records: Vec<ServerRecord>) {
        self.records = records
            .into_iter()
            .map(|r| {
                (
                    r.guide,
                    TourRecord {
                        seen: r.seen,
                        dismissed: false,
                    },
                )
            })
            .collect();
    }

    /// Optimistically mark a tour seen. No-op for tours the server never
    /// reported; those are not part of this session's runtime set.
    pub fn mark_seen(&mut self, id: &str, dismissed: bool) {
        if let Some(record) = self.records.get_mut(id) {
            record.seen = true;
            record.dismissed = dismissed;
        }
    }

    pub fn get(&self, id: &str) -> Option<TourRecord> {
        self.records.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
