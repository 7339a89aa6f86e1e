use crate::anchors::AnchorSet;
use crate::catalog::{Catalog, Step, TourDefinition};
use crate::ledger::{Ledger, TourRecord};
use crate::user::UserContext;
use chrono::{DateTime, TimeZone, Utc};

// ---------------------------------------------------------------------------
// Seen-filter bypass
// ---------------------------------------------------------------------------

/// Tours shown even when already seen. Carried over verbatim from the
/// product rules; see DESIGN.md before touching.
pub const ALWAYS_SHOW_TOURS: &[&str] = &["getting_started"];

/// Users who joined after this date keep seeing tours they have already
/// completed. Part of the same carried-over rule set as ALWAYS_SHOW_TOURS.
pub fn seen_bypass_joined_after() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2019, 7, 1, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

fn seen_filter_bypassed(user: &UserContext, tour_id: &str) -> bool {
    user.is_superuser
        || ALWAYS_SHOW_TOURS.contains(&tour_id)
        || user.date_joined > seen_bypass_joined_after()
}

// ---------------------------------------------------------------------------
// TourRuntimeState
// ---------------------------------------------------------------------------

/// The selected tour as it should render right now: completion flags merged
/// in, steps trimmed to the anchors currently mounted. Recomputed from
/// scratch on every selector run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TourRuntimeState {
    pub id: String,
    pub cue: String,
    pub seen: bool,
    pub dismissed: bool,
    pub steps: Vec<Step>,
}

fn runtime_state(tour: &TourDefinition, record: TourRecord, anchors: &AnchorSet) -> TourRuntimeState {
    let steps = tour
        .steps
        .iter()
        .filter(|s| s.target.as_deref().map_or(true, |t| anchors.contains(t)))
        .cloned()
        .collect();
    TourRuntimeState {
        id: tour.id.clone(),
        cue: tour.cue.clone(),
        seen: record.seen,
        dismissed: record.dismissed,
        steps,
    }
}

// ---------------------------------------------------------------------------
// select()
// ---------------------------------------------------------------------------

/// Pick the single tour to display, or `None`.
///
/// 1. Candidates are catalog tours the server reported this session whose
///    required targets are all currently mounted.
/// 2. Candidates are ordered by id, ascending — the deterministic tie-break.
/// 3. Unless `force_show`, tours already seen are skipped, except for
///    superusers, allowlisted tours, and users joined after the cutoff.
/// 4. The first survivor wins; its steps are trimmed to mounted anchors.
pub fn select(
    catalog: &Catalog,
    ledger: &Ledger,
    anchors: &AnchorSet,
    user: &UserContext,
    force_show: bool,
) -> Option<TourRuntimeState> {
    let mut candidates: Vec<(&TourDefinition, TourRecord)> = catalog
        .tours
        .iter()
        .filter_map(|tour| ledger.get(&tour.id).map(|record| (tour, record)))
        .filter(|(tour, _)| anchors.contains_all(&tour.required_targets))
        .collect();
    candidates.sort_by(|(a, _), (b, _)| a.id.cmp(&b.id));

    candidates
        .into_iter()
        .find(|(tour, record)| {
            force_show || !record.seen || seen_filter_bypassed(user, &tour.id)
        })
        .map(|(tour, record)| runtime_state(tour, record, anchors))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::default_catalog;
    use crate::ledger::ServerRecord;
    use std::collections::BTreeSet;

    fn user_joined(year: i32) -> UserContext {
        UserContext {
            id: 1,
            is_superuser: false,
            date_joined: Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn ledger_for(entries: &[(&str, bool)]) -> Ledger {
        let mut ledger = Ledger::new();
        ledger.replace(
            entries
                .iter()
                .map(|(id, seen)| ServerRecord {
                    guide: id.to_string(),
                    seen: *seen,
                })
                .collect(),
        );
        ledger
    }

    fn tour(id: &str, required: &[&str], steps: Vec<Step>) -> TourDefinition {
        TourDefinition {
            id: id.to_string(),
            cue: format!("Tour {id}"),
            steps,
            required_targets: required.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn ineligible_without_required_anchors() {
        let catalog = default_catalog();
        let ledger = ledger_for(&[("issue_stream", false)]);
        let anchors = AnchorSet::new();
        let result = select(&catalog, &ledger, &anchors, &user_joined(2017), false);
        assert!(result.is_none());
    }

    #[test]
    fn eligible_once_anchors_mount() {
        let catalog = default_catalog();
        let ledger = ledger_for(&[("issue_stream", false)]);
        let mut anchors = AnchorSet::new();
        anchors.register("issue_stream");

        let result = select(&catalog, &ledger, &anchors, &user_joined(2017), false).unwrap();
        assert_eq!(result.id, "issue_stream");
        assert_eq!(result.steps.len(), 1);
    }

    #[test]
    fn unknown_to_server_means_not_a_candidate() {
        let catalog = default_catalog();
        let ledger = Ledger::new();
        let mut anchors = AnchorSet::new();
        anchors.register("issue_stream");
        assert!(select(&catalog, &ledger, &anchors, &user_joined(2017), false).is_none());
    }

    #[test]
    fn lexicographically_smallest_id_wins() {
        let catalog = Catalog::new(vec![
            tour("zebra", &[], vec![Step::new(None, "Z", "z")]),
            tour("apple", &[], vec![Step::new(None, "A", "a")]),
            tour("mango", &[], vec![Step::new(None, "M", "m")]),
        ])
        .unwrap();
        let ledger = ledger_for(&[("zebra", false), ("apple", false), ("mango", false)]);
        let anchors = AnchorSet::new();

        let result = select(&catalog, &ledger, &anchors, &user_joined(2017), false).unwrap();
        assert_eq!(result.id, "apple");
    }

    #[test]
    fn seen_tours_are_skipped() {
        let catalog = Catalog::new(vec![
            tour("aa", &[], vec![Step::new(None, "A", "a")]),
            tour("bb", &[], vec![Step::new(None, "B", "b")]),
        ])
        .unwrap();
        let ledger = ledger_for(&[("aa", true), ("bb", false)]);
        let anchors = AnchorSet::new();

        let result = select(&catalog, &ledger, &anchors, &user_joined(2017), false).unwrap();
        assert_eq!(result.id, "bb");
    }

    #[test]
    fn force_show_overrides_seen() {
        let catalog = Catalog::new(vec![tour("aa", &[], vec![Step::new(None, "A", "a")])]).unwrap();
        let ledger = ledger_for(&[("aa", true)]);
        let anchors = AnchorSet::new();

        assert!(select(&catalog, &ledger, &anchors, &user_joined(2017), false).is_none());
        let forced = select(&catalog, &ledger, &anchors, &user_joined(2017), true).unwrap();
        assert_eq!(forced.id, "aa");
        assert!(forced.seen);
    }

    #[test]
    fn superuser_bypasses_seen_filter() {
        let catalog = Catalog::new(vec![tour("aa", &[], vec![Step::new(None, "A", "a")])]).unwrap();
        let ledger = ledger_for(&[("aa", true)]);
        let anchors = AnchorSet::new();
        let mut user = user_joined(2017);
        user.is_superuser = true;

        let result = select(&catalog, &ledger, &anchors, &user, false).unwrap();
        assert_eq!(result.id, "aa");
    }

    #[test]
    fn allowlisted_tour_bypasses_seen_filter() {
        let catalog = default_catalog();
        let ledger = ledger_for(&[("getting_started", true)]);
        let mut anchors = AnchorSet::new();
        anchors.register("project_sidebar");

        let result = select(&catalog, &ledger, &anchors, &user_joined(2017), false).unwrap();
        assert_eq!(result.id, "getting_started");
    }

    #[test]
    fn recent_join_date_bypasses_seen_filter() {
        let catalog = Catalog::new(vec![tour("aa", &[], vec![Step::new(None, "A", "a")])]).unwrap();
        let ledger = ledger_for(&[("aa", true)]);
        let anchors = AnchorSet::new();

        assert!(select(&catalog, &ledger, &anchors, &user_joined(2017), false).is_none());
        let recent = select(&catalog, &ledger, &anchors, &user_joined(2020), false).unwrap();
        assert_eq!(recent.id, "aa");
    }

    #[test]
    fn steps_are_trimmed_to_mounted_anchors() {
        let catalog = default_catalog();
        let ledger = ledger_for(&[("issue", false)]);
        let mut anchors = AnchorSet::new();
        anchors.register("tags");
        anchors.register("exception");
        // "breadcrumbs" stays unmounted.

        let result = select(&catalog, &ledger, &anchors, &user_joined(2017), false).unwrap();
        assert_eq!(result.id, "issue");
        let titles: Vec<_> = result.steps.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Tags", "Stack trace"]);
    }

    #[test]
    fn untargeted_steps_always_survive() {
        let catalog = Catalog::new(vec![TourDefinition {
            id: "mixed".to_string(),
            cue: "Mixed".to_string(),
            steps: vec![
                Step::new(None, "Intro", "hello"),
                Step::new(Some("gone"), "Gone", "bye"),
            ],
            required_targets: BTreeSet::new(),
        }])
        .unwrap();
        let ledger = ledger_for(&[("mixed", false)]);
        let anchors = AnchorSet::new();

        let result = select(&catalog, &ledger, &anchors, &user_joined(2017), false).unwrap();
        assert_eq!(result.steps.len(), 1);
        assert_eq!(result.steps[0].title, "Intro");
    }
}
