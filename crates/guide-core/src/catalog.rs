use crate::error::{GuideError, Result};
use crate::types::is_valid_tour_id;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

// ---------------------------------------------------------------------------
// Step
// ---------------------------------------------------------------------------

/// One bubble of a tour. A step with no target is not tied to an anchor and
/// always survives step filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    #[serde(default)]
    pub target: Option<String>,
    pub title: String,
    pub message: String,
}

impl Step {
    pub fn new(target: Option<&str>, title: &str, message: &str) -> Self {
        Self {
            target: target.map(str::to_string),
            title: title.to_string(),
            message: message.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// TourDefinition
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TourDefinition {
    pub id: String,
    /// Prompt shown before the tour starts.
    pub cue: String,
    pub steps: Vec<Step>,
    /// Every listed anchor must be mounted before the tour can qualify.
    #[serde(default)]
    pub required_targets: BTreeSet<String>,
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// The static collection of tour definitions, loaded once at startup.
/// Author order is preserved; selection applies its own ordering.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    pub tours: Vec<TourDefinition>,
}

impl Catalog {
    pub fn new(tours: Vec<TourDefinition>) -> Result<Self> {
        let catalog = Self { tours };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load a catalog from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let catalog: Self = serde_yaml::from_str(&data)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn get(&self, id: &str) -> Option<&TourDefinition> {
        self.tours.iter().find(|t| t.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.tours.is_empty()
    }

    fn validate(&self) -> Result<()> {
        let mut seen = BTreeSet::new();
        for tour in &self.tours {
            if !is_valid_tour_id(&tour.id) {
                return Err(GuideError::InvalidTourId(tour.id.clone()));
            }
            if !seen.insert(tour.id.as_str()) {
                return Err(GuideError::DuplicateTour(tour.id.clone()));
            }
            if tour.steps.is_empty() {
                return Err(GuideError::EmptyTour(tour.id.clone()));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Built-in catalog
// ---------------------------------------------------------------------------

fn targets(ids: &[&str]) -> BTreeSet<String> {
    ids.iter().map(|s| s.to_string()).collect()
}

/// The tours shipped with the product. Composition roots that need a custom
/// set load one from YAML instead.
pub fn default_catalog() -> Catalog {
    Catalog {
        tours: vec![
            TourDefinition {
                id: "issue".to_string(),
                cue: "Get to know the issue page".to_string(),
                steps: vec![
                    Step::new(
                        Some("tags"),
                        "Tags",
                        "Tags summarize the environments and releases an issue was seen in.",
                    ),
                    Step::new(
                        Some("exception"),
                        "Stack trace",
                        "The stack trace shows the full chain of calls that led to the error.",
                    ),
                    Step::new(
                        Some("breadcrumbs"),
                        "Breadcrumbs",
                        "Breadcrumbs are the events that happened right before the error.",
                    ),
                ],
                required_targets: targets(&["tags", "exception"]),
            },
            TourDefinition {
                id: "issue_stream".to_string(),
                cue: "Tour the issue stream".to_string(),
                steps: vec![Step::new(
                    Some("issue_stream"),
                    "Issues",
                    "Errors are grouped into issues so one bug is one row, however often it fires.",
                )],
                required_targets: targets(&["issue_stream"]),
            },
            TourDefinition {
                id: "getting_started".to_string(),
                cue: "Finish setting up your project".to_string(),
                steps: vec![Step::new(
                    None,
                    "Welcome",
                    "Install the SDK and send your first event to unlock the rest of the product.",
                )],
                required_targets: targets(&["project_sidebar"]),
            },
        ],
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_catalog_is_valid() {
        let catalog = default_catalog();
        assert!(catalog.validate().is_ok());
        assert!(catalog.get("issue_stream").is_some());
        assert!(catalog.get("nope").is_none());
    }

    #[test]
    fn yaml_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tours.yaml");
        let data = serde_yaml::to_string(&default_catalog()).unwrap();
        std::fs::write(&path, data).unwrap();

        let loaded = Catalog::load(&path).unwrap();
        assert_eq!(loaded.tours.len(), default_catalog().tours.len());
        let issue = loaded.get("issue").unwrap();
        assert_eq!(issue.steps.len(), 3);
        assert!(issue.required_targets.contains("tags"));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let tour = default_catalog().tours[0].clone();
        let err = Catalog::new(vec![tour.clone(), tour]).unwrap_err();
        assert!(matches!(err, GuideError::DuplicateTour(_)));
    }

    #[test]
    fn rejects_invalid_ids() {
        let mut tour = default_catalog().tours[0].clone();
        tour.id = "Not-A-Slug".to_string();
        let err = Catalog::new(vec![tour]).unwrap_err();
        assert!(matches!(err, GuideError::InvalidTourId(_)));
    }

    #[test]
    fn rejects_stepless_tours() {
        let mut tour = default_catalog().tours[0].clone();
        tour.steps.clear();
        let err = Catalog::new(vec![tour]).unwrap_err();
        assert!(matches!(err, GuideError::EmptyTour(_)));
    }

    #[test]
    fn step_without_target_deserializes() {
        let yaml = "tours:\n  - id: solo\n    cue: Hi\n    steps:\n      - title: T\n        message: M\n";
        let catalog: Catalog = serde_yaml::from_str(yaml).unwrap();
        assert!(catalog.tours[0].steps[0].target.is_none());
        assert!(catalog.tours[0].required_targets.is_empty());
    }
}
