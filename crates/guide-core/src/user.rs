use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// UserContext / Session
// ---------------------------------------------------------------------------

/// The facts about the current user that selection and analytics need.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserContext {
    pub id: u64,
    #[serde(default)]
    pub is_superuser: bool,
    pub date_joined: DateTime<Utc>,
}

/// Ambient session context handed to the coordinator at construction.
/// The org slug is used only to tag analytics events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub user: UserContext,
    #[serde(default)]
    pub org_slug: Option<String>,
}

impl Session {
    pub fn new(user: UserContext) -> Self {
        Self {
            user,
            org_slug: None,
        }
    }

    pub fn with_org(mut self, slug: impl Into<String>) -> Self {
        self.org_slug = Some(slug.into());
        self
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
