use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use super::ContentId;

/// Upper bound on stored search history entries
pub const SEARCH_HISTORY_LIMIT: usize = 50;

/// One recorded search
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchEntry {
    pub query: String,
    pub result_count: u32,
    pub timestamp: DateTime<Utc>,
}

/// Everything a profile has done that the recommender can learn from
///
/// Written by the interaction-tracking side of the application; read-only here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct InteractionRecord {
    pub profile_id: String,
    /// Liked ids, first-liked first, no duplicates
    pub liked_content_ids: Vec<ContentId>,
    /// Percent watched (0-100) per item
    pub watch_progress: HashMap<ContentId, u8>,
    /// Most recent search first
    pub search_history: Vec<SearchEntry>,
}

impl InteractionRecord {
    pub fn new(profile_id: impl Into<String>) -> Self {
        Self {
            profile_id: profile_id.into(),
            ..Default::default()
        }
    }

    /// Builds a record from raw stored values, normalizing them on the way in
    pub fn from_parts(
        profile_id: impl Into<String>,
        liked: impl IntoIterator<Item = ContentId>,
        watch_progress: HashMap<ContentId, u8>,
        mut search_history: Vec<SearchEntry>,
    ) -> Self {
        let mut seen = HashSet::new();
        let liked_content_ids = liked
            .into_iter()
            .filter(|id| seen.insert(id.clone()))
            .collect();

        search_history.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        search_history.truncate(SEARCH_HISTORY_LIMIT);

        Self {
            profile_id: profile_id.into(),
            liked_content_ids,
            watch_progress: watch_progress
                .into_iter()
                .map(|(id, pct)| (id, pct.min(100)))
                .collect(),
            search_history,
        }
    }

    pub fn has_likes(&self) -> bool {
        !self.liked_content_ids.is_empty()
    }

    /// Ids that must never be recommended back: liked or started
    pub fn excluded_ids(&self) -> HashSet<ContentId> {
        self.liked_content_ids
            .iter()
            .chain(self.watch_progress.keys())
            .cloned()
            .collect()
    }
}
