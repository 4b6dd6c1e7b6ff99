#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use regex::RegexBuilder;
use streamfront_api::{
    db::ContentStore,
    error::{AppError, AppResult},
    models::{
        Category, ContentId, ContentItem, ContentSource, DiscoverSort, InteractionRecord,
        RemoteItem, RemoteItemDetails, RemoteKind,
    },
    services::{RecommendationEngine, RemoteCatalog},
};

pub fn local_item(id: &str, genre: &str, popularity: f64, likes: u32) -> ContentItem {
    ContentItem {
        id: ContentId::local(id),
        title: format!("Local {}", id),
        description: String::new(),
        category: Category::Movie,
        genre: genre.to_string(),
        popularity,
        likes,
        year: Some(2020),
        rating: None,
        poster_url: None,
        backdrop_url: None,
        created_at: None,
        source: ContentSource::Local,
    }
}

pub fn remote_item(remote_id: u64, genres: &[&str], popularity: f64) -> RemoteItem {
    RemoteItem {
        remote_id,
        kind: RemoteKind::Movie,
        title: format!("Remote {}", remote_id),
        overview: String::new(),
        genres: genres.iter().map(|g| g.to_string()).collect(),
        popularity,
        vote_count: 250,
        vote_average: Some(7.1),
        release_year: Some(2019),
        poster_url: None,
        backdrop_url: None,
    }
}

pub fn record(profile_id: &str, liked: &[&str], watched: &[&str]) -> InteractionRecord {
    let mut record = InteractionRecord::new(profile_id);
    record.liked_content_ids = liked.iter().map(|id| ContentId::parse(id)).collect();
    for id in watched {
        record.watch_progress.insert(ContentId::parse(id), 40);
    }
    record
}

/// Local store backed by vectors; genre patterns are evaluated the way
/// Postgres `~*` does
#[derive(Default)]
pub struct InMemoryStore {
    pub items: Vec<ContentItem>,
    pub records: HashMap<String, InteractionRecord>,
}

impl InMemoryStore {
    pub fn with_items(items: Vec<ContentItem>) -> Self {
        Self {
            items,
            records: HashMap::new(),
        }
    }

    pub fn with_record(mut self, record: InteractionRecord) -> Self {
        self.records.insert(record.profile_id.clone(), record);
        self
    }
}

#[async_trait::async_trait]
impl ContentStore for InMemoryStore {
    async fn find_items_by_ids(&self, ids: &[ContentId]) -> AppResult<Vec<ContentItem>> {
        Ok(self
            .items
            .iter()
            .filter(|item| ids.contains(&item.id))
            .cloned()
            .collect())
    }

    async fn find_items_by_genre_pattern(
        &self,
        pattern: &str,
        limit: usize,
    ) -> AppResult<Vec<ContentItem>> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| AppError::InvalidInput(e.to_string()))?;

        let mut matched: Vec<ContentItem> = self
            .items
            .iter()
            .filter(|item| regex.is_match(&item.genre))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.popularity.total_cmp(&a.popularity));
        matched.truncate(limit);
        Ok(matched)
    }

    async fn find_item_by_id(&self, id: &ContentId) -> AppResult<Option<ContentItem>> {
        Ok(self.items.iter().find(|item| &item.id == id).cloned())
    }

    async fn find_most_popular(&self, limit: usize) -> AppResult<Vec<ContentItem>> {
        let mut items = self.items.clone();
        items.sort_by(|a, b| {
            b.likes
                .cmp(&a.likes)
                .then(b.popularity.total_cmp(&a.popularity))
        });
        items.truncate(limit);
        Ok(items)
    }

    async fn get_interaction_record(
        &self,
        profile_id: &str,
    ) -> AppResult<Option<InteractionRecord>> {
        Ok(self.records.get(profile_id).cloned())
    }
}

/// Scripted remote catalog that records every call it receives
#[derive(Default)]
pub struct FakeCatalog {
    pub details: HashMap<u64, Vec<String>>,
    pub discover: HashMap<Vec<u32>, Vec<RemoteItem>>,
    pub popular: Vec<RemoteItem>,
    pub unavailable: bool,
    pub calls: Mutex<Vec<String>>,
}

impl FakeCatalog {
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record_call(&self, call: String) -> AppResult<()> {
        self.calls.lock().unwrap().push(call);
        if self.unavailable {
            return Err(AppError::ExternalApi("catalog unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl RemoteCatalog for FakeCatalog {
    async fn get_item_details(
        &self,
        kind: RemoteKind,
        remote_id: u64,
    ) -> AppResult<RemoteItemDetails> {
        self.record_call(format!("details:{}:{}", kind.as_str(), remote_id))?;
        self.details
            .get(&remote_id)
            .map(|genres| RemoteItemDetails {
                genres: genres.clone(),
            })
            .ok_or_else(|| AppError::ExternalApi(format!("no item {}", remote_id)))
    }

    async fn discover_by_genres(
        &self,
        genre_ids: &[u32],
        min_votes: u32,
        _sort_by: DiscoverSort,
    ) -> AppResult<Vec<RemoteItem>> {
        let ids: Vec<String> = genre_ids.iter().map(u32::to_string).collect();
        self.record_call(format!("discover:{}:{}", ids.join(","), min_votes))?;
        Ok(self.discover.get(genre_ids).cloned().unwrap_or_default())
    }

    async fn get_currently_popular(&self) -> AppResult<Vec<RemoteItem>> {
        self.record_call("popular".to_string())?;
        Ok(self.popular.clone())
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

pub fn engine(store: InMemoryStore, catalog: Arc<FakeCatalog>) -> RecommendationEngine {
    RecommendationEngine::new(Arc::new(store), catalog)
}

pub fn ids(items: &[ContentItem]) -> Vec<String> {
    items.iter().map(|item| item.id.to_string()).collect()
}
