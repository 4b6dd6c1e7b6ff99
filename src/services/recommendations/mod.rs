//! Personalized recommendations
//!
//! The engine picks a strategy from how much the profile's history says:
//!
//! | signal                     | result                                   |
//! |----------------------------|------------------------------------------|
//! | no interaction record      | mixed local + remote popular             |
//! | record, no likes           | local popular                            |
//! | likes, no genre preference | local popular                            |
//! | likes, favored genres      | genre candidates from both sources, ranked; local popular if none survive |
//! | any error along the way    | local popular                            |
//!
//! Liked and watched items are filtered out of every branch that has a record.

use std::sync::Arc;

use crate::{
    db::ContentStore,
    error::AppResult,
    models::{ContentId, ContentItem, InteractionRecord},
    services::providers::RemoteCatalog,
};

pub mod candidates;
pub mod genres;
pub mod interactions;
pub mod popular;
pub mod ranking;

pub use candidates::{CandidateFinder, RemoteTier};
pub use genres::GenreExtractor;
pub use interactions::ProfileSignal;
pub use popular::PopularityService;

pub const DEFAULT_RECOMMENDATION_LIMIT: usize = 10;
pub const DEFAULT_RELATED_LIMIT: usize = 6;

/// Which branch of the decision table served a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    MixedPopular,
    Popular,
    GenreMatch,
}

#[derive(Clone)]
pub struct RecommendationEngine {
    store: Arc<dyn ContentStore>,
    popularity: PopularityService,
    genres: GenreExtractor,
    candidates: CandidateFinder,
}

impl RecommendationEngine {
    pub fn new(store: Arc<dyn ContentStore>, catalog: Arc<dyn RemoteCatalog>) -> Self {
        let popularity = PopularityService::new(Arc::clone(&store), Arc::clone(&catalog));
        let genres = GenreExtractor::new(Arc::clone(&store), Arc::clone(&catalog));
        let candidates =
            CandidateFinder::new(Arc::clone(&store), catalog, popularity.clone());

        Self {
            store,
            popularity,
            genres,
            candidates,
        }
    }

    /// Recommendations for a profile, at most `limit` of them
    ///
    /// Never fails; an empty list means nothing could be recommended.
    #[tracing::instrument(skip(self))]
    pub async fn get_recommendations(&self, profile_id: &str, limit: usize) -> Vec<ContentItem> {
        if limit == 0 {
            return vec![];
        }

        match self.recommend(profile_id, limit).await {
            Ok((strategy, items)) => {
                tracing::info!(strategy = ?strategy, count = items.len(), "Recommendations served");
                items
            }
            Err(e) => {
                tracing::error!(error = %e, "Recommendation failed, serving popular content");
                self.popularity.popular(limit).await
            }
        }
    }

    async fn recommend(
        &self,
        profile_id: &str,
        limit: usize,
    ) -> AppResult<(Strategy, Vec<ContentItem>)> {
        let signal = interactions::read_signal(self.store.as_ref(), profile_id).await?;

        let served = match signal {
            ProfileSignal::NoRecord => {
                (Strategy::MixedPopular, self.popularity.mixed(limit).await)
            }
            ProfileSignal::NoLikes(record) => {
                let items = self
                    .popularity
                    .popular_excluding(limit, &record.excluded_ids())
                    .await;
                (Strategy::Popular, items)
            }
            ProfileSignal::HasLikes(record) => self.recommend_from_likes(&record, limit).await,
        };

        Ok(served)
    }

    async fn recommend_from_likes(
        &self,
        record: &InteractionRecord,
        limit: usize,
    ) -> (Strategy, Vec<ContentItem>) {
        let excluded = record.excluded_ids();
        let genres = self.genres.extract(record).await;

        if genres.is_empty() {
            tracing::debug!("No genre preference found");
            return (
                Strategy::Popular,
                self.popularity.popular_excluding(limit, &excluded).await,
            );
        }

        let (local, remote) = tokio::join!(
            self.candidates.find_local(&genres, limit.div_ceil(2)),
            self.candidates.find_remote(&genres, limit.saturating_mul(2))
        );

        tracing::debug!(
            genres = ?genres,
            local = local.len(),
            remote = remote.len(),
            "Candidates collected"
        );

        let local = local.into_iter().map(|candidate| candidate.item).collect();
        let ranked = ranking::rank(local, remote, &excluded, limit);

        if ranked.is_empty() {
            return (
                Strategy::Popular,
                self.popularity.popular_excluding(limit, &excluded).await,
            );
        }

        (Strategy::GenreMatch, ranked)
    }

    /// "More like this": local items sharing the source item's genres
    ///
    /// Remote or unknown ids yield an empty list.
    #[tracing::instrument(skip(self))]
    pub async fn get_related_content(
        &self,
        content_id: &ContentId,
        limit: usize,
    ) -> Vec<ContentItem> {
        if limit == 0 || !content_id.is_local() {
            return vec![];
        }

        let source = match self.store.find_item_by_id(content_id).await {
            Ok(Some(item)) => item,
            Ok(None) => {
                tracing::debug!("Source item not found");
                return vec![];
            }
            Err(e) => {
                tracing::warn!(error = %e, "Source item lookup failed");
                return vec![];
            }
        };

        let genres = source.genres();

        self.candidates
            .find_local(&genres, limit.saturating_add(1))
            .await
            .into_iter()
            .map(|candidate| candidate.item)
            .filter(|item| item.id != source.id)
            .take(limit)
            .collect()
    }

    /// Most liked local content
    pub async fn get_popular_content(&self, limit: usize) -> Vec<ContentItem> {
        self.popularity.popular(limit).await
    }

    /// Local and remote popular content, shuffled together
    pub async fn get_mixed_popular_content(&self, limit: usize) -> Vec<ContentItem> {
        self.popularity.mixed(limit).await
    }
}
