use std::collections::HashSet;
use std::sync::Arc;

use crate::{
    db::ContentStore,
    error::AppResult,
    models::{ContentItem, DiscoverSort, RemoteItem, ScoredCandidate},
    services::{providers::RemoteCatalog, vocabulary},
};

use super::popular::PopularityService;

/// Vote floor for the strict all-genres discover query
pub const ALL_GENRES_MIN_VOTES: u32 = 100;

/// Vote floor for the broadened primary-genre query
pub const PRIMARY_GENRE_MIN_VOTES: u32 = 20;

/// Successively broader remote queries, tried in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteTier {
    /// Movies carrying every favored genre
    AllGenres,
    /// Movies carrying the strongest favored genre
    PrimaryGenre,
    /// Whatever is popular right now
    Popular,
}

impl RemoteTier {
    pub const ORDER: [RemoteTier; 3] = [
        RemoteTier::AllGenres,
        RemoteTier::PrimaryGenre,
        RemoteTier::Popular,
    ];
}

/// Builds a case-insensitive alternation matching any of `genres`
pub fn genre_pattern(genres: &[String]) -> String {
    genres
        .iter()
        .map(|g| regex::escape(g))
        .collect::<Vec<_>>()
        .join("|")
}

/// Scores items by how many favored genres their genre field mentions and
/// orders them best match first, most popular first within a score
pub fn score_candidates(items: Vec<ContentItem>, genres: &[String]) -> Vec<ScoredCandidate> {
    let wanted: Vec<String> = genres.iter().map(|g| g.to_lowercase()).collect();

    let mut scored: Vec<ScoredCandidate> = items
        .into_iter()
        .map(|item| {
            let field = item.genre.to_lowercase();
            let match_score = wanted.iter().filter(|g| field.contains(g.as_str())).count();
            let genre_match_ratio = if wanted.is_empty() {
                0.0
            } else {
                match_score as f64 / wanted.len() as f64
            };

            ScoredCandidate {
                item,
                match_score,
                genre_match_ratio,
            }
        })
        .collect();

    scored.sort_by(|a, b| {
        b.match_score
            .cmp(&a.match_score)
            .then(b.item.popularity.total_cmp(&a.item.popularity))
    });

    scored
}

/// Pulls candidate items for a set of favored genres from both sources
#[derive(Clone)]
pub struct CandidateFinder {
    store: Arc<dyn ContentStore>,
    catalog: Arc<dyn RemoteCatalog>,
    popularity: PopularityService,
}

impl CandidateFinder {
    pub fn new(
        store: Arc<dyn ContentStore>,
        catalog: Arc<dyn RemoteCatalog>,
        popularity: PopularityService,
    ) -> Self {
        Self {
            store,
            catalog,
            popularity,
        }
    }

    /// Local items matching any favored genre, best matches first
    ///
    /// With no genres this is the popular list, unscored.
    pub async fn find_local(&self, genres: &[String], limit: usize) -> Vec<ScoredCandidate> {
        if limit == 0 {
            return vec![];
        }

        if genres.is_empty() {
            return self
                .popularity
                .popular(limit)
                .await
                .into_iter()
                .map(|item| ScoredCandidate {
                    item,
                    match_score: 0,
                    genre_match_ratio: 0.0,
                })
                .collect();
        }

        let pattern = genre_pattern(genres);

        // Over-fetch so re-ranking by match score has room to work
        let items = match self
            .store
            .find_items_by_genre_pattern(&pattern, limit.saturating_mul(2))
            .await
        {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(error = %e, pattern = %pattern, "Local candidate query failed");
                return vec![];
            }
        };

        let mut scored = score_candidates(items, genres);
        scored.truncate(limit);
        scored
    }

    /// Remote items for the favored genres, broadening until `limit` is met
    ///
    /// Never fails: a tier that errors contributes nothing and the next one
    /// is tried.
    pub async fn find_remote(&self, genres: &[String], limit: usize) -> Vec<ContentItem> {
        let genre_ids = vocabulary::genre_ids(genres);
        if genre_ids.is_empty() || limit == 0 {
            return vec![];
        }

        let mut pool: Vec<RemoteItem> = Vec::new();
        let mut seen: HashSet<u64> = HashSet::new();

        for tier in RemoteTier::ORDER {
            if pool.len() >= limit {
                break;
            }

            match self.fetch_tier(tier, &genre_ids).await {
                Ok(items) => {
                    let before = pool.len();
                    pool.extend(items.into_iter().filter(|item| seen.insert(item.remote_id)));
                    tracing::debug!(tier = ?tier, added = pool.len() - before, "Remote tier fetched");
                }
                Err(e) => {
                    tracing::warn!(
                        tier = ?tier,
                        error = %e,
                        provider = self.catalog.name(),
                        "Remote tier failed, trying next"
                    );
                }
            }
        }

        pool.truncate(limit);
        pool.into_iter().map(ContentItem::from).collect()
    }

    async fn fetch_tier(&self, tier: RemoteTier, genre_ids: &[u32]) -> AppResult<Vec<RemoteItem>> {
        match tier {
            RemoteTier::AllGenres => {
                self.catalog
                    .discover_by_genres(genre_ids, ALL_GENRES_MIN_VOTES, DiscoverSort::PopularityDesc)
                    .await
            }
            RemoteTier::PrimaryGenre => {
                self.catalog
                    .discover_by_genres(
                        &genre_ids[..1],
                        PRIMARY_GENRE_MIN_VOTES,
                        DiscoverSort::PopularityDesc,
                    )
                    .await
            }
            RemoteTier::Popular => self.catalog.get_currently_popular().await,
        }
    }
}
