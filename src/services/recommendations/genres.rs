use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::{
    db::ContentStore,
    models::{ContentId, InteractionRecord, RemoteKind, SearchEntry},
    services::providers::RemoteCatalog,
};

/// Most favored genres handed to the candidate finder
pub const MAX_FAVORITE_GENRES: usize = 5;

/// Liked remote items looked up per request; keeps us inside TMDB's budget
pub const MAX_REMOTE_LOOKUPS: usize = 10;

/// Stand-in taste when every remote lookup failed
pub const DEFAULT_REMOTE_GENRES: [&str; 4] = ["Action", "Drama", "Comedy", "Thriller"];

/// Search keywords that hint at a genre, matched case-insensitively
const SEARCH_KEYWORDS: &[(&str, &[&str])] = &[
    ("Action", &["action", "thriller", "fight", "explosion", "superhero"]),
    ("Comedy", &["comedy", "funny", "laugh", "humor", "hilarious"]),
    ("Drama", &["drama", "emotional", "tearjerker"]),
    ("Horror", &["horror", "scary", "ghost", "zombie", "haunted"]),
    ("Romance", &["romance", "romantic", "love"]),
    ("Sci-Fi", &["sci-fi", "scifi", "science fiction", "space", "alien", "robot"]),
    ("Fantasy", &["fantasy", "magic", "dragon", "wizard"]),
    ("Documentary", &["documentary", "docuseries", "true story", "nature"]),
];

/// Accumulated evidence for one genre during a single extraction
#[derive(Debug, Clone, PartialEq)]
struct GenreVote {
    genre: String,
    local_votes: usize,
    liked_remotely: bool,
    search_votes: usize,
    first_seen: usize,
}

#[derive(Debug, Default)]
struct GenreTally {
    votes: Vec<GenreVote>,
    index: HashMap<String, usize>,
}

impl GenreTally {
    fn entry(&mut self, genre: &str) -> &mut GenreVote {
        let position = match self.index.get(genre) {
            Some(position) => *position,
            None => {
                let position = self.votes.len();
                self.votes.push(GenreVote {
                    genre: genre.to_string(),
                    local_votes: 0,
                    liked_remotely: false,
                    search_votes: 0,
                    first_seen: position,
                });
                self.index.insert(genre.to_string(), position);
                position
            }
        };
        &mut self.votes[position]
    }

    /// Genres ordered by local votes, then remote likes, then searches,
    /// then first appearance
    fn ranked(mut self, max: usize) -> Vec<String> {
        self.votes.sort_by(|a, b| {
            b.local_votes
                .cmp(&a.local_votes)
                .then(b.liked_remotely.cmp(&a.liked_remotely))
                .then(b.search_votes.cmp(&a.search_votes))
                .then(a.first_seen.cmp(&b.first_seen))
        });

        self.votes.into_iter().take(max).map(|v| v.genre).collect()
    }
}

/// Genres a search query hints at
pub fn genres_for_query(query: &str) -> Vec<&'static str> {
    let query = query.to_lowercase();
    SEARCH_KEYWORDS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|k| query.contains(k)))
        .map(|(genre, _)| *genre)
        .collect()
}

/// Derives a profile's favorite genres from likes and searches
#[derive(Clone)]
pub struct GenreExtractor {
    store: Arc<dyn ContentStore>,
    catalog: Arc<dyn RemoteCatalog>,
}

impl GenreExtractor {
    pub fn new(store: Arc<dyn ContentStore>, catalog: Arc<dyn RemoteCatalog>) -> Self {
        Self { store, catalog }
    }

    /// Up to `MAX_FAVORITE_GENRES` genre names, strongest first
    ///
    /// An empty list means no preference could be determined.
    pub async fn extract(&self, record: &InteractionRecord) -> Vec<String> {
        let (local_ids, remote_ids): (Vec<ContentId>, Vec<ContentId>) = record
            .liked_content_ids
            .iter()
            .cloned()
            .partition(ContentId::is_local);

        let remote_ids: Vec<(RemoteKind, u64)> = remote_ids
            .into_iter()
            .filter_map(|id| match id {
                ContentId::Remote { kind, remote_id } => Some((kind, remote_id)),
                ContentId::Local(_) => None,
            })
            .collect();

        let (local_genres, remote_genres) = tokio::join!(
            self.local_genre_votes(&local_ids),
            self.remote_genres(remote_ids)
        );

        let mut tally = GenreTally::default();
        for genre in local_genres {
            tally.entry(&genre).local_votes += 1;
        }
        for genre in remote_genres {
            tally.entry(&genre).liked_remotely = true;
        }
        for genre in search_genre_votes(&record.search_history) {
            tally.entry(genre).search_votes += 1;
        }

        let genres = tally.ranked(MAX_FAVORITE_GENRES);

        tracing::debug!(
            profile_id = %record.profile_id,
            local_likes = local_ids.len(),
            genres = ?genres,
            "Extracted favorite genres"
        );

        genres
    }

    /// One entry per (liked local item, genre on it)
    async fn local_genre_votes(&self, ids: &[ContentId]) -> Vec<String> {
        if ids.is_empty() {
            return vec![];
        }

        let mut items = match self.store.find_items_by_ids(ids).await {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(error = %e, "Could not load liked local items, ignoring them");
                return vec![];
            }
        };

        // Tally in liked order whatever order the store returned rows in
        let position: HashMap<&ContentId, usize> =
            ids.iter().enumerate().map(|(i, id)| (id, i)).collect();
        items.sort_by_key(|item| position.get(&item.id).copied().unwrap_or(usize::MAX));

        items
            .iter()
            .flat_map(|item| {
                let mut seen = HashSet::new();
                item.genres()
                    .into_iter()
                    .filter(move |g| seen.insert(g.clone()))
            })
            .collect()
    }

    /// Distinct genres of liked remote items, looked up concurrently
    async fn remote_genres(&self, ids: Vec<(RemoteKind, u64)>) -> Vec<String> {
        if ids.is_empty() {
            return vec![];
        }

        let mut tasks = Vec::new();
        for (kind, remote_id) in ids.into_iter().take(MAX_REMOTE_LOOKUPS) {
            let catalog = Arc::clone(&self.catalog);
            let task = tokio::spawn(async move {
                let result = catalog.get_item_details(kind, remote_id).await;
                (kind, remote_id, result)
            });
            tasks.push(task);
        }

        let mut genres: Vec<String> = Vec::new();
        let mut succeeded = 0;

        for task in tasks {
            match task.await {
                Ok((_, _, Ok(details))) => {
                    succeeded += 1;
                    for genre in details.genres {
                        if !genres.contains(&genre) {
                            genres.push(genre);
                        }
                    }
                }
                Ok((kind, remote_id, Err(e))) => {
                    tracing::warn!(
                        kind = kind.as_str(),
                        remote_id,
                        error = %e,
                        provider = self.catalog.name(),
                        "Genre lookup failed for liked item"
                    );
                }
                Err(e) => {
                    tracing::error!(error = %e, "Genre lookup task join error");
                }
            }
        }

        if succeeded == 0 {
            tracing::warn!("All remote genre lookups failed, using default genres");
            return DEFAULT_REMOTE_GENRES.iter().map(|g| g.to_string()).collect();
        }

        genres
    }
}

/// One entry per (search, genre it hints at)
fn search_genre_votes(history: &[SearchEntry]) -> Vec<&'static str> {
    history
        .iter()
        .flat_map(|entry| genres_for_query(&entry.query))
        .collect()
}
