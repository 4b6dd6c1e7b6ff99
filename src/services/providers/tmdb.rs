/// TMDB (The Movie Database) v3 provider
///
/// API Flow:
/// 1. Details: /{movie|tv}/{id} → genre objects for one liked item
/// 2. Discover: /discover/movie?with_genres=28,53 → comma means AND on TMDB
/// 3. Popular: /movie/popular → generic fallback list
///
/// Every outgoing request claims a slot from the provider's request budget and
/// runs under the HTTP client's timeout; responses are cached in Redis.
use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{
        DiscoverSort, RemoteItem, RemoteItemDetails, RemoteKind, TmdbDetails, TmdbListItem,
        TmdbPage,
    },
    services::{
        providers::{RemoteCatalog, RequestBudget},
        vocabulary,
    },
};
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use std::time::Duration;

const DETAILS_CACHE_TTL: u64 = 86400; // 1 day
const DISCOVER_CACHE_TTL: u64 = 3600; // 1 hour
const POPULAR_CACHE_TTL: u64 = 1800; // 30 minutes

pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    image_url: String,
    cache: Cache,
    budget: RequestBudget,
}

impl TmdbProvider {
    pub fn new(
        cache: Cache,
        api_key: String,
        api_url: String,
        image_url: String,
        timeout: Duration,
        budget: RequestBudget,
    ) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            image_url: image_url.trim_end_matches('/').to_string(),
            cache,
            budget,
        })
    }

    /// GET `{api_url}{path}` with the api key and extra query params
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> AppResult<T> {
        self.budget.try_acquire()?;

        let url = format!("{}{}", self.api_url, path);
        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str()), ("language", "en-US")])
            .query(params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                path = %path,
                status = %status,
                body = %body,
                "TMDB request failed"
            );
            return Err(AppError::ExternalApi(format!(
                "TMDB API returned status {}: {}",
                status, body
            )));
        }

        Ok(response.json().await?)
    }

    fn image(&self, path: Option<&str>) -> Option<String> {
        path.filter(|p| !p.is_empty())
            .map(|p| format!("{}{}", self.image_url, p))
    }

    /// Convert a TMDB list entry into a RemoteItem
    fn to_remote_item(&self, item: TmdbListItem, kind: RemoteKind) -> RemoteItem {
        let release_year = item.release_year();
        let title = item
            .title
            .clone()
            .or_else(|| item.name.clone())
            .unwrap_or_else(|| "Untitled".to_string());

        RemoteItem {
            remote_id: item.id,
            kind,
            title,
            overview: item.overview.clone().unwrap_or_default(),
            genres: vocabulary::genre_names(&item.genre_ids),
            popularity: item.popularity,
            vote_count: item.vote_count,
            vote_average: item.vote_average,
            release_year,
            poster_url: self.image(item.poster_path.as_deref()),
            backdrop_url: self.image(item.backdrop_path.as_deref()),
        }
    }

    fn to_remote_items(&self, page: TmdbPage, kind: RemoteKind) -> Vec<RemoteItem> {
        page.results
            .into_iter()
            .map(|item| self.to_remote_item(item, kind))
            .collect()
    }
}

#[async_trait::async_trait]
impl RemoteCatalog for TmdbProvider {
    async fn get_item_details(
        &self,
        kind: RemoteKind,
        remote_id: u64,
    ) -> AppResult<RemoteItemDetails> {
        cached!(
            self.cache,
            CacheKey::RemoteDetails(kind, remote_id),
            DETAILS_CACHE_TTL,
            async move {
                let path = format!("/{}/{}", kind.as_str(), remote_id);
                let details: TmdbDetails = self.get_json(&path, &[]).await?;

                Ok::<_, AppError>(RemoteItemDetails {
                    genres: details.genres.into_iter().map(|g| g.name).collect(),
                })
            }
        )
    }

    async fn discover_by_genres(
        &self,
        genre_ids: &[u32],
        min_votes: u32,
        sort_by: DiscoverSort,
    ) -> AppResult<Vec<RemoteItem>> {
        if genre_ids.is_empty() {
            return Err(AppError::InvalidInput(
                "Discover needs at least one genre".to_string(),
            ));
        }

        cached!(
            self.cache,
            CacheKey::Discover {
                genre_ids: genre_ids.to_vec(),
                min_votes,
                sort_by: sort_by.as_str(),
            },
            DISCOVER_CACHE_TTL,
            async move {
                let with_genres: Vec<String> = genre_ids.iter().map(u32::to_string).collect();
                let params = [
                    ("with_genres", with_genres.join(",")),
                    ("vote_count.gte", min_votes.to_string()),
                    ("sort_by", sort_by.as_str().to_string()),
                    ("include_adult", "false".to_string()),
                    ("page", "1".to_string()),
                ];

                let page: TmdbPage = self.get_json("/discover/movie", &params).await?;
                let items = self.to_remote_items(page, RemoteKind::Movie);

                tracing::info!(
                    genres = %with_genres.join(","),
                    min_votes,
                    results = items.len(),
                    provider = "tmdb",
                    "Discover query completed"
                );

                Ok::<_, AppError>(items)
            }
        )
    }

    async fn get_currently_popular(&self) -> AppResult<Vec<RemoteItem>> {
        cached!(self.cache, CacheKey::Popular, POPULAR_CACHE_TTL, async move {
            let params = [("page", "1".to_string())];
            let page: TmdbPage = self.get_json("/movie/popular", &params).await?;
            let items = self.to_remote_items(page, RemoteKind::Movie);

            tracing::info!(results = items.len(), provider = "tmdb", "Popular list fetched");

            Ok::<_, AppError>(items)
        })
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
