/// Remote catalog abstraction
///
/// The recommender treats the remote catalog as a secondary content source:
/// detail lookups feed the taste profile, discover and popular lists feed the
/// candidate pool. Every call may fail; callers degrade instead of erroring.
use crate::{
    error::AppResult,
    models::{DiscoverSort, RemoteItem, RemoteItemDetails, RemoteKind},
};

pub mod rate_limit;
pub mod tmdb;

pub use rate_limit::RequestBudget;
pub use tmdb::TmdbProvider;

/// Trait for remote catalog providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RemoteCatalog: Send + Sync {
    /// Fetch the genre names of a single catalog item
    async fn get_item_details(
        &self,
        kind: RemoteKind,
        remote_id: u64,
    ) -> AppResult<RemoteItemDetails>;

    /// Discover movies carrying every genre in `genre_ids`
    ///
    /// `min_votes` filters out obscure titles with too few ratings to rank.
    async fn discover_by_genres(
        &self,
        genre_ids: &[u32],
        min_votes: u32,
        sort_by: DiscoverSort,
    ) -> AppResult<Vec<RemoteItem>>;

    /// Movies that are popular right now
    async fn get_currently_popular(&self) -> AppResult<Vec<RemoteItem>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
