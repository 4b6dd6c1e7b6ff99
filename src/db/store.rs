use crate::{
    error::AppResult,
    models::{ContentId, ContentItem, InteractionRecord},
};

/// Read access to locally stored content and profile interactions
///
/// The recommender only reads. Writes (likes, progress, searches) belong to
/// the interaction-tracking handlers, which own the same tables.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ContentStore: Send + Sync {
    /// Fetch the local items among `ids`; unknown ids are skipped
    async fn find_items_by_ids(&self, ids: &[ContentId]) -> AppResult<Vec<ContentItem>>;

    /// Items whose genre field matches `pattern` (a case-insensitive regex
    /// alternation), at most `limit` of them
    async fn find_items_by_genre_pattern(
        &self,
        pattern: &str,
        limit: usize,
    ) -> AppResult<Vec<ContentItem>>;

    async fn find_item_by_id(&self, id: &ContentId) -> AppResult<Option<ContentItem>>;

    /// Most liked items, then most popular, then newest
    async fn find_most_popular(&self, limit: usize) -> AppResult<Vec<ContentItem>>;

    async fn get_interaction_record(&self, profile_id: &str)
        -> AppResult<Option<InteractionRecord>>;
}
