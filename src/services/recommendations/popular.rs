use rand::seq::SliceRandom;
use std::collections::HashSet;
use std::sync::Arc;

use crate::{
    db::ContentStore,
    models::{ContentId, ContentItem},
    services::providers::RemoteCatalog,
};

/// "Most popular" lists, used directly and as the fallback of every other path
///
/// Nothing here returns an error: a failing source contributes no items.
#[derive(Clone)]
pub struct PopularityService {
    store: Arc<dyn ContentStore>,
    catalog: Arc<dyn RemoteCatalog>,
}

impl PopularityService {
    pub fn new(store: Arc<dyn ContentStore>, catalog: Arc<dyn RemoteCatalog>) -> Self {
        Self { store, catalog }
    }

    /// Local items by likes, popularity, then recency
    pub async fn popular(&self, limit: usize) -> Vec<ContentItem> {
        if limit == 0 {
            return vec![];
        }

        match self.store.find_most_popular(limit).await {
            Ok(mut items) => {
                items.truncate(limit);
                items
            }
            Err(e) => {
                tracing::warn!(error = %e, limit, "Popular content query failed");
                vec![]
            }
        }
    }

    /// `popular`, minus anything in `excluded`
    ///
    /// Over-fetches by the size of the exclusion set so filtering cannot
    /// starve the result.
    pub async fn popular_excluding(
        &self,
        limit: usize,
        excluded: &HashSet<ContentId>,
    ) -> Vec<ContentItem> {
        if excluded.is_empty() {
            return self.popular(limit).await;
        }

        let mut items = self.popular(limit.saturating_add(excluded.len())).await;
        items.retain(|item| !excluded.contains(&item.id));
        items.truncate(limit);
        items
    }

    /// Local and remote popular items blended evenly, in random order
    ///
    /// The remote catalog supplies half (rounded down); whichever side comes
    /// up short is backfilled from the other.
    pub async fn mixed(&self, limit: usize) -> Vec<ContentItem> {
        if limit == 0 {
            return vec![];
        }

        let (local, remote) = tokio::join!(
            self.popular(limit),
            self.catalog.get_currently_popular()
        );

        let remote: Vec<ContentItem> = match remote {
            Ok(items) => items.into_iter().map(ContentItem::from).collect(),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    provider = self.catalog.name(),
                    "Remote popular list unavailable, mixing local only"
                );
                vec![]
            }
        };

        let (local_take, remote_take) = split_quota(limit, local.len(), remote.len());

        let mut blended: Vec<ContentItem> = local
            .into_iter()
            .take(local_take)
            .chain(remote.into_iter().take(remote_take))
            .collect();
        blended.shuffle(&mut rand::rng());

        tracing::debug!(local = local_take, remote = remote_take, "Mixed popular content");

        blended
    }
}

/// How many items to take from each side: `(local, remote)`
fn split_quota(limit: usize, local_len: usize, remote_len: usize) -> (usize, usize) {
    let remote_wanted = (limit / 2).max(limit.saturating_sub(local_len));
    let remote_take = remote_wanted.min(remote_len);
    let local_take = (limit - remote_take).min(local_len);
    (local_take, remote_take)
}
