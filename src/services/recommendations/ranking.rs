use std::collections::HashSet;

use crate::models::{ContentId, ContentItem};

/// Merges local and remote candidates into the final recommendation list
///
/// Drops excluded (liked or watched) ids and duplicates, then orders by
/// popularity. The sort is stable, so equal popularity keeps pool order:
/// local before remote, each in the order it arrived.
pub fn rank(
    local: Vec<ContentItem>,
    remote: Vec<ContentItem>,
    excluded: &HashSet<ContentId>,
    limit: usize,
) -> Vec<ContentItem> {
    let mut seen: HashSet<ContentId> = HashSet::new();

    let mut pool: Vec<ContentItem> = local
        .into_iter()
        .chain(remote)
        .filter(|item| !excluded.contains(&item.id))
        .filter(|item| seen.insert(item.id.clone()))
        .collect();

    pool.sort_by(|a, b| b.popularity.total_cmp(&a.popularity));
    pool.truncate(limit);
    pool
}
