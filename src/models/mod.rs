mod content;
mod interaction;
mod remote;

pub use content::{
    split_genres, Category, ContentId, ContentItem, ContentSource, RemoteKind, ScoredCandidate,
};
pub use interaction::{InteractionRecord, SearchEntry, SEARCH_HISTORY_LIMIT};
pub use remote::{
    DiscoverSort, RemoteItem, RemoteItemDetails, TmdbDetails, TmdbGenre, TmdbListItem, TmdbPage,
};
