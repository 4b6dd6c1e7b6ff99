use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Kind of item in the remote catalog, as it appears in composite ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteKind {
    Movie,
    Tv,
}

impl RemoteKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RemoteKind::Movie => "movie",
            RemoteKind::Tv => "tv",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "movie" => Some(RemoteKind::Movie),
            "tv" => Some(RemoteKind::Tv),
            _ => None,
        }
    }
}

/// Identifier for a content item
///
/// Local-store keys and remote catalog items live in separate namespaces.
/// Remote items are written as `"<kind>_<remoteId>"` (e.g. `movie_603`);
/// every other string is a local key. Parsing happens once, where an id
/// enters the system, so nothing downstream inspects id strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum ContentId {
    Local(String),
    Remote { kind: RemoteKind, remote_id: u64 },
}

impl ContentId {
    pub fn local(id: impl Into<String>) -> Self {
        ContentId::Local(id.into())
    }

    pub fn remote(kind: RemoteKind, remote_id: u64) -> Self {
        ContentId::Remote { kind, remote_id }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, ContentId::Local(_))
    }

    /// Parses the textual form of an id
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();

        if let Some((kind, remote_id)) = raw.split_once('_') {
            if let (Some(kind), Ok(remote_id)) = (RemoteKind::parse(kind), remote_id.parse::<u64>())
            {
                return ContentId::Remote { kind, remote_id };
            }
        }

        ContentId::Local(raw.to_string())
    }
}

impl FromStr for ContentId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ContentId::parse(s))
    }
}

impl From<String> for ContentId {
    fn from(raw: String) -> Self {
        ContentId::parse(&raw)
    }
}

impl From<ContentId> for String {
    fn from(id: ContentId) -> Self {
        id.to_string()
    }
}

impl Display for ContentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentId::Local(id) => write!(f, "{}", id),
            ContentId::Remote { kind, remote_id } => write!(f, "{}_{}", kind.as_str(), remote_id),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Category {
    Movie,
    Series,
}

impl Category {
    pub fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "series" | "tv" | "tv_series" => Category::Series,
            _ => Category::Movie,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Movie => "Movie",
            Category::Series => "Series",
        }
    }
}

/// Where a content item came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ContentSource {
    Local,
    Tmdb,
}

/// A movie or series as served to clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    pub id: ContentId,
    pub title: String,
    pub description: String,
    pub category: Category,
    /// Comma-separated genre names, e.g. "Action, Thriller"
    pub genre: String,
    pub popularity: f64,
    pub likes: u32,
    pub year: Option<i32>,
    pub rating: Option<f64>,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub source: ContentSource,
}

impl ContentItem {
    /// Genre names listed on this item, trimmed, empty entries dropped
    pub fn genres(&self) -> Vec<String> {
        split_genres(&self.genre)
    }
}

/// Splits a comma-separated genre field into trimmed names
pub fn split_genres(field: &str) -> Vec<String> {
    field
        .split(',')
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .map(str::to_string)
        .collect()
}

/// A content item with its genre overlap against a favorite-genre list
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub item: ContentItem,
    /// Number of favorite genres the item's genre field contains
    pub match_score: usize,
    /// `match_score / favorite genre count`
    pub genre_match_ratio: f64,
}
