use serde::{Deserialize, Serialize};

use super::{Category, ContentId, ContentItem, ContentSource, RemoteKind};

/// A catalog entry returned by the remote catalog's list endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RemoteItem {
    pub remote_id: u64,
    pub kind: RemoteKind,
    pub title: String,
    pub overview: String,
    /// Genre names, already resolved from the catalog's numeric ids
    pub genres: Vec<String>,
    pub popularity: f64,
    pub vote_count: u32,
    pub vote_average: Option<f64>,
    pub release_year: Option<i32>,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
}

/// The part of a remote item's detail page the recommender reads
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct RemoteItemDetails {
    pub genres: Vec<String>,
}

/// Sort orders supported by the discover endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoverSort {
    PopularityDesc,
}

impl DiscoverSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscoverSort::PopularityDesc => "popularity.desc",
        }
    }
}

impl From<RemoteItem> for ContentItem {
    fn from(remote: RemoteItem) -> Self {
        let category = match remote.kind {
            RemoteKind::Movie => Category::Movie,
            RemoteKind::Tv => Category::Series,
        };

        ContentItem {
            id: ContentId::remote(remote.kind, remote.remote_id),
            title: remote.title,
            description: remote.overview,
            category,
            genre: remote.genres.join(", "),
            popularity: remote.popularity,
            likes: remote.vote_count,
            year: remote.release_year,
            rating: remote.vote_average,
            poster_url: remote.poster_url,
            backdrop_url: remote.backdrop_url,
            created_at: None,
            source: ContentSource::Tmdb,
        }
    }
}

// ============================================================================
// TMDB wire types
// ============================================================================

/// Paged list response (`/discover/movie`, `/movie/popular`)
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbPage {
    #[serde(default)]
    pub results: Vec<TmdbListItem>,
}

/// Entry of a TMDB list response; movies carry `title`, TV shows `name`
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbListItem {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub vote_count: u32,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
}

impl TmdbListItem {
    /// Year from `release_date` or `first_air_date` ("2010-07-15" -> 2010)
    pub fn release_year(&self) -> Option<i32> {
        self.release_date
            .as_deref()
            .or(self.first_air_date.as_deref())
            .and_then(|date| date.get(..4))
            .and_then(|year| year.parse().ok())
    }
}

/// Detail response (`/movie/{id}`, `/tv/{id}`)
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbDetails {
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbGenre {
    pub id: u32,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tmdb_list_item_deserialization() {
        let json = r#"{
            "id": 27205,
            "title": "Inception",
            "overview": "Cobb, a skilled thief...",
            "genre_ids": [28, 878, 12],
            "popularity": 83.95,
            "vote_count": 35000,
            "vote_average": 8.4,
            "release_date": "2010-07-15",
            "poster_path": "/poster.jpg",
            "adult": false
        }"#;

        let item: TmdbListItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.id, 27205);
        assert_eq!(item.title.as_deref(), Some("Inception"));
        assert_eq!(item.genre_ids, vec![28, 878, 12]);
        assert_eq!(item.release_year(), Some(2010));
        assert_eq!(item.backdrop_path, None);
    }

    #[test]
    fn test_tmdb_list_item_tv_uses_first_air_date() {
        let json = r#"{"id": 1399, "name": "Game of Thrones", "first_air_date": "2011-04-17"}"#;
        let item: TmdbListItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.release_year(), Some(2011));
        assert_eq!(item.title, None);
    }

    #[test]
    fn test_tmdb_list_item_bad_date_has_no_year() {
        let json = r#"{"id": 1, "release_date": ""}"#;
        let item: TmdbListItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.release_year(), None);
    }

    #[test]
    fn test_remote_item_into_content_item() {
        let remote = RemoteItem {
            remote_id: 603,
            kind: RemoteKind::Movie,
            title: "The Matrix".to_string(),
            overview: "A hacker learns the truth".to_string(),
            genres: vec!["Action".to_string(), "Science Fiction".to_string()],
            popularity: 70.5,
            vote_count: 24000,
            vote_average: Some(8.2),
            release_year: Some(1999),
            poster_url: None,
            backdrop_url: None,
        };

        let item: ContentItem = remote.into();
        assert_eq!(item.id.to_string(), "movie_603");
        assert_eq!(item.genre, "Action, Science Fiction");
        assert_eq!(item.category, Category::Movie);
        assert_eq!(item.likes, 24000);
        assert_eq!(item.source, ContentSource::Tmdb);
    }

    #[test]
    fn test_remote_tv_item_is_series() {
        let remote = RemoteItem {
            remote_id: 1399,
            kind: RemoteKind::Tv,
            title: "Game of Thrones".to_string(),
            overview: String::new(),
            genres: vec![],
            popularity: 1.0,
            vote_count: 0,
            vote_average: None,
            release_year: None,
            poster_url: None,
            backdrop_url: None,
        };

        let item: ContentItem = remote.into();
        assert_eq!(item.category, Category::Series);
        assert_eq!(item.id.to_string(), "tv_1399");
    }
}
