//! Genre names <-> TMDB numeric genre ids
//!
//! One table for the whole crate. Movie and TV genres share the id space on
//! TMDB; where a TV-only genre overlaps a movie genre (e.g. "Sci-Fi & Fantasy")
//! it resolves to the movie id of its first component so discover queries,
//! which run against movies, still receive a usable id.

/// Canonical names, as TMDB returns them
const CANONICAL: &[(u32, &str)] = &[
    (28, "Action"),
    (12, "Adventure"),
    (16, "Animation"),
    (35, "Comedy"),
    (80, "Crime"),
    (99, "Documentary"),
    (18, "Drama"),
    (10751, "Family"),
    (14, "Fantasy"),
    (36, "History"),
    (27, "Horror"),
    (10402, "Music"),
    (9648, "Mystery"),
    (10749, "Romance"),
    (878, "Science Fiction"),
    (10770, "TV Movie"),
    (53, "Thriller"),
    (10752, "War"),
    (37, "Western"),
    (10759, "Action & Adventure"),
    (10762, "Kids"),
    (10763, "News"),
    (10764, "Reality"),
    (10765, "Sci-Fi & Fantasy"),
    (10766, "Soap"),
    (10767, "Talk"),
    (10768, "War & Politics"),
];

/// Extra spellings seen in locally curated content
const ALIASES: &[(&str, u32)] = &[
    ("sci-fi", 878),
    ("scifi", 878),
    ("science-fiction", 878),
    ("romcom", 10749),
    ("suspense", 53),
    ("animated", 16),
    ("anime", 16),
    ("kids", 10751),
    ("biography", 36),
    ("musical", 10402),
];

/// TV genres that the movie discover endpoint does not know
const TV_TO_MOVIE: &[(u32, u32)] = &[
    (10759, 28),
    (10762, 10751),
    (10765, 878),
    (10768, 10752),
];

/// Looks up the TMDB genre id for a genre name, case-insensitively
pub fn genre_id(name: &str) -> Option<u32> {
    let name = name.trim();
    if name.is_empty() {
        return None;
    }

    let id = CANONICAL
        .iter()
        .find(|(_, canonical)| canonical.eq_ignore_ascii_case(name))
        .map(|(id, _)| *id)
        .or_else(|| {
            ALIASES
                .iter()
                .find(|(alias, _)| alias.eq_ignore_ascii_case(name))
                .map(|(_, id)| *id)
        })?;

    Some(movie_genre_id(id))
}

/// Canonical TMDB name for a genre id
pub fn genre_name(id: u32) -> Option<&'static str> {
    CANONICAL
        .iter()
        .find(|(candidate, _)| *candidate == id)
        .map(|(_, name)| *name)
}

/// Maps genre names to ids, dropping unknown names and duplicates
pub fn genre_ids(names: &[String]) -> Vec<u32> {
    let mut ids = Vec::new();
    for id in names.iter().filter_map(|name| genre_id(name)) {
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    ids
}

/// Maps genre ids to canonical names, dropping unknown ids
pub fn genre_names(ids: &[u32]) -> Vec<String> {
    ids.iter()
        .filter_map(|id| genre_name(*id))
        .map(str::to_string)
        .collect()
}

/// Every canonical (id, name) pair
pub fn all() -> impl Iterator<Item = (u32, &'static str)> {
    CANONICAL.iter().copied()
}

fn movie_genre_id(id: u32) -> u32 {
    TV_TO_MOVIE
        .iter()
        .find(|(tv, _)| *tv == id)
        .map(|(_, movie)| *movie)
        .unwrap_or(id)
}
