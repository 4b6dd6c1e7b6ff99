use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, types::Json, PgPool};
use std::collections::HashMap;

use crate::{
    db::ContentStore,
    error::AppResult,
    models::{Category, ContentId, ContentItem, ContentSource, InteractionRecord, SearchEntry},
};

/// `LIMIT` parameter for a `usize` limit; oversized limits mean "no limit"
fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

/// Creates a PostgreSQL connection pool
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(pool)
}

const CONTENT_COLUMNS: &str = "id, title, description, category, genre, popularity, likes, \
     year, rating, poster_url, backdrop_url, created_at";

#[derive(Debug, sqlx::FromRow)]
struct ContentRow {
    id: String,
    title: String,
    description: String,
    category: String,
    genre: String,
    popularity: f64,
    likes: i32,
    year: Option<i32>,
    rating: Option<f64>,
    poster_url: Option<String>,
    backdrop_url: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<ContentRow> for ContentItem {
    fn from(row: ContentRow) -> Self {
        ContentItem {
            id: ContentId::parse(&row.id),
            title: row.title,
            description: row.description,
            category: Category::parse(&row.category),
            genre: row.genre,
            popularity: row.popularity,
            likes: row.likes.max(0) as u32,
            year: row.year,
            rating: row.rating,
            poster_url: row.poster_url,
            backdrop_url: row.backdrop_url,
            created_at: Some(row.created_at),
            source: ContentSource::Local,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct InteractionRow {
    profile_id: String,
    liked_content_ids: Vec<String>,
    watch_progress: Json<HashMap<String, f64>>,
    search_history: Json<Vec<SearchEntry>>,
}

impl From<InteractionRow> for InteractionRecord {
    fn from(row: InteractionRow) -> Self {
        let watch_progress = row
            .watch_progress
            .0
            .into_iter()
            .map(|(id, pct)| (ContentId::parse(&id), pct.clamp(0.0, 100.0).round() as u8))
            .collect();

        InteractionRecord::from_parts(
            row.profile_id,
            row.liked_content_ids.iter().map(|id| ContentId::parse(id)),
            watch_progress,
            row.search_history.0,
        )
    }
}

/// `ContentStore` backed by the application's PostgreSQL database
#[derive(Clone)]
pub struct PgContentStore {
    pool: PgPool,
}

impl PgContentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ContentStore for PgContentStore {
    async fn find_items_by_ids(&self, ids: &[ContentId]) -> AppResult<Vec<ContentItem>> {
        // Remote ids never live in this table (see the content_items_local_id constraint)
        let local: Vec<String> = ids
            .iter()
            .filter(|id| id.is_local())
            .map(ContentId::to_string)
            .collect();

        if local.is_empty() {
            return Ok(vec![]);
        }

        let rows: Vec<ContentRow> = sqlx::query_as(&format!(
            "SELECT {} FROM content_items WHERE id = ANY($1) ORDER BY array_position($1, id)",
            CONTENT_COLUMNS
        ))
        .bind(&local)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ContentItem::from).collect())
    }

    async fn find_items_by_genre_pattern(
        &self,
        pattern: &str,
        limit: usize,
    ) -> AppResult<Vec<ContentItem>> {
        let rows: Vec<ContentRow> = sqlx::query_as(&format!(
            "SELECT {} FROM content_items WHERE genre ~* $1 \
             ORDER BY popularity DESC, created_at DESC LIMIT $2",
            CONTENT_COLUMNS
        ))
        .bind(pattern)
        .bind(sql_limit(limit))
        .fetch_all(&self.pool)
        .await?;

        tracing::debug!(pattern = %pattern, found = rows.len(), "Genre pattern query");

        Ok(rows.into_iter().map(ContentItem::from).collect())
    }

    async fn find_item_by_id(&self, id: &ContentId) -> AppResult<Option<ContentItem>> {
        let ContentId::Local(key) = id else {
            return Ok(None);
        };

        let row: Option<ContentRow> = sqlx::query_as(&format!(
            "SELECT {} FROM content_items WHERE id = $1",
            CONTENT_COLUMNS
        ))
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ContentItem::from))
    }

    async fn find_most_popular(&self, limit: usize) -> AppResult<Vec<ContentItem>> {
        let rows: Vec<ContentRow> = sqlx::query_as(&format!(
            "SELECT {} FROM content_items \
             ORDER BY likes DESC, popularity DESC, created_at DESC LIMIT $1",
            CONTENT_COLUMNS
        ))
        .bind(sql_limit(limit))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ContentItem::from).collect())
    }

    async fn get_interaction_record(
        &self,
        profile_id: &str,
    ) -> AppResult<Option<InteractionRecord>> {
        let row: Option<InteractionRow> = sqlx::query_as(
            r#"
            SELECT profile_id, liked_content_ids, watch_progress, search_history
            FROM interaction_records
            WHERE profile_id = $1
            "#,
        )
        .bind(profile_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(InteractionRecord::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RemoteKind;

    fn row(id: &str, likes: i32, category: &str) -> ContentRow {
        ContentRow {
            id: id.to_string(),
            title: "Heat".to_string(),
            description: "LA crime saga".to_string(),
            category: category.to_string(),
            genre: "Crime, Thriller".to_string(),
            popularity: 42.0,
            likes,
            year: Some(1995),
            rating: Some(8.3),
            poster_url: None,
            backdrop_url: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_content_row_into_item() {
        let item: ContentItem = row("65f1c2a9e4b0a1b2c3d4e5f6", 12, "Series").into();

        assert_eq!(item.id, ContentId::local("65f1c2a9e4b0a1b2c3d4e5f6"));
        assert_eq!(item.category, Category::Series);
        assert_eq!(item.likes, 12);
        assert_eq!(item.source, ContentSource::Local);
        assert_eq!(item.genres(), vec!["Crime", "Thriller"]);
    }

    #[test]
    fn test_content_row_id_parsed_like_stored_references() {
        let item: ContentItem = row("movie_12", 0, "Movie").into();

        // Same value a liked or watched "movie_12" entry parses to
        assert_eq!(item.id, ContentId::parse("movie_12"));
        assert_eq!(item.id, ContentId::remote(RemoteKind::Movie, 12));
    }

    #[test]
    fn test_sql_limit_saturates() {
        assert_eq!(sql_limit(10), 10);
        assert_eq!(sql_limit(usize::MAX), i64::MAX);
    }

    #[test]
    fn test_negative_likes_clamped_to_zero() {
        let item: ContentItem = row("a", -3, "Movie").into();
        assert_eq!(item.likes, 0);
    }

    #[test]
    fn test_interaction_row_parses_ids_at_the_boundary() {
        let mut progress = HashMap::new();
        progress.insert("tv_1399".to_string(), 37.6);
        progress.insert("abc".to_string(), 140.0);

        let record: InteractionRecord = InteractionRow {
            profile_id: "p1".to_string(),
            liked_content_ids: vec!["movie_603".to_string(), "abc".to_string()],
            watch_progress: Json(progress),
            search_history: Json(vec![]),
        }
        .into();

        assert_eq!(
            record.liked_content_ids,
            vec![
                ContentId::remote(RemoteKind::Movie, 603),
                ContentId::local("abc")
            ]
        );
        assert_eq!(
            record.watch_progress[&ContentId::remote(RemoteKind::Tv, 1399)],
            38
        );
        assert_eq!(record.watch_progress[&ContentId::local("abc")], 100);
    }
}
