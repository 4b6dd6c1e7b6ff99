use axum::Json;
use serde::Serialize;

use crate::services::vocabulary;

#[derive(Debug, Serialize)]
pub struct GenreEntry {
    pub id: u32,
    pub name: &'static str,
}

/// The genre vocabulary shared by local and remote content
pub async fn list() -> Json<Vec<GenreEntry>> {
    Json(
        vocabulary::all()
            .map(|(id, name)| GenreEntry { id, name })
            .collect(),
    )
}
