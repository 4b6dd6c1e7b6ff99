use crate::{db::ContentStore, error::AppResult, models::InteractionRecord};

/// How much a profile's history can tell the recommender
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileSignal {
    /// The profile never interacted with anything
    NoRecord,
    /// History exists but nothing was liked
    NoLikes(InteractionRecord),
    HasLikes(InteractionRecord),
}

/// Reads a profile's interaction record and classifies it
pub async fn read_signal(store: &dyn ContentStore, profile_id: &str) -> AppResult<ProfileSignal> {
    let signal = match store.get_interaction_record(profile_id).await? {
        None => ProfileSignal::NoRecord,
        Some(record) if !record.has_likes() => ProfileSignal::NoLikes(record),
        Some(record) => ProfileSignal::HasLikes(record),
    };

    Ok(signal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MockContentStore;
    use crate::error::AppError;
    use crate::models::ContentId;
    use mockall::predicate::eq;

    #[tokio::test]
    async fn test_missing_record() {
        let mut store = MockContentStore::new();
        store
            .expect_get_interaction_record()
            .with(eq("p1"))
            .returning(|_| Ok(None));

        assert_eq!(read_signal(&store, "p1").await.unwrap(), ProfileSignal::NoRecord);
    }

    #[tokio::test]
    async fn test_record_without_likes() {
        let mut store = MockContentStore::new();
        store
            .expect_get_interaction_record()
            .returning(|id| Ok(Some(InteractionRecord::new(id))));

        let signal = read_signal(&store, "p1").await.unwrap();
        assert!(matches!(signal, ProfileSignal::NoLikes(_)));
    }

    #[tokio::test]
    async fn test_record_with_likes() {
        let mut store = MockContentStore::new();
        store.expect_get_interaction_record().returning(|id| {
            let mut record = InteractionRecord::new(id);
            record.liked_content_ids.push(ContentId::parse("movie_1"));
            Ok(Some(record))
        });

        let signal = read_signal(&store, "p1").await.unwrap();
        assert!(matches!(signal, ProfileSignal::HasLikes(_)));
    }

    #[tokio::test]
    async fn test_store_error_propagates() {
        let mut store = MockContentStore::new();
        store
            .expect_get_interaction_record()
            .returning(|_| Err(AppError::Internal("db down".to_string())));

        assert!(read_signal(&store, "p1").await.is_err());
    }
}
