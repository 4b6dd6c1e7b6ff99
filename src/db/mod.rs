pub mod postgres;
pub mod redis;
pub mod store;

pub use self::postgres::{create_pool, PgContentStore};
pub use self::redis::{create_redis_client, Cache, CacheKey, CacheWriterHandle};
pub use self::store::ContentStore;

#[cfg(test)]
pub use self::store::MockContentStore;
