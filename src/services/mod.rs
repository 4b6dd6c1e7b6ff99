pub mod providers;
pub mod recommendations;
pub mod vocabulary;

pub use providers::{RemoteCatalog, TmdbProvider};
pub use recommendations::RecommendationEngine;
