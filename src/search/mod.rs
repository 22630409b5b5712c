//! Document relevance search engine.

pub mod engine;
pub mod normalize;
pub mod redirect;
pub mod routing;
pub mod score;
pub mod special;
pub mod synonyms;

pub use engine::{has_only_technical_files, EngineConfig, SearchEngine, DEFAULT_LIMIT};
pub use routing::{should_use_ai_directly, AiRoutingPolicy};
