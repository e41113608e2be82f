pub mod collaborator;
pub mod engine;
pub mod error;
pub mod image_client;
pub mod llm_client;
pub mod narrative;
pub mod portrait_cache;
pub mod prompt_builder;
pub mod protocol;
