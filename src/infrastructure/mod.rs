// Infrastructure layer module
// Contains database, LLM and chat adapters
// Follows Hexagonal Architecture

pub mod llm;
pub mod repositories;
pub mod telegram;
