// LLM adapters

pub mod http_llm_client;

pub use http_llm_client::HttpLlmClient;
