//! LLM clients for itinerary narration
//!
//! This crate provides the text-generation backends used by the narrative
//! stage. It has no pipeline dependencies - prompt construction and fallback
//! handling stay in `wandr`.
//!
//! ## Backend Selection
//!
//! Set `WANDR_LLM_BACKEND` environment variable:
//! - `anthropic` (default): Anthropic Claude API
//! - `openai`: OpenAI API
//! - `none`: no generation; the narrative stage uses its template

pub mod anthropic_client;
pub mod backend;
pub mod client_factory;
pub mod llm_client;
pub mod openai_client;

pub use backend::AgentBackend;
pub use client_factory::{create_llm_client, create_llm_client_with_key};
pub use llm_client::LlmClient;
