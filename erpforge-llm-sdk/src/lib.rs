//! # ERPForge LLM SDK
//!
//! Thin async clients for the LLM providers the pipeline talks to:
//! Claude for text generation, Voyage AI for embeddings. Both are exposed
//! behind provider-agnostic traits so agents and the retrieval index can be
//! tested against scripted fakes.
//!
//! ## Example
//!
//! ```rust,no_run
//! use erpforge_llm_sdk::claude::{ClaudeClient, types::ClaudeContentBlock};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ClaudeClient::new("your-api-key")?;
//!     let response = client
//!         .message_builder()
//!         .model("claude-sonnet-4-5-20250929")
//!         .max_tokens(1024)
//!         .message("user", "Hello, Claude!")
//!         .send()
//!         .await?;
//!
//!     match &response.content[0] {
//!         ClaudeContentBlock::Text { text } => println!("Response: {}", text),
//!     }
//!     Ok(())
//! }
//! ```

pub mod claude;
pub mod client;
pub mod error;
pub mod models;
pub mod providers;
pub mod types;
pub mod voyage;

pub use client::{EmbeddingClient, LlmClient};
pub use error::LlmError;
pub use types::{CompletionRequest, CompletionResponse, ContentBlock, Message, Role, Usage};
