// Service exports
pub mod memory;
pub mod openai;
pub mod postgres;
pub mod store;

pub use memory::InMemoryStore;
pub use openai::{LlmError, OpenAiClient, OpenAiConfig, TextGenerator};
pub use postgres::PostgresStore;
pub use store::{CatalogStore, ProfileStore, StoreError};
