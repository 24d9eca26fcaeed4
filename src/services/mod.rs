// Service exports
pub mod cache;
pub mod extraction;
pub mod llm;
pub mod memory;
pub mod postgres;

pub use cache::{CacheError, CacheKey, CacheManager};
pub use extraction::{CvParser, EmailDrafter, ExtractionError, JdAnalyzer};
pub use llm::{LlmClient, LlmError};
pub use memory::{InMemoryMatchStore, MemoryStoreError};
pub use postgres::{PostgresClient, PostgresError};
