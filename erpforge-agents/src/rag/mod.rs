//! Document chunking, vector indexing and retrieval

pub mod chunker;
pub mod index;
pub mod retriever;

pub use chunker::{chunk_text, DEFAULT_CHUNK_SIZE, DEFAULT_OVERLAP};
pub use index::{cosine_similarity, InMemoryIndex, VectorIndex};
pub use retriever::Retriever;
