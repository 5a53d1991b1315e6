//! Retrieval surface: document chunking and the embedding/store seams.
//!
//! This module carries the types and traits a retrieval pipeline is built
//! from: [`Document`], a [`Chunker`] with a character-window
//! [`TextChunker`], and async [`Embedder`]/[`VectorStore`] traits for the
//! pieces that talk to real services. No store or embedder implementation
//! ships here; those live with whatever backend an application picks.

mod chunk;
mod embed;
mod store;
mod types;

pub use chunk::{Chunker, TextChunker};
pub use embed::Embedder;
pub use store::VectorStore;
pub use types::Document;
