//! Document chunking.

use uuid::Uuid;

use crate::rag::types::Document;

/// Splits source text into retrieval documents.
pub trait Chunker: Send + Sync {
    fn chunk(&self, text: &str) -> Vec<Document>;
}

/// Sliding character window with overlap. Each chunk gets a fresh v4 uuid.
#[derive(Debug, Clone)]
pub struct TextChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl TextChunker {
    /// # Panics
    ///
    /// Panics when `chunk_overlap >= chunk_size` or `chunk_size == 0`; the
    /// window would never advance.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        assert!(chunk_size > 0, "chunk size must be positive");
        assert!(
            chunk_overlap < chunk_size,
            "chunk overlap must be smaller than chunk size"
        );
        Self {
            chunk_size,
            chunk_overlap,
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }
}

impl Chunker for TextChunker {
    fn chunk(&self, text: &str) -> Vec<Document> {
        // Windows advance over characters, not bytes, so multi-byte text
        // never splits inside a code point.
        let chars: Vec<char> = text.chars().collect();
        let step = self.chunk_size - self.chunk_overlap;

        let mut documents = Vec::new();
        let mut start = 0;
        while start < chars.len() {
            let end = (start + self.chunk_size).min(chars.len());
            let chunk: String = chars[start..end].iter().collect();
            documents.push(Document::new(Uuid::new_v4().to_string(), chunk));
            if end == chars.len() {
                break;
            }
            start += step;
        }
        documents
    }
}
