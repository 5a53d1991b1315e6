//! Vector store seam.

use async_trait::async_trait;

use crate::error::Result;
use crate::rag::types::Document;

/// Stores documents and retrieves the closest matches for a query.
/// Implementations own embedding, persistence and similarity.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Add documents to the store.
    async fn add_documents(&self, documents: &[Document]) -> Result<()>;

    /// The `limit` documents most relevant to `query`, best first.
    async fn retrieve(&self, query: &str, limit: usize) -> Result<Vec<Document>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Substring match stands in for similarity; enough to exercise the seam.
    #[derive(Default)]
    struct MemoryStore {
        documents: Mutex<Vec<Document>>,
    }

    #[async_trait]
    impl VectorStore for MemoryStore {
        async fn add_documents(&self, documents: &[Document]) -> Result<()> {
            self.documents
                .lock()
                .map_err(|_| crate::error::Error::execution("store lock poisoned"))?
                .extend_from_slice(documents);
            Ok(())
        }

        async fn retrieve(&self, query: &str, limit: usize) -> Result<Vec<Document>> {
            let documents = self
                .documents
                .lock()
                .map_err(|_| crate::error::Error::execution("store lock poisoned"))?;
            Ok(documents
                .iter()
                .filter(|d| d.text.contains(query))
                .take(limit)
                .cloned()
                .collect())
        }
    }

    #[tokio::test]
    async fn test_add_and_retrieve() {
        let store = MemoryStore::default();
        store
            .add_documents(&[
                Document::new("1", "the fjords of Norway"),
                Document::new("2", "the deserts of Nevada"),
            ])
            .await
            .unwrap();

        let hits = store.retrieve("fjords", 5).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "1");
    }

    #[tokio::test]
    async fn test_retrieve_respects_limit() {
        let store = MemoryStore::default();
        let docs: Vec<Document> = (0..5)
            .map(|i| Document::new(i.to_string(), "same text"))
            .collect();
        store.add_documents(&docs).await.unwrap();
        assert_eq!(store.retrieve("same", 2).await.unwrap().len(), 2);
    }
}
