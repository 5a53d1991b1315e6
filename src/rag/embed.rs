//! Embedding seam.

use async_trait::async_trait;

use crate::error::Result;

/// Turns text into vectors. Implementations own their model choice, batching
/// and transport.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed each input text, preserving order.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Dimensionality of the produced vectors.
    fn dimensions(&self) -> usize;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ConstantEmbedder;

    #[async_trait]
    impl Embedder for ConstantEmbedder {
        async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|t| vec![t.len() as f32, 1.0]).collect())
        }

        fn dimensions(&self) -> usize {
            2
        }
    }

    #[tokio::test]
    async fn test_embedder_preserves_order() {
        let embedder = ConstantEmbedder;
        let vectors = embedder
            .embed(&["a".to_string(), "abc".to_string()])
            .await
            .unwrap();
        assert_eq!(vectors, vec![vec![1.0, 1.0], vec![3.0, 1.0]]);
        assert_eq!(embedder.dimensions(), 2);
    }
}
