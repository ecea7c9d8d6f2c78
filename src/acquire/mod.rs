pub mod gemini;

use async_trait::async_trait;

use crate::error::AcquireError;
use crate::models::media::{CitationSource, MediaDescriptor};

/// Result of one acquisition: the fabricated descriptor plus whatever
/// citation sources the service volunteered.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub descriptor: MediaDescriptor,
    pub sources: Vec<CitationSource>,
}

/// Seam between the controller and the generative backend. Exactly one
/// outbound call per invocation; the caller serializes requests.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    async fn fetch_metadata(&self, url: &str) -> Result<Extraction, AcquireError>;
}
