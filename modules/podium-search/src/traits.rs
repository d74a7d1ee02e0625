// Trait seam between the fetcher and the generative-content service.
//
// Gemini implements it for production; testing::MockGenerator scripts
// responses and counts calls so fetcher behaviour is tested without a network.

use std::sync::Arc;

use ai_client::Gemini;
use async_trait::async_trait;
use podium_common::{ApiKey, SearchError};

use crate::query_formatter::FormattedQuery;

#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Submit one structured-output request and return its raw text payload.
    ///
    /// `Ok(None)` means the service answered without any text.
    async fn generate(
        &self,
        api_key: &ApiKey,
        query: &FormattedQuery,
    ) -> Result<Option<String>, SearchError>;
}

#[async_trait]
impl ContentGenerator for Gemini {
    async fn generate(
        &self,
        api_key: &ApiKey,
        query: &FormattedQuery,
    ) -> Result<Option<String>, SearchError> {
        Ok(self
            .generate_text(api_key.expose(), &query.instruction, query.schema.clone())
            .await?)
    }
}

#[async_trait]
impl<T: ContentGenerator + ?Sized> ContentGenerator for Arc<T> {
    async fn generate(
        &self,
        api_key: &ApiKey,
        query: &FormattedQuery,
    ) -> Result<Option<String>, SearchError> {
        (**self).generate(api_key, query).await
    }
}
