use crate::error::Result;
use crate::shortcode::ShortCode;
use async_trait::async_trait;

#[async_trait]
pub trait Redirector: Send + Sync + 'static {
    /// Resolves a short code to its long URL.
    /// Fails with [`ServiceError::NotFound`](crate::ServiceError::NotFound)
    /// if no mapping exists.
    async fn resolve(&self, code: &ShortCode) -> Result<String>;
}
