//! Release index trait for listing published releases of a tool

#[cfg(test)]
use mockall::automock;

use crate::release::error::IndexError;
use crate::release::types::ReleaseEntry;

/// Trait for fetching the published releases of a tool
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait ReleaseIndex: Send + Sync {
    /// Lists the releases of a tool
    ///
    /// # Arguments
    /// * `tool_name` - The name of the tool (e.g., "go-actions")
    ///
    /// # Returns
    /// * `Ok(Vec<ReleaseEntry>)` - Releases in index order, one entry per version
    /// * `Err(IndexError)` - If the index could not be fetched or parsed
    async fn list_releases(&self, tool_name: &str) -> Result<Vec<ReleaseEntry>, IndexError>;
}
