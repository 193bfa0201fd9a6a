use crate::models::Property;
use anyhow::Result;
use async_trait::async_trait;

/// Durable home of the property catalog.
///
/// The store loads everything once and writes the whole array back after
/// each command, so implementations only need whole-catalog reads and writes.
#[async_trait]
pub trait PropertyRepository: Send + Sync {
    /// Load every stored record, in insertion order
    async fn load(&self) -> Result<Vec<Property>>;

    /// Replace the stored catalog with `records`
    async fn save(&self, records: &[Property]) -> Result<()>;

    /// Get the name of the storage backend
    fn backend_name(&self) -> &'static str;
}
