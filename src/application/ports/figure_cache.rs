use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::figures::figure::Figure;

/// Read-through cache in front of figure point lookups.
#[async_trait]
pub trait FigureCache: Send + Sync {
    async fn get(&self, id: Uuid) -> Option<Figure>;
    async fn put(&self, figure: Figure);
    async fn remove(&self, id: Uuid);
}
