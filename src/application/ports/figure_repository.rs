use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::figures::figure::{Figure, Model};

#[async_trait]
pub trait FigureRepository: Send + Sync {
    async fn list_all(&self) -> anyhow::Result<Vec<Figure>>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Figure>>;
    /// Case-insensitive exact name match; several figures may share a name.
    async fn find_by_name(&self, name: &str) -> anyhow::Result<Vec<Figure>>;
    async fn find_by_model(&self, model: Model) -> anyhow::Result<Vec<Figure>>;
    async fn find_by_release_year(&self, year: i32) -> anyhow::Result<Vec<Figure>>;
    async fn insert(&self, figure: &Figure) -> anyhow::Result<()>;
    async fn update(&self, id: Uuid, figure: &Figure) -> anyhow::Result<Option<Figure>>;
    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;
    async fn max_serial(&self) -> anyhow::Result<i64>;
}
