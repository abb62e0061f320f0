use async_trait::async_trait;

use crate::domain::figures::figure::Figure;

#[async_trait]
pub trait BackupStore: Send + Sync {
    async fn export(&self, file_name: &str, figures: &[Figure]) -> anyhow::Result<()>;
    async fn import(&self, file_name: &str) -> anyhow::Result<Vec<Figure>>;
}
