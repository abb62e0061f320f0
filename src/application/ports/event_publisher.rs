use async_trait::async_trait;

use crate::domain::figures::figure::FigureEvent;

#[async_trait]
pub trait FigureEventPublisher: Send + Sync {
    async fn publish(&self, event: &FigureEvent) -> anyhow::Result<()>;
}
