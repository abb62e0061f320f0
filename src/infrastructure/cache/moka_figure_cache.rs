use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use uuid::Uuid;

use crate::application::ports::figure_cache::FigureCache;
use crate::domain::figures::figure::Figure;

/// Bounded TTL cache for figure point lookups. Capacity evicts least-recently
/// used entries; expired entries are also swept by a periodic background task
/// (see main.rs).
#[derive(Clone)]
pub struct MokaFigureCache {
    cache: Cache<Uuid, Figure>,
}

impl MokaFigureCache {
    pub fn new(capacity: u64, ttl: Duration) -> Self {
        Self {
            cache: Cache::builder()
                .max_capacity(capacity)
                .time_to_live(ttl)
                .build(),
        }
    }

    pub async fn run_pending_tasks(&self) {
        self.cache.run_pending_tasks().await;
    }
}

#[async_trait]
impl FigureCache for MokaFigureCache {
    async fn get(&self, id: Uuid) -> Option<Figure> {
        self.cache.get(&id).await
    }

    async fn put(&self, figure: Figure) {
        self.cache.insert(figure.id, figure).await;
    }

    async fn remove(&self, id: Uuid) {
        self.cache.invalidate(&id).await;
    }
}
