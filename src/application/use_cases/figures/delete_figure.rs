use uuid::Uuid;

use crate::application::ports::event_publisher::FigureEventPublisher;
use crate::application::ports::figure_cache::FigureCache;
use crate::application::ports::figure_repository::FigureRepository;
use crate::domain::figures::figure::{Figure, FigureEvent, FigureEventKind};

pub struct DeleteFigure<'a, R, C, E>
where
    R: FigureRepository + ?Sized,
    C: FigureCache + ?Sized,
    E: FigureEventPublisher + ?Sized,
{
    pub repo: &'a R,
    pub cache: &'a C,
    pub events: &'a E,
}

impl<'a, R, C, E> DeleteFigure<'a, R, C, E>
where
    R: FigureRepository + ?Sized,
    C: FigureCache + ?Sized,
    E: FigureEventPublisher + ?Sized,
{
    pub async fn execute(&self, id: Uuid) -> anyhow::Result<Option<Figure>> {
        let existing = match self.repo.find_by_id(id).await? {
            Some(f) => f,
            None => return Ok(None),
        };
        // Evict before the row goes away so a concurrent lookup can't re-fill
        // the cache with a deleted figure.
        self.cache.remove(id).await;
        self.repo.delete(id).await?;
        self.events
            .publish(&FigureEvent {
                kind: FigureEventKind::Deleted,
                figure: existing.clone(),
            })
            .await?;
        Ok(Some(existing))
    }
}
