use chrono::Utc;
use uuid::Uuid;

use crate::application::ports::event_publisher::FigureEventPublisher;
use crate::application::ports::figure_cache::FigureCache;
use crate::application::ports::figure_repository::FigureRepository;
use crate::domain::figures::figure::{Figure, FigureDraft, FigureEvent, FigureEventKind};

pub struct UpdateFigure<'a, R, C, E>
where
    R: FigureRepository + ?Sized,
    C: FigureCache + ?Sized,
    E: FigureEventPublisher + ?Sized,
{
    pub repo: &'a R,
    pub cache: &'a C,
    pub events: &'a E,
}

impl<'a, R, C, E> UpdateFigure<'a, R, C, E>
where
    R: FigureRepository + ?Sized,
    C: FigureCache + ?Sized,
    E: FigureEventPublisher + ?Sized,
{
    /// Identity fields (id, serial, created_at) survive the update; the draft
    /// replaces everything else.
    pub async fn execute(&self, id: Uuid, draft: FigureDraft) -> anyhow::Result<Option<Figure>> {
        draft.validate()?;
        let existing = match self.repo.find_by_id(id).await? {
            Some(f) => f,
            None => return Ok(None),
        };
        let figure = Figure {
            id: existing.id,
            serial: existing.serial,
            name: draft.name,
            model: draft.model,
            price: draft.price,
            release_date: draft.release_date,
            created_at: existing.created_at,
            updated_at: Utc::now(),
        };
        let updated = match self.repo.update(id, &figure).await? {
            Some(f) => f,
            None => return Ok(None),
        };
        self.cache.put(updated.clone()).await;
        self.events
            .publish(&FigureEvent {
                kind: FigureEventKind::Updated,
                figure: updated.clone(),
            })
            .await?;
        Ok(Some(updated))
    }
}
