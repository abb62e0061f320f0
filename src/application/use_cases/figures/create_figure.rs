use chrono::Utc;
use uuid::Uuid;

use crate::application::ports::event_publisher::FigureEventPublisher;
use crate::application::ports::figure_cache::FigureCache;
use crate::application::ports::figure_repository::FigureRepository;
use crate::application::services::serial_generator::SerialGenerator;
use crate::domain::figures::figure::{Figure, FigureDraft, FigureEvent, FigureEventKind};

pub struct CreateFigure<'a, R, C, E>
where
    R: FigureRepository + ?Sized,
    C: FigureCache + ?Sized,
    E: FigureEventPublisher + ?Sized,
{
    pub repo: &'a R,
    pub cache: &'a C,
    pub events: &'a E,
    pub serials: &'a SerialGenerator,
}

impl<'a, R, C, E> CreateFigure<'a, R, C, E>
where
    R: FigureRepository + ?Sized,
    C: FigureCache + ?Sized,
    E: FigureEventPublisher + ?Sized,
{
    pub async fn execute(&self, draft: FigureDraft) -> anyhow::Result<Figure> {
        draft.validate()?;
        let now = Utc::now();
        let figure = Figure {
            id: Uuid::new_v4(),
            serial: self.serials.next(),
            name: draft.name,
            model: draft.model,
            price: draft.price,
            release_date: draft.release_date,
            created_at: now,
            updated_at: now,
        };
        self.repo.insert(&figure).await?;
        self.cache.put(figure.clone()).await;
        self.events
            .publish(&FigureEvent {
                kind: FigureEventKind::Created,
                figure: figure.clone(),
            })
            .await?;
        Ok(figure)
    }
}
