use chrono::Utc;
use tracing::warn;

use crate::application::ports::event_publisher::FigureEventPublisher;
use crate::application::ports::figure_repository::FigureRepository;
use crate::application::services::serial_generator::SerialGenerator;
use crate::domain::figures::figure::{Figure, FigureDraft, FigureEvent, FigureEventKind};

/// One row of a catalog file: the id the file carries plus the figure fields.
#[derive(Debug, Clone)]
pub struct CatalogRecord {
    pub id: uuid::Uuid,
    pub draft: FigureDraft,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedOutcome {
    pub inserted: usize,
    pub skipped: usize,
}

pub struct SeedCatalog<'a, R, E>
where
    R: FigureRepository + ?Sized,
    E: FigureEventPublisher + ?Sized,
{
    pub repo: &'a R,
    pub events: &'a E,
    pub serials: &'a SerialGenerator,
}

impl<'a, R, E> SeedCatalog<'a, R, E>
where
    R: FigureRepository + ?Sized,
    E: FigureEventPublisher + ?Sized,
{
    /// Inserts catalog records one by one, keeping the ids the file carries.
    /// A record that fails validation or insertion is logged and skipped so
    /// one broken row never sinks the rest of the load.
    pub async fn execute(&self, records: Vec<CatalogRecord>) -> anyhow::Result<SeedOutcome> {
        let mut outcome = SeedOutcome::default();
        for record in records {
            if let Err(e) = record.draft.validate() {
                warn!(id = %record.id, error = %e, "seed_record_invalid");
                outcome.skipped += 1;
                continue;
            }
            let now = Utc::now();
            let figure = Figure {
                id: record.id,
                serial: self.serials.next(),
                name: record.draft.name,
                model: record.draft.model,
                price: record.draft.price,
                release_date: record.draft.release_date,
                created_at: now,
                updated_at: now,
            };
            if let Err(e) = self.repo.insert(&figure).await {
                warn!(id = %figure.id, error = %e, "seed_record_insert_failed");
                outcome.skipped += 1;
                continue;
            }
            self.events
                .publish(&FigureEvent {
                    kind: FigureEventKind::Created,
                    figure,
                })
                .await?;
            outcome.inserted += 1;
        }
        Ok(outcome)
    }
}
