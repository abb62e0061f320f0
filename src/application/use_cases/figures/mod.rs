pub mod catalog_stats;
pub mod create_figure;
pub mod delete_figure;
pub mod find_by_name;
pub mod get_figure;
pub mod list_figures;
pub mod update_figure;

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::NaiveDate;
    use uuid::Uuid;

    use crate::application::ports::event_publisher::FigureEventPublisher;
    use crate::application::ports::figure_cache::FigureCache;
    use crate::application::ports::figure_repository::FigureRepository;
    use crate::application::services::serial_generator::SerialGenerator;
    use crate::application::use_cases::figures::catalog_stats::CatalogStats;
    use crate::application::use_cases::figures::create_figure::CreateFigure;
    use crate::application::use_cases::figures::delete_figure::DeleteFigure;
    use crate::application::use_cases::figures::find_by_name::FindFiguresByName;
    use crate::application::use_cases::figures::get_figure::GetFigure;
    use crate::application::use_cases::figures::list_figures::{ListFigures, ListFilter};
    use crate::application::use_cases::figures::update_figure::UpdateFigure;
    use crate::domain::figures::figure::{
        Figure, FigureDraft, FigureEvent, FigureEventKind, FigureInvalid, Model,
    };

    #[derive(Default)]
    struct InMemoryFigures {
        rows: Mutex<Vec<Figure>>,
    }

    #[async_trait]
    impl FigureRepository for InMemoryFigures {
        async fn list_all(&self) -> anyhow::Result<Vec<Figure>> {
            Ok(self.rows.lock().unwrap().clone())
        }

        async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Figure>> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .find(|f| f.id == id)
                .cloned())
        }

        async fn find_by_name(&self, name: &str) -> anyhow::Result<Vec<Figure>> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|f| f.name.eq_ignore_ascii_case(name))
                .cloned()
                .collect())
        }

        async fn find_by_model(&self, model: Model) -> anyhow::Result<Vec<Figure>> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|f| f.model == model)
                .cloned()
                .collect())
        }

        async fn find_by_release_year(&self, year: i32) -> anyhow::Result<Vec<Figure>> {
            use chrono::Datelike;
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|f| f.release_date.year() == year)
                .cloned()
                .collect())
        }

        async fn insert(&self, figure: &Figure) -> anyhow::Result<()> {
            self.rows.lock().unwrap().push(figure.clone());
            Ok(())
        }

        async fn update(&self, id: Uuid, figure: &Figure) -> anyhow::Result<Option<Figure>> {
            let mut rows = self.rows.lock().unwrap();
            match rows.iter_mut().find(|f| f.id == id) {
                Some(slot) => {
                    *slot = figure.clone();
                    Ok(Some(figure.clone()))
                }
                None => Ok(None),
            }
        }

        async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
            let mut rows = self.rows.lock().unwrap();
            let before = rows.len();
            rows.retain(|f| f.id != id);
            Ok(rows.len() < before)
        }

        async fn max_serial(&self) -> anyhow::Result<i64> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .map(|f| f.serial)
                .max()
                .unwrap_or(0))
        }
    }

    #[derive(Default)]
    struct MapCache {
        entries: Mutex<std::collections::HashMap<Uuid, Figure>>,
    }

    #[async_trait]
    impl FigureCache for MapCache {
        async fn get(&self, id: Uuid) -> Option<Figure> {
            self.entries.lock().unwrap().get(&id).cloned()
        }

        async fn put(&self, figure: Figure) {
            self.entries.lock().unwrap().insert(figure.id, figure);
        }

        async fn remove(&self, id: Uuid) {
            self.entries.lock().unwrap().remove(&id);
        }
    }

    #[derive(Default)]
    struct RecordingPublisher {
        events: Mutex<Vec<FigureEvent>>,
    }

    #[async_trait]
    impl FigureEventPublisher for RecordingPublisher {
        async fn publish(&self, event: &FigureEvent) -> anyhow::Result<()> {
            self.events.lock().unwrap().push(event.clone());
            Ok(())
        }
    }

    fn draft(name: &str, model: Model, price: f64, year: i32) -> FigureDraft {
        FigureDraft {
            name: name.to_string(),
            model,
            price,
            release_date: NaiveDate::from_ymd_opt(year, 6, 1).unwrap(),
        }
    }

    struct Harness {
        repo: InMemoryFigures,
        cache: MapCache,
        events: RecordingPublisher,
        serials: SerialGenerator,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                repo: InMemoryFigures::default(),
                cache: MapCache::default(),
                events: RecordingPublisher::default(),
                serials: SerialGenerator::new(0),
            }
        }

        async fn create(&self, draft: FigureDraft) -> anyhow::Result<Figure> {
            CreateFigure {
                repo: &self.repo,
                cache: &self.cache,
                events: &self.events,
                serials: &self.serials,
            }
            .execute(draft)
            .await
        }
    }

    #[tokio::test]
    async fn create_assigns_serials_and_publishes() {
        let h = Harness::new();
        let first = h.create(draft("Luffy", Model::Anime, 11.95, 2020)).await.unwrap();
        let second = h.create(draft("Tardis", Model::Other, 26.99, 2023)).await.unwrap();
        assert_eq!(first.serial, 1);
        assert_eq!(second.serial, 2);

        let events = h.events.events.lock().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind, FigureEventKind::Created);
        assert_eq!(events[0].figure.id, first.id);
        // the new row is cached for subsequent point lookups
        drop(events);
        assert!(h.cache.get(first.id).await.is_some());
    }

    #[tokio::test]
    async fn create_rejects_invalid_drafts_without_side_effects() {
        let h = Harness::new();
        let err = h
            .create(draft("", Model::Other, 1.0, 2023))
            .await
            .unwrap_err();
        assert!(err.downcast_ref::<FigureInvalid>().is_some());
        assert!(h.repo.list_all().await.unwrap().is_empty());
        assert!(h.events.events.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn get_reads_through_the_cache() {
        let h = Harness::new();
        let created = h.create(draft("Stitch 626", Model::Disney, 12.75, 2021)).await.unwrap();
        h.cache.remove(created.id).await;

        let uc = GetFigure {
            repo: &h.repo,
            cache: &h.cache,
        };
        // miss populates the cache
        let found = uc.execute(created.id).await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert!(h.cache.get(created.id).await.is_some());

        // a hit is served even if the row vanished underneath
        h.repo.delete(created.id).await.unwrap();
        assert!(uc.execute(created.id).await.unwrap().is_some());

        assert!(uc.execute(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_refreshes_cache_and_keeps_identity() {
        let h = Harness::new();
        let created = h.create(draft("MadiFigure", Model::Other, 42.0, 2023)).await.unwrap();

        let updated = UpdateFigure {
            repo: &h.repo,
            cache: &h.cache,
            events: &h.events,
        }
        .execute(created.id, draft("MadiFigureModified", Model::Disney, 42.42, 2023))
        .await
        .unwrap()
        .expect("row exists");

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.serial, created.serial);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
        assert_eq!(updated.name, "MadiFigureModified");
        assert_eq!(h.cache.get(created.id).await.unwrap().name, "MadiFigureModified");
        assert_eq!(
            h.events.events.lock().unwrap().last().unwrap().kind,
            FigureEventKind::Updated
        );
    }

    #[tokio::test]
    async fn update_of_unknown_id_is_none() {
        let h = Harness::new();
        let result = UpdateFigure {
            repo: &h.repo,
            cache: &h.cache,
            events: &h.events,
        }
        .execute(Uuid::new_v4(), draft("Ghost", Model::Other, 1.0, 2023))
        .await
        .unwrap();
        assert!(result.is_none());
        assert!(h.events.events.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_evicts_and_returns_the_row() {
        let h = Harness::new();
        let created = h.create(draft("Iron Man", Model::Marvel, 14.5, 2022)).await.unwrap();

        let deleted = DeleteFigure {
            repo: &h.repo,
            cache: &h.cache,
            events: &h.events,
        }
        .execute(created.id)
        .await
        .unwrap()
        .expect("row exists");

        assert_eq!(deleted.id, created.id);
        assert!(h.cache.get(created.id).await.is_none());
        assert!(h.repo.find_by_id(created.id).await.unwrap().is_none());
        assert_eq!(
            h.events.events.lock().unwrap().last().unwrap().kind,
            FigureEventKind::Deleted
        );
    }

    #[tokio::test]
    async fn list_combines_base_filter_with_name_prefix() {
        let h = Harness::new();
        h.create(draft("Stitch 626", Model::Disney, 12.75, 2021)).await.unwrap();
        h.create(draft("Stitch Surfing", Model::Disney, 13.25, 2023)).await.unwrap();
        h.create(draft("Luffy", Model::Anime, 11.95, 2020)).await.unwrap();

        let uc = ListFigures { repo: &h.repo };
        let all = uc.execute(ListFilter::default()).await.unwrap();
        assert_eq!(all.len(), 3);

        let disney = uc
            .execute(ListFilter {
                model: Some(Model::Disney),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(disney.len(), 2);

        let by_year = uc
            .execute(ListFilter {
                year: Some(2023),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_year.len(), 1);
        assert_eq!(by_year[0].name, "Stitch Surfing");

        let stitch_2021 = uc
            .execute(ListFilter {
                name: Some("Stitch".into()),
                year: Some(2021),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(stitch_2021.len(), 1);
        assert_eq!(stitch_2021[0].name, "Stitch 626");
    }

    #[tokio::test]
    async fn find_by_name_ignores_case_and_flags_no_match() {
        let h = Harness::new();
        h.create(draft("One Piece Luffy", Model::Anime, 11.95, 2020)).await.unwrap();

        let uc = FindFiguresByName { repo: &h.repo };
        let found = uc.execute("one piece luffy").await.unwrap().unwrap();
        assert_eq!(found.len(), 1);
        assert!(uc.execute("NoSuchFigure").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn stats_cover_the_whole_catalog() {
        let h = Harness::new();
        h.create(draft("Luffy", Model::Anime, 10.0, 2020)).await.unwrap();
        h.create(draft("Totoro", Model::Anime, 20.0, 2023)).await.unwrap();
        h.create(draft("Tardis", Model::Other, 30.0, 2023)).await.unwrap();

        let stats = CatalogStats { repo: &h.repo }.execute().await.unwrap();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.most_expensive.as_ref().unwrap().name, "Tardis");
        assert!((stats.average_price.unwrap() - 20.0).abs() < f64::EPSILON);
        assert_eq!(stats.count_by_model.get("ANIME"), Some(&2));
        assert_eq!(stats.count_by_model.get("OTHER"), Some(&1));
    }

    #[tokio::test]
    async fn stats_on_an_empty_catalog() {
        let h = Harness::new();
        let stats = CatalogStats { repo: &h.repo }.execute().await.unwrap();
        assert_eq!(stats.total, 0);
        assert!(stats.most_expensive.is_none());
        assert!(stats.average_price.is_none());
        assert!(stats.count_by_model.is_empty());
    }
}
