use std::sync::Arc;

use futures_util::{StreamExt, stream::BoxStream};
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;

use crate::application::ports::backup_store::BackupStore;
use crate::application::ports::event_publisher::FigureEventPublisher;
use crate::application::ports::figure_cache::FigureCache;
use crate::application::ports::figure_repository::FigureRepository;
use crate::application::ports::user_repository::UserRepository;
use crate::application::services::serial_generator::SerialGenerator;
use crate::bootstrap::config::Config;
use crate::domain::figures::figure::FigureEvent;

#[derive(Clone)]
pub struct AppContext {
    pub cfg: Config,
    services: Arc<AppServices>,
}

pub struct AppServices {
    figure_repo: Arc<dyn FigureRepository>,
    user_repo: Arc<dyn UserRepository>,
    figure_cache: Arc<dyn FigureCache>,
    event_publisher: Arc<dyn FigureEventPublisher>,
    backup_store: Arc<dyn BackupStore>,
    serials: Arc<SerialGenerator>,
    figure_events: broadcast::Sender<FigureEvent>,
}

impl AppServices {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        figure_repo: Arc<dyn FigureRepository>,
        user_repo: Arc<dyn UserRepository>,
        figure_cache: Arc<dyn FigureCache>,
        event_publisher: Arc<dyn FigureEventPublisher>,
        backup_store: Arc<dyn BackupStore>,
        serials: Arc<SerialGenerator>,
        figure_events: broadcast::Sender<FigureEvent>,
    ) -> Self {
        Self {
            figure_repo,
            user_repo,
            figure_cache,
            event_publisher,
            backup_store,
            serials,
            figure_events,
        }
    }
}

impl AppContext {
    pub fn new(cfg: Config, services: AppServices) -> Self {
        Self {
            cfg,
            services: Arc::new(services),
        }
    }

    pub fn figure_repo(&self) -> Arc<dyn FigureRepository> {
        self.services.figure_repo.clone()
    }

    pub fn user_repo(&self) -> Arc<dyn UserRepository> {
        self.services.user_repo.clone()
    }

    pub fn figure_cache(&self) -> Arc<dyn FigureCache> {
        self.services.figure_cache.clone()
    }

    pub fn event_publisher(&self) -> Arc<dyn FigureEventPublisher> {
        self.services.event_publisher.clone()
    }

    pub fn backup_store(&self) -> Arc<dyn BackupStore> {
        self.services.backup_store.clone()
    }

    pub fn serials(&self) -> Arc<SerialGenerator> {
        self.services.serials.clone()
    }

    pub fn subscribe_figure_events(&self) -> BoxStream<'static, FigureEvent> {
        BroadcastStream::new(self.services.figure_events.subscribe())
            .filter_map(|evt| async move { evt.ok() })
            .boxed()
    }
}
