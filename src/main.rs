use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::MatchedPath;
use dotenvy::dotenv;
use http::HeaderValue;
use tokio::task::JoinHandle;
use tokio::time::{Duration, sleep};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use popshelf::application::ports::figure_repository::FigureRepository;
use popshelf::application::ports::user_repository::{Role, UserRepository};
use popshelf::application::services::serial_generator::SerialGenerator;
use popshelf::application::use_cases::auth::register::{Register, RegisterRequest};
use popshelf::application::use_cases::catalog::seed_catalog::SeedCatalog;
use popshelf::bootstrap::app_context::{AppContext, AppServices};
use popshelf::bootstrap::config::Config;
use popshelf::infrastructure::cache::moka_figure_cache::MokaFigureCache;
use popshelf::infrastructure::events::broadcast_publisher::BroadcastFigureEventPublisher;
use popshelf::infrastructure::io::backup_fs::FsBackupStore;
use popshelf::infrastructure::io::csv_catalog;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
        paths(
            popshelf::presentation::http::auth::register,
            popshelf::presentation::http::auth::login,
            popshelf::presentation::http::auth::logout,
            popshelf::presentation::http::auth::me,
            popshelf::presentation::http::figures::list_figures,
            popshelf::presentation::http::figures::create_figure,
            popshelf::presentation::http::figures::get_figure,
            popshelf::presentation::http::figures::find_figures_by_name,
            popshelf::presentation::http::figures::update_figure,
            popshelf::presentation::http::figures::delete_figure,
            popshelf::presentation::http::figures::figure_stats,
            popshelf::presentation::http::backup::export_backup,
            popshelf::presentation::http::backup::import_backup,
            popshelf::presentation::http::events::stream_events,
            popshelf::presentation::http::health::health,
        ),
        components(schemas(
            popshelf::presentation::http::auth::RegisterRequest,
            popshelf::presentation::http::auth::LoginRequest,
            popshelf::presentation::http::auth::LoginResponse,
            popshelf::presentation::http::auth::UserResponse,
            popshelf::presentation::http::figures::FigureResponse,
            popshelf::presentation::http::figures::FigureListResponse,
            popshelf::presentation::http::figures::FigureRequest,
            popshelf::presentation::http::figures::StatsResponse,
            popshelf::presentation::http::backup::BackupRequest,
            popshelf::presentation::http::backup::ExportBackupResponse,
            popshelf::presentation::http::backup::ImportBackupResponse,
            popshelf::presentation::http::health::HealthResp,
        )),
        tags(
            (name = "Auth", description = "Authentication"),
            (name = "Figures", description = "Figure catalog"),
            (name = "Backup", description = "Catalog snapshots"),
            (name = "Events", description = "Catalog change stream"),
            (name = "Health", description = "System health checks")
        )
    )]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "popshelf=debug,axum=info,tower_http=info".into()),
        )
        .init();

    let cfg = Config::from_env()?;
    info!(?cfg, "Starting popshelf backend");

    // Database
    let pool = popshelf::infrastructure::db::connect_pool(&cfg.database_url).await?;
    popshelf::infrastructure::db::migrate(&pool).await?;

    let figure_repo = Arc::new(
        popshelf::infrastructure::db::repositories::figure_repository_sqlx::SqlxFigureRepository::new(
            pool.clone(),
        ),
    );
    let user_repo = Arc::new(
        popshelf::infrastructure::db::repositories::user_repository_sqlx::SqlxUserRepository::new(
            pool.clone(),
        ),
    );
    let cache = MokaFigureCache::new(
        cfg.cache_capacity,
        Duration::from_secs(cfg.cache_ttl_secs),
    );
    let (figure_events, _) = tokio::sync::broadcast::channel(64);
    let event_publisher = Arc::new(BroadcastFigureEventPublisher::new(figure_events.clone()));
    let backup_store = Arc::new(FsBackupStore::new(&cfg.backup_dir));

    // Catalog serials continue where the database left off
    let serials = Arc::new(SerialGenerator::new(figure_repo.max_serial().await?));

    // First boot: make sure an admin account exists
    if user_repo.count().await? == 0 {
        let uc = Register {
            repo: user_repo.as_ref(),
        };
        let admin = uc
            .execute(&RegisterRequest {
                username: cfg.admin_username.clone(),
                password: cfg.admin_password.clone(),
                role: Role::Admin,
            })
            .await?;
        info!(username = %admin.username, "default_admin_created");
    }

    // Optional catalog seeding from CSV
    if let Some(path) = &cfg.seed_csv {
        match csv_catalog::load_catalog(std::path::Path::new(path)) {
            Ok(records) => {
                let uc = SeedCatalog {
                    repo: figure_repo.as_ref(),
                    events: event_publisher.as_ref(),
                    serials: serials.as_ref(),
                };
                match uc.execute(records).await {
                    Ok(outcome) => info!(
                        inserted = outcome.inserted,
                        skipped = outcome.skipped,
                        path = %path,
                        "catalog_seeded"
                    ),
                    Err(e) => warn!(error = ?e, path = %path, "catalog_seed_failed"),
                }
            }
            Err(e) => warn!(error = ?e, path = %path, "catalog_file_unreadable"),
        }
    }

    let services = AppServices::new(
        figure_repo,
        user_repo,
        Arc::new(cache.clone()),
        event_publisher,
        backup_store,
        serials,
        figure_events,
    );

    let ctx = AppContext::new(cfg.clone(), services);

    // Build CORS
    let cors = if let Some(origin) = cfg.frontend_url.clone() {
        match HeaderValue::from_str(&origin) {
            Ok(v) => cors_layer(AllowOrigin::exact(v)),
            Err(_) => cors_layer(AllowOrigin::mirror_request()),
        }
    } else if cfg.is_production {
        // In production FRONTEND_URL should be set; fall back to deny-all
        cors_layer(AllowOrigin::exact(HeaderValue::from_static(
            "http://invalid",
        )))
    } else {
        // Development convenience
        cors_layer(AllowOrigin::mirror_request())
    };

    // Build API router
    let app = Router::new()
        .nest(
            "/api",
            popshelf::presentation::http::health::routes(pool.clone()),
        )
        .nest(
            "/api/auth",
            popshelf::presentation::http::auth::routes(ctx.clone()),
        )
        .nest(
            "/api",
            popshelf::presentation::http::figures::routes(ctx.clone()),
        )
        .nest(
            "/api",
            popshelf::presentation::http::backup::routes(ctx.clone()),
        )
        .nest(
            "/api",
            popshelf::presentation::http::events::routes(ctx.clone()),
        )
        .merge(SwaggerUi::new("/api/docs").url("/api/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &http::Request<_>| {
                let method = req.method().clone();
                let uri = req.uri().clone();
                let matched = req
                    .extensions()
                    .get::<MatchedPath>()
                    .map(|p| p.as_str().to_string())
                    .unwrap_or_default();
                tracing::info_span!("http", %method, %uri, matched_path = %matched)
            }),
        );

    let api_addr = SocketAddr::from(([0, 0, 0, 0], cfg.api_port));
    info!(%api_addr, "HTTP API listening");
    let listener = tokio::net::TcpListener::bind(api_addr).await?;

    let api_handle: JoinHandle<anyhow::Result<()>> = tokio::spawn(async move {
        axum::serve(listener, app).await?;
        Ok(())
    });

    // Background cache maintenance: expired entries are dropped eagerly
    // instead of lingering until their key is touched again.
    let sweep_interval = Duration::from_secs(cfg.cache_sweep_secs);
    let sweeper: JoinHandle<()> = tokio::spawn(async move {
        loop {
            sleep(sweep_interval).await;
            cache.run_pending_tasks().await;
        }
    });

    match api_handle.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!(?e, "API server task failed"),
        Err(e) => error!(?e, "API server task panicked"),
    }
    sweeper.abort();
    Ok(())
}

fn cors_layer(origin: AllowOrigin) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            http::Method::GET,
            http::Method::POST,
            http::Method::PUT,
            http::Method::DELETE,
            http::Method::OPTIONS,
        ])
        .allow_headers([http::header::CONTENT_TYPE, http::header::AUTHORIZATION])
        .allow_credentials(true)
}
