use std::collections::BTreeMap;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::use_cases::figures::catalog_stats::CatalogStats;
use crate::application::use_cases::figures::create_figure::CreateFigure;
use crate::application::use_cases::figures::delete_figure::DeleteFigure;
use crate::application::use_cases::figures::find_by_name::FindFiguresByName;
use crate::application::use_cases::figures::get_figure::GetFigure;
use crate::application::use_cases::figures::list_figures::{ListFigures, ListFilter};
use crate::application::use_cases::figures::update_figure::UpdateFigure;
use crate::bootstrap::app_context::AppContext;
use crate::domain::figures::figure::{self as domain, FigureInvalid};
use crate::presentation::http::auth::{self, Bearer};

#[derive(Debug, Serialize, ToSchema)]
pub struct FigureResponse {
    pub id: Uuid,
    pub serial: i64,
    pub name: String,
    pub model: String,
    pub price: f64,
    pub release_date: chrono::NaiveDate,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<domain::Figure> for FigureResponse {
    fn from(f: domain::Figure) -> Self {
        Self {
            id: f.id,
            serial: f.serial,
            name: f.name,
            model: f.model.as_str().to_string(),
            price: f.price,
            release_date: f.release_date,
            created_at: f.created_at,
            updated_at: f.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FigureListResponse {
    pub items: Vec<FigureResponse>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct FigureRequest {
    pub name: String,
    /// Product line: MARVEL, DISNEY, ANIME or OTHER (case-insensitive).
    pub model: String,
    pub price: f64,
    pub release_date: chrono::NaiveDate,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StatsResponse {
    pub total: usize,
    pub most_expensive: Option<FigureResponse>,
    pub average_price: Option<f64>,
    pub count_by_model: BTreeMap<String, i64>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub name: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/figures", get(list_figures).post(create_figure))
        .route("/figures/stats", get(figure_stats))
        .route("/figures/by-name/:name", get(find_figures_by_name))
        .route(
            "/figures/:id",
            get(get_figure).put(update_figure).delete(delete_figure),
        )
        .with_state(ctx)
}

fn draft_from_request(req: FigureRequest) -> Result<domain::FigureDraft, StatusCode> {
    let model = req
        .model
        .parse::<domain::Model>()
        .map_err(|_| StatusCode::UNPROCESSABLE_ENTITY)?;
    Ok(domain::FigureDraft {
        name: req.name,
        model,
        price: req.price,
        release_date: req.release_date,
    })
}

fn map_use_case_error(err: anyhow::Error) -> StatusCode {
    if err.downcast_ref::<FigureInvalid>().is_some() {
        StatusCode::UNPROCESSABLE_ENTITY
    } else {
        tracing::error!(error = ?err, "figure_use_case_failed");
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

#[utoipa::path(get, path = "/api/figures", tag = "Figures",
    params(
        ("name" = Option<String>, Query, description = "Name prefix filter"),
        ("model" = Option<String>, Query, description = "Product line filter"),
        ("year" = Option<i32>, Query, description = "Release year filter")
    ),
    responses((status = 200, body = FigureListResponse)))]
pub async fn list_figures(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    q: Option<Query<ListQuery>>,
) -> Result<Json<FigureListResponse>, StatusCode> {
    auth::authenticate(&ctx.cfg, bearer)?;
    let query = q.map(|Query(v)| v).unwrap_or(ListQuery {
        name: None,
        model: None,
        year: None,
    });
    let model = match query.model {
        Some(raw) => Some(
            raw.parse::<domain::Model>()
                .map_err(|_| StatusCode::UNPROCESSABLE_ENTITY)?,
        ),
        None => None,
    };

    let repo = ctx.figure_repo();
    let uc = ListFigures {
        repo: repo.as_ref(),
    };
    let figures = uc
        .execute(ListFilter {
            name: query.name,
            model,
            year: query.year,
        })
        .await
        .map_err(map_use_case_error)?;

    Ok(Json(FigureListResponse {
        items: figures.into_iter().map(FigureResponse::from).collect(),
    }))
}

#[utoipa::path(post, path = "/api/figures", tag = "Figures", request_body = FigureRequest,
    responses((status = 201, body = FigureResponse)))]
pub async fn create_figure(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Json(req): Json<FigureRequest>,
) -> Result<(StatusCode, Json<FigureResponse>), StatusCode> {
    auth::authenticate(&ctx.cfg, bearer)?;
    let draft = draft_from_request(req)?;

    let repo = ctx.figure_repo();
    let cache = ctx.figure_cache();
    let events = ctx.event_publisher();
    let serials = ctx.serials();
    let uc = CreateFigure {
        repo: repo.as_ref(),
        cache: cache.as_ref(),
        events: events.as_ref(),
        serials: serials.as_ref(),
    };
    let figure = uc.execute(draft).await.map_err(map_use_case_error)?;
    Ok((StatusCode::CREATED, Json(figure.into())))
}

#[utoipa::path(get, path = "/api/figures/{id}", tag = "Figures",
    params(("id" = Uuid, Path, description = "Figure ID")),
    responses((status = 200, body = FigureResponse), (status = 404)))]
pub async fn get_figure(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Path(id): Path<Uuid>,
) -> Result<Json<FigureResponse>, StatusCode> {
    auth::authenticate(&ctx.cfg, bearer)?;
    let repo = ctx.figure_repo();
    let cache = ctx.figure_cache();
    let uc = GetFigure {
        repo: repo.as_ref(),
        cache: cache.as_ref(),
    };
    let figure = uc
        .execute(id)
        .await
        .map_err(map_use_case_error)?
        .ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(figure.into()))
}

#[utoipa::path(put, path = "/api/figures/{id}", tag = "Figures", request_body = FigureRequest,
    params(("id" = Uuid, Path, description = "Figure ID")),
    responses((status = 200, body = FigureResponse), (status = 404)))]
pub async fn update_figure(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Path(id): Path<Uuid>,
    Json(req): Json<FigureRequest>,
) -> Result<Json<FigureResponse>, StatusCode> {
    auth::authenticate(&ctx.cfg, bearer)?;
    let draft = draft_from_request(req)?;

    let repo = ctx.figure_repo();
    let cache = ctx.figure_cache();
    let events = ctx.event_publisher();
    let uc = UpdateFigure {
        repo: repo.as_ref(),
        cache: cache.as_ref(),
        events: events.as_ref(),
    };
    let figure = uc
        .execute(id, draft)
        .await
        .map_err(map_use_case_error)?
        .ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(figure.into()))
}

#[utoipa::path(delete, path = "/api/figures/{id}", tag = "Figures",
    params(("id" = Uuid, Path, description = "Figure ID")),
    responses((status = 200, body = FigureResponse), (status = 403), (status = 404)))]
pub async fn delete_figure(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Path(id): Path<Uuid>,
) -> Result<Json<FigureResponse>, StatusCode> {
    let caller = auth::authenticate(&ctx.cfg, bearer)?;
    auth::require_admin(&caller)?;

    let repo = ctx.figure_repo();
    let cache = ctx.figure_cache();
    let events = ctx.event_publisher();
    let uc = DeleteFigure {
        repo: repo.as_ref(),
        cache: cache.as_ref(),
        events: events.as_ref(),
    };
    let figure = uc
        .execute(id)
        .await
        .map_err(map_use_case_error)?
        .ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(figure.into()))
}

#[utoipa::path(get, path = "/api/figures/by-name/{name}", tag = "Figures",
    params(("name" = String, Path, description = "Exact figure name, case-insensitive")),
    responses((status = 200, body = FigureListResponse), (status = 404)))]
pub async fn find_figures_by_name(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Path(name): Path<String>,
) -> Result<Json<FigureListResponse>, StatusCode> {
    auth::authenticate(&ctx.cfg, bearer)?;
    let repo = ctx.figure_repo();
    let uc = FindFiguresByName {
        repo: repo.as_ref(),
    };
    let figures = uc
        .execute(&name)
        .await
        .map_err(map_use_case_error)?
        .ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(FigureListResponse {
        items: figures.into_iter().map(FigureResponse::from).collect(),
    }))
}

#[utoipa::path(get, path = "/api/figures/stats", tag = "Figures",
    responses((status = 200, body = StatsResponse)))]
pub async fn figure_stats(
    State(ctx): State<AppContext>,
    bearer: Bearer,
) -> Result<Json<StatsResponse>, StatusCode> {
    auth::authenticate(&ctx.cfg, bearer)?;
    let repo = ctx.figure_repo();
    let uc = CatalogStats {
        repo: repo.as_ref(),
    };
    let stats = uc.execute().await.map_err(map_use_case_error)?;
    Ok(Json(StatsResponse {
        total: stats.total,
        most_expensive: stats.most_expensive.map(FigureResponse::from),
        average_price: stats.average_price,
        count_by_model: stats.count_by_model,
    }))
}
