use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::use_cases::backup::export_backup::ExportBackup;
use crate::application::use_cases::backup::import_backup::ImportBackup;
use crate::bootstrap::app_context::AppContext;
use crate::presentation::http::auth::{self, Bearer};
use crate::presentation::http::figures::FigureResponse;

const DEFAULT_BACKUP_FILE: &str = "backup.json";

#[derive(Debug, Deserialize, ToSchema)]
pub struct BackupRequest {
    /// Plain file name inside the configured backup directory.
    pub file_name: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ExportBackupResponse {
    pub file_name: String,
    pub figures: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ImportBackupResponse {
    pub file_name: String,
    pub items: Vec<FigureResponse>,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/backup/export", post(export_backup))
        .route("/backup/import", post(import_backup))
        .with_state(ctx)
}

#[utoipa::path(post, path = "/api/backup/export", tag = "Backup", request_body = BackupRequest,
    responses((status = 200, body = ExportBackupResponse), (status = 403)))]
pub async fn export_backup(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Json(req): Json<BackupRequest>,
) -> Result<Json<ExportBackupResponse>, StatusCode> {
    let caller = auth::authenticate(&ctx.cfg, bearer)?;
    auth::require_admin(&caller)?;
    let file_name = req
        .file_name
        .unwrap_or_else(|| DEFAULT_BACKUP_FILE.to_string());

    let repo = ctx.figure_repo();
    let store = ctx.backup_store();
    let uc = ExportBackup {
        repo: repo.as_ref(),
        store: store.as_ref(),
    };
    let figures = uc.execute(&file_name).await.map_err(|e| {
        tracing::error!(error = ?e, file_name = %file_name, "backup_export_failed");
        StatusCode::CONFLICT
    })?;
    Ok(Json(ExportBackupResponse { file_name, figures }))
}

#[utoipa::path(post, path = "/api/backup/import", tag = "Backup", request_body = BackupRequest,
    responses((status = 200, body = ImportBackupResponse), (status = 403)))]
pub async fn import_backup(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Json(req): Json<BackupRequest>,
) -> Result<Json<ImportBackupResponse>, StatusCode> {
    let caller = auth::authenticate(&ctx.cfg, bearer)?;
    auth::require_admin(&caller)?;
    let file_name = req
        .file_name
        .unwrap_or_else(|| DEFAULT_BACKUP_FILE.to_string());

    let store = ctx.backup_store();
    let uc = ImportBackup {
        store: store.as_ref(),
    };
    let figures = uc.execute(&file_name).await.map_err(|e| {
        tracing::error!(error = ?e, file_name = %file_name, "backup_import_failed");
        StatusCode::CONFLICT
    })?;
    Ok(Json(ImportBackupResponse {
        file_name,
        items: figures.into_iter().map(FigureResponse::from).collect(),
    }))
}
