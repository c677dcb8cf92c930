use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use crate::controllers::detail_entry_controller::DetailEntryController;
use crate::dto::api_response::ApiResponse;
use crate::dto::detail_entry_dto::{
    ClearedResponse, CreateDetailEntryRequest, DeletedResponse, EntryQuery,
    UpdateDetailEntryRequest,
};
use crate::models::detail_entry::DetailEntry;
use crate::services::export_service;
use crate::services::summary_service::EntrySummary;
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};

pub fn create_detail_entry_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_entry).get(list_entries).delete(clear_entries))
        .route("/summary", get(summarize_entries))
        .route("/export", get(export_entries))
        .route("/:id", get(get_entry).put(update_entry).delete(delete_entry))
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

fn query_params(query: Result<Query<EntryQuery>, QueryRejection>) -> AppResult<EntryQuery> {
    query
        .map(|Query(params)| params)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

fn entry_id(path: Result<Path<i64>, PathRejection>) -> AppResult<i64> {
    path
        .map(|Path(id)| id)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

async fn create_entry(
    State(state): State<AppState>,
    payload: Result<Json<CreateDetailEntryRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<DetailEntry>>), AppError> {
    let request = json_body(payload)?;
    let controller = DetailEntryController::new(state.entries.clone());
    let response = controller.create(request, state.today()).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_entries(
    State(state): State<AppState>,
    query: Result<Query<EntryQuery>, QueryRejection>,
) -> Result<Json<Vec<DetailEntry>>, AppError> {
    let query = query_params(query)?;
    let controller = DetailEntryController::new(state.entries.clone());
    let entries = controller.list(query, state.today()).await?;
    Ok(Json(entries))
}

async fn get_entry(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<DetailEntry>, AppError> {
    let id = entry_id(path)?;
    let controller = DetailEntryController::new(state.entries.clone());
    let entry = controller.get_by_id(id).await?;
    Ok(Json(entry))
}

async fn update_entry(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateDetailEntryRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<DetailEntry>>, AppError> {
    let id = entry_id(path)?;
    let request = json_body(payload)?;
    let controller = DetailEntryController::new(state.entries.clone());
    let response = controller.update(id, request).await?;
    Ok(Json(response))
}

async fn delete_entry(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<ApiResponse<DeletedResponse>>, AppError> {
    let id = entry_id(path)?;
    let controller = DetailEntryController::new(state.entries.clone());
    let response = controller.delete(id).await?;
    Ok(Json(response))
}

async fn clear_entries(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ClearedResponse>>, AppError> {
    let controller = DetailEntryController::new(state.entries.clone());
    let response = controller.delete_all().await?;
    Ok(Json(response))
}

async fn summarize_entries(
    State(state): State<AppState>,
    query: Result<Query<EntryQuery>, QueryRejection>,
) -> Result<Json<EntrySummary>, AppError> {
    let query = query_params(query)?;
    let controller = DetailEntryController::new(state.entries.clone());
    let summary = controller.summary(query, state.today()).await?;
    Ok(Json(summary))
}

async fn export_entries(
    State(state): State<AppState>,
    query: Result<Query<EntryQuery>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let query = query_params(query)?;
    let today = state.today();
    let controller = DetailEntryController::new(state.entries.clone());
    let csv = controller.export(query, today).await?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        export_service::export_filename(today)
    );
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    ))
}
