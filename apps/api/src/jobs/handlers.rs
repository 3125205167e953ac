use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use mongodb::bson::oid::ObjectId;
use serde::Serialize;
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::jobs::payload::{
    build_create, build_status_set, build_update, CreateJobRequest, StatusUpdateRequest,
    UpdateJobRequest,
};
use crate::jobs::query::ListJobsQuery;
use crate::jobs::repository;
use crate::models::job::{JobResponse, JobStatus};
use crate::state::AppState;

/// Envelope for paginated listings. The portal's client accepts either a bare
/// array or this shape and prefers `data`.
#[derive(Serialize)]
pub struct JobListResponse {
    pub data: Vec<JobResponse>,
    pub page: i64,
    pub limit: i64,
    pub total: u64,
}

/// Parses a route id, producing the 400 the portal's object-id middleware
/// produced.
fn parse_object_id(id: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(id).map_err(|_| AppError::Validation(format!("Invalid id: \"{id}\"")))
}

/// POST /api/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    Json(req): Json<CreateJobRequest>,
) -> Result<(StatusCode, Json<JobResponse>), AppError> {
    let job = build_create(req)?;
    let job = repository::insert(&state.db, job).await?;
    Ok((StatusCode::CREATED, Json(job.into())))
}

/// GET /api/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Query(params): Query<ListJobsQuery>,
) -> Result<Json<JobListResponse>, AppError> {
    let (filter, page) = params.into_parts()?;
    let result = repository::list(&state.db, &filter, page).await?;
    Ok(Json(JobListResponse {
        data: result.jobs.into_iter().map(Into::into).collect(),
        page: page.page,
        limit: page.limit,
        total: result.total,
    }))
}

/// GET /api/jobs/public — the careers page variant; only Open jobs.
pub async fn handle_list_public_jobs(
    State(state): State<AppState>,
    Query(params): Query<ListJobsQuery>,
) -> Result<Json<JobListResponse>, AppError> {
    let (mut filter, page) = params.into_parts()?;
    filter.status = Some(JobStatus::Open);
    let result = repository::list(&state.db, &filter, page).await?;
    Ok(Json(JobListResponse {
        data: result.jobs.into_iter().map(Into::into).collect(),
        page: page.page,
        limit: page.limit,
        total: result.total,
    }))
}

/// GET /api/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<JobResponse>, AppError> {
    let id = parse_object_id(&id)?;
    let job = repository::get(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".to_string()))?;
    Ok(Json(job.into()))
}

/// PUT|PATCH /api/jobs/:id — partial update either way.
pub async fn handle_update_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateJobRequest>,
) -> Result<Json<JobResponse>, AppError> {
    let id = parse_object_id(&id)?;
    let set = build_update(req)?;
    let job = repository::update(&state.db, id, set)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".to_string()))?;
    Ok(Json(job.into()))
}

/// PATCH /api/jobs/:id/status
pub async fn handle_set_job_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<StatusUpdateRequest>,
) -> Result<Json<JobResponse>, AppError> {
    let id = parse_object_id(&id)?;
    let set = build_status_set(req)?;
    let job = repository::update(&state.db, id, set)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".to_string()))?;
    Ok(Json(job.into()))
}

/// DELETE /api/jobs/:id
pub async fn handle_delete_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = parse_object_id(&id)?;
    repository::delete(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".to_string()))?;
    Ok(Json(json!({ "message": "Job deleted successfully" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_object_id_accepts_hex() {
        let id = ObjectId::new();
        assert_eq!(parse_object_id(&id.to_hex()).unwrap(), id);
    }

    #[test]
    fn test_parse_object_id_rejects_garbage() {
        let err = parse_object_id("not-an-id").unwrap_err();
        match err {
            AppError::Validation(msg) => assert!(msg.contains("not-an-id")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
