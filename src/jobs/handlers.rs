use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::jwt::AuthAccount,
    error::ApiError,
    jobs::dto::{CreateJobRequest, DeleteJobResponse, UpdateJobRequest},
    jobs::repo::Job,
    state::AppState,
};

pub fn job_routes() -> Router<AppState> {
    Router::new()
        .route("/jobs", get(list_jobs))
        .route("/jobs", post(create_job))
        .route("/jobs/:id", put(update_job))
        .route("/jobs/:id", delete(delete_job))
}

#[instrument(skip(state))]
pub async fn list_jobs(
    State(state): State<AppState>,
    AuthAccount(account_id): AuthAccount,
) -> Result<Json<Vec<Job>>, ApiError> {
    let jobs = Job::list_by_owner(&state.db, account_id).await?;
    Ok(Json(jobs))
}

#[instrument(skip(state, payload))]
pub async fn create_job(
    State(state): State<AppState>,
    AuthAccount(account_id): AuthAccount,
    Json(payload): Json<CreateJobRequest>,
) -> Result<(StatusCode, Json<Job>), ApiError> {
    payload.validate()?;

    let job = Job::create(
        &state.db,
        account_id,
        &payload.company,
        &payload.position,
        payload.status,
        payload.notes.as_deref(),
    )
    .await?;

    info!(job_id = %job.id, "job created");
    Ok((StatusCode::CREATED, Json(job)))
}

#[instrument(skip(state, payload))]
pub async fn update_job(
    State(state): State<AppState>,
    AuthAccount(account_id): AuthAccount,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateJobRequest>,
) -> Result<Json<Job>, ApiError> {
    payload.validate()?;

    // Zero rows means the id is missing or belongs to someone else; the two
    // cases stay indistinguishable so non-owners learn nothing.
    let job = Job::update_owned(
        &state.db,
        account_id,
        id,
        &payload.company,
        &payload.position,
        payload.status,
        payload.notes.as_deref(),
    )
    .await?
    .ok_or_else(|| {
        warn!(%id, "update refused");
        ApiError::Forbidden
    })?;

    info!(job_id = %job.id, "job updated");
    Ok(Json(job))
}

#[instrument(skip(state))]
pub async fn delete_job(
    State(state): State<AppState>,
    AuthAccount(account_id): AuthAccount,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteJobResponse>, ApiError> {
    let job = Job::delete_owned(&state.db, account_id, id)
        .await?
        .ok_or_else(|| {
            warn!(%id, "delete refused");
            ApiError::Forbidden
        })?;

    info!(job_id = %job.id, "job deleted");
    Ok(Json(DeleteJobResponse {
        message: "Job deleted successfully",
        deleted_job: job,
    }))
}
