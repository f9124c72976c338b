// src/web/handlers/job_handlers.rs
use crate::database::DatabaseConfig;
use crate::error::ServiceError;
use crate::jobs::{JobPayload, JobService};
use crate::web::types::{ApiError, JobDeleteResponse, JobListResponse, JobResponse, JobView};

use rocket::http::Status;
use rocket::response::status::Created;
use rocket::serde::json::Json;
use rocket::State;
use sqlx::SqlitePool;
use tracing::{error, info, warn};

fn pool_or_500(db_config: &State<DatabaseConfig>) -> Result<&SqlitePool, ApiError> {
    db_config.pool().map_err(|e| {
        error!("Database connection failed: {}", e);
        ApiError::job(
            Status::InternalServerError,
            "SERVER_ERROR",
            "Database connection failed".to_string(),
            Some(e.to_string()),
        )
    })
}

/// Map a service failure onto the job error envelope. Validation failures
/// keep their own code; anything unexpected gets the caller's 500 code.
fn map_job_error(e: ServiceError, server_code: &'static str, server_message: &str) -> ApiError {
    match e {
        ServiceError::Validation { code, message } => {
            ApiError::job(Status::BadRequest, code, message, None)
        }
        ServiceError::NotFound { .. } => {
            warn!("{}", e);
            ApiError::job(Status::NotFound, "JOB_NOT_FOUND", e.to_string(), None)
        }
        other => {
            error!("{}: {}", server_message, other);
            ApiError::job(
                Status::InternalServerError,
                server_code,
                server_message.to_string(),
                Some(other.to_string()),
            )
        }
    }
}

pub async fn get_all_jobs_handler(
    db_config: &State<DatabaseConfig>,
) -> Result<Json<JobListResponse>, ApiError> {
    info!("Fetching all jobs");
    let pool = pool_or_500(db_config)?;
    let service = JobService::new(pool);

    let jobs = service
        .get_all()
        .await
        .map_err(|e| map_job_error(e, "SERVER_ERROR", "Failed to retrieve jobs"))?;

    Ok(Json(JobListResponse::success(jobs)))
}

pub async fn get_job_by_id_handler(
    id: i64,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<JobResponse>, ApiError> {
    info!("Fetching job with id: {}", id);
    let pool = pool_or_500(db_config)?;
    let service = JobService::new(pool);

    let job = service
        .get_by_id(id)
        .await
        .map_err(|e| map_job_error(e, "SERVER_ERROR", "Failed to retrieve job"))?
        .ok_or_else(|| {
            warn!("Job not found with id: {}", id);
            ApiError::job(
                Status::NotFound,
                "JOB_NOT_FOUND",
                format!("Job not found with id: {}", id),
                None,
            )
        })?;

    Ok(Json(JobResponse::success(job)))
}

pub async fn create_job_handler(
    payload: Json<JobPayload>,
    db_config: &State<DatabaseConfig>,
) -> Result<Created<Json<JobView>>, ApiError> {
    let pool = pool_or_500(db_config)?;
    let service = JobService::new(pool);

    let job = service
        .create(payload.into_inner())
        .await
        .map_err(|e| map_job_error(e, "SERVER_ERROR", "Failed to create job"))?;

    let location = format!("/api/jobs/{}", job.id);
    Ok(Created::new(location).body(Json(JobView::from(job))))
}

pub async fn update_job_handler(
    id: i64,
    payload: Json<JobPayload>,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<JobResponse>, ApiError> {
    info!("Updating job with id: {}", id);
    let pool = pool_or_500(db_config)?;
    let service = JobService::new(pool);

    let job = service
        .update(id, payload.into_inner())
        .await
        .map_err(|e| map_job_error(e, "UPDATE_FAILED", "Failed to update job"))?;

    Ok(Json(JobResponse::success(job)))
}

pub async fn delete_job_handler(
    id: i64,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<JobDeleteResponse>, ApiError> {
    info!("Deleting job with id: {}", id);
    let pool = pool_or_500(db_config)?;
    let service = JobService::new(pool);

    service
        .delete(id)
        .await
        .map_err(|e| map_job_error(e, "DELETION_FAILED", "Failed to delete job"))?;

    Ok(Json(JobDeleteResponse {
        status: "success".to_string(),
        message: "Job deleted successfully".to_string(),
    }))
}
