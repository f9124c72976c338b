// src/web/handlers/job_match_handlers.rs
use crate::database::DatabaseConfig;
use crate::error::ServiceError;
use crate::job_matches::{JobMatch, JobMatchService};
use crate::web::types::{ApiError, CreateMatchParams, MatchSearchParams};

use rocket::http::Status;
use rocket::response::status::NoContent;
use rocket::serde::json::Json;
use rocket::State;
use sqlx::SqlitePool;
use tracing::error;

fn pool_or_500(db_config: &State<DatabaseConfig>) -> Result<&SqlitePool, Status> {
    db_config.pool().map_err(|e| {
        error!("Database connection failed: {}", e);
        Status::InternalServerError
    })
}

pub async fn create_job_match_handler(
    params: CreateMatchParams,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<JobMatch>, Status> {
    let pool = pool_or_500(db_config)?;
    let service = JobMatchService::new(pool);

    let saved = service
        .create(&params.candidate_id, params.job_id, params.match_percentage)
        .await
        .map_err(|e| {
            error!("Error recording job match: {}", e);
            Status::InternalServerError
        })?;

    Ok(Json(saved))
}

pub async fn get_all_job_matches_handler(
    db_config: &State<DatabaseConfig>,
) -> Result<Json<Vec<JobMatch>>, Status> {
    let pool = pool_or_500(db_config)?;
    let service = JobMatchService::new(pool);

    let matches = service.get_all().await.map_err(|e| {
        error!("Error fetching job matches: {}", e);
        Status::InternalServerError
    })?;

    Ok(Json(matches))
}

pub async fn search_job_matches_handler(
    params: MatchSearchParams,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<Vec<JobMatch>>, Status> {
    let pool = pool_or_500(db_config)?;
    let service = JobMatchService::new(pool);

    let matches = service
        .search(params.candidate_id.as_deref())
        .await
        .map_err(|e| {
            error!("Error searching job matches: {}", e);
            Status::InternalServerError
        })?;

    Ok(Json(matches))
}

pub async fn get_job_match_by_id_handler(
    id: i64,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<JobMatch>, Status> {
    let pool = pool_or_500(db_config)?;
    let service = JobMatchService::new(pool);

    match service.get_by_id(id).await {
        Ok(Some(job_match)) => Ok(Json(job_match)),
        Ok(None) => Err(Status::NotFound),
        Err(e) => {
            error!("Error fetching job match {}: {}", id, e);
            Err(Status::InternalServerError)
        }
    }
}

pub async fn delete_job_match_handler(
    id: i64,
    db_config: &State<DatabaseConfig>,
) -> Result<NoContent, Status> {
    let pool = pool_or_500(db_config)?;
    let service = JobMatchService::new(pool);

    match service.delete(id).await {
        Ok(()) => Ok(NoContent),
        Err(ServiceError::NotFound { .. }) => Err(Status::NotFound),
        Err(e) => {
            error!("Error deleting job match {}: {}", id, e);
            Err(Status::InternalServerError)
        }
    }
}
