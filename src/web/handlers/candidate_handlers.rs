// src/web/handlers/candidate_handlers.rs
use crate::candidates::{Candidate, CandidateService, NewCandidate};
use crate::database::DatabaseConfig;
use crate::gateway::{CandidateMeta, ChatbotClient, CvParserClient};
use crate::storage::FileStore;
use crate::web::types::{
    ApiError, CandidateDeleteResponse, CandidateUploadForm, CandidateUploadResponse, ChatResponse,
};

use rocket::form::Form;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use sqlx::SqlitePool;
use tracing::{error, info};

fn pool_or_500(db_config: &State<DatabaseConfig>) -> Result<&SqlitePool, ApiError> {
    db_config.pool().map_err(|e| {
        error!("Database connection failed: {}", e);
        ApiError::candidate(
            Status::InternalServerError,
            "DATABASE_ERROR",
            e.to_string(),
        )
    })
}

pub async fn get_all_candidates_handler(
    db_config: &State<DatabaseConfig>,
) -> Result<Json<Vec<Candidate>>, ApiError> {
    let pool = pool_or_500(db_config)?;
    let service = CandidateService::new(pool);

    let candidates = service.get_all().await.map_err(|e| {
        error!("Error fetching candidates: {}", e);
        ApiError::candidate(Status::InternalServerError, "SERVER_ERROR", e.to_string())
    })?;

    Ok(Json(candidates))
}

pub async fn get_candidate_by_id_handler(
    id: i64,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<Candidate>, Status> {
    let pool = match db_config.pool() {
        Ok(pool) => pool,
        Err(e) => {
            error!("Database connection failed: {}", e);
            return Err(Status::InternalServerError);
        }
    };

    let service = CandidateService::new(pool);
    match service.get_by_id(id).await {
        Ok(Some(candidate)) => Ok(Json(candidate)),
        Ok(None) => Err(Status::NotFound),
        Err(e) => {
            error!("Error fetching candidate {}: {}", id, e);
            Err(Status::InternalServerError)
        }
    }
}

/// Two-phase upload: the candidate row is persisted first, then the stored
/// file is sent to the parsing service. A parse failure leaves the row in
/// place marked parse-failed and reports PROCESSING_FAILED to the client.
pub async fn upload_cv_handler(
    mut upload: Form<CandidateUploadForm<'_>>,
    db_config: &State<DatabaseConfig>,
    file_store: &State<FileStore>,
    parser: &State<CvParserClient>,
) -> Result<Json<CandidateUploadResponse>, ApiError> {
    let pool = db_config
        .pool()
        .map_err(|e| ApiError::processing_failed(e.to_string()))?;

    let original_name = upload
        .cv
        .raw_name()
        .and_then(|n| n.as_str())
        .unwrap_or("uploaded_cv")
        .to_string();

    info!(
        "CV upload for {} {} ({})",
        upload.first_name, upload.last_name, original_name
    );

    // Phase one: move the upload into the file store and persist the row.
    let temp_path = std::env::temp_dir().join(format!("cv_upload_{}", uuid::Uuid::new_v4()));
    if let Err(e) = upload.cv.persist_to(&temp_path).await {
        error!("Failed to save uploaded file: {}", e);
        return Err(ApiError::processing_failed(e.to_string()));
    }

    let stored_name = match file_store.store(&temp_path, &original_name).await {
        Ok(name) => name,
        Err(e) => {
            let _ = tokio::fs::remove_file(&temp_path).await;
            error!("Failed to store uploaded CV: {}", e);
            return Err(ApiError::processing_failed(e.to_string()));
        }
    };
    let _ = tokio::fs::remove_file(&temp_path).await;

    let service = CandidateService::new(pool);
    let candidate = service
        .create(NewCandidate {
            first_name: upload.first_name.clone(),
            last_name: upload.last_name.clone(),
            email: upload.email.clone(),
            phone: upload.phone.clone(),
            skills: upload.skills.clone(),
            cv_path: stored_name.clone(),
        })
        .await
        .map_err(|e| {
            error!("Failed to persist candidate: {}", e);
            ApiError::processing_failed(e.to_string())
        })?;

    // Phase two: hand the stored file to the parsing service.
    let meta = CandidateMeta {
        first_name: upload.first_name.clone(),
        last_name: upload.last_name.clone(),
        email: upload.email.clone(),
        phone: upload.phone.clone(),
        skills: upload.skills.clone(),
    };

    match parser.parse_cv(&file_store.resolve(&stored_name), &meta).await {
        Ok(parsed) => {
            if let Err(e) = service.mark_parsed(candidate.id).await {
                error!("Failed to mark candidate {} parsed: {}", candidate.id, e);
            }

            Ok(Json(CandidateUploadResponse {
                success: true,
                candidate_id: candidate.id,
                skills: parsed.skills,
                experience: parsed.experience_years,
            }))
        }
        Err(e) => {
            error!("CV parsing failed for candidate {}: {}", candidate.id, e);
            if let Err(mark_err) = service.mark_parse_failed(candidate.id).await {
                error!(
                    "Failed to mark candidate {} parse-failed: {}",
                    candidate.id, mark_err
                );
            }
            Err(ApiError::processing_failed(e.to_string()))
        }
    }
}

pub async fn delete_candidate_handler(
    id: i64,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<CandidateDeleteResponse>, ApiError> {
    let pool = pool_or_500(db_config)?;
    let service = CandidateService::new(pool);

    match service.delete(id).await {
        Ok(()) => Ok(Json(CandidateDeleteResponse {
            success: true,
            message: "Candidate deleted successfully".to_string(),
        })),
        Err(e) => {
            error!("Error deleting candidate {}: {}", id, e);
            Err(ApiError::candidate(
                Status::InternalServerError,
                "DELETE_FAILED",
                e.to_string(),
            ))
        }
    }
}

/// Chat is always responsive: the gateway swallows failures into fallback
/// text, so this handler has no error branch.
pub async fn chat_handler(message: String, chatbot: &State<ChatbotClient>) -> Json<ChatResponse> {
    let response = chatbot.send_message(&message).await;
    Json(ChatResponse {
        success: true,
        response,
    })
}
