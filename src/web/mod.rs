// src/web/mod.rs
pub mod handlers;
pub mod types;

pub use types::*;

use crate::database::DatabaseConfig;
use crate::environment::EnvironmentConfig;
use crate::gateway::{ChatbotClient, CvParserClient};
use crate::jobs::JobPayload;
use crate::storage::FileStore;

use anyhow::Result;
use rocket::fairing::{Fairing, Info, Kind};
use rocket::form::Form;
use rocket::http::{Header, Status};
use rocket::response::status::{Created, NoContent};
use rocket::serde::json::Json;
use rocket::{catchers, delete, get, options, post, put, routes, Request, Response, State};
use serde_json::{json, Value};
use tracing::{error, info};

// CORS Fairing
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "POST, GET, PUT, DELETE, OPTIONS",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
    }
}

// Candidate routes

#[get("/candidates")]
pub async fn get_all_candidates(
    db_config: &State<DatabaseConfig>,
) -> Result<Json<Vec<crate::candidates::Candidate>>, ApiError> {
    handlers::get_all_candidates_handler(db_config).await
}

#[get("/candidates/<id>")]
pub async fn get_candidate_by_id(
    id: i64,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<crate::candidates::Candidate>, Status> {
    handlers::get_candidate_by_id_handler(id, db_config).await
}

#[post("/candidates/upload", data = "<upload>")]
pub async fn upload_cv(
    upload: Form<CandidateUploadForm<'_>>,
    db_config: &State<DatabaseConfig>,
    file_store: &State<FileStore>,
    parser: &State<CvParserClient>,
) -> Result<Json<CandidateUploadResponse>, ApiError> {
    handlers::upload_cv_handler(upload, db_config, file_store, parser).await
}

#[delete("/candidates/<id>")]
pub async fn delete_candidate(
    id: i64,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<CandidateDeleteResponse>, ApiError> {
    handlers::delete_candidate_handler(id, db_config).await
}

#[get("/candidates/chatbot?<message>")]
pub async fn chat_with_bot(
    message: String,
    chatbot: &State<ChatbotClient>,
) -> Json<ChatResponse> {
    handlers::chat_handler(message, chatbot).await
}

// Job routes

#[get("/jobs")]
pub async fn get_all_jobs(
    db_config: &State<DatabaseConfig>,
) -> Result<Json<JobListResponse>, ApiError> {
    handlers::get_all_jobs_handler(db_config).await
}

#[get("/jobs/<id>")]
pub async fn get_job_by_id(
    id: i64,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<JobResponse>, ApiError> {
    handlers::get_job_by_id_handler(id, db_config).await
}

#[post("/jobs", data = "<payload>")]
pub async fn create_job(
    payload: Json<JobPayload>,
    db_config: &State<DatabaseConfig>,
) -> Result<Created<Json<JobView>>, ApiError> {
    handlers::create_job_handler(payload, db_config).await
}

#[put("/jobs/<id>", data = "<payload>")]
pub async fn update_job(
    id: i64,
    payload: Json<JobPayload>,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<JobResponse>, ApiError> {
    handlers::update_job_handler(id, payload, db_config).await
}

#[delete("/jobs/<id>")]
pub async fn delete_job(
    id: i64,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<JobDeleteResponse>, ApiError> {
    handlers::delete_job_handler(id, db_config).await
}

// Job match routes

#[post("/job-matches?<params..>")]
pub async fn create_job_match(
    params: CreateMatchParams,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<crate::job_matches::JobMatch>, Status> {
    handlers::create_job_match_handler(params, db_config).await
}

#[get("/job-matches")]
pub async fn get_all_job_matches(
    db_config: &State<DatabaseConfig>,
) -> Result<Json<Vec<crate::job_matches::JobMatch>>, Status> {
    handlers::get_all_job_matches_handler(db_config).await
}

#[get("/job-matches/search?<params..>")]
pub async fn search_job_matches(
    params: MatchSearchParams,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<Vec<crate::job_matches::JobMatch>>, Status> {
    handlers::search_job_matches_handler(params, db_config).await
}

#[get("/job-matches/<id>")]
pub async fn get_job_match_by_id(
    id: i64,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<crate::job_matches::JobMatch>, Status> {
    handlers::get_job_match_by_id_handler(id, db_config).await
}

#[delete("/job-matches/<id>")]
pub async fn delete_job_match(
    id: i64,
    db_config: &State<DatabaseConfig>,
) -> Result<NoContent, Status> {
    handlers::delete_job_match_handler(id, db_config).await
}

#[options("/<_..>")]
pub async fn options_route() -> Status {
    Status::Ok
}

// Error catchers

#[rocket::catch(400)]
pub fn bad_request() -> Json<Value> {
    Json(json!({
        "success": false,
        "error": "BAD_REQUEST",
        "message": "Invalid request format",
    }))
}

// Not-found responses carry an empty body
#[rocket::catch(404)]
pub fn not_found() -> Status {
    Status::NotFound
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<Value> {
    Json(json!({
        "success": false,
        "error": "INTERNAL_ERROR",
        "message": "Internal server error",
    }))
}

// Main server start function
pub async fn start_web_server(config: EnvironmentConfig, port: u16) -> Result<()> {
    let mut db_config = DatabaseConfig::new(config.database_path.clone());

    if let Err(e) = db_config.init_pool().await {
        error!("Failed to initialize database: {}", e);
        return Err(e);
    }

    if let Err(e) = db_config.migrate().await {
        error!("Failed to run database migrations: {}", e);
        return Err(e);
    }

    let file_store = FileStore::new(config.upload_path.clone());
    file_store.ensure_root().await?;

    let parser = CvParserClient::new(
        config.parser_service_url.clone(),
        config.request_timeout_secs,
    )?;
    let chatbot = ChatbotClient::new(config.chatbot_url.clone(), config.request_timeout_secs)?;

    info!("Starting CVTech recruiting API server");
    info!("Database: {}", db_config.database_path.display());
    info!("Uploads: {}", config.upload_path.display());
    info!("CV parsing service: {}", config.parser_service_url);
    info!("Chatbot service: {}", config.chatbot_url);

    let figment = rocket::Config::figment()
        .merge(("port", port))
        .merge(("address", "0.0.0.0"));

    let _rocket = rocket::custom(figment)
        .attach(Cors)
        .manage(db_config)
        .manage(file_store)
        .manage(parser)
        .manage(chatbot)
        .register("/api", catchers![bad_request, not_found, internal_error])
        .mount(
            "/api",
            routes![
                get_all_candidates,
                get_candidate_by_id,
                upload_cv,
                delete_candidate,
                chat_with_bot,
                get_all_jobs,
                get_job_by_id,
                create_job,
                update_job,
                delete_job,
                create_job_match,
                get_all_job_matches,
                search_job_matches,
                get_job_match_by_id,
                delete_job_match,
                options_route,
            ],
        )
        .launch()
        .await?;

    Ok(())
}
