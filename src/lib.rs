pub mod candidates;
pub mod database;
pub mod environment;
pub mod error;
pub mod gateway;
pub mod job_matches;
pub mod jobs;
pub mod storage;
pub mod web;

pub use environment::EnvironmentConfig;
pub use error::{ServiceError, ServiceResult};
pub use web::start_web_server;
