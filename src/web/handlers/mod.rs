// src/web/handlers/mod.rs
pub mod candidate_handlers;
pub mod job_handlers;
pub mod job_match_handlers;

pub use candidate_handlers::*;
pub use job_handlers::*;
pub use job_match_handlers::*;
