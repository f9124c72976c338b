// src/web/types.rs
use crate::jobs::Job;
use chrono::NaiveDate;
use rocket::form::FromForm;
use rocket::fs::TempFile;
use rocket::http::{ContentType, Status};
use rocket::response::{self, Responder};
use rocket::serde::Serialize;
use rocket::{Request, Response};
use serde_json::{json, Value};

/// JSON error body paired with its HTTP status. Each entity family keeps the
/// wire shape its consumers already expect.
pub struct ApiError {
    pub status: Status,
    pub body: Value,
}

impl ApiError {
    /// Job-style error envelope: `{status:"error", error, message, details?}`
    pub fn job(status: Status, code: &str, message: String, details: Option<String>) -> Self {
        let mut body = json!({
            "status": "error",
            "error": code,
            "message": message,
        });
        if let Some(details) = details {
            body["details"] = Value::String(details);
        }
        Self { status, body }
    }

    /// Candidate-style error envelope: `{success:false, error, message}`
    pub fn candidate(status: Status, code: &str, message: String) -> Self {
        Self {
            status,
            body: json!({
                "success": false,
                "error": code,
                "message": message,
            }),
        }
    }

    /// Upload failure envelope: `{error:"PROCESSING_FAILED", message}`
    pub fn processing_failed(message: String) -> Self {
        Self {
            status: Status::InternalServerError,
            body: json!({
                "error": "PROCESSING_FAILED",
                "message": message,
            }),
        }
    }
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        let body = self.body.to_string();
        Response::build()
            .status(self.status)
            .header(ContentType::JSON)
            .sized_body(body.len(), std::io::Cursor::new(body))
            .ok()
    }
}

/// Multipart form for POST /api/candidates/upload
#[derive(FromForm)]
pub struct CandidateUploadForm<'f> {
    pub cv: TempFile<'f>,
    #[field(name = "firstName")]
    pub first_name: String,
    #[field(name = "lastName")]
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub skills: String,
}

/// Query parameters for POST /api/job-matches
#[derive(FromForm)]
pub struct CreateMatchParams {
    #[field(name = "candidateId")]
    pub candidate_id: String,
    #[field(name = "jobId")]
    pub job_id: i32,
    #[field(name = "matchPercentage")]
    pub match_percentage: f64,
}

/// Query parameters for GET /api/job-matches/search
#[derive(FromForm)]
pub struct MatchSearchParams {
    #[field(name = "candidateId")]
    pub candidate_id: Option<String>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct CandidateUploadResponse {
    pub success: bool,
    #[serde(rename = "candidateId")]
    pub candidate_id: i64,
    pub skills: Vec<String>,
    pub experience: i32,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct CandidateDeleteResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ChatResponse {
    pub success: bool,
    pub response: String,
}

/// Job as it goes out on the wire, with the skills strings parsed into
/// ordered lists alongside the raw values.
#[derive(Serialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct JobView {
    pub id: i64,
    pub title: String,
    pub company: String,
    pub description: Option<String>,
    pub required_skills: String,
    pub required_skills_list: Vec<String>,
    pub preferred_skills: String,
    pub preferred_skills_list: Vec<String>,
    pub experience_required: i32,
    pub job_type: String,
    pub location: String,
    pub salary_range: String,
    pub posted_date: NaiveDate,
}

impl From<Job> for JobView {
    fn from(job: Job) -> Self {
        let required_skills_list = job.required_skills_list();
        let preferred_skills_list = job.preferred_skills_list();
        Self {
            id: job.id,
            title: job.title,
            company: job.company,
            description: job.description,
            required_skills: job.required_skills,
            required_skills_list,
            preferred_skills: job.preferred_skills,
            preferred_skills_list,
            experience_required: job.experience_required,
            job_type: job.job_type,
            location: job.location,
            salary_range: job.salary_range,
            posted_date: job.posted_date,
        }
    }
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct JobListResponse {
    pub status: String,
    pub jobs: Vec<JobView>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct JobResponse {
    pub status: String,
    pub job: JobView,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct JobDeleteResponse {
    pub status: String,
    pub message: String,
}

impl JobListResponse {
    pub fn success(jobs: Vec<Job>) -> Self {
        Self {
            status: "success".to_string(),
            jobs: jobs.into_iter().map(JobView::from).collect(),
        }
    }
}

impl JobResponse {
    pub fn success(job: Job) -> Self {
        Self {
            status: "success".to_string(),
            job: job.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_view_carries_parsed_skill_lists() {
        let job = Job {
            id: 1,
            title: "SE".to_string(),
            company: "Acme".to_string(),
            description: None,
            required_skills: "Java, Python,C++".to_string(),
            preferred_skills: String::new(),
            experience_required: 0,
            job_type: "Full-time".to_string(),
            location: "Remote".to_string(),
            salary_range: "Not specified".to_string(),
            posted_date: NaiveDate::from_ymd_opt(2026, 8, 23).unwrap(),
        };

        let view = JobView::from(job);
        assert_eq!(view.required_skills_list, vec!["Java", "Python", "C++"]);
        assert!(view.preferred_skills_list.is_empty());

        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value["requiredSkills"], "Java, Python,C++");
        assert_eq!(value["requiredSkillsList"][2], "C++");
        assert_eq!(value["jobType"], "Full-time");
    }

    #[test]
    fn test_api_error_job_body_includes_details_when_present() {
        let err = ApiError::job(
            Status::InternalServerError,
            "SERVER_ERROR",
            "Failed to retrieve jobs".to_string(),
            Some("pool closed".to_string()),
        );
        assert_eq!(err.body["status"], "error");
        assert_eq!(err.body["error"], "SERVER_ERROR");
        assert_eq!(err.body["details"], "pool closed");

        let bare = ApiError::job(Status::NotFound, "JOB_NOT_FOUND", "nope".to_string(), None);
        assert!(bare.body.get("details").is_none());
    }
}
