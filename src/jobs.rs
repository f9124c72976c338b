// src/jobs.rs
use crate::error::{ServiceError, ServiceResult};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::{info, warn};

pub const DEFAULT_JOB_TYPE: &str = "Full-time";
pub const DEFAULT_LOCATION: &str = "Remote";
pub const DEFAULT_SALARY_RANGE: &str = "Not specified";
pub const MAX_EXPERIENCE_YEARS: i32 = 50;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i64,
    pub title: String,
    pub company: String,
    pub description: Option<String>,
    pub required_skills: String,
    pub preferred_skills: String,
    pub experience_required: i32,
    pub job_type: String,
    pub location: String,
    pub salary_range: String,
    pub posted_date: NaiveDate,
}

impl Job {
    /// Parse the comma-delimited skills string into an ordered list.
    /// Whitespace around commas is ignored; an empty string yields no skills.
    pub fn required_skills_list(&self) -> Vec<String> {
        split_skills(&self.required_skills)
    }

    pub fn preferred_skills_list(&self) -> Vec<String> {
        split_skills(&self.preferred_skills)
    }
}

pub fn split_skills(skills: &str) -> Vec<String> {
    if skills.trim().is_empty() {
        return Vec::new();
    }
    skills
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Incoming create/update body. Optional fields are filled with defaults at
/// the service boundary; required ones are validated there.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPayload {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub required_skills: Option<String>,
    #[serde(default)]
    pub preferred_skills: Option<String>,
    #[serde(default)]
    pub experience_required: Option<i32>,
    #[serde(default)]
    pub job_type: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub salary_range: Option<String>,
    #[serde(default)]
    pub posted_date: Option<NaiveDate>,
}

/// Validated job fields with every default applied, ready to persist
#[derive(Debug, Clone)]
pub struct JobFields {
    pub title: String,
    pub company: String,
    pub description: Option<String>,
    pub required_skills: String,
    pub preferred_skills: String,
    pub experience_required: i32,
    pub job_type: String,
    pub location: String,
    pub salary_range: String,
    pub posted_date: NaiveDate,
}

impl JobPayload {
    /// Single validation point for job writes. Checks the three required
    /// fields and fills defaults for everything else.
    pub fn validate(self) -> ServiceResult<JobFields> {
        let title = non_blank(self.title, "INVALID_TITLE", "Job title is required")?;
        let company = non_blank(self.company, "INVALID_COMPANY", "Company name is required")?;
        let required_skills = non_blank(
            self.required_skills,
            "REQUIRED_SKILLS_MISSING",
            "At least one required skill must be specified",
        )?;

        let experience_required = self
            .experience_required
            .unwrap_or(0)
            .clamp(0, MAX_EXPERIENCE_YEARS);

        Ok(JobFields {
            title,
            company,
            description: self.description,
            required_skills,
            preferred_skills: self.preferred_skills.unwrap_or_default(),
            experience_required,
            job_type: self
                .job_type
                .unwrap_or_else(|| DEFAULT_JOB_TYPE.to_string()),
            location: self
                .location
                .unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
            salary_range: self
                .salary_range
                .unwrap_or_else(|| DEFAULT_SALARY_RANGE.to_string()),
            posted_date: self
                .posted_date
                .unwrap_or_else(|| Utc::now().date_naive()),
        })
    }
}

fn non_blank(
    value: Option<String>,
    code: &'static str,
    message: &'static str,
) -> ServiceResult<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ServiceError::validation(code, message)),
    }
}

pub struct JobRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> JobRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_all(&self) -> ServiceResult<Vec<Job>> {
        let jobs = sqlx::query_as::<_, Job>(
            r#"
            SELECT id, title, company, description, required_skills, preferred_skills,
                   experience_required, job_type, location, salary_range, posted_date
            FROM jobs
            ORDER BY id ASC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(jobs)
    }

    pub async fn find_by_id(&self, id: i64) -> ServiceResult<Option<Job>> {
        let job = sqlx::query_as::<_, Job>(
            r#"
            SELECT id, title, company, description, required_skills, preferred_skills,
                   experience_required, job_type, location, salary_range, posted_date
            FROM jobs
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(job)
    }

    pub async fn exists_by_id(&self, id: i64) -> ServiceResult<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM jobs WHERE id = ?")
            .bind(id)
            .fetch_one(self.pool)
            .await?;

        Ok(count > 0)
    }

    pub async fn insert(&self, fields: JobFields) -> ServiceResult<Job> {
        let result = sqlx::query(
            r#"
            INSERT INTO jobs (title, company, description, required_skills, preferred_skills,
                              experience_required, job_type, location, salary_range, posted_date)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&fields.title)
        .bind(&fields.company)
        .bind(&fields.description)
        .bind(&fields.required_skills)
        .bind(&fields.preferred_skills)
        .bind(fields.experience_required)
        .bind(&fields.job_type)
        .bind(&fields.location)
        .bind(&fields.salary_range)
        .bind(fields.posted_date)
        .execute(self.pool)
        .await?;

        let id = result.last_insert_rowid();
        info!("Created job {}: {} at {}", id, fields.title, fields.company);

        Ok(Job {
            id,
            title: fields.title,
            company: fields.company,
            description: fields.description,
            required_skills: fields.required_skills,
            preferred_skills: fields.preferred_skills,
            experience_required: fields.experience_required,
            job_type: fields.job_type,
            location: fields.location,
            salary_range: fields.salary_range,
            posted_date: fields.posted_date,
        })
    }

    /// Wholesale field replacement of an existing row
    pub async fn update(&self, id: i64, fields: JobFields) -> ServiceResult<Job> {
        sqlx::query(
            r#"
            UPDATE jobs
            SET title = ?, company = ?, description = ?, required_skills = ?,
                preferred_skills = ?, experience_required = ?, job_type = ?,
                location = ?, salary_range = ?, posted_date = ?
            WHERE id = ?
            "#,
        )
        .bind(&fields.title)
        .bind(&fields.company)
        .bind(&fields.description)
        .bind(&fields.required_skills)
        .bind(&fields.preferred_skills)
        .bind(fields.experience_required)
        .bind(&fields.job_type)
        .bind(&fields.location)
        .bind(&fields.salary_range)
        .bind(fields.posted_date)
        .bind(id)
        .execute(self.pool)
        .await?;

        Ok(Job {
            id,
            title: fields.title,
            company: fields.company,
            description: fields.description,
            required_skills: fields.required_skills,
            preferred_skills: fields.preferred_skills,
            experience_required: fields.experience_required,
            job_type: fields.job_type,
            location: fields.location,
            salary_range: fields.salary_range,
            posted_date: fields.posted_date,
        })
    }

    pub async fn delete_by_id(&self, id: i64) -> ServiceResult<bool> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

pub struct JobService<'a> {
    repo: JobRepository<'a>,
}

impl<'a> JobService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self {
            repo: JobRepository::new(pool),
        }
    }

    pub async fn get_all(&self) -> ServiceResult<Vec<Job>> {
        self.repo.find_all().await
    }

    pub async fn get_by_id(&self, id: i64) -> ServiceResult<Option<Job>> {
        self.repo.find_by_id(id).await
    }

    /// Bulk fetch. Ids with no matching row are silently omitted.
    pub async fn get_by_ids(&self, ids: &[i64]) -> ServiceResult<Vec<Job>> {
        let mut jobs = Vec::with_capacity(ids.len());
        for &id in ids {
            if let Some(job) = self.repo.find_by_id(id).await? {
                jobs.push(job);
            }
        }
        Ok(jobs)
    }

    pub async fn create(&self, payload: JobPayload) -> ServiceResult<Job> {
        let fields = payload.validate()?;
        self.repo.insert(fields).await
    }

    /// Every field of the existing row is overwritten from the payload;
    /// partial updates are not supported.
    pub async fn update(&self, id: i64, payload: JobPayload) -> ServiceResult<Job> {
        let fields = payload.validate()?;

        if !self.repo.exists_by_id(id).await? {
            warn!("Job not found with id: {}", id);
            return Err(ServiceError::not_found("Job", id));
        }

        let job = self.repo.update(id, fields).await?;
        info!("Updated job {}", id);
        Ok(job)
    }

    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        if !self.repo.delete_by_id(id).await? {
            warn!("Attempt to delete non-existent job with id: {}", id);
            return Err(ServiceError::not_found("Job", id));
        }
        info!("Deleted job {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_pool;

    fn minimal_payload() -> JobPayload {
        JobPayload {
            title: Some("SE".to_string()),
            company: Some("Acme".to_string()),
            description: None,
            required_skills: Some("Java,SQL".to_string()),
            preferred_skills: None,
            experience_required: None,
            job_type: None,
            location: None,
            salary_range: None,
            posted_date: None,
        }
    }

    #[test]
    fn test_split_skills_trims_and_preserves_order() {
        assert_eq!(
            split_skills("Java, Python,C++"),
            vec!["Java", "Python", "C++"]
        );
        assert_eq!(split_skills(""), Vec::<String>::new());
        assert_eq!(split_skills("  "), Vec::<String>::new());
        assert_eq!(split_skills("Rust"), vec!["Rust"]);
    }

    #[test]
    fn test_validate_fills_defaults() {
        let fields = minimal_payload().validate().unwrap();

        assert_eq!(fields.job_type, DEFAULT_JOB_TYPE);
        assert_eq!(fields.location, DEFAULT_LOCATION);
        assert_eq!(fields.salary_range, DEFAULT_SALARY_RANGE);
        assert_eq!(fields.preferred_skills, "");
        assert_eq!(fields.experience_required, 0);
        assert_eq!(fields.posted_date, Utc::now().date_naive());
    }

    #[test]
    fn test_validate_clamps_experience() {
        let mut payload = minimal_payload();
        payload.experience_required = Some(-3);
        assert_eq!(payload.clone().validate().unwrap().experience_required, 0);

        payload.experience_required = Some(80);
        assert_eq!(
            payload.validate().unwrap().experience_required,
            MAX_EXPERIENCE_YEARS
        );
    }

    #[test]
    fn test_validate_rejects_blank_required_fields() {
        let mut payload = minimal_payload();
        payload.title = Some("   ".to_string());
        match payload.validate() {
            Err(ServiceError::Validation { code, .. }) => assert_eq!(code, "INVALID_TITLE"),
            other => panic!("expected validation error, got {:?}", other.map(|_| ())),
        }

        let mut payload = minimal_payload();
        payload.company = None;
        match payload.validate() {
            Err(ServiceError::Validation { code, .. }) => assert_eq!(code, "INVALID_COMPANY"),
            other => panic!("expected validation error, got {:?}", other.map(|_| ())),
        }

        let mut payload = minimal_payload();
        payload.required_skills = Some(String::new());
        match payload.validate() {
            Err(ServiceError::Validation { code, .. }) => {
                assert_eq!(code, "REQUIRED_SKILLS_MISSING")
            }
            other => panic!("expected validation error, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_create_persists_defaults() {
        let pool = test_pool().await;
        let service = JobService::new(&pool);

        let created = service.create(minimal_payload()).await.unwrap();
        let stored = service.get_by_id(created.id).await.unwrap().unwrap();

        assert_eq!(stored.job_type, "Full-time");
        assert_eq!(stored.location, "Remote");
        assert_eq!(stored.salary_range, "Not specified");
        assert_eq!(stored.preferred_skills, "");
        assert_eq!(stored.experience_required, 0);
        assert_eq!(stored.posted_date, Utc::now().date_naive());
        assert_eq!(stored.required_skills_list(), vec!["Java", "SQL"]);
    }

    #[tokio::test]
    async fn test_create_blank_title_persists_nothing() {
        let pool = test_pool().await;
        let service = JobService::new(&pool);

        let mut payload = minimal_payload();
        payload.title = None;
        assert!(service.create(payload).await.is_err());

        let mut payload = minimal_payload();
        payload.required_skills = Some("  ".to_string());
        assert!(service.create(payload).await.is_err());

        assert!(service.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_overwrites_every_field() {
        let pool = test_pool().await;
        let service = JobService::new(&pool);

        let created = service.create(minimal_payload()).await.unwrap();

        let mut payload = minimal_payload();
        payload.title = Some("Senior SE".to_string());
        payload.description = Some("Build things".to_string());
        payload.location = Some("Zurich".to_string());
        payload.experience_required = Some(5);

        let updated = service.update(created.id, payload).await.unwrap();
        assert_eq!(updated.title, "Senior SE");
        assert_eq!(updated.description.as_deref(), Some("Build things"));
        assert_eq!(updated.location, "Zurich");
        assert_eq!(updated.experience_required, 5);

        // Fields absent from the payload fall back to defaults rather than
        // surviving from the previous row.
        assert_eq!(updated.salary_range, DEFAULT_SALARY_RANGE);
    }

    #[tokio::test]
    async fn test_update_missing_id_leaves_store_unchanged() {
        let pool = test_pool().await;
        let service = JobService::new(&pool);

        let created = service.create(minimal_payload()).await.unwrap();

        let mut payload = minimal_payload();
        payload.title = Some("Ghost".to_string());
        match service.update(created.id + 100, payload).await {
            Err(ServiceError::NotFound { entity, .. }) => assert_eq!(entity, "Job"),
            other => panic!("expected not found, got {:?}", other.map(|_| ())),
        }

        let all = service.get_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].title, "SE");
    }

    #[tokio::test]
    async fn test_delete_missing_id_is_not_found() {
        let pool = test_pool().await;
        let service = JobService::new(&pool);

        match service.delete(42).await {
            Err(ServiceError::NotFound { entity, .. }) => assert_eq!(entity, "Job"),
            other => panic!("expected not found, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_get_by_ids_omits_missing() {
        let pool = test_pool().await;
        let service = JobService::new(&pool);

        let first = service.create(minimal_payload()).await.unwrap();
        let second = service.create(minimal_payload()).await.unwrap();

        let jobs = service
            .get_by_ids(&[first.id, 999, second.id])
            .await
            .unwrap();
        assert_eq!(
            jobs.iter().map(|j| j.id).collect::<Vec<_>>(),
            vec![first.id, second.id]
        );
    }
}
