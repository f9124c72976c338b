// src/job_matches.rs
use crate::error::{ServiceError, ServiceResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::{info, warn};

/// Candidate-to-job score computed by the external matching service and
/// merely persisted here. candidate_id is a free-form string identifier with
/// no referential check against the candidates table, and the percentage is
/// stored as supplied.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct JobMatch {
    pub id: i64,
    pub candidate_id: String,
    pub job_id: i32,
    pub match_percentage: f64,
    pub created_at: DateTime<Utc>,
}

pub struct JobMatchRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> JobMatchRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_all(&self) -> ServiceResult<Vec<JobMatch>> {
        let matches = sqlx::query_as::<_, JobMatch>(
            r#"
            SELECT id, candidate_id, job_id, match_percentage, created_at
            FROM job_matches
            ORDER BY id ASC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(matches)
    }

    pub async fn find_by_id(&self, id: i64) -> ServiceResult<Option<JobMatch>> {
        let job_match = sqlx::query_as::<_, JobMatch>(
            r#"
            SELECT id, candidate_id, job_id, match_percentage, created_at
            FROM job_matches
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(job_match)
    }

    pub async fn find_by_candidate_id(&self, candidate_id: &str) -> ServiceResult<Vec<JobMatch>> {
        let matches = sqlx::query_as::<_, JobMatch>(
            r#"
            SELECT id, candidate_id, job_id, match_percentage, created_at
            FROM job_matches
            WHERE candidate_id = ?
            ORDER BY id ASC
            "#,
        )
        .bind(candidate_id)
        .fetch_all(self.pool)
        .await?;

        Ok(matches)
    }

    pub async fn insert(
        &self,
        candidate_id: &str,
        job_id: i32,
        match_percentage: f64,
    ) -> ServiceResult<JobMatch> {
        let created_at = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO job_matches (candidate_id, job_id, match_percentage, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(candidate_id)
        .bind(job_id)
        .bind(match_percentage)
        .bind(created_at)
        .execute(self.pool)
        .await?;

        let id = result.last_insert_rowid();
        info!(
            "Recorded match {} for candidate {} on job {}: {}%",
            id, candidate_id, job_id, match_percentage
        );

        Ok(JobMatch {
            id,
            candidate_id: candidate_id.to_string(),
            job_id,
            match_percentage,
            created_at,
        })
    }

    pub async fn delete_by_id(&self, id: i64) -> ServiceResult<bool> {
        let result = sqlx::query("DELETE FROM job_matches WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

pub struct JobMatchService<'a> {
    repo: JobMatchRepository<'a>,
}

impl<'a> JobMatchService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self {
            repo: JobMatchRepository::new(pool),
        }
    }

    /// The percentage is computed entirely outside this system; no range or
    /// referential validation happens here.
    pub async fn create(
        &self,
        candidate_id: &str,
        job_id: i32,
        match_percentage: f64,
    ) -> ServiceResult<JobMatch> {
        self.repo.insert(candidate_id, job_id, match_percentage).await
    }

    pub async fn get_all(&self) -> ServiceResult<Vec<JobMatch>> {
        self.repo.find_all().await
    }

    pub async fn get_by_id(&self, id: i64) -> ServiceResult<Option<JobMatch>> {
        self.repo.find_by_id(id).await
    }

    /// All rows when no candidate id is given, exact string match otherwise
    pub async fn search(&self, candidate_id: Option<&str>) -> ServiceResult<Vec<JobMatch>> {
        match candidate_id {
            Some(id) if !id.is_empty() => self.repo.find_by_candidate_id(id).await,
            _ => self.repo.find_all().await,
        }
    }

    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        if !self.repo.delete_by_id(id).await? {
            warn!("Attempt to delete non-existent job match with id: {}", id);
            return Err(ServiceError::not_found("JobMatch", id));
        }
        info!("Deleted job match {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_pool;

    #[tokio::test]
    async fn test_create_assigns_timestamp() {
        let pool = test_pool().await;
        let service = JobMatchService::new(&pool);

        let before = Utc::now();
        let created = service.create("C1", 7, 82.5).await.unwrap();
        let after = Utc::now();

        assert!(created.created_at >= before && created.created_at <= after);

        let stored = service.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(stored.candidate_id, "C1");
        assert_eq!(stored.job_id, 7);
        assert_eq!(stored.match_percentage, 82.5);
    }

    #[tokio::test]
    async fn test_percentage_is_stored_unconstrained() {
        let pool = test_pool().await;
        let service = JobMatchService::new(&pool);

        let created = service.create("C1", 1, 250.0).await.unwrap();
        let stored = service.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(stored.match_percentage, 250.0);
    }

    #[tokio::test]
    async fn test_search_filters_by_candidate_in_insertion_order() {
        let pool = test_pool().await;
        let service = JobMatchService::new(&pool);

        let first = service.create("C1", 1, 70.0).await.unwrap();
        service.create("C2", 1, 55.0).await.unwrap();
        let third = service.create("C1", 2, 90.0).await.unwrap();

        let matches = service.search(Some("C1")).await.unwrap();
        assert_eq!(
            matches.iter().map(|m| m.id).collect::<Vec<_>>(),
            vec![first.id, third.id]
        );
    }

    #[tokio::test]
    async fn test_search_without_candidate_returns_all() {
        let pool = test_pool().await;
        let service = JobMatchService::new(&pool);

        service.create("C1", 1, 70.0).await.unwrap();
        service.create("C2", 1, 55.0).await.unwrap();

        assert_eq!(service.search(None).await.unwrap().len(), 2);
        assert_eq!(service.search(Some("")).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_delete_missing_id_is_not_found() {
        let pool = test_pool().await;
        let service = JobMatchService::new(&pool);

        match service.delete(12).await {
            Err(ServiceError::NotFound { entity, .. }) => assert_eq!(entity, "JobMatch"),
            other => panic!("expected not found, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_delete_removes_row() {
        let pool = test_pool().await;
        let service = JobMatchService::new(&pool);

        let created = service.create("C1", 3, 40.0).await.unwrap();
        service.delete(created.id).await.unwrap();
        assert!(service.get_by_id(created.id).await.unwrap().is_none());
    }
}
