// src/candidates.rs
use crate::error::ServiceResult;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::info;

/// Parse lifecycle of an uploaded CV. The candidate row is persisted before
/// the external parsing call, so the status records whether that second
/// phase completed.
pub const PARSE_PENDING: &str = "pending";
pub const PARSE_DONE: &str = "parsed";
pub const PARSE_FAILED: &str = "failed";

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub skills: String,
    pub cv_path: String,
    pub parse_status: String,
}

pub struct NewCandidate {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub skills: String,
    pub cv_path: String,
}

pub struct CandidateRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CandidateRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_all(&self) -> ServiceResult<Vec<Candidate>> {
        let candidates = sqlx::query_as::<_, Candidate>(
            r#"
            SELECT id, first_name, last_name, email, phone, skills, cv_path, parse_status
            FROM candidates
            ORDER BY id ASC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(candidates)
    }

    pub async fn find_by_id(&self, id: i64) -> ServiceResult<Option<Candidate>> {
        let candidate = sqlx::query_as::<_, Candidate>(
            r#"
            SELECT id, first_name, last_name, email, phone, skills, cv_path, parse_status
            FROM candidates
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(candidate)
    }

    /// Insert a new candidate row with the parse phase still pending
    pub async fn insert(&self, new: NewCandidate) -> ServiceResult<Candidate> {
        let result = sqlx::query(
            r#"
            INSERT INTO candidates (first_name, last_name, email, phone, skills, cv_path, parse_status)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(&new.email)
        .bind(&new.phone)
        .bind(&new.skills)
        .bind(&new.cv_path)
        .bind(PARSE_PENDING)
        .execute(self.pool)
        .await?;

        let id = result.last_insert_rowid();
        info!("Created candidate {} ({} {})", id, new.first_name, new.last_name);

        Ok(Candidate {
            id,
            first_name: new.first_name,
            last_name: new.last_name,
            email: new.email,
            phone: new.phone,
            skills: new.skills,
            cv_path: new.cv_path,
            parse_status: PARSE_PENDING.to_string(),
        })
    }

    pub async fn set_parse_status(&self, id: i64, status: &str) -> ServiceResult<()> {
        sqlx::query("UPDATE candidates SET parse_status = ? WHERE id = ?")
            .bind(status)
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(())
    }

    pub async fn delete_by_id(&self, id: i64) -> ServiceResult<bool> {
        let result = sqlx::query("DELETE FROM candidates WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

pub struct CandidateService<'a> {
    repo: CandidateRepository<'a>,
}

impl<'a> CandidateService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self {
            repo: CandidateRepository::new(pool),
        }
    }

    /// Persist the candidate row (phase one of the upload). The caller marks
    /// the parse outcome afterwards.
    pub async fn create(&self, new: NewCandidate) -> ServiceResult<Candidate> {
        self.repo.insert(new).await
    }

    pub async fn get_all(&self) -> ServiceResult<Vec<Candidate>> {
        self.repo.find_all().await
    }

    pub async fn get_by_id(&self, id: i64) -> ServiceResult<Option<Candidate>> {
        self.repo.find_by_id(id).await
    }

    pub async fn mark_parsed(&self, id: i64) -> ServiceResult<()> {
        self.repo.set_parse_status(id, PARSE_DONE).await
    }

    pub async fn mark_parse_failed(&self, id: i64) -> ServiceResult<()> {
        self.repo.set_parse_status(id, PARSE_FAILED).await
    }

    /// Candidate deletion is idempotent: deleting an absent id is a no-op,
    /// not an error. Job and JobMatch deletes fail loudly instead.
    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        let removed = self.repo.delete_by_id(id).await?;
        if removed {
            info!("Deleted candidate {}", id);
        } else {
            info!("Delete for absent candidate {} ignored", id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_pool;

    fn sample() -> NewCandidate {
        NewCandidate {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: "+41790000000".to_string(),
            skills: "Rust, SQL".to_string(),
            cv_path: "abc_cv.pdf".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_starts_parse_pending() {
        let pool = test_pool().await;
        let service = CandidateService::new(&pool);

        let candidate = service.create(sample()).await.unwrap();
        assert_eq!(candidate.parse_status, PARSE_PENDING);

        let stored = service.get_by_id(candidate.id).await.unwrap().unwrap();
        assert_eq!(stored.cv_path, "abc_cv.pdf");
        assert_eq!(stored.parse_status, PARSE_PENDING);
    }

    #[tokio::test]
    async fn test_row_survives_parse_failure() {
        let pool = test_pool().await;
        let service = CandidateService::new(&pool);

        let candidate = service.create(sample()).await.unwrap();
        service.mark_parse_failed(candidate.id).await.unwrap();

        let stored = service.get_by_id(candidate.id).await.unwrap().unwrap();
        assert_eq!(stored.parse_status, PARSE_FAILED);
        assert_eq!(stored.cv_path, "abc_cv.pdf");
    }

    #[tokio::test]
    async fn test_mark_parsed() {
        let pool = test_pool().await;
        let service = CandidateService::new(&pool);

        let candidate = service.create(sample()).await.unwrap();
        service.mark_parsed(candidate.id).await.unwrap();

        let stored = service.get_by_id(candidate.id).await.unwrap().unwrap();
        assert_eq!(stored.parse_status, PARSE_DONE);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let pool = test_pool().await;
        let service = CandidateService::new(&pool);

        let candidate = service.create(sample()).await.unwrap();
        service.delete(candidate.id).await.unwrap();

        // Second delete of the same id and a delete of a never-existing id
        // both succeed silently.
        service.delete(candidate.id).await.unwrap();
        service.delete(9999).await.unwrap();

        assert!(service.get_by_id(candidate.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_all_in_insertion_order() {
        let pool = test_pool().await;
        let service = CandidateService::new(&pool);

        let first = service.create(sample()).await.unwrap();
        let mut second = sample();
        second.email = "grace@example.com".to_string();
        let second = service.create(second).await.unwrap();

        let all = service.get_all().await.unwrap();
        assert_eq!(
            all.iter().map(|c| c.id).collect::<Vec<_>>(),
            vec![first.id, second.id]
        );
    }
}
