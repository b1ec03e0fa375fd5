use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "job_status")]
pub enum JobStatus {
    Applied,
    Interview,
    Offer,
    Rejected,
}

impl Default for JobStatus {
    fn default() -> Self {
        JobStatus::Applied
    }
}

/// Job application record. `owner_id` is set from the authenticated identity
/// at insert and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Job {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub company: String,
    pub position: String,
    pub status: JobStatus,
    pub notes: Option<String>,
    pub date_applied: OffsetDateTime,
}

impl Job {
    pub async fn list_by_owner(db: &PgPool, owner_id: Uuid) -> Result<Vec<Job>, sqlx::Error> {
        sqlx::query_as::<_, Job>(
            r#"
            SELECT id, owner_id, company, position, status, notes, date_applied
            FROM jobs
            WHERE owner_id = $1
            ORDER BY date_applied DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(db)
        .await
    }

    /// `date_applied` is assigned by the database, never by the client.
    pub async fn create(
        db: &PgPool,
        owner_id: Uuid,
        company: &str,
        position: &str,
        status: JobStatus,
        notes: Option<&str>,
    ) -> Result<Job, sqlx::Error> {
        sqlx::query_as::<_, Job>(
            r#"
            INSERT INTO jobs (owner_id, company, position, status, notes)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, owner_id, company, position, status, notes, date_applied
            "#,
        )
        .bind(owner_id)
        .bind(company)
        .bind(position)
        .bind(status)
        .bind(notes)
        .fetch_one(db)
        .await
    }

    /// Ownership lives in the statement predicate itself: a foreign or
    /// missing id yields zero rows, with no separate lookup to race against.
    pub async fn update_owned(
        db: &PgPool,
        owner_id: Uuid,
        id: Uuid,
        company: &str,
        position: &str,
        status: JobStatus,
        notes: Option<&str>,
    ) -> Result<Option<Job>, sqlx::Error> {
        sqlx::query_as::<_, Job>(
            r#"
            UPDATE jobs
            SET company = $1, position = $2, status = $3, notes = $4
            WHERE id = $5 AND owner_id = $6
            RETURNING id, owner_id, company, position, status, notes, date_applied
            "#,
        )
        .bind(company)
        .bind(position)
        .bind(status)
        .bind(notes)
        .bind(id)
        .bind(owner_id)
        .fetch_optional(db)
        .await
    }

    pub async fn delete_owned(
        db: &PgPool,
        owner_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Job>, sqlx::Error> {
        sqlx::query_as::<_, Job>(
            r#"
            DELETE FROM jobs
            WHERE id = $1 AND owner_id = $2
            RETURNING id, owner_id, company, position, status, notes, date_applied
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(db)
        .await
    }
}
