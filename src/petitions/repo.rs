use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Petition lifecycle status. Content is immutable after creation; only the
/// status and the rendered-document path ever change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PetitionStatus {
    Draft,
    Submitted,
    Approved,
    Rejected,
}

impl PetitionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PetitionStatus::Draft => "draft",
            PetitionStatus::Submitted => "submitted",
            PetitionStatus::Approved => "approved",
            PetitionStatus::Rejected => "rejected",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Petition {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category: String,
    pub content: String,
    pub status: String,
    pub pdf_path: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl Petition {
    /// Persist a new draft petition in one transaction; on failure the
    /// transaction rolls back and no half-written record survives.
    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        category: &str,
        content: &str,
    ) -> anyhow::Result<Petition> {
        let mut tx = db.begin().await?;
        let petition = sqlx::query_as::<_, Petition>(
            r#"
            INSERT INTO petitions (user_id, category, content, status)
            VALUES ($1, $2, $3, 'draft')
            RETURNING id, user_id, category, content, status, pdf_path,
                      created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(category)
        .bind(content)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(petition)
    }

    /// Owner-scoped page, ordered by insertion (explicit sort key so the
    /// contract is deterministic across storage engines).
    pub async fn list_by_user(
        db: &PgPool,
        user_id: Uuid,
        skip: i64,
        limit: i64,
    ) -> anyhow::Result<Vec<Petition>> {
        let rows = sqlx::query_as::<_, Petition>(
            r#"
            SELECT id, user_id, category, content, status, pdf_path,
                   created_at, updated_at
            FROM petitions
            WHERE user_id = $1
            ORDER BY created_at ASC, id ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(skip)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Petition>> {
        let petition = sqlx::query_as::<_, Petition>(
            r#"
            SELECT id, user_id, category, content, status, pdf_path,
                   created_at, updated_at
            FROM petitions
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(petition)
    }

    /// Status transition; last write wins on concurrent updates.
    pub async fn update_status(
        db: &PgPool,
        id: Uuid,
        status: PetitionStatus,
    ) -> anyhow::Result<Petition> {
        let petition = sqlx::query_as::<_, Petition>(
            r#"
            UPDATE petitions
            SET status = $2, updated_at = now()
            WHERE id = $1
            RETURNING id, user_id, category, content, status, pdf_path,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .fetch_one(db)
        .await?;
        Ok(petition)
    }

    pub async fn set_pdf_path(db: &PgPool, id: Uuid, path: &str) -> anyhow::Result<Petition> {
        let petition = sqlx::query_as::<_, Petition>(
            r#"
            UPDATE petitions
            SET pdf_path = $2, updated_at = now()
            WHERE id = $1
            RETURNING id, user_id, category, content, status, pdf_path,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(path)
        .fetch_one(db)
        .await?;
        Ok(petition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_wire_form_is_lowercase() {
        assert_eq!(
            serde_json::to_string(&PetitionStatus::Draft).unwrap(),
            "\"draft\""
        );
        let parsed: PetitionStatus = serde_json::from_str("\"approved\"").unwrap();
        assert_eq!(parsed, PetitionStatus::Approved);
    }

    #[test]
    fn invalid_status_values_are_rejected() {
        assert!(serde_json::from_str::<PetitionStatus>("\"archived\"").is_err());
        assert!(serde_json::from_str::<PetitionStatus>("\"DRAFT\"").is_err());
    }

    #[test]
    fn as_str_matches_wire_form() {
        for status in [
            PetitionStatus::Draft,
            PetitionStatus::Submitted,
            PetitionStatus::Approved,
            PetitionStatus::Rejected,
        ] {
            let wire = serde_json::to_string(&status).unwrap();
            assert_eq!(wire, format!("\"{}\"", status.as_str()));
        }
    }
}
