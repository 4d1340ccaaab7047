use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::generation::prompt::CaseData;
use crate::generation::PetitionCategory;
use crate::petitions::repo::{Petition, PetitionStatus};

/// Request body for petition generation.
#[derive(Debug, Deserialize)]
pub struct GeneratePetitionRequest {
    pub category: PetitionCategory,
    pub full_name: String,
    pub id_number: String,
    pub incident_date: String,
    pub incident_details: String,
}

impl GeneratePetitionRequest {
    pub fn case_data(&self) -> CaseData {
        CaseData {
            full_name: self.full_name.clone(),
            id_number: self.id_number.clone(),
            incident_date: self.incident_date.clone(),
            incident_details: self.incident_details.clone(),
        }
    }
}

/// Request body for a status transition.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: PetitionStatus,
}

const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

impl Pagination {
    /// Row offset, never negative.
    pub fn offset(&self) -> i64 {
        self.skip.max(0)
    }

    /// Page size, clamped to `0..=MAX_PAGE_SIZE`.
    pub fn page_size(&self) -> i64 {
        self.limit.clamp(0, MAX_PAGE_SIZE)
    }
}

fn default_limit() -> i64 {
    10
}

#[derive(Debug, Serialize)]
pub struct PetitionResponse {
    pub id: Uuid,
    pub category: String,
    pub content: String,
    pub user_id: Uuid,
    pub status: String,
    pub pdf_path: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<Petition> for PetitionResponse {
    fn from(p: Petition) -> Self {
        Self {
            id: p.id,
            category: p.category,
            content: p.content,
            user_id: p.user_id,
            status: p.status,
            pdf_path: p.pdf_path,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}
