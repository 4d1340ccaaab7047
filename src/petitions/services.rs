//! Premium-gated generation workflow: gate → validate → prompt → provider →
//! normalize → persist. Validation errors propagate unchanged; provider and
//! persistence causes are logged here and re-signaled as coarse errors.

use time::OffsetDateTime;
use tracing::{error, info, warn};

use crate::auth::repo::User;
use crate::error::ApiError;
use crate::generation::normalize::normalize;
use crate::generation::prompt::{build_prompt, validate_case_data};
use crate::generation::templates::template_for;
use crate::petitions::dto::GeneratePetitionRequest;
use crate::petitions::repo::Petition;
use crate::state::AppState;

pub async fn generate_petition(
    state: &AppState,
    user: &User,
    request: &GeneratePetitionRequest,
) -> Result<Petition, ApiError> {
    let now = OffsetDateTime::now_utc();
    if !user.premium_active(now) {
        warn!(user_id = %user.id, "non-premium user attempted to generate petition");
        return Err(ApiError::PremiumRequired);
    }

    let template = template_for(request.category);
    let case = request.case_data();
    validate_case_data(&case, template.required_fields)?;

    let prompt = build_prompt(request.category, &case);

    info!(user_id = %user.id, category = request.category.as_str(), "starting petition generation");
    let raw = state
        .generator
        .generate(template.system_prompt, &prompt, user.premium_active(now))
        .await?;

    let content = normalize(&raw);

    let petition = Petition::create(&state.db, user.id, request.category.as_str(), &content)
        .await
        .map_err(|e| {
            error!(error = %e, user_id = %user.id, "petition insert failed");
            ApiError::Database
        })?;

    info!(petition_id = %petition.id, "petition generated");
    Ok(petition)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::{GenerationClient, PetitionCategory};
    use crate::state::AppState;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use time::Duration;
    use uuid::Uuid;

    struct CountingClient {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl GenerationClient for CountingClient {
        async fn generate(
            &self,
            _system_prompt: &str,
            _user_prompt: &str,
            _premium: bool,
        ) -> Result<String, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok("Sayın Yetkili".into())
        }
    }

    fn state_with_counter(calls: Arc<AtomicUsize>) -> AppState {
        let base = AppState::fake();
        AppState::from_parts(
            base.db.clone(),
            base.config.clone(),
            Arc::new(CountingClient { calls }),
            base.renderer.clone(),
        )
    }

    fn user(premium: bool) -> User {
        let now = OffsetDateTime::now_utc();
        User {
            id: Uuid::new_v4(),
            email: "a@b.c".into(),
            password_hash: "x".into(),
            full_name: Some("Ali Veli".into()),
            is_active: true,
            is_premium: premium,
            premium_until: premium.then(|| now + Duration::days(30)),
            created_at: now,
            updated_at: now,
        }
    }

    fn request() -> GeneratePetitionRequest {
        GeneratePetitionRequest {
            category: PetitionCategory::Traffic,
            full_name: "Ali Veli".into(),
            id_number: "12345678901".into(),
            incident_date: "2024-01-15".into(),
            incident_details: "Hız cezası".into(),
        }
    }

    #[tokio::test]
    async fn non_premium_user_is_gated_before_any_provider_call() {
        let calls = Arc::new(AtomicUsize::new(0));
        let state = state_with_counter(calls.clone());

        let err = generate_petition(&state, &user(false), &request())
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::PremiumRequired));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn expired_premium_is_gated() {
        let calls = Arc::new(AtomicUsize::new(0));
        let state = state_with_counter(calls.clone());

        let mut expired = user(true);
        expired.premium_until = Some(OffsetDateTime::now_utc() - Duration::days(1));

        let err = generate_petition(&state, &expired, &request())
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::PremiumRequired));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn validation_failure_precedes_provider_call() {
        let calls = Arc::new(AtomicUsize::new(0));
        let state = state_with_counter(calls.clone());

        let mut bad = request();
        bad.incident_details.clear();

        let err = generate_petition(&state, &user(true), &bad)
            .await
            .unwrap_err();

        match err {
            ApiError::Validation(msg) => {
                assert_eq!(msg, "Empty value for field: incident_details")
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
