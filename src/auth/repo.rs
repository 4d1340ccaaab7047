use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::error::ApiError;

/// Longest accepted premium activation; keeps the expiry timestamp inside
/// the representable date range.
pub const MAX_PREMIUM_DURATION_DAYS: i64 = 3650;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub full_name: Option<String>,
    pub is_active: bool,
    pub is_premium: bool,
    pub premium_until: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Premium entitlement fields after a lazy expiry check. Clearing is
/// idempotent: an already-cleared pair maps to itself.
pub fn refreshed_premium_fields(
    is_premium: bool,
    premium_until: Option<OffsetDateTime>,
    now: OffsetDateTime,
) -> (bool, Option<OffsetDateTime>) {
    match (is_premium, premium_until) {
        (true, Some(until)) if until < now => (false, None),
        other => other,
    }
}

/// Range check for an activation request. Runs before any database access,
/// so a bad duration never touches the user's stored premium state.
pub fn validate_premium_duration(duration_days: i64) -> Result<(), ApiError> {
    if duration_days < 1 {
        return Err(ApiError::Validation(
            "Premium duration must be at least one day".into(),
        ));
    }
    if duration_days > MAX_PREMIUM_DURATION_DAYS {
        return Err(ApiError::Validation(
            "Premium duration exceeds the allowed maximum".into(),
        ));
    }
    Ok(())
}

/// Entitlement expiry timestamp for a validated activation of `duration_days`.
pub fn premium_expiry(now: OffsetDateTime, duration_days: i64) -> OffsetDateTime {
    now + Duration::days(duration_days)
}

impl User {
    /// Premium flag is only meaningful while the expiry is in the future.
    pub fn premium_active(&self, now: OffsetDateTime) -> bool {
        self.is_premium && self.premium_until.is_some_and(|until| until > now)
    }

    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, full_name, is_active, is_premium,
                   premium_until, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, full_name, is_active, is_premium,
                   premium_until, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Create a new user with hashed password.
    pub async fn create(
        db: &PgPool,
        email: &str,
        password_hash: &str,
        full_name: &str,
    ) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, full_name)
            VALUES ($1, $2, $3)
            RETURNING id, email, password_hash, full_name, is_active, is_premium,
                      premium_until, created_at, updated_at
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(full_name)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    /// Partial profile update; `None` leaves the column unchanged.
    pub async fn update_profile(
        db: &PgPool,
        id: Uuid,
        email: Option<&str>,
        full_name: Option<&str>,
        password_hash: Option<&str>,
    ) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET email = COALESCE($2, email),
                full_name = COALESCE($3, full_name),
                password_hash = COALESCE($4, password_hash),
                updated_at = now()
            WHERE id = $1
            RETURNING id, email, password_hash, full_name, is_active, is_premium,
                      premium_until, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(email)
        .bind(full_name)
        .bind(password_hash)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    pub async fn activate_premium(
        db: &PgPool,
        id: Uuid,
        until: OffsetDateTime,
    ) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET is_premium = true, premium_until = $2, updated_at = now()
            WHERE id = $1
            RETURNING id, email, password_hash, full_name, is_active, is_premium,
                      premium_until, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(until)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    async fn clear_premium(db: &PgPool, id: Uuid) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET is_premium = false, premium_until = NULL, updated_at = now()
            WHERE id = $1
            RETURNING id, email, password_hash, full_name, is_active, is_premium,
                      premium_until, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    /// Lazy expiry: entitlement is recalculated whenever a user is loaded,
    /// not by a background sweep. Clears the stored flag once the expiry
    /// timestamp is in the past.
    pub async fn refresh_premium(self, db: &PgPool) -> anyhow::Result<User> {
        let now = OffsetDateTime::now_utc();
        let (is_premium, premium_until) =
            refreshed_premium_fields(self.is_premium, self.premium_until, now);
        if is_premium == self.is_premium && premium_until == self.premium_until {
            return Ok(self);
        }
        tracing::info!(user_id = %self.id, "premium subscription expired");
        User::clear_premium(db, self.id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;

    fn user_with_premium(is_premium: bool, until: Option<OffsetDateTime>) -> User {
        let now = OffsetDateTime::now_utc();
        User {
            id: Uuid::new_v4(),
            email: "a@b.c".into(),
            password_hash: "x".into(),
            full_name: None,
            is_active: true,
            is_premium,
            premium_until: until,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn premium_requires_future_expiry() {
        let now = OffsetDateTime::now_utc();
        let active = user_with_premium(true, Some(now + Duration::days(5)));
        assert!(active.premium_active(now));

        let expired = user_with_premium(true, Some(now - Duration::days(1)));
        assert!(!expired.premium_active(now));

        let no_expiry = user_with_premium(true, None);
        assert!(!no_expiry.premium_active(now));

        let never = user_with_premium(false, None);
        assert!(!never.premium_active(now));
    }

    #[test]
    fn expired_entitlement_is_cleared() {
        let now = OffsetDateTime::now_utc();
        let past = now - Duration::days(1);
        assert_eq!(
            refreshed_premium_fields(true, Some(past), now),
            (false, None)
        );
    }

    #[test]
    fn active_entitlement_is_untouched() {
        let now = OffsetDateTime::now_utc();
        let future = now + Duration::days(30);
        assert_eq!(
            refreshed_premium_fields(true, Some(future), now),
            (true, Some(future))
        );
    }

    #[test]
    fn clearing_is_idempotent() {
        let now = OffsetDateTime::now_utc();
        let past = now - Duration::days(1);
        let once = refreshed_premium_fields(true, Some(past), now);
        let twice = refreshed_premium_fields(once.0, once.1, now);
        assert_eq!(once, twice);
        assert_eq!(twice, (false, None));
    }

    #[test]
    fn expiry_is_duration_days_ahead() {
        let now = OffsetDateTime::now_utc();
        assert_eq!(premium_expiry(now, 30), now + Duration::days(30));
    }

    #[test]
    fn duration_within_range_is_accepted() {
        assert!(validate_premium_duration(1).is_ok());
        assert!(validate_premium_duration(30).is_ok());
        assert!(validate_premium_duration(MAX_PREMIUM_DURATION_DAYS).is_ok());
    }

    #[test]
    fn zero_and_negative_durations_are_rejected() {
        for days in [0, -1, -30] {
            match validate_premium_duration(days) {
                Err(ApiError::Validation(msg)) => {
                    assert_eq!(msg, "Premium duration must be at least one day")
                }
                other => panic!("expected validation error for {days}, got {other:?}"),
            }
        }
    }

    #[test]
    fn absurd_durations_are_rejected_not_computed() {
        // Past the cap the expiry arithmetic would leave the valid date
        // range, so the request must fail validation instead.
        match validate_premium_duration(100_000_000_000) {
            Err(ApiError::Validation(msg)) => {
                assert_eq!(msg, "Premium duration exceeds the allowed maximum")
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
