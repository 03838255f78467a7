use sqlx::PgPool;
use uuid::Uuid;

use crate::models::onboarding::{NegotiationGoalsRow, UserProfileRow};
use crate::onboarding::validation::{NegotiationGoals, ProfileData};

/// One profile per user; saving again replaces every field.
pub async fn upsert_profile(
    pool: &PgPool,
    user_id: Uuid,
    profile: &ProfileData,
) -> Result<UserProfileRow, sqlx::Error> {
    sqlx::query_as::<_, UserProfileRow>(
        r#"
        INSERT INTO user_profiles
            (id, user_id, job_description, company, linkedin_url,
             additional_info, resume_url, cover_letter_url)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ON CONFLICT (user_id) DO UPDATE SET
            job_description  = EXCLUDED.job_description,
            company          = EXCLUDED.company,
            linkedin_url     = EXCLUDED.linkedin_url,
            additional_info  = EXCLUDED.additional_info,
            resume_url       = EXCLUDED.resume_url,
            cover_letter_url = EXCLUDED.cover_letter_url,
            updated_at       = now()
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(&profile.job_description)
    .bind(&profile.company)
    .bind(&profile.linkedin_url)
    .bind(&profile.additional_info)
    .bind(&profile.resume_url)
    .bind(&profile.cover_letter_url)
    .fetch_one(pool)
    .await
}

pub async fn find_profile(pool: &PgPool, user_id: Uuid) -> Result<Option<UserProfileRow>, sqlx::Error> {
    sqlx::query_as::<_, UserProfileRow>("SELECT * FROM user_profiles WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

pub async fn upsert_goals(
    pool: &PgPool,
    user_id: Uuid,
    goals: &NegotiationGoals,
) -> Result<NegotiationGoalsRow, sqlx::Error> {
    sqlx::query_as::<_, NegotiationGoalsRow>(
        r#"
        INSERT INTO negotiation_goals (id, user_id, reservation_price, target_price, batna)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (user_id) DO UPDATE SET
            reservation_price = EXCLUDED.reservation_price,
            target_price      = EXCLUDED.target_price,
            batna             = EXCLUDED.batna,
            updated_at        = now()
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(goals.reservation_price)
    .bind(goals.target_price)
    .bind(&goals.batna)
    .fetch_one(pool)
    .await
}

pub async fn find_goals(pool: &PgPool, user_id: Uuid) -> Result<Option<NegotiationGoalsRow>, sqlx::Error> {
    sqlx::query_as::<_, NegotiationGoalsRow>("SELECT * FROM negotiation_goals WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

pub async fn mark_onboarding_complete(pool: &PgPool, user_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO profiles (id, onboarding_completed)
        VALUES ($1, true)
        ON CONFLICT (id) DO UPDATE SET onboarding_completed = true, updated_at = now()
        "#,
    )
    .bind(user_id)
    .execute(pool)
    .await?;
    Ok(())
}

/// `false` for users without a status row.
pub async fn onboarding_completed(pool: &PgPool, user_id: Uuid) -> Result<bool, sqlx::Error> {
    let completed: Option<bool> =
        sqlx::query_scalar("SELECT onboarding_completed FROM profiles WHERE id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await?;
    Ok(completed.unwrap_or(false))
}
