use sqlx::PgPool;
use uuid::Uuid;

use crate::coaching::validation::{NewSession, NewStrategy, SessionStatus};
use crate::models::coaching::{CoachingSessionRow, StrategyRow};

/// New sessions always start out `pending`.
pub async fn insert_session(pool: &PgPool, new: &NewSession) -> Result<CoachingSessionRow, sqlx::Error> {
    sqlx::query_as::<_, CoachingSessionRow>(
        r#"
        INSERT INTO coaching_sessions
            (id, user_id, communication_type, latest_communication,
             company_response, additional_context, files, status)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(new.user_id)
    .bind(&new.communication_type)
    .bind(&new.latest_communication)
    .bind(&new.company_response)
    .bind(&new.additional_context)
    .bind(&new.files)
    .bind(SessionStatus::Pending.as_str())
    .fetch_one(pool)
    .await
}

pub async fn find_session(pool: &PgPool, id: Uuid) -> Result<Option<CoachingSessionRow>, sqlx::Error> {
    sqlx::query_as::<_, CoachingSessionRow>("SELECT * FROM coaching_sessions WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list_user_sessions(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<CoachingSessionRow>, sqlx::Error> {
    sqlx::query_as::<_, CoachingSessionRow>(
        "SELECT * FROM coaching_sessions WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Returns `false` when no session has this id.
pub async fn set_session_status(
    pool: &PgPool,
    id: Uuid,
    status: SessionStatus,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE coaching_sessions SET status = $2, updated_at = now() WHERE id = $1",
    )
    .bind(id)
    .bind(status.as_str())
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Inserts only when the session exists and belongs to the strategy's user.
pub async fn insert_strategy(
    pool: &PgPool,
    session_id: Uuid,
    new: &NewStrategy,
) -> Result<Option<StrategyRow>, sqlx::Error> {
    sqlx::query_as::<_, StrategyRow>(
        r#"
        INSERT INTO strategies
            (id, session_id, user_id, strategy_type, content,
             confidence_score, expected_outcome, tactics)
        SELECT $1, s.id, s.user_id, $4, $5, $6, $7, $8
        FROM coaching_sessions s
        WHERE s.id = $2 AND s.user_id = $3
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(session_id)
    .bind(new.user_id)
    .bind(&new.strategy_type)
    .bind(&new.content)
    .bind(new.confidence_score)
    .bind(&new.expected_outcome)
    .bind(&new.tactics)
    .fetch_optional(pool)
    .await
}

pub async fn list_session_strategies(
    pool: &PgPool,
    session_id: Uuid,
) -> Result<Vec<StrategyRow>, sqlx::Error> {
    sqlx::query_as::<_, StrategyRow>(
        "SELECT * FROM strategies WHERE session_id = $1 ORDER BY created_at DESC",
    )
    .bind(session_id)
    .fetch_all(pool)
    .await
}

pub async fn list_user_strategies(pool: &PgPool, user_id: Uuid) -> Result<Vec<StrategyRow>, sqlx::Error> {
    sqlx::query_as::<_, StrategyRow>(
        "SELECT * FROM strategies WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}
