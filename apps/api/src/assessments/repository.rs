use sqlx::PgPool;
use uuid::Uuid;

use crate::assessments::validation::{AnalysisPatch, ClientInfo, NewAssessment};
use crate::models::assessment::AssessmentRow;

pub async fn insert_assessment(
    pool: &PgPool,
    new: &NewAssessment,
    client: &ClientInfo,
) -> Result<AssessmentRow, sqlx::Error> {
    sqlx::query_as::<_, AssessmentRow>(
        r#"
        INSERT INTO assessments
            (id, job_title, company, offer_amount, benefits, additional_context,
             ip_address, user_agent)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&new.job_title)
    .bind(&new.company)
    .bind(new.offer_amount)
    .bind(&new.benefits)
    .bind(&new.additional_context)
    .bind(&client.ip_address)
    .bind(&client.user_agent)
    .fetch_one(pool)
    .await
}

pub async fn find_assessment(pool: &PgPool, id: Uuid) -> Result<Option<AssessmentRow>, sqlx::Error> {
    sqlx::query_as::<_, AssessmentRow>("SELECT * FROM assessments WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Absent patch fields keep their stored value.
pub async fn update_analysis(
    pool: &PgPool,
    id: Uuid,
    patch: &AnalysisPatch,
) -> Result<Option<AssessmentRow>, sqlx::Error> {
    sqlx::query_as::<_, AssessmentRow>(
        r#"
        UPDATE assessments SET
            market_analysis  = COALESCE($2, market_analysis),
            red_flags        = COALESCE($3, red_flags),
            opportunities    = COALESCE($4, opportunities),
            confidence_score = COALESCE($5, confidence_score)
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&patch.market_analysis)
    .bind(&patch.red_flags)
    .bind(&patch.opportunities)
    .bind(patch.confidence_score)
    .fetch_optional(pool)
    .await
}

pub async fn append_file(
    pool: &PgPool,
    id: Uuid,
    file: &serde_json::Value,
) -> Result<Option<AssessmentRow>, sqlx::Error> {
    sqlx::query_as::<_, AssessmentRow>(
        r#"
        UPDATE assessments
        SET files = COALESCE(files, '[]'::jsonb) || jsonb_build_array($2::jsonb)
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(file)
    .fetch_optional(pool)
    .await
}
