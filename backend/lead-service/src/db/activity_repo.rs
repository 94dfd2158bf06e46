use crate::models::LeadActivity;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

const ACTIVITY_COLUMNS: &str = "id, lead_id, activity_type, description, \
     field_changed, old_value, new_value, performed_by, created_at";

/// Append payload for an audit-trail entry
#[derive(Debug, Clone, Default)]
pub struct NewActivity {
    pub activity_type: String,
    pub description: Option<String>,
    pub field_changed: Option<String>,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub performed_by: Option<String>,
}

/// Append an activity record for a lead
pub async fn log_activity(
    conn: &mut PgConnection,
    lead_id: Uuid,
    activity: &NewActivity,
) -> Result<LeadActivity, sqlx::Error> {
    let query = format!(
        r#"
        INSERT INTO lead_activities (
            lead_id, activity_type, description, field_changed,
            old_value, new_value, performed_by
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {ACTIVITY_COLUMNS}
        "#
    );

    sqlx::query_as::<_, LeadActivity>(&query)
        .bind(lead_id)
        .bind(&activity.activity_type)
        .bind(&activity.description)
        .bind(&activity.field_changed)
        .bind(&activity.old_value)
        .bind(&activity.new_value)
        .bind(&activity.performed_by)
        .fetch_one(conn)
        .await
}

/// Activity history for a lead, newest first
pub async fn get_activities(
    pool: &PgPool,
    lead_id: Uuid,
    limit: i64,
) -> Result<Vec<LeadActivity>, sqlx::Error> {
    let query = format!(
        r#"
        SELECT {ACTIVITY_COLUMNS}
        FROM lead_activities
        WHERE lead_id = $1
        ORDER BY created_at DESC
        LIMIT $2
        "#
    );

    sqlx::query_as::<_, LeadActivity>(&query)
        .bind(lead_id)
        .bind(limit)
        .fetch_all(pool)
        .await
}
