use crate::models::Lead;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

/// Column list shared by every query that materializes a `Lead`
const LEAD_COLUMNS: &str = "id, company_name, contact_name, email, phone, \
     project_description, source, estimated_value, urgency_level, client_tier, \
     budget_confirmed, strategic_fit, score, queue_position, status, \
     assigned_to, is_active, created_at, updated_at";

/// Insert payload for a new lead
#[derive(Debug, Clone)]
pub struct NewLead {
    pub company_name: String,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub project_description: Option<String>,
    pub source: Option<String>,
    pub estimated_value: f64,
    pub urgency_level: i32,
    pub client_tier: String,
    pub budget_confirmed: bool,
    pub strategic_fit: bool,
    pub assigned_to: Option<String>,
}

/// List filters and ordering for lead queries
#[derive(Debug, Clone)]
pub struct LeadFilter {
    pub is_active: Option<bool>,
    pub status: Option<String>,
    pub client_tier: Option<String>,
    pub order_by: LeadOrder,
    pub limit: i64,
    pub offset: i64,
}

impl Default for LeadFilter {
    fn default() -> Self {
        Self {
            is_active: Some(true),
            status: None,
            client_tier: None,
            order_by: LeadOrder::QueuePosition,
            limit: 100,
            offset: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadOrder {
    QueuePosition,
    Score,
    CreatedAt,
}

impl LeadOrder {
    pub fn from_str(s: &str) -> Self {
        match s {
            "score" => Self::Score,
            "created_at" => Self::CreatedAt,
            _ => Self::QueuePosition,
        }
    }

    fn order_clause(&self) -> &'static str {
        match self {
            Self::QueuePosition => "queue_position ASC",
            Self::Score => "score DESC",
            Self::CreatedAt => "created_at DESC",
        }
    }
}

/// Insert a new lead with its computed score and queue position
pub async fn create_lead(
    conn: &mut PgConnection,
    lead: &NewLead,
    score: i32,
    queue_position: i32,
) -> Result<Lead, sqlx::Error> {
    let query = format!(
        r#"
        INSERT INTO leads (
            company_name, contact_name, email, phone, project_description,
            source, estimated_value, urgency_level, client_tier,
            budget_confirmed, strategic_fit, score, queue_position, assigned_to
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
        RETURNING {LEAD_COLUMNS}
        "#
    );

    sqlx::query_as::<_, Lead>(&query)
        .bind(&lead.company_name)
        .bind(&lead.contact_name)
        .bind(&lead.email)
        .bind(&lead.phone)
        .bind(&lead.project_description)
        .bind(&lead.source)
        .bind(lead.estimated_value)
        .bind(lead.urgency_level)
        .bind(&lead.client_tier)
        .bind(lead.budget_confirmed)
        .bind(lead.strategic_fit)
        .bind(score)
        .bind(queue_position)
        .bind(&lead.assigned_to)
        .fetch_one(conn)
        .await
}

/// Find a lead by ID (active or not)
pub async fn find_lead_by_id(pool: &PgPool, lead_id: Uuid) -> Result<Option<Lead>, sqlx::Error> {
    let query = format!("SELECT {LEAD_COLUMNS} FROM leads WHERE id = $1");

    sqlx::query_as::<_, Lead>(&query)
        .bind(lead_id)
        .fetch_optional(pool)
        .await
}

/// Find a lead by ID inside a transaction, locking the row
pub async fn find_lead_for_update(
    conn: &mut PgConnection,
    lead_id: Uuid,
) -> Result<Option<Lead>, sqlx::Error> {
    let query = format!("SELECT {LEAD_COLUMNS} FROM leads WHERE id = $1 FOR UPDATE");

    sqlx::query_as::<_, Lead>(&query)
        .bind(lead_id)
        .fetch_optional(conn)
        .await
}

/// List leads with filtering, ordering and pagination
pub async fn list_leads(pool: &PgPool, filter: &LeadFilter) -> Result<Vec<Lead>, sqlx::Error> {
    let query = format!(
        r#"
        SELECT {LEAD_COLUMNS}
        FROM leads
        WHERE ($1::boolean IS NULL OR is_active = $1)
          AND ($2::text IS NULL OR status = $2)
          AND ($3::text IS NULL OR client_tier = $3)
        ORDER BY {order}
        LIMIT $4 OFFSET $5
        "#,
        order = filter.order_by.order_clause()
    );

    sqlx::query_as::<_, Lead>(&query)
        .bind(filter.is_active)
        .bind(&filter.status)
        .bind(&filter.client_tier)
        .bind(filter.limit)
        .bind(filter.offset)
        .fetch_all(pool)
        .await
}

/// Count leads matching the filter
pub async fn count_leads(pool: &PgPool, filter: &LeadFilter) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*)
        FROM leads
        WHERE ($1::boolean IS NULL OR is_active = $1)
          AND ($2::text IS NULL OR status = $2)
          AND ($3::text IS NULL OR client_tier = $3)
        "#,
    )
    .bind(filter.is_active)
    .bind(&filter.status)
    .bind(&filter.client_tier)
    .fetch_one(pool)
    .await?;

    Ok(count)
}

/// Maximum queue position among active leads, if any
pub async fn max_active_position(conn: &mut PgConnection) -> Result<Option<i32>, sqlx::Error> {
    let (max,): (Option<i32>,) =
        sqlx::query_as("SELECT MAX(queue_position) FROM leads WHERE is_active = TRUE")
            .fetch_one(conn)
            .await?;

    Ok(max)
}

/// Active leads ordered for the prioritized queue view
pub async fn get_queue(pool: &PgPool, limit: i64) -> Result<Vec<Lead>, sqlx::Error> {
    let query = format!(
        r#"
        SELECT {LEAD_COLUMNS}
        FROM leads
        WHERE is_active = TRUE
        ORDER BY queue_position ASC
        LIMIT $1
        "#
    );

    sqlx::query_as::<_, Lead>(&query)
        .bind(limit)
        .fetch_all(pool)
        .await
}

/// Active lead ids ordered by score descending; ties resolved by creation
/// time, then id, so the ranking is total
pub async fn active_ids_by_score(conn: &mut PgConnection) -> Result<Vec<Uuid>, sqlx::Error> {
    let rows: Vec<(Uuid,)> = sqlx::query_as(
        r#"
        SELECT id
        FROM leads
        WHERE is_active = TRUE
        ORDER BY score DESC, created_at ASC, id ASC
        "#,
    )
    .fetch_all(conn)
    .await?;

    Ok(rows.into_iter().map(|(id,)| id).collect())
}

/// Active lead ids in current queue order; the secondary keys make the
/// ordering stable when positions collide after a bulk reorder
pub async fn active_ids_by_position(conn: &mut PgConnection) -> Result<Vec<Uuid>, sqlx::Error> {
    let rows: Vec<(Uuid,)> = sqlx::query_as(
        r#"
        SELECT id
        FROM leads
        WHERE is_active = TRUE
        ORDER BY queue_position ASC, created_at ASC, id ASC
        "#,
    )
    .fetch_all(conn)
    .await?;

    Ok(rows.into_iter().map(|(id,)| id).collect())
}

/// All active leads, for bulk score recalculation
pub async fn active_leads(conn: &mut PgConnection) -> Result<Vec<Lead>, sqlx::Error> {
    let query = format!("SELECT {LEAD_COLUMNS} FROM leads WHERE is_active = TRUE");

    sqlx::query_as::<_, Lead>(&query).fetch_all(conn).await
}

/// Set a lead's queue position directly; returns whether a row matched
pub async fn set_position(
    conn: &mut PgConnection,
    lead_id: Uuid,
    position: i32,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE leads SET queue_position = $1, updated_at = NOW() WHERE id = $2",
    )
    .bind(position)
    .bind(lead_id)
    .execute(conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Persist a recomputed score
pub async fn set_score(
    conn: &mut PgConnection,
    lead_id: Uuid,
    score: i32,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE leads SET score = $1, updated_at = NOW() WHERE id = $2")
        .bind(score)
        .bind(lead_id)
        .execute(conn)
        .await?;

    Ok(())
}

/// Shift every other active lead whose position lies in `[lo, hi]` by
/// `delta` slots, as a single relative update
pub async fn shift_positions(
    conn: &mut PgConnection,
    lo: i32,
    hi: i32,
    delta: i32,
    exclude_id: Uuid,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE leads
        SET queue_position = queue_position + $1, updated_at = NOW()
        WHERE queue_position >= $2
          AND queue_position <= $3
          AND is_active = TRUE
          AND id != $4
        "#,
    )
    .bind(delta)
    .bind(lo)
    .bind(hi)
    .bind(exclude_id)
    .execute(conn)
    .await?;

    Ok(result.rows_affected())
}

/// Write the mutable fields of a lead back to its row
pub async fn update_lead_row(conn: &mut PgConnection, lead: &Lead) -> Result<Lead, sqlx::Error> {
    let query = format!(
        r#"
        UPDATE leads
        SET company_name = $1, contact_name = $2, email = $3, phone = $4,
            project_description = $5, source = $6, estimated_value = $7,
            urgency_level = $8, client_tier = $9, budget_confirmed = $10,
            strategic_fit = $11, score = $12, queue_position = $13,
            status = $14, assigned_to = $15, updated_at = NOW()
        WHERE id = $16
        RETURNING {LEAD_COLUMNS}
        "#
    );

    sqlx::query_as::<_, Lead>(&query)
        .bind(&lead.company_name)
        .bind(&lead.contact_name)
        .bind(&lead.email)
        .bind(&lead.phone)
        .bind(&lead.project_description)
        .bind(&lead.source)
        .bind(lead.estimated_value)
        .bind(lead.urgency_level)
        .bind(&lead.client_tier)
        .bind(lead.budget_confirmed)
        .bind(lead.strategic_fit)
        .bind(lead.score)
        .bind(lead.queue_position)
        .bind(&lead.status)
        .bind(&lead.assigned_to)
        .bind(lead.id)
        .fetch_one(conn)
        .await
}

/// Soft delete a lead; its queue position is left untouched
pub async fn soft_delete_lead(conn: &mut PgConnection, lead_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE leads SET is_active = FALSE, updated_at = NOW() WHERE id = $1 AND is_active = TRUE",
    )
    .bind(lead_id)
    .execute(conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

// ========================================
// Aggregates for queue statistics
// ========================================

pub async fn count_all(pool: &PgPool) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM leads")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn count_active(pool: &PgPool) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM leads WHERE is_active = TRUE")
            .fetch_one(pool)
            .await?;
    Ok(count)
}

pub async fn count_active_by_status(pool: &PgPool) -> Result<Vec<(String, i64)>, sqlx::Error> {
    sqlx::query_as(
        "SELECT status, COUNT(*) FROM leads WHERE is_active = TRUE GROUP BY status",
    )
    .fetch_all(pool)
    .await
}

pub async fn count_active_by_tier(pool: &PgPool) -> Result<Vec<(String, i64)>, sqlx::Error> {
    sqlx::query_as(
        "SELECT client_tier, COUNT(*) FROM leads WHERE is_active = TRUE GROUP BY client_tier",
    )
    .fetch_all(pool)
    .await
}

pub async fn sum_active_value(pool: &PgPool) -> Result<f64, sqlx::Error> {
    let (sum,): (Option<f64>,) =
        sqlx::query_as("SELECT SUM(estimated_value) FROM leads WHERE is_active = TRUE")
            .fetch_one(pool)
            .await?;
    Ok(sum.unwrap_or(0.0))
}

pub async fn avg_active_score(pool: &PgPool) -> Result<f64, sqlx::Error> {
    let (avg,): (Option<f64>,) =
        sqlx::query_as("SELECT AVG(score::float8) FROM leads WHERE is_active = TRUE")
            .fetch_one(pool)
            .await?;
    Ok(avg.unwrap_or(0.0))
}

pub async fn count_high_priority(pool: &PgPool, threshold: i32) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM leads WHERE is_active = TRUE AND score >= $1",
    )
    .bind(threshold)
    .fetch_one(pool)
    .await?;
    Ok(count)
}
