/// Lead service - lead creation, retrieval, updates, and audit trail
use crate::db::activity_repo::{self, NewActivity};
use crate::db::lead_repo::{self, LeadFilter, NewLead};
use crate::error::Result;
use crate::models::{ActivityType, Lead, LeadActivity};
use crate::services::scoring::{self, ScoreBreakdown, ScoreInputs};
use sqlx::PgPool;
use uuid::Uuid;

/// Patch-style field changes for a lead; `None` leaves a field untouched
#[derive(Debug, Clone, Default)]
pub struct LeadChanges {
    pub company_name: Option<String>,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub project_description: Option<String>,
    pub source: Option<String>,
    pub estimated_value: Option<f64>,
    pub urgency_level: Option<i32>,
    pub client_tier: Option<String>,
    pub budget_confirmed: Option<bool>,
    pub strategic_fit: Option<bool>,
    pub status: Option<String>,
    pub assigned_to: Option<String>,
    pub queue_position: Option<i32>,
}

pub struct LeadService {
    pool: PgPool,
}

impl LeadService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a lead with an auto-calculated score, appended at the tail of
    /// the active queue, logging a `created` activity in the same
    /// transaction.
    pub async fn create_lead(
        &self,
        new_lead: NewLead,
        performed_by: Option<String>,
    ) -> Result<Lead> {
        let score = scoring::calculate_score(&ScoreInputs {
            estimated_value: new_lead.estimated_value,
            urgency_level: new_lead.urgency_level,
            client_tier: &new_lead.client_tier,
            budget_confirmed: new_lead.budget_confirmed,
            strategic_fit: new_lead.strategic_fit,
        });

        let mut tx = self.pool.begin().await?;

        let position = lead_repo::max_active_position(&mut tx)
            .await?
            .map_or(0, |max| max + 1);

        let lead = lead_repo::create_lead(&mut tx, &new_lead, score, position).await?;

        activity_repo::log_activity(
            &mut tx,
            lead.id,
            &NewActivity {
                activity_type: ActivityType::Created.as_str().to_string(),
                description: Some(format!("Lead created: {}", lead.company_name)),
                performed_by,
                ..Default::default()
            },
        )
        .await?;

        tx.commit().await?;

        tracing::info!(lead_id = %lead.id, score, position, "lead created");
        Ok(lead)
    }

    /// Get a single lead by ID
    pub async fn get_lead(&self, lead_id: Uuid) -> Result<Option<Lead>> {
        Ok(lead_repo::find_lead_by_id(&self.pool, lead_id).await?)
    }

    /// List leads with filtering and pagination
    pub async fn list_leads(&self, filter: &LeadFilter) -> Result<Vec<Lead>> {
        Ok(lead_repo::list_leads(&self.pool, filter).await?)
    }

    /// Count leads matching the filter
    pub async fn count_leads(&self, filter: &LeadFilter) -> Result<i64> {
        Ok(lead_repo::count_leads(&self.pool, filter).await?)
    }

    /// Apply patch-style changes to a lead. Each changed field is logged as
    /// an `updated` activity; the score is recomputed when any scoring input
    /// changed. Returns `None` for an unknown id.
    pub async fn update_lead(
        &self,
        lead_id: Uuid,
        changes: LeadChanges,
        performed_by: Option<String>,
    ) -> Result<Option<Lead>> {
        let mut tx = self.pool.begin().await?;

        let Some(mut lead) = lead_repo::find_lead_for_update(&mut tx, lead_id).await? else {
            return Ok(None);
        };

        let mut changed_fields: Vec<(&'static str, String, String)> = Vec::new();
        let mut score_changed = false;

        // Required columns: the change replaces the value directly
        macro_rules! apply {
            ($field:ident, $scoring:expr) => {
                if let Some(value) = changes.$field {
                    if lead.$field != value {
                        changed_fields.push((
                            stringify!($field),
                            format_value(&lead.$field),
                            format_value(&value),
                        ));
                        lead.$field = value;
                        if $scoring {
                            score_changed = true;
                        }
                    }
                }
            };
        }

        // Nullable columns: a provided change sets the value; absent changes
        // leave the column as-is (fields cannot be nulled through a patch)
        macro_rules! apply_opt {
            ($field:ident) => {
                if let Some(value) = changes.$field {
                    if lead.$field.as_deref() != Some(value.as_str()) {
                        changed_fields.push((
                            stringify!($field),
                            format_value(&lead.$field),
                            format_value(&value),
                        ));
                        lead.$field = Some(value);
                    }
                }
            };
        }

        apply!(company_name, false);
        apply_opt!(contact_name);
        apply_opt!(email);
        apply_opt!(phone);
        apply_opt!(project_description);
        apply_opt!(source);
        apply!(estimated_value, true);
        apply!(urgency_level, true);
        apply!(client_tier, true);
        apply!(budget_confirmed, true);
        apply!(strategic_fit, true);
        apply!(status, false);
        apply_opt!(assigned_to);
        apply!(queue_position, false);

        if changed_fields.is_empty() {
            tx.commit().await?;
            return Ok(Some(lead));
        }

        if score_changed {
            lead.score = scoring::calculate_score(&ScoreInputs::from(&lead));
        }

        let updated = lead_repo::update_lead_row(&mut tx, &lead).await?;

        for (field, old_value, new_value) in changed_fields {
            activity_repo::log_activity(
                &mut tx,
                lead_id,
                &NewActivity {
                    activity_type: ActivityType::Updated.as_str().to_string(),
                    description: Some(format!("Changed {}", field)),
                    field_changed: Some(field.to_string()),
                    old_value: Some(old_value),
                    new_value: Some(new_value),
                    performed_by: performed_by.clone(),
                },
            )
            .await?;
        }

        tx.commit().await?;

        tracing::debug!(lead_id = %lead_id, score_changed, "lead updated");
        Ok(Some(updated))
    }

    /// Soft delete a lead. Other leads' positions are deliberately left
    /// untouched; the gap persists until normalize runs.
    pub async fn delete_lead(&self, lead_id: Uuid, performed_by: Option<String>) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        let deleted = lead_repo::soft_delete_lead(&mut tx, lead_id).await?;
        if deleted {
            activity_repo::log_activity(
                &mut tx,
                lead_id,
                &NewActivity {
                    activity_type: ActivityType::Deleted.as_str().to_string(),
                    description: Some("Lead soft deleted".to_string()),
                    performed_by,
                    ..Default::default()
                },
            )
            .await?;
        }

        tx.commit().await?;
        Ok(deleted)
    }

    /// Record a manual activity (note, call, ...) on a lead. Returns `None`
    /// for an unknown lead.
    pub async fn log_activity(
        &self,
        lead_id: Uuid,
        activity: NewActivity,
    ) -> Result<Option<LeadActivity>> {
        if lead_repo::find_lead_by_id(&self.pool, lead_id).await?.is_none() {
            return Ok(None);
        }

        let mut conn = self.pool.acquire().await?;
        let entry = activity_repo::log_activity(&mut conn, lead_id, &activity).await?;
        Ok(Some(entry))
    }

    /// Activity history for a lead, newest first. Returns `None` for an
    /// unknown lead.
    pub async fn get_activities(
        &self,
        lead_id: Uuid,
        limit: i64,
    ) -> Result<Option<Vec<LeadActivity>>> {
        if lead_repo::find_lead_by_id(&self.pool, lead_id).await?.is_none() {
            return Ok(None);
        }

        let activities = activity_repo::get_activities(&self.pool, lead_id, limit).await?;
        Ok(Some(activities))
    }

    /// Diagnostic score breakdown for a lead
    pub async fn score_breakdown(&self, lead_id: Uuid) -> Result<Option<ScoreBreakdown>> {
        let lead = lead_repo::find_lead_by_id(&self.pool, lead_id).await?;
        Ok(lead.map(|lead| scoring::score_breakdown(&ScoreInputs::from(&lead))))
    }
}

fn format_value<T: std::fmt::Debug>(value: &T) -> String {
    format!("{:?}", value)
}
