/// Data models for lead-service
///
/// This module defines structures for:
/// - Lead: prospective-client record with scoring attributes and queue rank
/// - LeadActivity: append-only audit trail entry for a lead
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ========================================
// Lead Models
// ========================================

/// Client relationship tier used as a scoring input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientTier {
    New,
    Existing,
    Strategic,
}

impl ClientTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Existing => "existing",
            Self::Strategic => "strategic",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "new" => Some(Self::New),
            "existing" => Some(Self::Existing),
            "strategic" => Some(Self::Strategic),
            _ => None,
        }
    }
}

/// Lead pipeline status (not a scoring input)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
    New,
    Contacted,
    Qualified,
    Proposal,
    Won,
    Lost,
}

impl LeadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Contacted => "contacted",
            Self::Qualified => "qualified",
            Self::Proposal => "proposal",
            Self::Won => "won",
            Self::Lost => "lost",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "new" => Some(Self::New),
            "contacted" => Some(Self::Contacted),
            "qualified" => Some(Self::Qualified),
            "proposal" => Some(Self::Proposal),
            "won" => Some(Self::Won),
            "lost" => Some(Self::Lost),
            _ => None,
        }
    }
}

/// Lead database entity
///
/// `score` is derived from the five scoring inputs and must only be written
/// through the scoring engine. `queue_position` is an explicit rank among
/// active leads, maintained by the queue service.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Lead {
    pub id: Uuid,
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
    pub score: i32,
    pub queue_position: i32,
    pub status: String,
    pub assigned_to: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Lead {
    pub fn get_client_tier(&self) -> ClientTier {
        ClientTier::from_str(&self.client_tier).unwrap_or(ClientTier::New)
    }

    pub fn get_status(&self) -> LeadStatus {
        LeadStatus::from_str(&self.status).unwrap_or(LeadStatus::New)
    }
}

// ========================================
// Activity Models
// ========================================

/// Kind of audit-trail entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    Created,
    Updated,
    Deleted,
    Note,
    Call,
    Email,
    Meeting,
    Other,
}

impl ActivityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
            Self::Note => "note",
            Self::Call => "call",
            Self::Email => "email",
            Self::Meeting => "meeting",
            Self::Other => "other",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "created" => Some(Self::Created),
            "updated" => Some(Self::Updated),
            "deleted" => Some(Self::Deleted),
            "note" => Some(Self::Note),
            "call" => Some(Self::Call),
            "email" => Some(Self::Email),
            "meeting" => Some(Self::Meeting),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

/// Activity database entity
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct LeadActivity {
    pub id: Uuid,
    pub lead_id: Uuid,
    pub activity_type: String,
    pub description: Option<String>,
    pub field_changed: Option<String>,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub performed_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_tier_round_trip() {
        for tier in [ClientTier::New, ClientTier::Existing, ClientTier::Strategic] {
            assert_eq!(ClientTier::from_str(tier.as_str()), Some(tier));
        }
        assert_eq!(ClientTier::from_str("vip"), None);
    }

    #[test]
    fn test_lead_status_round_trip() {
        for status in [
            LeadStatus::New,
            LeadStatus::Contacted,
            LeadStatus::Qualified,
            LeadStatus::Proposal,
            LeadStatus::Won,
            LeadStatus::Lost,
        ] {
            assert_eq!(LeadStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(LeadStatus::from_str("archived"), None);
    }
}
