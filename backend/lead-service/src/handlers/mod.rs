/// HTTP handlers for lead-service endpoints
///
/// This module contains handlers for:
/// - Leads: CRUD, manual repositioning, activity trail, score diagnostics
/// - Queue: prioritization, bulk reorder, normalization, statistics
pub mod leads;
pub mod queue;

// Re-export handler functions at module level
pub use leads::{
    create_activity, create_lead, delete_lead, get_activities, get_lead, get_score_breakdown,
    list_leads, reorder_lead, update_lead,
};
pub use queue::{bulk_reorder, get_queue, get_stats, normalize, recalculate, reprioritize};
