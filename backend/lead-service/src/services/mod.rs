/// Business logic layer
///
/// - `scoring`: pure priority-score computation
/// - `queue`: queue ordering and statistics over the active-lead set
/// - `leads`: lead CRUD and audit-trail orchestration
pub mod leads;
pub mod queue;
pub mod scoring;

pub use leads::{LeadChanges, LeadService};
pub use queue::{LeadPosition, QueueService, QueueStats};
