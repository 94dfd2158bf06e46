/// Database access layer for lead-service
///
/// Repositories are free async functions over sqlx executors. Read paths
/// take the pool; mutations that participate in a queue operation take the
/// transaction connection so the caller controls the commit boundary.
pub mod activity_repo;
pub mod lead_repo;
