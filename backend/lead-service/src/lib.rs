/// Lead Service Library
///
/// Lead management and priority-queue backend for the salon business API.
/// Stores prospective-client leads, derives a 0-100 priority score from
/// weighted business attributes, and maintains an explicit, manually
/// reorderable queue over the active leads.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers for leads and queue operations
/// - `models`: Lead and activity data structures
/// - `services`: Business logic layer (scoring, queue maintenance, CRUD)
/// - `db`: Database access layer and repositories
/// - `error`: Error types and handling
/// - `config`: Configuration management
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod openapi;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};
