/// Queue handlers - HTTP endpoints for priority-queue operations
use crate::error::Result;
use crate::handlers::leads::MessageResponse;
use crate::services::{LeadPosition, QueueService};
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;

#[derive(Debug, Deserialize)]
pub struct QueueQuery {
    #[serde(default = "default_queue_limit")]
    pub limit: i64,
}

fn default_queue_limit() -> i64 {
    50
}

/// Bulk reorder multiple leads at once
#[derive(Debug, Deserialize)]
pub struct BulkReorderRequest {
    pub lead_positions: Vec<LeadPosition>,
}

/// Get the prioritized lead queue
pub async fn get_queue(
    pool: web::Data<PgPool>,
    query: web::Query<QueueQuery>,
) -> Result<HttpResponse> {
    let service = QueueService::new((**pool).clone());
    let leads = service.get_queue(query.limit.clamp(1, 200)).await?;
    Ok(HttpResponse::Ok().json(leads))
}

/// Auto-sort the queue by score
pub async fn reprioritize(pool: web::Data<PgPool>) -> Result<HttpResponse> {
    let service = QueueService::new((**pool).clone());
    let count = service.auto_prioritize().await?;
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: format!("Reprioritized {} leads", count),
        success: true,
    }))
}

/// Recalculate all lead scores
pub async fn recalculate(pool: web::Data<PgPool>) -> Result<HttpResponse> {
    let service = QueueService::new((**pool).clone());
    let count = service.recalculate_all_scores().await?;
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: format!("Recalculated {} scores", count),
        success: true,
    }))
}

/// Bulk reorder multiple leads
pub async fn bulk_reorder(
    pool: web::Data<PgPool>,
    req: web::Json<BulkReorderRequest>,
) -> Result<HttpResponse> {
    let service = QueueService::new((**pool).clone());
    let count = service.bulk_reorder(&req.lead_positions).await?;
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: format!("Reordered {} leads", count),
        success: true,
    }))
}

/// Close gaps in queue positions
pub async fn normalize(pool: web::Data<PgPool>) -> Result<HttpResponse> {
    let service = QueueService::new((**pool).clone());
    let count = service.normalize_positions().await?;
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: format!("Normalized {} positions", count),
        success: true,
    }))
}

/// Get queue statistics
pub async fn get_stats(pool: web::Data<PgPool>) -> Result<HttpResponse> {
    let service = QueueService::new((**pool).clone());
    let stats = service.get_stats().await?;
    Ok(HttpResponse::Ok().json(stats))
}
