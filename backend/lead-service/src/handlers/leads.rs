/// Lead handlers - HTTP endpoints for lead CRUD and activity operations
use crate::db::activity_repo::NewActivity;
use crate::db::lead_repo::{LeadFilter, LeadOrder, NewLead};
use crate::error::{AppError, Result};
use crate::models::{ActivityType, ClientTier, Lead, LeadStatus};
use crate::services::{LeadChanges, LeadService};
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateLeadRequest {
    #[validate(length(min = 1, max = 255))]
    pub company_name: String,
    #[validate(length(max = 255))]
    pub contact_name: Option<String>,
    #[validate(length(max = 255))]
    pub email: Option<String>,
    #[validate(length(max = 50))]
    pub phone: Option<String>,
    pub project_description: Option<String>,
    #[validate(length(max = 100))]
    pub source: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub estimated_value: f64,
    #[serde(default = "default_urgency")]
    #[validate(range(min = 1, max = 5))]
    pub urgency_level: i32,
    #[serde(default = "default_tier")]
    pub client_tier: String,
    #[serde(default)]
    pub budget_confirmed: bool,
    #[serde(default)]
    pub strategic_fit: bool,
    #[validate(length(max = 100))]
    pub assigned_to: Option<String>,
    pub performed_by: Option<String>,
}

fn default_urgency() -> i32 {
    3
}

fn default_tier() -> String {
    "new".to_string()
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateLeadRequest {
    #[validate(length(min = 1, max = 255))]
    pub company_name: Option<String>,
    #[validate(length(max = 255))]
    pub contact_name: Option<String>,
    #[validate(length(max = 255))]
    pub email: Option<String>,
    #[validate(length(max = 50))]
    pub phone: Option<String>,
    pub project_description: Option<String>,
    #[validate(length(max = 100))]
    pub source: Option<String>,
    #[validate(range(min = 0.0))]
    pub estimated_value: Option<f64>,
    #[validate(range(min = 1, max = 5))]
    pub urgency_level: Option<i32>,
    pub client_tier: Option<String>,
    pub budget_confirmed: Option<bool>,
    pub strategic_fit: Option<bool>,
    pub status: Option<String>,
    #[validate(length(max = 100))]
    pub assigned_to: Option<String>,
    #[validate(range(min = 0))]
    pub queue_position: Option<i32>,
    pub performed_by: Option<String>,
}

/// Pagination and filter query parameters for lead listing
#[derive(Debug, Deserialize)]
pub struct LeadListQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
    pub status: Option<String>,
    pub client_tier: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default = "default_order")]
    pub order_by: String,
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    20
}

fn default_true() -> bool {
    true
}

fn default_order() -> String {
    "queue_position".to_string()
}

/// Paginated list of leads
#[derive(Debug, Serialize)]
pub struct LeadListResponse {
    pub leads: Vec<Lead>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
}

/// Generic success message
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
    pub success: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ReorderQuery {
    #[validate(range(min = 0))]
    pub position: i32,
}

#[derive(Debug, Deserialize)]
pub struct ActivityCreateRequest {
    pub activity_type: String,
    pub description: Option<String>,
    pub performed_by: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ActivityListQuery {
    #[serde(default = "default_activity_limit")]
    pub limit: i64,
}

fn default_activity_limit() -> i64 {
    50
}

fn validate_tier(tier: &str) -> Result<()> {
    if ClientTier::from_str(tier).is_none() {
        return Err(AppError::ValidationError(format!(
            "unknown client_tier '{}'",
            tier
        )));
    }
    Ok(())
}

fn validate_status(status: &str) -> Result<()> {
    if LeadStatus::from_str(status).is_none() {
        return Err(AppError::ValidationError(format!(
            "unknown status '{}'",
            status
        )));
    }
    Ok(())
}

/// Create a new lead
pub async fn create_lead(
    pool: web::Data<PgPool>,
    req: web::Json<CreateLeadRequest>,
) -> Result<HttpResponse> {
    req.validate()?;
    validate_tier(&req.client_tier)?;

    let req = req.into_inner();
    let service = LeadService::new((**pool).clone());
    let lead = service
        .create_lead(
            NewLead {
                company_name: req.company_name,
                contact_name: req.contact_name,
                email: req.email,
                phone: req.phone,
                project_description: req.project_description,
                source: req.source,
                estimated_value: req.estimated_value,
                urgency_level: req.urgency_level,
                client_tier: req.client_tier,
                budget_confirmed: req.budget_confirmed,
                strategic_fit: req.strategic_fit,
                assigned_to: req.assigned_to,
            },
            req.performed_by,
        )
        .await?;

    Ok(HttpResponse::Created().json(lead))
}

/// List leads with pagination
pub async fn list_leads(
    pool: web::Data<PgPool>,
    query: web::Query<LeadListQuery>,
) -> Result<HttpResponse> {
    let page = query.page.max(1);
    let page_size = query.page_size.clamp(1, 100);

    let filter = LeadFilter {
        is_active: Some(query.is_active),
        status: query.status.clone(),
        client_tier: query.client_tier.clone(),
        order_by: LeadOrder::from_str(&query.order_by),
        limit: page_size,
        offset: (page - 1) * page_size,
    };

    let service = LeadService::new((**pool).clone());
    let leads = service.list_leads(&filter).await?;
    let total = service.count_leads(&filter).await?;

    let total_pages = if total > 0 {
        (total + page_size - 1) / page_size
    } else {
        1
    };

    Ok(HttpResponse::Ok().json(LeadListResponse {
        leads,
        total,
        page,
        page_size,
        total_pages,
    }))
}

/// Get a single lead
pub async fn get_lead(pool: web::Data<PgPool>, lead_id: web::Path<Uuid>) -> Result<HttpResponse> {
    let service = LeadService::new((**pool).clone());
    match service.get_lead(*lead_id).await? {
        Some(lead) => Ok(HttpResponse::Ok().json(lead)),
        None => Err(AppError::NotFound("Lead not found".to_string())),
    }
}

/// Update a lead
pub async fn update_lead(
    pool: web::Data<PgPool>,
    lead_id: web::Path<Uuid>,
    req: web::Json<UpdateLeadRequest>,
) -> Result<HttpResponse> {
    req.validate()?;
    if let Some(tier) = &req.client_tier {
        validate_tier(tier)?;
    }
    if let Some(status) = &req.status {
        validate_status(status)?;
    }

    let req = req.into_inner();
    let changes = LeadChanges {
        company_name: req.company_name,
        contact_name: req.contact_name,
        email: req.email,
        phone: req.phone,
        project_description: req.project_description,
        source: req.source,
        estimated_value: req.estimated_value,
        urgency_level: req.urgency_level,
        client_tier: req.client_tier,
        budget_confirmed: req.budget_confirmed,
        strategic_fit: req.strategic_fit,
        status: req.status,
        assigned_to: req.assigned_to,
        queue_position: req.queue_position,
    };

    let service = LeadService::new((**pool).clone());
    match service.update_lead(*lead_id, changes, req.performed_by).await? {
        Some(lead) => Ok(HttpResponse::Ok().json(lead)),
        None => Err(AppError::NotFound("Lead not found".to_string())),
    }
}

/// Soft delete a lead
pub async fn delete_lead(
    pool: web::Data<PgPool>,
    lead_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let service = LeadService::new((**pool).clone());
    if !service.delete_lead(*lead_id, None).await? {
        return Err(AppError::NotFound("Lead not found".to_string()));
    }

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Lead deleted".to_string(),
        success: true,
    }))
}

/// Move a lead to a specific queue position
pub async fn reorder_lead(
    pool: web::Data<PgPool>,
    lead_id: web::Path<Uuid>,
    query: web::Query<ReorderQuery>,
) -> Result<HttpResponse> {
    query.validate()?;

    let service = crate::services::QueueService::new((**pool).clone());
    match service.move_lead(*lead_id, query.position).await? {
        Some(lead) => Ok(HttpResponse::Ok().json(lead)),
        None => Err(AppError::NotFound("Lead not found".to_string())),
    }
}

/// Get the diagnostic score breakdown for a lead
pub async fn get_score_breakdown(
    pool: web::Data<PgPool>,
    lead_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let service = LeadService::new((**pool).clone());
    match service.score_breakdown(*lead_id).await? {
        Some(breakdown) => Ok(HttpResponse::Ok().json(breakdown)),
        None => Err(AppError::NotFound("Lead not found".to_string())),
    }
}

/// Get activity history for a lead
pub async fn get_activities(
    pool: web::Data<PgPool>,
    lead_id: web::Path<Uuid>,
    query: web::Query<ActivityListQuery>,
) -> Result<HttpResponse> {
    let limit = query.limit.clamp(1, 200);

    let service = LeadService::new((**pool).clone());
    match service.get_activities(*lead_id, limit).await? {
        Some(activities) => Ok(HttpResponse::Ok().json(activities)),
        None => Err(AppError::NotFound("Lead not found".to_string())),
    }
}

/// Log a manual activity on a lead
pub async fn create_activity(
    pool: web::Data<PgPool>,
    lead_id: web::Path<Uuid>,
    req: web::Json<ActivityCreateRequest>,
) -> Result<HttpResponse> {
    let manual = matches!(
        ActivityType::from_str(&req.activity_type),
        Some(
            ActivityType::Note
                | ActivityType::Call
                | ActivityType::Email
                | ActivityType::Meeting
                | ActivityType::Other
        )
    );
    if !manual {
        return Err(AppError::ValidationError(format!(
            "unknown activity_type '{}'",
            req.activity_type
        )));
    }

    let req = req.into_inner();
    let service = LeadService::new((**pool).clone());
    match service
        .log_activity(
            *lead_id,
            NewActivity {
                activity_type: req.activity_type,
                description: req.description,
                performed_by: req.performed_by,
                ..Default::default()
            },
        )
        .await?
    {
        Some(activity) => Ok(HttpResponse::Created().json(activity)),
        None => Err(AppError::NotFound("Lead not found".to_string())),
    }
}
