/// OpenAPI documentation for the Lead Service
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Salon Lead Queue API",
        version = "1.0.0",
        description = "Business lead management and prioritization API. Stores prospective-client leads, derives weighted 0-100 priority scores, and maintains an explicit, manually reorderable priority queue with auto-prioritization, bulk reordering, and queue statistics.",
        license(
            name = "MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Development server"),
    ),
    tags(
        (name = "health", description = "Service health checks"),
        (name = "leads", description = "Lead creation, retrieval, updates, soft deletion, and activity trail"),
        (name = "queue", description = "Priority-queue operations and statistics"),
    ),
)]
pub struct ApiDoc;

impl ApiDoc {
    pub fn title() -> &'static str {
        "Salon Lead Queue"
    }

    pub fn openapi_json_path() -> &'static str {
        "/api/v1/openapi.json"
    }
}
