//! OpenAPI specification endpoint

use actix_web::{HttpResponse, Responder, get};
use utoipa::OpenApi;

use crate::api::error::ErrorResponse;
use crate::api::health::HealthStatus;
use crate::model::{
    Entry, EntryPartition, ParameterMapping, Runbook, Step, StepType, Trigger, TriggerFilter,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Runbook Importer API",
        description = "Imports alert-handling runbooks from Excel workbooks"
    ),
    paths(crate::api::health::health, crate::api::upload::upload),
    components(schemas(
        HealthStatus,
        ErrorResponse,
        EntryPartition,
        Entry,
        Runbook,
        Step,
        StepType,
        Trigger,
        TriggerFilter,
        ParameterMapping
    )),
    tags(
        (name = "import", description = "Workbook import"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;

/// Serve OpenAPI JSON specification
#[get("/openapi.json")]
pub async fn openapi_json() -> impl Responder {
    HttpResponse::Ok().json(ApiDoc::openapi())
}

/// Configure OpenAPI routes
pub fn configure(cfg: &mut actix_web::web::ServiceConfig) {
    cfg.service(openapi_json);
}
