use crate::errors::JarLedgerError;
use crate::models::{
    CreateConsumerRequest, CreateEntryRequest, MarkMonthRequest, UpdateConsumerRequest,
    UpdateEntryRequest, UpdateRatesRequest,
};
use crate::services::LedgerService;
use actix_web::{web, HttpResponse};
use serde_json::json;
use std::sync::Arc;

/// Health check endpoint
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": "jar-ledger",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Register a consumer; 400 if the mobile is already in use
pub async fn create_consumer(
    service: web::Data<Arc<LedgerService>>,
    request: web::Json<CreateConsumerRequest>,
) -> Result<HttpResponse, JarLedgerError> {
    let consumer = service.register_consumer(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(consumer))
}

/// List consumers, most recent first
pub async fn get_consumers(
    service: web::Data<Arc<LedgerService>>,
) -> Result<HttpResponse, JarLedgerError> {
    let consumers = service.list_consumers().await?;
    Ok(HttpResponse::Ok().json(consumers))
}

/// Full update of the consumer at this mobile; renames cascade to entries
pub async fn update_consumer(
    service: web::Data<Arc<LedgerService>>,
    mobile: web::Path<String>,
    request: web::Json<UpdateConsumerRequest>,
) -> Result<HttpResponse, JarLedgerError> {
    let consumer = service
        .update_consumer(&mobile, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(consumer))
}

/// Cascade delete; succeeds even when the mobile is unknown
pub async fn delete_consumer(
    service: web::Data<Arc<LedgerService>>,
    mobile: web::Path<String>,
) -> Result<HttpResponse, JarLedgerError> {
    let deleted = service.remove_consumer(&mobile).await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Consumer deleted",
        "deleted": deleted
    })))
}

/// Record a delivery entry
pub async fn create_entry(
    service: web::Data<Arc<LedgerService>>,
    request: web::Json<CreateEntryRequest>,
) -> Result<HttpResponse, JarLedgerError> {
    let entry = service.create_entry(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(entry))
}

/// List entries, most recent first
pub async fn get_entries(
    service: web::Data<Arc<LedgerService>>,
) -> Result<HttpResponse, JarLedgerError> {
    let entries = service.list_entries().await?;
    Ok(HttpResponse::Ok().json(entries))
}

/// Full update of one entry; 404 if the id is unknown
pub async fn update_entry(
    service: web::Data<Arc<LedgerService>>,
    id: web::Path<i64>,
    request: web::Json<UpdateEntryRequest>,
) -> Result<HttpResponse, JarLedgerError> {
    let entry = service.update_entry(*id, request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(entry))
}

/// Delete one entry; succeeds even when the id is unknown
pub async fn delete_entry(
    service: web::Data<Arc<LedgerService>>,
    id: web::Path<i64>,
) -> Result<HttpResponse, JarLedgerError> {
    let deleted = service.remove_entry(*id).await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Entry deleted",
        "deleted": deleted
    })))
}

/// Bulk-mark a consumer's month as paid/unpaid; returns the count updated
pub async fn mark_month(
    service: web::Data<Arc<LedgerService>>,
    request: web::Json<MarkMonthRequest>,
) -> Result<HttpResponse, JarLedgerError> {
    let updated = service.mark_month(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "updated": updated })))
}

/// Current global rates, defaults when unset
pub async fn get_rates(
    service: web::Data<Arc<LedgerService>>,
) -> Result<HttpResponse, JarLedgerError> {
    let rates = service.get_rates().await?;
    Ok(HttpResponse::Ok().json(rates))
}

/// Partial rates update; returns the resulting rates
pub async fn update_rates(
    service: web::Data<Arc<LedgerService>>,
    request: web::Json<UpdateRatesRequest>,
) -> Result<HttpResponse, JarLedgerError> {
    let rates = service.set_rates(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(rates))
}

/// Configure routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/consumers", web::post().to(create_consumer))
        .route("/consumers", web::get().to(get_consumers))
        .route("/consumers/{mobile}", web::put().to(update_consumer))
        .route("/consumers/{mobile}", web::delete().to(delete_consumer))
        .route("/entries", web::post().to(create_entry))
        .route("/entries", web::get().to(get_entries))
        .route("/entries/{id}", web::put().to(update_entry))
        .route("/entries/{id}", web::delete().to(delete_entry))
        .route("/payments/mark-month", web::put().to(mark_month))
        .route("/rates", web::get().to(get_rates))
        .route("/rates", web::post().to(update_rates));
}
