use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::errors::LinkletError;
use crate::services::analytics::{AnalyticsService, DEFAULT_WINDOW_DAYS};
use crate::services::Owner;

#[derive(Debug, Deserialize)]
pub struct AnalyticsQuery {
    /// Daily-series window in days, clamped to 1..=365.
    pub days: Option<i64>,
}

pub async fn url_analytics(
    path: web::Path<String>,
    query: web::Query<AnalyticsQuery>,
    _owner: Owner,
    service: web::Data<AnalyticsService>,
) -> Result<HttpResponse, LinkletError> {
    let days = query.days.unwrap_or(DEFAULT_WINDOW_DAYS).clamp(1, 365);
    let report = service.url_analytics(&path.into_inner(), days).await?;
    Ok(HttpResponse::Ok().json(report))
}

pub async fn dashboard(
    owner: Owner,
    service: web::Data<AnalyticsService>,
) -> Result<HttpResponse, LinkletError> {
    let report = service.user_dashboard(&owner.id).await?;
    Ok(HttpResponse::Ok().json(report))
}
