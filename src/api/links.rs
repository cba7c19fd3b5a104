use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::errors::LinkletError;
use crate::services::link_service::{CreateLinkRequest, LinkService};
use crate::services::Owner;
use crate::storage::ShortLink;

#[derive(Debug, Deserialize)]
pub struct CreateUrlBody {
    pub target: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub code: String,
    /// Fully-qualified short URL composed from the configured base URL.
    pub short_url: String,
    pub target: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub click_count: u64,
    pub active: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LinkResponse {
    pub fn from_link(link: &ShortLink, base_url: &str) -> Self {
        Self {
            code: link.code.clone(),
            short_url: format!("{}/{}", base_url.trim_end_matches('/'), link.code),
            target: link.target.clone(),
            title: link.title.clone(),
            description: link.description.clone(),
            click_count: link.click_count,
            active: link.active,
            expires_at: link.expires_at,
            created_at: link.created_at,
            updated_at: link.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub code: String,
    pub target: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub click_count: u64,
    pub active: bool,
    pub expired: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&ShortLink> for PreviewResponse {
    fn from(link: &ShortLink) -> Self {
        Self {
            code: link.code.clone(),
            target: link.target.clone(),
            title: link.title.clone(),
            description: link.description.clone(),
            click_count: link.click_count,
            active: link.active,
            expired: link.is_expired(),
            expires_at: link.expires_at,
            created_at: link.created_at,
            updated_at: link.updated_at,
        }
    }
}

pub async fn create(
    body: web::Json<CreateUrlBody>,
    owner: Owner,
    service: web::Data<LinkService>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, LinkletError> {
    let body = body.into_inner();
    let link = service
        .create(
            CreateLinkRequest {
                target: body.target,
                title: body.title,
                description: body.description,
                expires_at: body.expires_at,
            },
            &owner,
        )
        .await?;

    Ok(HttpResponse::Created().json(LinkResponse::from_link(&link, &config.base_url)))
}

pub async fn delete(
    path: web::Path<String>,
    owner: Owner,
    service: web::Data<LinkService>,
) -> Result<HttpResponse, LinkletError> {
    service.delete(&path.into_inner(), &owner).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Metadata without redirecting or recording a click.
pub async fn preview(
    path: web::Path<String>,
    service: web::Data<LinkService>,
) -> Result<HttpResponse, LinkletError> {
    let link = service.preview(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(PreviewResponse::from(&link)))
}
