use actix_web::http::{header, StatusCode};
use actix_web::{web, HttpRequest, HttpResponse};

use crate::services::redirect::{ClientContext, RedirectOutcome, RedirectResolver};
use crate::utils::extract_client_ip;

pub async fn redirect(
    path: web::Path<String>,
    req: HttpRequest,
    resolver: web::Data<RedirectResolver>,
) -> HttpResponse {
    let code = path.into_inner();

    let ctx = ClientContext {
        ip: extract_client_ip(&req),
        user_agent: header_string(&req, header::USER_AGENT),
        referrer: header_string(&req, header::REFERER),
    };

    match resolver.resolve(&code, ctx).await {
        RedirectOutcome::Redirect(target) => HttpResponse::Found()
            .insert_header((header::LOCATION, target))
            .finish(),
        RedirectOutcome::NotFound => plain_status(StatusCode::NOT_FOUND, "Not Found"),
        RedirectOutcome::Gone => plain_status(StatusCode::GONE, "Gone"),
    }
}

/// Negative redirect responses are short-cacheable; the code space is huge
/// and misses repeat.
fn plain_status(status: StatusCode, body: &'static str) -> HttpResponse {
    HttpResponse::build(status)
        .insert_header(("Content-Type", "text/html; charset=utf-8"))
        .insert_header(("Cache-Control", "public, max-age=60"))
        .body(body)
}

fn header_string(req: &HttpRequest, name: header::HeaderName) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}
