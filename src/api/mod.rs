//! HTTP surface: route registration and handlers.
//!
//! The catch-all redirect route is registered last so every functional
//! route wins first; the resolver's reserved-path check backstops this at
//! the business-rule level as well.

pub mod analytics;
pub mod auth;
pub mod health;
pub mod links;
pub mod redirect;

use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/health").route(web::get().to(health::health)))
        .service(web::resource("/preview/{code}").route(web::get().to(links::preview)))
        .service(
            web::scope("/api")
                .service(web::resource("/urls").route(web::post().to(links::create)))
                .service(web::resource("/urls/{code}").route(web::delete().to(links::delete)))
                .service(
                    web::resource("/analytics/dashboard")
                        .route(web::get().to(analytics::dashboard)),
                )
                .service(
                    web::resource("/analytics/{code}")
                        .route(web::get().to(analytics::url_analytics)),
                ),
        )
        .service(web::resource("/{code}").route(web::get().to(redirect::redirect)));
}
