//! HTTP handlers and route configuration.

mod authors;
mod checks;
mod consumers;
mod entries;
mod groups;
mod health;
mod pagination;
mod payments;
mod users;

#[cfg(test)]
mod tests;

use actix_web::web;

use crate::middleware::error::configure_extractors;

/// Standard viewset routes for one resource: list and create on the
/// collection, retrieve/update/partial update/delete on `/{id}`.
macro_rules! resource {
    ($path:expr, $handlers:ident) => {
        web::scope($path)
            .route("", web::get().to($handlers::list))
            .route("", web::post().to($handlers::create))
            .route("/{id}", web::get().to($handlers::retrieve))
            .route("/{id}", web::put().to($handlers::update))
            .route("/{id}", web::patch().to($handlers::partial_update))
            .route("/{id}", web::delete().to($handlers::destroy))
    };
}

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    configure_extractors(cfg);
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            // Payments tracker
            .service(resource!("/payments", payments))
            .service(resource!("/consumers", consumers))
            .service(resource!("/users", users))
            .service(resource!("/groups", groups))
            // Blog
            .service(
                web::scope("/blog")
                    .service(resource!("/users", authors))
                    .service(resource!("/entries", entries)),
            ),
    );
}
