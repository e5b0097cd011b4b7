//! HTTP handlers and route configuration.

mod auth;
mod health;
mod media;
mod posts;
mod studio;

use actix_web::web;

pub use studio::MAX_UPLOAD_BYTES;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public reading surface
            .route("/health", web::get().to(health::health_check))
            .route("/posts", web::get().to(posts::list))
            .route("/posts/{slug}", web::get().to(posts::detail))
            .route("/archive", web::get().to(posts::archive))
            // Identity provider bridge
            .service(
                web::scope("/auth")
                    .route("/login", web::get().to(auth::login))
                    .route("/callback", web::get().to(auth::callback))
                    .route("/me", web::get().to(auth::me))
                    .route("/logout", web::post().to(auth::logout))
                    .route("/events", web::get().to(auth::events)),
            )
            // Gated editing surface
            .service(
                web::scope("/studio")
                    .route("/status", web::get().to(studio::status))
                    .route("/upload", web::post().to(studio::upload))
                    .route("/submit", web::post().to(studio::submit)),
            ),
    );

    cfg.route("/media/{key}", web::get().to(media::serve));
}
