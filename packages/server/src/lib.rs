pub mod config;
pub mod database;
pub mod donation;
pub mod entity;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod identity;
pub mod models;
pub mod payment;
pub mod routes;
pub mod seed;
pub mod state;
pub mod utils;

use std::time::Duration;

use axum::http::{HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable as ScalarServable};

use crate::config::CorsConfig;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Donation Platform API",
        version = "1.0.0",
        description = "API for donation intake, review, articles and payments"
    ),
    tags(
        (name = "Auth", description = "Registration, login and the current user"),
        (name = "Donations", description = "Donation CRUD with ownership checks"),
        (name = "Final Donations", description = "Donations verified and handed over"),
        (name = "Articles", description = "Published articles"),
        (name = "Payments", description = "Hosted checkout through the payment gateway"),
        (name = "Admin", description = "Administrative overviews"),
    ),
    modifiers(&SecurityAddon),
)]
struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_default();
        components.add_security_scheme(
            "jwt",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

fn cors_layer(cfg: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = cfg
        .allow_origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();

    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(Duration::from_secs(cfg.max_age));

    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(origins))
    }
}

/// Build the application router.
pub fn build_router(state: AppState) -> axum::Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .nest("/api", routes::api_routes())
        .split_for_parts();

    let spec = api.clone();
    router
        .route(
            "/api-docs/openapi.json",
            axum::routing::get(move || async move { axum::Json(spec) }),
        )
        .layer(cors_layer(&state.config.server.cors))
        .with_state(state)
        .merge(Scalar::with_url("/scalar", api))
}
