//! HTTP surface for the choice query service.
//!
//! One endpoint: `GET /{namespace}/{entity}/{field}/` with `q`, `page` and
//! `page_limit` query parameters. Cross-origin requests are served through
//! CORS headers; client input errors map to 400, unknown references to 404.

use crate::config::Select2Config;
use crate::error::{Select2Error, Select2Result};
use crate::query::{ChoiceQuery, QueryParams};
use crate::registry::EntityRegistry;
use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer, Responder};
use log::info;
use serde_json::json;
use std::sync::Arc;

/// Shared application state for the HTTP server.
pub struct AppState {
    /// Entity type registry, read-only after startup.
    pub registry: Arc<EntityRegistry>,
    /// Bridge configuration.
    pub config: Select2Config,
}

/// Handler for `GET /{namespace}/{entity}/{field}/`.
pub async fn fetch_items(
    path: web::Path<(String, String, String)>,
    params: web::Query<QueryParams>,
    state: web::Data<AppState>,
) -> impl Responder {
    let (namespace, entity, field) = path.into_inner();
    let query = ChoiceQuery::new(&state.registry, &namespace, &entity, &field);
    match query.fetch_items(&params) {
        Ok(envelope) => HttpResponse::Ok().json(envelope),
        Err(e) => error_response(&e),
    }
}

/// Map a service error onto an error envelope with the right status.
fn error_response(err: &Select2Error) -> HttpResponse {
    let body = json!({ "error": err.to_string() });
    match err {
        Select2Error::NotFound(_) => HttpResponse::NotFound().json(body),
        Select2Error::InvalidParameter(_) => HttpResponse::BadRequest().json(body),
        _ => HttpResponse::InternalServerError().json(body),
    }
}

/// The actix route pattern the fetch-items handler is registered under.
pub fn route_pattern(endpoint_prefix: &str) -> String {
    format!(
        "{}/{{namespace}}/{{entity}}/{{field}}/",
        endpoint_prefix.trim_end_matches('/')
    )
}

/// HTTP server hosting the choice endpoint for a registry.
pub struct ChoiceHttpServer {
    registry: Arc<EntityRegistry>,
    config: Select2Config,
    bind_address: String,
}

impl ChoiceHttpServer {
    pub fn new(registry: Arc<EntityRegistry>, config: Select2Config, bind_address: &str) -> Self {
        Self {
            registry,
            config,
            bind_address: bind_address.to_string(),
        }
    }

    /// Run the HTTP server until it is shut down.
    ///
    /// # Errors
    ///
    /// Returns a `Select2Error` if the listener cannot bind or the server
    /// fails while running.
    pub async fn run(&self) -> Select2Result<()> {
        info!("choice HTTP server running on {}", self.bind_address);

        let app_state = web::Data::new(AppState {
            registry: self.registry.clone(),
            config: self.config.clone(),
        });
        let pattern = route_pattern(&self.config.endpoint_prefix);

        let server = HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .app_data(app_state.clone())
                .route(&pattern, web::get().to(fetch_items))
        })
        .bind(&self.bind_address)
        .map_err(|e| {
            Select2Error::Internal(format!("failed to bind to {}: {}", self.bind_address, e))
        })?
        .run();

        server
            .await
            .map_err(|e| Select2Error::Internal(format!("HTTP server error: {}", e)))
    }
}
