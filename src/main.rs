use std::sync::Arc;

use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use dotenvy::dotenv;

mod api;
mod auth;
mod config;
mod docs;
mod error;
mod model;
mod models;
mod routes;
mod seed;
mod service;
mod store;
mod utils;

#[cfg(test)]
mod test_support;

use config::Config;
use store::{AttendanceStore, InMemoryStore};

use crate::docs::ApiDoc;
use tracing::info;
use tracing_appender::rolling;
use utoipa::OpenApi; // ← needed for ApiDoc::openapi()
use utoipa_swagger_ui::SwaggerUi;

#[get("/")]
async fn index() -> impl Responder {
    "Clinic attendance service is running"
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(config.log_level)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Server starting...");

    let staff = seed::load_staff(config.staff_seed_path.as_deref())?;
    let store = InMemoryStore::new(staff);
    info!(staff = store.staff_count(), "Staff directory loaded");

    let store: Arc<dyn AttendanceStore> = Arc::new(store);
    let server_addr = config.server_addr.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // ← important: wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(Data::from(store.clone()))
            .app_data(Data::new(config.clone()))
            .service(index)
            .configure(|cfg| routes::configure(cfg, config.clone()))
    })
    .bind(&server_addr)?
    .run()
    .await?;

    info!("Server stopped");
    Ok(())
}
