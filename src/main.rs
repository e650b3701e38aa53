mod api;
mod config;
mod db;
mod dto;
#[cfg(test)]
mod fake_db;
mod model;
mod telemetry;

use std::sync::Arc;

use actix_web::http::header::ContentType;
use actix_web::{get, middleware, web, App, HttpResponse, HttpServer, Responder, Result};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::config::{Config, IDLE_TIMEOUT, READ_TIMEOUT, SHUTDOWN_GRACE, WRITE_TIMEOUT};
use crate::db::{MongoDbClient, TodoRepository};

const HOME_PAGE: &str = include_str!("../static/home.html");

#[derive(Serialize, Deserialize)]
pub struct Response {
    pub message: String,
}

#[get("/health")]
async fn healthcheck() -> impl Responder {
    let response = Response {
        message: "Everything is working fine".to_string(),
    };
    HttpResponse::Ok().json(response)
}

#[get("/")]
async fn index() -> impl Responder {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(HOME_PAGE)
}

async fn not_found() -> Result<HttpResponse> {
    let response = Response {
        message: "Resource not found".to_string(),
    };
    Ok(HttpResponse::NotFound().json(response))
}

async fn setup(config: &Config) -> Result<web::Data<dyn TodoRepository>, anyhow::Error> {
    let todo_db = MongoDbClient::new(config).await?;
    Ok(web::Data::from(Arc::new(todo_db) as Arc<dyn TodoRepository>))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(err) = telemetry::init_subscriber(env!("CARGO_PKG_NAME"), "info") {
        eprintln!("Failed to install tracing subscriber: {err}");
        std::process::exit(1);
    }

    let config = match Config::new() {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "invalid configuration");
            std::process::exit(1);
        }
    };
    let data = match setup(&config).await {
        Ok(data) => data,
        Err(err) => {
            error!(error = %err, uri = %config.mongodb_uri, "failed to connect to MongoDB");
            std::process::exit(1);
        }
    };

    let server = HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .service(index)
            .service(healthcheck)
            .configure(api::config)
            .default_service(web::route().to(not_found))
            .wrap(middleware::Logger::default())
    })
    .client_request_timeout(READ_TIMEOUT)
    .client_disconnect_timeout(WRITE_TIMEOUT)
    .keep_alive(IDLE_TIMEOUT)
    .shutdown_timeout(SHUTDOWN_GRACE.as_secs())
    .disable_signals()
    .bind(("0.0.0.0", config.port))?
    .run();

    info!("Listening on port {}", config.port);
    let handle = server.handle();
    actix_web::rt::spawn(async move {
        if actix_web::rt::signal::ctrl_c().await.is_ok() {
            info!("Shutting down server...");
            handle.stop(true).await;
        }
    });

    server.await?;
    info!("Server gracefully stopped");
    Ok(())
}
