use actix_web::{web, HttpResponse, Responder};
use mongodb::Client;
use serde::Serialize;
use std::collections::HashMap;
use std::env;
use std::sync::Arc;

use crate::db::mongo;
use crate::services::catalog_service::CatalogHandle;

#[derive(Serialize)]
struct HealthStatus {
    status: String,
    services: HashMap<String, ServiceStatus>,
    environment: String,
    version: String,
}

#[derive(Serialize, Clone)]
struct ServiceStatus {
    status: String,
    details: Option<String>,
}

impl ServiceStatus {
    fn ok(details: String) -> Self {
        Self {
            status: "ok".to_string(),
            details: Some(details),
        }
    }

    fn error(details: String) -> Self {
        Self {
            status: "error".to_string(),
            details: Some(details),
        }
    }
}

pub async fn health_check(
    client: Option<web::Data<Arc<Client>>>,
    catalog: web::Data<Arc<CatalogHandle>>,
) -> impl Responder {
    let mut health = HealthStatus {
        status: "ok".to_string(),
        services: HashMap::new(),
        environment: env::var("RUST_ENV").unwrap_or("development".to_string()),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    if let Some(client) = client {
        health
            .services
            .insert("mongodb".to_string(), check_mongodb(&client).await);
    }

    health
        .services
        .insert("catalog".to_string(), check_catalog(&catalog));
    health
        .services
        .insert("generation".to_string(), check_generation_key());

    if health.services.values().any(|s| s.status != "ok") {
        health.status = "degraded".to_string();
    }

    HttpResponse::Ok().json(health)
}

async fn check_mongodb(client: &Client) -> ServiceStatus {
    match mongo::ping(client).await {
        Ok(()) => ServiceStatus::ok("Connected successfully to MongoDB".to_string()),
        Err(e) => {
            log::error!("MongoDB health check failed: {}", e);
            ServiceStatus::error(format!("Failed to connect: {}", e))
        }
    }
}

fn check_generation_key() -> ServiceStatus {
    match env::var("GOOGLE_API") {
        Ok(key) if !key.trim().is_empty() => {
            let masked_key = if key.len() > 8 && key.is_ascii() {
                format!("{}***{}", &key[0..4], &key[key.len() - 4..])
            } else {
                "***".to_string()
            };
            ServiceStatus::ok(format!("Gemini API key configured ({})", masked_key))
        }
        _ => ServiceStatus::error("GOOGLE_API not configured".to_string()),
    }
}

fn check_catalog(catalog: &CatalogHandle) -> ServiceStatus {
    let snapshot = catalog.snapshot();
    if snapshot.is_empty() {
        ServiceStatus::error("Catalog is not loaded".to_string())
    } else {
        ServiceStatus::ok(format!(
            "{} places loaded ({:?} schema)",
            snapshot.len(),
            snapshot.schema()
        ))
    }
}
