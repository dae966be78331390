pub mod catalog;
pub mod health;
pub mod plan;

use actix_web::{error, web, HttpResponse};
use serde_json::json;

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let message = format!("invalid input: {}", err);
        error::InternalError::from_response(
            err,
            HttpResponse::BadRequest().json(json!({ "error": message })),
        )
        .into()
    })
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/api")
                .service(
                    web::scope("/plan")
                        .app_data(json_config())
                        .route("/generate", web::post().to(plan::generate))
                        .route("/{id}", web::get().to(plan::get_by_id)),
                )
                .route("/catalog/reload", web::post().to(catalog::reload)),
        );
}
