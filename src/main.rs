use std::io;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;
use log::{error, info};

use tripcanvas_api::config::AppConfig;
use tripcanvas_api::db::mongo;
use tripcanvas_api::routes;
use tripcanvas_api::services::plan_store::{MongoPlanStore, PlanStore};
use tripcanvas_api::services::planner_service::TripPlanner;

#[actix_web::main]
async fn main() -> io::Result<()> {
    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    }

    env_logger::init_from_env(Env::default().default_filter_or("info"));
    info!("Application starting...");

    let config = AppConfig::from_env().map_err(|e| {
        error!("Configuration error: {}", e);
        io::Error::other(e)
    })?;

    let client = mongo::create_mongo_client(&config.mongo_uri)
        .await
        .map_err(io::Error::other)?;

    let (planner, catalog_store) = TripPlanner::from_config(&config, client.clone())
        .await
        .map_err(|e| {
            error!("Failed to initialise planner: {}", e);
            io::Error::other(e)
        })?;

    let catalog = planner.catalog().clone();
    let planner = Arc::new(planner);
    let plan_store: Arc<dyn PlanStore> =
        Arc::new(MongoPlanStore::new(client.clone(), config.plan_database.clone()));

    info!("Starting HTTP server on {}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .app_data(web::Data::new(client.clone()))
            .app_data(web::Data::new(planner.clone()))
            .app_data(web::Data::new(catalog.clone()))
            .app_data(web::Data::new(catalog_store.clone()))
            .app_data(web::Data::new(plan_store.clone()))
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
