use actix_web::{web, HttpResponse};
use serde_json::json;
use std::sync::Arc;

use crate::error::PlannerError;
use crate::services::catalog_service::{reload_catalog, CatalogHandle, CatalogStore};

pub async fn reload(
    handle: web::Data<Arc<CatalogHandle>>,
    store: web::Data<Arc<dyn CatalogStore>>,
) -> Result<HttpResponse, PlannerError> {
    let count = reload_catalog(&handle, store.get_ref().as_ref()).await?;
    Ok(HttpResponse::Ok().json(json!({ "places": count })))
}
