use actix_web::{web, HttpResponse};
use log::{info, warn};
use mongodb::bson::oid::ObjectId;
use serde_json::json;
use std::sync::Arc;

use crate::error::PlannerError;
use crate::models::plan_document::PlanDocument;
use crate::models::trip_request::{TripRequest, TripRequestInput};
use crate::services::plan_store::PlanStore;
use crate::services::planner_service::TripPlanner;

pub async fn generate(
    planner: web::Data<Arc<TripPlanner>>,
    store: web::Data<Arc<dyn PlanStore>>,
    payload: web::Json<TripRequestInput>,
) -> Result<HttpResponse, PlannerError> {
    let trip = TripRequest::try_from(payload.into_inner())?;
    info!(
        "Plan requested: {} -> {} ({} ~ {})",
        trip.origin(),
        trip.destination(),
        trip.start_date(),
        trip.end_date()
    );

    let plan = planner.plan(&trip).await?;
    let id = store.save(PlanDocument::new(&trip, plan.clone())).await?;

    Ok(HttpResponse::Ok().json(json!({
        "id": id.to_hex(),
        "plan": plan,
    })))
}

pub async fn get_by_id(
    store: web::Data<Arc<dyn PlanStore>>,
    path: web::Path<String>,
) -> Result<HttpResponse, PlannerError> {
    let id = match ObjectId::parse_str(path.into_inner().as_str()) {
        Ok(id) => id,
        Err(_) => return Ok(HttpResponse::BadRequest().json(json!({ "error": "Invalid ID" }))),
    };

    match store.find(&id).await? {
        Some(document) => Ok(HttpResponse::Ok().json(document)),
        None => {
            warn!("Plan {} not found", id);
            Ok(HttpResponse::NotFound().json(json!({ "error": "Plan not found" })))
        }
    }
}
