use crate::models::{travel_plan::TravelPlan, trip_request::TripRequest};
use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// A stored plan together with the request that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: Option<String>,
    pub origin: String,
    pub destination: String,
    pub start_date: String,
    pub end_date: String,
    pub budget_per_person: u64,
    pub headcount: u64,
    pub plan: TravelPlan,
    pub created_at: Option<DateTime>,
}

impl PlanDocument {
    pub fn new(trip: &TripRequest, plan: TravelPlan) -> Self {
        let destination = match trip.district() {
            Some(district) => format!("{} {}", trip.destination(), district),
            None => trip.destination().to_string(),
        };
        Self {
            id: None,
            user_id: trip.user_id().map(str::to_string),
            origin: trip.origin().to_string(),
            destination,
            start_date: trip.start_date().to_string(),
            end_date: trip.end_date().to_string(),
            budget_per_person: trip.budget_per_person(),
            headcount: trip.headcount(),
            plan,
            created_at: Some(DateTime::now()),
        }
    }
}
