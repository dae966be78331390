pub mod place;
pub mod plan_document;
pub mod travel_plan;
pub mod trip_request;
