use serde::{Deserialize, Serialize};

/// Placeholder the generator writes instead of an absent value.
pub const NONE_SENTINEL: &str = "none";

/// A generated itinerary. Field order is the output key order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelPlan {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub travel_plan: Vec<DayPlan>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPlan {
    pub day: i64,
    pub places: Vec<LocationDetail>,
    pub accommodation: LocationDetail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationDetail {
    pub name: String,
    pub description: String,
    /// `"lat, lon"` as the generator wrote it.
    pub coords: String,
    pub estimated_cost: i64,
    pub closest_subway: String,
}

impl LocationDetail {
    pub fn is_none_sentinel(&self) -> bool {
        self.name.trim() == NONE_SENTINEL
    }
}

impl TravelPlan {
    pub fn day_count(&self) -> usize {
        self.travel_plan.len()
    }

    pub fn total_estimated_cost(&self) -> i64 {
        self.travel_plan
            .iter()
            .flat_map(|day| day.places.iter().chain(std::iter::once(&day.accommodation)))
            .fold(0i64, |total, location| total.saturating_add(location.estimated_cost))
    }
}
