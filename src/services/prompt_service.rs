use crate::models::travel_plan::NONE_SENTINEL;
use crate::models::trip_request::TripRequest;
use crate::services::candidate_filter::{Candidate, CandidateSet};
use serde_json::{json, Value};

pub const MIN_PLACES_PER_DAY: usize = 2;
pub const MAX_PLACES_PER_DAY: usize = 4;

/// Instruction text plus the structural schema the backend must decode against.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptPayload {
    pub instruction: String,
    pub response_schema: Value,
}

const OUTPUT_EXAMPLE: &str = r#"{
  "title": "Overall trip title",
  "description": "Short description of the whole trip",
  "travel_plan": [
    {
      "day": 1,
      "places": [
        {
          "name": "Place name (chosen from the place candidate list)",
          "description": "Creative description",
          "coords": "latitude, longitude",
          "estimated_cost": 50000,
          "closest_subway": "Nearest subway station name or none"
        }
      ],
      "accommodation": {
        "name": "Accommodation name (chosen from the accommodation candidate list)",
        "description": "Creative description of the accommodation",
        "coords": "latitude, longitude (from the accommodation candidate list)",
        "estimated_cost": 150000,
        "closest_subway": "Nearest subway station name or none"
      }
    }
  ]
}"#;

/// `theme_keywords` and `accommodation_theme` are the values the candidates
/// were actually filtered with, which may differ from the trip's own.
pub fn assemble(
    trip: &TripRequest,
    theme_keywords: &[String],
    accommodation_theme: &str,
    candidates: &CandidateSet,
) -> PromptPayload {
    PromptPayload {
        instruction: render_instruction(trip, theme_keywords, accommodation_theme, candidates),
        response_schema: response_schema(),
    }
}

fn render_instruction(
    trip: &TripRequest,
    theme_keywords: &[String],
    accommodation_theme: &str,
    candidates: &CandidateSet,
) -> String {
    let themes = if theme_keywords.is_empty() {
        "any".to_string()
    } else {
        theme_keywords.join(", ")
    };
    let destination = match trip.district() {
        Some(district) => format!("{} {}", trip.destination(), district),
        None => trip.destination().to_string(),
    };

    let mut prompt = format!(
        "You are a professional travel planner. Using the information and candidate lists below, \
write a complete {days}-day travel plan. The traveller prefers places with the theme(s) \"{themes}\". \
The total budget is {budget} KRW and must cover accommodation and every activity.\n\
Output the plan as JSON only. The value of the top-level key 'travel_plan' must be a JSON array \
of per-day plans, and the output must STRICTLY follow the requirements and the example structure below.\n\n",
        days = trip.duration_days(),
        themes = themes,
        budget = trip.total_budget(),
    );

    prompt.push_str("[Trip information]\n");
    prompt.push_str(&format!("Origin: {}\n", trip.origin()));
    prompt.push_str(&format!("Destination: {}\n", destination));
    prompt.push_str(&format!(
        "Duration: {} days ({} ~ {})\n",
        trip.duration_days(),
        trip.start_date(),
        trip.end_date()
    ));
    prompt.push_str(&format!(
        "Total budget: {} KRW (accommodation and all activities included)\n",
        trip.total_budget()
    ));
    prompt.push_str(&format!("Travellers: {}\n", trip.headcount()));
    prompt.push_str(&format!("Place themes: {}\n", themes));
    prompt.push_str(&format!(
        "Requested accommodation theme: {}\n\n",
        accommodation_theme
    ));

    prompt.push_str("[Place candidate list] (use for 'places')\n");
    prompt.push_str(&render_candidates(&candidates.places));
    prompt.push_str("\n\n[Accommodation candidate list] (use for 'accommodation')\n");
    prompt.push_str(&render_candidates(&candidates.accommodations));

    prompt.push_str("\n\n[Example JSON output structure]\n");
    prompt.push_str(OUTPUT_EXAMPLE);

    prompt.push_str("\n\n[JSON output requirements]\n");
    for (idx, rule) in requirements().iter().enumerate() {
        prompt.push_str(&format!("{}. {}\n", idx + 1, rule));
    }
    prompt.push_str("\nThe final output must be only the required JSON. Do not include any other text.\n");
    prompt
}

fn requirements() -> Vec<String> {
    vec![
        "The top-level key is 'travel_plan' and its value must be a JSON array.".to_string(),
        "Each object in the array must have the keys 'day' (number), 'places' (array) and 'accommodation' (object).".to_string(),
        "The 'name' and 'coords' values in 'places' must be taken verbatim from the [Place candidate list].".to_string(),
        "The 'name' and 'coords' values in 'accommodation' must be taken verbatim from the [Accommodation candidate list].".to_string(),
        format!(
            "Work out 'closest_subway' from 'coords' and write the nearest subway station name. If there is no nearby station write \"{}\".",
            NONE_SENTINEL
        ),
        "'estimated_cost' must be written as an integer only.".to_string(),
        format!(
            "If the trip starts and ends on the same day, write 1 for 'day' and \"{}\" as the accommodation name.",
            NONE_SENTINEL
        ),
        format!(
            "Recommend at least {} and at most {} 'places' per day, and exactly 1 'accommodation' per day.",
            MIN_PLACES_PER_DAY, MAX_PLACES_PER_DAY
        ),
    ]
}

fn render_candidates(candidates: &[Candidate]) -> String {
    candidates
        .iter()
        .map(Candidate::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

fn location_detail_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "name": { "type": "STRING" },
            "description": { "type": "STRING" },
            "coords": {
                "type": "STRING",
                "description": "Latitude, longitude string (e.g. 37.5665, 126.9780)"
            },
            "estimated_cost": {
                "type": "INTEGER",
                "description": "Total spend in KRW"
            },
            "closest_subway": {
                "type": "STRING",
                "description": "Nearest subway station name or 'none'"
            }
        },
        "required": ["name", "description", "coords", "estimated_cost", "closest_subway"],
        "propertyOrdering": ["name", "description", "coords", "estimated_cost", "closest_subway"]
    })
}

/// Response schema mirroring `TravelPlan` / `DayPlan` / `LocationDetail`.
pub fn response_schema() -> Value {
    let day_plan = json!({
        "type": "OBJECT",
        "properties": {
            "day": {
                "type": "INTEGER",
                "description": "Trip day number (1, 2, 3...)"
            },
            "places": {
                "type": "ARRAY",
                "description": "Places to visit that day.",
                "items": location_detail_schema()
            },
            "accommodation": location_detail_schema()
        },
        "required": ["day", "places", "accommodation"],
        "propertyOrdering": ["day", "places", "accommodation"]
    });

    json!({
        "type": "OBJECT",
        "properties": {
            "title": {
                "type": "STRING",
                "description": "Overall trip title"
            },
            "description": {
                "type": "STRING",
                "description": "Short description of the whole trip"
            },
            "travel_plan": {
                "type": "ARRAY",
                "description": "The whole trip as an array of per-day plans.",
                "items": day_plan
            }
        },
        "required": ["title", "description", "travel_plan"],
        "propertyOrdering": ["title", "description", "travel_plan"]
    })
}
