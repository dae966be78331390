use crate::error::{CandidateKind, PlannerError};
use crate::models::travel_plan::{LocationDetail, TravelPlan};
use crate::services::candidate_filter::CandidateSet;
use crate::services::generation_backend::{GenerationBackend, GenerationRequest};
use crate::services::prompt_service::PromptPayload;
use log::{debug, error, info};
use std::sync::Arc;

pub struct PlanGenerator {
    backend: Arc<dyn GenerationBackend>,
    model: String,
}

impl PlanGenerator {
    pub fn new(backend: Arc<dyn GenerationBackend>, model: impl Into<String>) -> Self {
        Self {
            backend,
            model: model.into(),
        }
    }

    /// Calls the backend exactly once, then parses and validates the response.
    pub async fn generate(
        &self,
        payload: &PromptPayload,
        duration_days: u32,
        candidates: &CandidateSet,
    ) -> Result<TravelPlan, PlannerError> {
        let request = GenerationRequest {
            model: self.model.clone(),
            prompt: payload.instruction.clone(),
            response_schema: payload.response_schema.clone(),
        };

        let response = self.backend.generate(request).await.map_err(|e| {
            error!("Generation backend failed: {}", e);
            PlannerError::from(e)
        })?;

        let plan = parse_plan(&response.text)?;
        validate_plan(&plan, duration_days, candidates)?;

        info!(
            "Generated plan with {} days, estimated cost {}",
            plan.day_count(),
            plan.total_estimated_cost()
        );
        Ok(plan)
    }
}

pub fn parse_plan(text: &str) -> Result<TravelPlan, PlannerError> {
    serde_json::from_str(text.trim()).map_err(|e| {
        error!("Generated plan is not valid JSON for the plan schema: {}", e);
        debug!("Raw generation response: {}", text);
        PlannerError::Parse {
            message: e.to_string(),
            raw: text.to_string(),
        }
    })
}

/// Checks what schema-constrained decoding cannot: day numbering, costs and
/// that every chosen location comes from the candidates that were offered.
pub fn validate_plan(
    plan: &TravelPlan,
    duration_days: u32,
    candidates: &CandidateSet,
) -> Result<(), PlannerError> {
    if plan.travel_plan.len() != duration_days as usize {
        return Err(PlannerError::InvalidPlan(format!(
            "expected {} days, got {}",
            duration_days,
            plan.travel_plan.len()
        )));
    }

    for (idx, day) in plan.travel_plan.iter().enumerate() {
        let expected = idx as i64 + 1;
        if day.day != expected {
            return Err(PlannerError::InvalidPlan(format!(
                "day numbers must run 1..={} in order, found {} at position {}",
                duration_days, day.day, expected
            )));
        }

        for place in &day.places {
            check_cost(day.day, place)?;
            if !candidates.contains_place(&place.name) {
                return Err(PlannerError::CandidateMismatch {
                    day: day.day,
                    kind: CandidateKind::Place,
                    name: place.name.clone(),
                });
            }
        }

        let accommodation = &day.accommodation;
        check_cost(day.day, accommodation)?;
        if accommodation.is_none_sentinel() {
            if duration_days != 1 {
                return Err(PlannerError::InvalidPlan(format!(
                    "day {} has no accommodation on a {}-day trip",
                    day.day, duration_days
                )));
            }
        } else if !candidates.contains_accommodation(&accommodation.name) {
            return Err(PlannerError::CandidateMismatch {
                day: day.day,
                kind: CandidateKind::Accommodation,
                name: accommodation.name.clone(),
            });
        }
    }

    Ok(())
}

fn check_cost(day: i64, location: &LocationDetail) -> Result<(), PlannerError> {
    if location.estimated_cost < 0 {
        return Err(PlannerError::InvalidPlan(format!(
            "day {}: '{}' has negative estimated_cost {}",
            day, location.name, location.estimated_cost
        )));
    }
    Ok(())
}
