use crate::config::AppConfig;
use crate::error::PlannerError;
use crate::models::place::Region;
use crate::models::travel_plan::TravelPlan;
use crate::models::trip_request::{TripRequest, LODGING_THEME};
use crate::services::candidate_filter::{filter_candidates, CandidateSet, FilterMode};
use crate::services::catalog_service::{load_catalog, CatalogHandle, CatalogStore, MongoCatalogStore};
use crate::services::generation_backend::GeminiBackend;
use crate::services::plan_generator::PlanGenerator;
use crate::services::prompt_service;
use log::info;
use mongodb::Client;
use std::sync::Arc;

/// Candidates for one trip, with the themes they were filtered by.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateSelection {
    pub region: Region,
    pub theme_keywords: Vec<String>,
    pub accommodation_theme: &'static str,
    pub candidates: CandidateSet,
}

/// Runs the whole pipeline for one request: filter, prompt, generate, validate.
pub struct TripPlanner {
    catalog: Arc<CatalogHandle>,
    generator: PlanGenerator,
}

impl TripPlanner {
    pub fn new(catalog: Arc<CatalogHandle>, generator: PlanGenerator) -> Self {
        Self { catalog, generator }
    }

    /// Loads the catalog from MongoDB and wires the Gemini backend.
    /// Returns the catalog store too so the catalog can be reloaded later.
    pub async fn from_config(
        config: &AppConfig,
        client: Arc<Client>,
    ) -> Result<(Self, Arc<dyn CatalogStore>), PlannerError> {
        let store: Arc<dyn CatalogStore> = Arc::new(MongoCatalogStore::new(
            client,
            config.catalog.database.clone(),
            config.catalog.collection.clone(),
            config.catalog.schema,
        ));
        let catalog = load_catalog(store.as_ref()).await?;

        let backend = GeminiBackend::from_config(&config.generation)?;
        let generator = PlanGenerator::new(Arc::new(backend), config.generation.model.clone());

        Ok((Self::new(Arc::new(CatalogHandle::new(catalog)), generator), store))
    }

    pub fn catalog(&self) -> &Arc<CatalogHandle> {
        &self.catalog
    }

    /// Resolves the region against the current snapshot and builds both
    /// candidate lists. Fails before any generation call if either is empty.
    pub fn select_candidates(&self, trip: &TripRequest) -> Result<CandidateSelection, PlannerError> {
        let catalog = self.catalog.snapshot();
        if catalog.is_empty() {
            return Err(PlannerError::Catalog("catalog is not loaded".to_string()));
        }

        let mode = FilterMode::from(catalog.schema());
        let region = trip.region(catalog.schema())?;

        let (theme_keywords, accommodation_theme) = match mode {
            FilterMode::ThemeAware => (trip.theme_keywords().to_vec(), trip.accommodation_theme()),
            FilterMode::AreaOnly => (Vec::new(), LODGING_THEME),
        };

        let candidates =
            filter_candidates(&catalog, &region, &theme_keywords, accommodation_theme, mode)?;
        candidates.ensure_non_empty(&region, accommodation_theme)?;
        Ok(CandidateSelection {
            region,
            theme_keywords,
            accommodation_theme,
            candidates,
        })
    }

    pub async fn plan(&self, trip: &TripRequest) -> Result<TravelPlan, PlannerError> {
        let selection = self.select_candidates(trip)?;
        info!(
            "Planning {}-day trip to {} with {} places and {} accommodations",
            trip.duration_days(),
            selection.region,
            selection.candidates.places.len(),
            selection.candidates.accommodations.len()
        );

        let payload = prompt_service::assemble(
            trip,
            &selection.theme_keywords,
            selection.accommodation_theme,
            &selection.candidates,
        );
        self.generator
            .generate(&payload, trip.duration_days(), &selection.candidates)
            .await
    }
}
