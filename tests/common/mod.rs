#![allow(dead_code)]

use actix_web::{web, App};
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tripcanvas_api::error::{GenerationError, PlannerError};
use tripcanvas_api::models::place::{CatalogSchema, Place, Region};
use tripcanvas_api::models::plan_document::PlanDocument;
use tripcanvas_api::routes;
use tripcanvas_api::services::catalog_service::{Catalog, CatalogHandle, CatalogStore};
use tripcanvas_api::services::generation_backend::{
    GenerationBackend, GenerationRequest, GenerationResponse,
};
use tripcanvas_api::services::plan_generator::PlanGenerator;
use tripcanvas_api::services::plan_store::PlanStore;
use tripcanvas_api::services::planner_service::TripPlanner;

pub struct MockGenerationBackend {
    responses: Mutex<Vec<Result<GenerationResponse, GenerationError>>>,
    call_count: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl MockGenerationBackend {
    pub fn with_texts(texts: Vec<String>) -> Self {
        Self {
            responses: Mutex::new(
                texts
                    .into_iter()
                    .map(|text| Ok(GenerationResponse { text }))
                    .collect(),
            ),
            call_count: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: GenerationError) -> Self {
        Self {
            responses: Mutex::new(vec![Err(error)]),
            call_count: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerationBackend for MockGenerationBackend {
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse, GenerationError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(request.prompt);
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        responses.remove(0)
    }
}

#[derive(Default)]
pub struct MemoryPlanStore {
    plans: Mutex<HashMap<ObjectId, PlanDocument>>,
}

impl MemoryPlanStore {
    pub fn len(&self) -> usize {
        self.plans.lock().unwrap().len()
    }
}

#[async_trait]
impl PlanStore for MemoryPlanStore {
    async fn save(&self, mut document: PlanDocument) -> Result<ObjectId, PlannerError> {
        let id = *document.id.get_or_insert_with(ObjectId::new);
        self.plans.lock().unwrap().insert(id, document);
        Ok(id)
    }

    async fn find(&self, id: &ObjectId) -> Result<Option<PlanDocument>, PlannerError> {
        Ok(self.plans.lock().unwrap().get(id).cloned())
    }
}

pub struct StaticCatalogStore {
    pub schema: CatalogSchema,
    pub places: Mutex<Vec<Place>>,
}

impl StaticCatalogStore {
    pub fn new(catalog: &Catalog) -> Self {
        Self {
            schema: catalog.schema(),
            places: Mutex::new(catalog.places().to_vec()),
        }
    }

    pub fn push(&self, place: Place) {
        self.places.lock().unwrap().push(place);
    }
}

#[async_trait]
impl CatalogStore for StaticCatalogStore {
    fn schema(&self) -> CatalogSchema {
        self.schema
    }

    async fn fetch_all(&self) -> Result<Vec<Place>, PlannerError> {
        Ok(self.places.lock().unwrap().clone())
    }
}

pub fn jongno() -> Region {
    Region::District {
        city: "Seoul".to_string(),
        district: "Jongno".to_string(),
    }
}

pub fn seoul_catalog() -> Catalog {
    Catalog::new(
        CatalogSchema::Nested,
        vec![
            Place::new("A", Some("cafe".to_string()), jongno(), Some(37.5), Some(127.0)),
            Place::new("B", Some("lodging".to_string()), jongno(), Some(37.6), Some(127.1)),
            Place::new("C", Some("history, museum".to_string()), jongno(), None, None),
        ],
    )
}

pub fn trip_body(start_date: &str, end_date: &str, themes: &str) -> Value {
    json!({
        "start_loc": "Busan",
        "end_area": "Seoul",
        "detail_addr": "Jongno",
        "start_date": start_date,
        "end_date": end_date,
        "budget_per_person": "150000",
        "total_people": "2",
        "place_themes": themes,
        "userId": "user-1"
    })
}

pub fn location(name: &str, cost: i64) -> Value {
    json!({
        "name": name,
        "description": "생성된 설명",
        "coords": "37.5, 127",
        "estimated_cost": cost,
        "closest_subway": "Jonggak"
    })
}

/// A plan text with one entry per `(places, accommodation)` pair, days numbered from 1.
pub fn plan_text(days: &[(Vec<&str>, &str)]) -> String {
    let days: Vec<Value> = days
        .iter()
        .enumerate()
        .map(|(idx, (places, accommodation))| {
            json!({
                "day": idx + 1,
                "places": places.iter().map(|p| location(p, 15000)).collect::<Vec<_>>(),
                "accommodation": location(accommodation, 90000)
            })
        })
        .collect();
    json!({ "title": "종로 여행", "description": "카페 투어", "travel_plan": days }).to_string()
}

pub struct TestApp {
    pub backend: Arc<MockGenerationBackend>,
    pub catalog: Arc<CatalogHandle>,
    pub catalog_store: Arc<StaticCatalogStore>,
    pub plan_store: Arc<MemoryPlanStore>,
    pub planner: Arc<TripPlanner>,
}

impl TestApp {
    pub fn new(catalog: Catalog, backend: MockGenerationBackend) -> Self {
        let backend = Arc::new(backend);
        let catalog_store = Arc::new(StaticCatalogStore::new(&catalog));
        let catalog = Arc::new(CatalogHandle::new(catalog));
        let generator = PlanGenerator::new(backend.clone(), "gemini-2.5-flash");

        Self {
            backend,
            planner: Arc::new(TripPlanner::new(catalog.clone(), generator)),
            catalog,
            catalog_store,
            plan_store: Arc::new(MemoryPlanStore::default()),
        }
    }

    pub fn create_app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let plan_store: Arc<dyn PlanStore> = self.plan_store.clone();
        let catalog_store: Arc<dyn CatalogStore> = self.catalog_store.clone();

        App::new()
            .app_data(web::Data::new(self.planner.clone()))
            .app_data(web::Data::new(self.catalog.clone()))
            .app_data(web::Data::new(catalog_store))
            .app_data(web::Data::new(plan_store))
            .configure(routes::configure)
    }
}
