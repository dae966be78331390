use crate::error::PlannerError;
use crate::models::place::{CatalogSchema, FlatPlaceRecord, NestedPlaceRecord, Place, Region};
use async_trait::async_trait;
use futures::TryStreamExt;
use log::{info, warn};
use mongodb::{
    bson::{doc, Document},
    Client, Collection,
};
use serde::de::DeserializeOwned;
use std::sync::{Arc, RwLock};

/// Source of catalog places. Exposes a single projected fetch-all.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    fn schema(&self) -> CatalogSchema;

    async fn fetch_all(&self) -> Result<Vec<Place>, PlannerError>;
}

pub struct MongoCatalogStore {
    client: Arc<Client>,
    database: String,
    collection: String,
    schema: CatalogSchema,
}

impl MongoCatalogStore {
    pub fn new(
        client: Arc<Client>,
        database: impl Into<String>,
        collection: impl Into<String>,
        schema: CatalogSchema,
    ) -> Self {
        Self {
            client,
            database: database.into(),
            collection: collection.into(),
            schema,
        }
    }

    fn projection(&self) -> Document {
        match self.schema {
            CatalogSchema::Nested => doc! {
                "title": 1,
                "category": 1,
                "address.city": 1,
                "address.district": 1,
                "coordinates.coordinates": 1,
                "_id": 0,
            },
            CatalogSchema::Flat => doc! {
                "title": 1,
                "cat": 1,
                "area": 1,
                "x": 1,
                "y": 1,
                "_id": 0,
            },
        }
    }

    async fn fetch_records<T>(&self) -> Result<Vec<T>, PlannerError>
    where
        T: DeserializeOwned + Send + Sync + Unpin,
    {
        let collection: Collection<T> = self
            .client
            .database(&self.database)
            .collection(&self.collection);

        let cursor = collection.find(doc! {}).projection(self.projection()).await?;
        let records: Vec<T> = cursor.try_collect().await?;
        Ok(records)
    }
}

#[async_trait]
impl CatalogStore for MongoCatalogStore {
    fn schema(&self) -> CatalogSchema {
        self.schema
    }

    async fn fetch_all(&self) -> Result<Vec<Place>, PlannerError> {
        let (total, places): (usize, Vec<Place>) = match self.schema {
            CatalogSchema::Nested => {
                let records = self.fetch_records::<NestedPlaceRecord>().await?;
                let total = records.len();
                (total, records.into_iter().filter_map(NestedPlaceRecord::into_place).collect())
            }
            CatalogSchema::Flat => {
                let records = self.fetch_records::<FlatPlaceRecord>().await?;
                let total = records.len();
                (total, records.into_iter().filter_map(FlatPlaceRecord::into_place).collect())
            }
        };

        if places.len() < total {
            warn!(
                "Skipped {} catalog records without a title or region",
                total - places.len()
            );
        }
        Ok(places)
    }
}

/// An immutable snapshot of the catalog.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    schema: CatalogSchema,
    places: Vec<Place>,
}

impl Catalog {
    pub fn new(schema: CatalogSchema, places: Vec<Place>) -> Self {
        Self { schema, places }
    }

    pub fn schema(&self) -> CatalogSchema {
        self.schema
    }

    pub fn places(&self) -> &[Place] {
        &self.places
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    pub fn in_region<'a>(&'a self, region: &'a Region) -> impl Iterator<Item = &'a Place> + 'a {
        self.places.iter().filter(move |place| &place.region == region)
    }
}

/// Shared handle to the current catalog snapshot.
///
/// Readers clone the inner `Arc` and keep a consistent view for the whole run;
/// a reload swaps the pointer instead of mutating the places in place.
#[derive(Debug, Default)]
pub struct CatalogHandle {
    current: RwLock<Arc<Catalog>>,
}

impl CatalogHandle {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            current: RwLock::new(Arc::new(catalog)),
        }
    }

    pub fn snapshot(&self) -> Arc<Catalog> {
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    /// Installs `catalog` and returns the snapshot it replaced.
    pub fn replace(&self, catalog: Catalog) -> Arc<Catalog> {
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        std::mem::replace(&mut *guard, Arc::new(catalog))
    }
}

pub async fn load_catalog(store: &dyn CatalogStore) -> Result<Catalog, PlannerError> {
    let places = store.fetch_all().await?;
    if places.is_empty() {
        return Err(PlannerError::Catalog("catalog store returned no places".to_string()));
    }
    info!("Loaded {} catalog places ({:?} schema)", places.len(), store.schema());
    Ok(Catalog::new(store.schema(), places))
}

/// Fetches a fresh catalog and swaps it in. The old snapshot stays valid for
/// anyone still holding it.
pub async fn reload_catalog(
    handle: &CatalogHandle,
    store: &dyn CatalogStore,
) -> Result<usize, PlannerError> {
    let catalog = load_catalog(store).await?;
    let count = catalog.len();
    let previous = handle.replace(catalog);
    info!("Catalog reloaded: {} -> {} places", previous.len(), count);
    Ok(count)
}
