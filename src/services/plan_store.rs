use crate::error::PlannerError;
use crate::models::plan_document::PlanDocument;
use async_trait::async_trait;
use log::info;
use mongodb::{
    bson::{doc, oid::ObjectId},
    Client, Collection,
};
use std::sync::Arc;

pub const PLANS_COLLECTION: &str = "Plans";

#[async_trait]
pub trait PlanStore: Send + Sync {
    async fn save(&self, document: PlanDocument) -> Result<ObjectId, PlannerError>;

    async fn find(&self, id: &ObjectId) -> Result<Option<PlanDocument>, PlannerError>;
}

pub struct MongoPlanStore {
    client: Arc<Client>,
    database: String,
}

impl MongoPlanStore {
    pub fn new(client: Arc<Client>, database: impl Into<String>) -> Self {
        Self {
            client,
            database: database.into(),
        }
    }

    fn collection(&self) -> Collection<PlanDocument> {
        self.client
            .database(&self.database)
            .collection(PLANS_COLLECTION)
    }
}

#[async_trait]
impl PlanStore for MongoPlanStore {
    async fn save(&self, mut document: PlanDocument) -> Result<ObjectId, PlannerError> {
        let id = *document.id.get_or_insert_with(ObjectId::new);
        self.collection().insert_one(document).await?;
        info!("Stored plan {}", id);
        Ok(id)
    }

    async fn find(&self, id: &ObjectId) -> Result<Option<PlanDocument>, PlannerError> {
        Ok(self.collection().find_one(doc! { "_id": id }).await?)
    }
}
