use log::{info, warn};
use mongodb::{
    bson::doc,
    options::{ClientOptions, ServerApi, ServerApiVersion},
    Client,
};
use std::sync::Arc;
use std::time::Duration;

pub async fn create_mongo_client(uri: &str) -> Result<Arc<Client>, mongodb::error::Error> {
    info!("Connecting to MongoDB");

    let mut client_options = ClientOptions::parse(uri).await?;

    client_options.connect_timeout = Some(Duration::from_secs(10));
    client_options.server_selection_timeout = Some(Duration::from_secs(10));
    client_options.max_pool_size = Some(10);
    client_options.min_pool_size = Some(1);

    // Set the server API if using MongoDB 5.0+
    let server_api = ServerApi::builder().version(ServerApiVersion::V1).build();
    client_options.server_api = Some(server_api);

    let client = Client::with_options(client_options)?;

    match ping(&client).await {
        Ok(()) => info!("Connected to MongoDB and verified with ping"),
        Err(e) => warn!(
            "Connected to MongoDB but ping failed: {}. Catalog loading will likely fail.",
            e
        ),
    }

    Ok(Arc::new(client))
}

pub async fn ping(client: &Client) -> Result<(), mongodb::error::Error> {
    client.database("admin").run_command(doc! { "ping": 1 }).await?;
    Ok(())
}
