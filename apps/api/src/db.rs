use std::time::Duration;

use anyhow::Result;
use mongodb::bson::doc;
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Database, IndexModel};
use tracing::info;

use crate::models::application::Application;
use crate::models::job::Job;

pub const JOBS_COLLECTION: &str = "jobs";
pub const APPLICATIONS_COLLECTION: &str = "applications";

/// Connects to MongoDB and returns a handle to the portal database.
/// The connection is verified with a ping so misconfiguration fails at boot.
pub async fn connect(uri: &str, db_name: &str) -> Result<Database> {
    info!("Connecting to MongoDB...");

    let mut options = ClientOptions::parse(uri).await?;
    options.server_selection_timeout = Some(Duration::from_secs(15));

    let client = Client::with_options(options)?;
    let db = client.database(db_name);
    db.run_command(doc! { "ping": 1 }).await?;

    info!("MongoDB connected: {db_name}");
    Ok(db)
}

/// Creates the indexes the job queries rely on. Safe to run on every boot.
pub async fn ensure_indexes(db: &Database) -> Result<()> {
    let jobs = db.collection::<Job>(JOBS_COLLECTION);
    jobs.create_indexes(vec![
        IndexModel::builder().keys(doc! { "createdAt": -1 }).build(),
        IndexModel::builder()
            .keys(doc! { "type": 1, "department": 1, "status": 1 })
            .build(),
        IndexModel::builder()
            .keys(doc! {
                "title": "text",
                "overview": "text",
                "description": "text",
                "location": "text",
                "department": "text",
                "tags": "text",
            })
            .options(IndexOptions::builder().name("jobs_text".to_string()).build())
            .build(),
    ])
    .await?;

    let applications = db.collection::<Application>(APPLICATIONS_COLLECTION);
    applications
        .create_indexes(vec![
            IndexModel::builder().keys(doc! { "jobId": 1 }).build(),
            IndexModel::builder().keys(doc! { "createdAt": -1 }).build(),
        ])
        .await?;

    info!("MongoDB indexes ensured");
    Ok(())
}
