//! Mongo access for the `applications` collection.

use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::{Collection, Database};
use tracing::info;

use crate::db::APPLICATIONS_COLLECTION;
use crate::errors::AppError;
use crate::jobs::query::Page;
use crate::models::application::Application;

fn collection(db: &Database) -> Collection<Application> {
    db.collection::<Application>(APPLICATIONS_COLLECTION)
}

pub struct ApplicationPage {
    pub applications: Vec<Application>,
    pub total: u64,
}

pub async fn insert(db: &Database, mut application: Application) -> Result<Application, AppError> {
    let result = collection(db).insert_one(&application).await?;
    application.id = result.inserted_id.as_object_id();
    info!(
        "Stored application {} for job {}",
        application.id.map(|id| id.to_hex()).unwrap_or_default(),
        application
            .job_id
            .map(|id| id.to_hex())
            .unwrap_or_else(|| "N/A".to_string())
    );
    Ok(application)
}

/// Newest-first listing for the HR dashboard, optionally scoped to one job.
pub async fn list(
    db: &Database,
    job_id: Option<ObjectId>,
    page: Page,
) -> Result<ApplicationPage, AppError> {
    let filter = match job_id {
        Some(id) => doc! { "jobId": id },
        None => Document::new(),
    };
    let coll = collection(db);
    let applications = coll
        .find(filter.clone())
        .sort(doc! { "createdAt": -1 })
        .skip(page.skip())
        .limit(page.limit)
        .await?
        .try_collect()
        .await?;
    let total = coll.count_documents(filter).await?;
    Ok(ApplicationPage {
        applications,
        total,
    })
}
