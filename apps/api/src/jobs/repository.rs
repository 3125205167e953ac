//! Mongo access for the `jobs` collection.

use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::error::{Error, ErrorKind};
use mongodb::options::ReturnDocument;
use mongodb::{Collection, Database};
use tracing::{info, warn};

use crate::db::JOBS_COLLECTION;
use crate::errors::AppError;
use crate::jobs::query::{self, JobFilter, Page};
use crate::models::job::Job;

fn collection(db: &Database) -> Collection<Job> {
    db.collection::<Job>(JOBS_COLLECTION)
}

/// One page of results plus the unpaginated total.
pub struct JobPage {
    pub jobs: Vec<Job>,
    pub total: u64,
}

pub async fn insert(db: &Database, mut job: Job) -> Result<Job, AppError> {
    let result = collection(db).insert_one(&job).await?;
    job.id = result.inserted_id.as_object_id();
    info!(
        "Created job {}",
        job.id.map(|id| id.to_hex()).unwrap_or_default()
    );
    Ok(job)
}

/// Filtered, paginated listing. With a search term this prefers the `$text`
/// index (sorted by text score, then recency) and falls back to a regex scan
/// when the index is missing.
pub async fn list(db: &Database, filter: &JobFilter, page: Page) -> Result<JobPage, AppError> {
    let coll = collection(db);

    if let Some(term) = filter.term.as_deref() {
        let text_filter = query::text_search_document(filter, term);
        let found = coll
            .find(text_filter.clone())
            .projection(query::text_score_projection())
            .sort(query::text_score_sort())
            .skip(page.skip())
            .limit(page.limit)
            .await;
        match found {
            Ok(cursor) => {
                let jobs = cursor.try_collect().await?;
                let total = coll.count_documents(text_filter).await?;
                return Ok(JobPage { jobs, total });
            }
            Err(e) if is_missing_text_index(&e) => {
                warn!("Text index missing, falling back to regex search");
                let regex_filter = query::regex_search_document(filter, term);
                return find_page(&coll, regex_filter, page).await;
            }
            Err(e) => return Err(e.into()),
        }
    }

    find_page(&coll, query::facet_document(filter), page).await
}

async fn find_page(
    coll: &Collection<Job>,
    filter: Document,
    page: Page,
) -> Result<JobPage, AppError> {
    let jobs = coll
        .find(filter.clone())
        .sort(query::recency_sort())
        .skip(page.skip())
        .limit(page.limit)
        .await?
        .try_collect()
        .await?;
    let total = coll.count_documents(filter).await?;
    Ok(JobPage { jobs, total })
}

pub async fn get(db: &Database, id: ObjectId) -> Result<Option<Job>, AppError> {
    Ok(collection(db).find_one(doc! { "_id": id }).await?)
}

/// Applies a partial `$set` and returns the post-update document.
pub async fn update(db: &Database, id: ObjectId, set: Document) -> Result<Option<Job>, AppError> {
    Ok(collection(db)
        .find_one_and_update(doc! { "_id": id }, doc! { "$set": set })
        .return_document(ReturnDocument::After)
        .await?)
}

pub async fn delete(db: &Database, id: ObjectId) -> Result<Option<Job>, AppError> {
    let deleted = collection(db).find_one_and_delete(doc! { "_id": id }).await?;
    if deleted.is_some() {
        info!("Deleted job {}", id.to_hex());
    }
    Ok(deleted)
}

/// Bumps the submission counter. Returns false when the job no longer exists.
pub async fn increment_applications(db: &Database, id: ObjectId) -> Result<bool, AppError> {
    let result = collection(db)
        .update_one(doc! { "_id": id }, doc! { "$inc": { "applications": 1 } })
        .await?;
    Ok(result.matched_count > 0)
}

/// Mongo raises server error 27 (IndexNotFound) when `$text` runs without a
/// text index.
fn is_missing_text_index(error: &Error) -> bool {
    match error.kind.as_ref() {
        ErrorKind::Command(command_error) => command_error.code == 27,
        _ => false,
    }
}
