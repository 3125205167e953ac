//! One-off maintenance: fill missing company names and re-mirror the tag
//! cloud on legacy job documents so they satisfy what the write path now
//! enforces.

use anyhow::Result;
use mongodb::bson::{doc, Document};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use careers_api::config::Config;
use careers_api::db::{self, JOBS_COLLECTION};
use careers_api::models::job::{Job, DEFAULT_COMPANY};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.rust_log.clone())),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database = db::connect(&config.mongo_uri, &config.db_name).await?;
    let jobs = database.collection::<Job>(JOBS_COLLECTION);

    let company = jobs
        .update_many(
            doc! { "$or": [
                { "companyName": { "$exists": false } },
                { "companyName": "" },
                { "companyName": null },
            ]},
            doc! { "$set": { "companyName": DEFAULT_COMPANY } },
        )
        .await?;
    info!(
        "companyName backfill: matched {}, modified {}",
        company.matched_count, company.modified_count
    );

    let merged = doc! { "$setUnion": [
        { "$ifNull": ["$tags", []] },
        { "$ifNull": ["$requiredSkills", []] },
    ]};
    let mirror = jobs
        .update_many(
            Document::new(),
            vec![doc! { "$set": { "tags": merged.clone(), "skills": merged } }],
        )
        .await?;
    info!(
        "tag mirror backfill: matched {}, modified {}",
        mirror.matched_count, mirror.modified_count
    );

    Ok(())
}
