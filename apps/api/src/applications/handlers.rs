use axum::extract::{Host, Multipart, Query, State};
use axum::Json;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::warn;

use crate::applications::{intake, repository};
use crate::errors::AppError;
use crate::jobs::query::Page;
use crate::jobs::repository as jobs_repository;
use crate::models::application::{Application, ApplicationResponse};
use crate::sanitize;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ListApplicationsQuery {
    #[serde(rename = "jobId")]
    pub job_id: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Serialize)]
pub struct ApplicationListResponse {
    pub data: Vec<ApplicationResponse>,
    pub page: i64,
    pub limit: i64,
    pub total: u64,
}

/// POST /api/apply (alias: POST /api/apply/submit) — the submission pipeline:
/// validate, store the resume, notify both parties, persist, bump the job's
/// counter.
pub async fn handle_submit_application(
    State(state): State<AppState>,
    Host(host): Host,
    multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    let form = intake::read_form(multipart).await?;
    intake::validate(&form)?;

    let Some(upload) = form.resume.as_ref() else {
        return Err(AppError::Validation("Resume file is missing.".to_string()));
    };
    let stored = state.resumes.save(&upload.original_name, &upload.data).await?;

    // Notify before persisting; a failed send rejects the submission
    // outright, so the stored file must not be left behind.
    let email = crate::mailer::ApplicationEmail {
        job_id: form.job_id.clone(),
        job_title: form.job_title.clone(),
        full_name: form.full_name.clone(),
        applicant_email: form.email.clone(),
        phone: form.phone.clone(),
        message: form.why.clone(),
        attachment_name: if upload.original_name.trim().is_empty() {
            stored.stored_name.clone()
        } else {
            upload.original_name.clone()
        },
        attachment: upload.data.clone(),
    };
    if let Err(e) = state.mailer.send_application_emails(&email).await {
        state.resumes.discard(&stored).await;
        return Err(e.into());
    }

    let job_object_id = ObjectId::parse_str(&form.job_id).ok();
    let now = DateTime::now();
    let application = Application {
        id: None,
        job_id: job_object_id,
        job_title: (!form.job_title.is_empty()).then(|| form.job_title.clone()),
        full_name: form.full_name.clone(),
        email: form.email.clone(),
        phone: form.phone.clone(),
        comments: form.why.clone(),
        resume_path: Some(stored.relative_path()),
        created_at: now,
        updated_at: now,
    };
    let application = match repository::insert(&state.db, application).await {
        Ok(application) => application,
        Err(e) => {
            state.resumes.discard(&stored).await;
            return Err(e);
        }
    };

    if let Some(job_id) = job_object_id {
        match jobs_repository::increment_applications(&state.db, job_id).await {
            Ok(false) => warn!("Application names unknown job {}", job_id.to_hex()),
            Err(e) => warn!("Failed to bump counter for job {}: {e}", job_id.to_hex()),
            Ok(true) => {}
        }
    }

    Ok(Json(json!({
        "ok": true,
        "message": "Application submitted successfully! Check your email for confirmation.",
        "applicationId": application.id.map(|id| id.to_hex()),
        "jobId": form.job_id,
        "jobTitle": form.job_title,
        "fullName": form.full_name,
        "email": form.email,
        "phone": form.phone,
        "why": form.why,
        "resume": {
            "filename": stored.original_name,
            "storedAs": stored.stored_name,
            "size": stored.size,
            "url": format!("http://{host}{}", stored.relative_path()),
            "path": stored.relative_path(),
        },
        "receivedAt": now.try_to_rfc3339_string().unwrap_or_default(),
    })))
}

/// GET /api/applications — HR dashboard listing, optionally scoped to a job.
pub async fn handle_list_applications(
    State(state): State<AppState>,
    Query(params): Query<ListApplicationsQuery>,
) -> Result<Json<ApplicationListResponse>, AppError> {
    let job_id = match params.job_id.as_deref().map(sanitize::strip) {
        None => None,
        Some(raw) if raw.is_empty() => None,
        Some(raw) => Some(
            ObjectId::parse_str(&raw)
                .map_err(|_| AppError::Validation(format!("Invalid jobId: \"{raw}\"")))?,
        ),
    };
    let page = Page::from_params(params.page, params.limit);

    let result = repository::list(&state.db, job_id, page).await?;
    Ok(Json(ApplicationListResponse {
        data: result.applications.into_iter().map(Into::into).collect(),
        page: page.page,
        limit: page.limit,
        total: result.total,
    }))
}
