pub mod health;

use axum::extract::DefaultBodyLimit;
use axum::http::Uri;
use axum::routing::{get, patch, post};
use axum::Router;
use tower_http::services::ServeDir;

use crate::applications::handlers as application_handlers;
use crate::errors::AppError;
use crate::jobs::handlers as job_handlers;
use crate::state::AppState;

const JSON_BODY_LIMIT: usize = 1024 * 1024;
/// Large enough that an oversized resume reaches the friendly size check
/// instead of the framework's opaque limit rejection.
const APPLY_BODY_LIMIT: usize = 8 * 1024 * 1024;

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("Route not found: {uri}"))
}

pub fn build_router(state: AppState) -> Router {
    let jobs = Router::new()
        .route(
            "/api/jobs",
            get(job_handlers::handle_list_jobs).post(job_handlers::handle_create_job),
        )
        .route("/api/jobs/public", get(job_handlers::handle_list_public_jobs))
        // status toggle before the generic :id routes
        .route(
            "/api/jobs/:id/status",
            patch(job_handlers::handle_set_job_status),
        )
        .route(
            "/api/jobs/:id",
            get(job_handlers::handle_get_job)
                .put(job_handlers::handle_update_job)
                .patch(job_handlers::handle_update_job)
                .delete(job_handlers::handle_delete_job),
        )
        .route(
            "/api/applications",
            get(application_handlers::handle_list_applications),
        )
        .layer(DefaultBodyLimit::max(JSON_BODY_LIMIT));

    let apply = Router::new()
        .route(
            "/api/apply",
            post(application_handlers::handle_submit_application),
        )
        .route(
            "/api/apply/submit",
            post(application_handlers::handle_submit_application),
        )
        .layer(DefaultBodyLimit::max(APPLY_BODY_LIMIT));

    let uploads_root = state.resumes.root().to_path_buf();

    Router::new()
        .route("/health", get(health::health_handler))
        .merge(jobs)
        .merge(apply)
        .nest_service("/uploads", ServeDir::new(uploads_root))
        .fallback(not_found)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::util::ServiceExt;

    use crate::applications::storage::ResumeStore;
    use crate::config::Config;
    use crate::mailer::Mailer;

    // Clients below are lazy: nothing connects until a request needs it, so
    // router-level tests run without a database or SMTP server.
    async fn test_state(upload_dir: &std::path::Path) -> AppState {
        let config = Config {
            mongo_uri: "mongodb://localhost:27017".to_string(),
            db_name: "careers_test".to_string(),
            smtp_host: "smtp.gmail.com".to_string(),
            smtp_username: "careers@example.com".to_string(),
            smtp_password: "app-password".to_string(),
            hr_email: "hr@example.com".to_string(),
            admin_email: None,
            frontend_origin: "*".to_string(),
            port: 0,
            upload_dir: upload_dir.to_path_buf(),
            rust_log: "info".to_string(),
        };
        let client = mongodb::Client::with_uri_str(&config.mongo_uri)
            .await
            .expect("client");
        AppState {
            db: client.database(&config.db_name),
            mailer: Mailer::from_config(&config).expect("mailer"),
            resumes: ResumeStore::open(&config.upload_dir).await.expect("store"),
            config,
        }
    }

    #[tokio::test]
    async fn test_health_route_responds_ok() {
        let dir = tempfile::tempdir().expect("tempdir");
        let app = build_router(test_state(dir.path()).await);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let dir = tempfile::tempdir().expect("tempdir");
        let app = build_router(test_state(dir.path()).await);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/nope")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_malformed_job_id_is_400() {
        let dir = tempfile::tempdir().expect("tempdir");
        let app = build_router(test_state(dir.path()).await);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/jobs/not-an-id")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
