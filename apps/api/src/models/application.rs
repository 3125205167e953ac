use mongodb::bson::oid::ObjectId;
use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};

/// A candidate submission against a job, as stored in the `applications`
/// collection. The job reference is optional: unsolicited applications come
/// in without one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<ObjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub comments: String,
    /// Relative path of the stored resume under the `/uploads` mount.
    #[serde(default)]
    pub resume_path: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

/// Wire shape of an application: hex ids, RFC 3339 timestamps.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationResponse {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub comments: String,
    pub resume_path: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Application> for ApplicationResponse {
    fn from(application: Application) -> Self {
        ApplicationResponse {
            id: application.id.map(|id| id.to_hex()).unwrap_or_default(),
            job_id: application.job_id.map(|id| id.to_hex()),
            job_title: application.job_title,
            full_name: application.full_name,
            email: application.email,
            phone: application.phone,
            comments: application.comments,
            resume_path: application.resume_path,
            created_at: application
                .created_at
                .try_to_rfc3339_string()
                .unwrap_or_default(),
            updated_at: application
                .updated_at
                .try_to_rfc3339_string()
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_document_field_names() {
        let now = DateTime::now();
        let application = Application {
            id: None,
            job_id: Some(ObjectId::new()),
            job_title: Some("Backend Engineer".to_string()),
            full_name: "Asha Rao".to_string(),
            email: "asha@example.com".to_string(),
            phone: "9876543210".to_string(),
            comments: "Excited to apply.".to_string(),
            resume_path: Some("/uploads/resumes/1_resume.pdf".to_string()),
            created_at: now,
            updated_at: now,
        };
        let doc = mongodb::bson::to_document(&application).unwrap();
        assert!(doc.contains_key("jobId"));
        assert!(doc.contains_key("fullName"));
        assert!(doc.contains_key("resumePath"));
        assert!(!doc.contains_key("_id"));
    }

    #[test]
    fn test_response_hexes_object_ids() {
        let id = ObjectId::new();
        let now = DateTime::now();
        let application = Application {
            id: Some(id),
            job_id: None,
            job_title: None,
            full_name: "Asha Rao".to_string(),
            email: "asha@example.com".to_string(),
            phone: "9876543210".to_string(),
            comments: "Hello".to_string(),
            resume_path: None,
            created_at: now,
            updated_at: now,
        };
        let response = ApplicationResponse::from(application);
        assert_eq!(response.id, id.to_hex());
        assert!(response.job_id.is_none());
    }
}
