use mongodb::bson::oid::ObjectId;
use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};

use crate::sanitize;

/// Company stamped on postings that do not name one.
pub const DEFAULT_COMPANY: &str = "GyanNidhi Innovations Pvt. Ltd.";

/// Departments a role can be posted under. Kept in sync with the portal's
/// dropdowns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Department {
    Engineering,
    Product,
    Research,
    Training,
    Marketing,
    #[serde(rename = "Quality Assurance")]
    QualityAssurance,
    #[serde(rename = "Machine Learning")]
    MachineLearning,
    #[serde(rename = "Artificial Intelligence")]
    ArtificialIntelligence,
    Education,
}

impl Department {
    pub const ALL: &'static [Department] = &[
        Department::Engineering,
        Department::Product,
        Department::Research,
        Department::Training,
        Department::Marketing,
        Department::QualityAssurance,
        Department::MachineLearning,
        Department::ArtificialIntelligence,
        Department::Education,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Department::Engineering => "Engineering",
            Department::Product => "Product",
            Department::Research => "Research",
            Department::Training => "Training",
            Department::Marketing => "Marketing",
            Department::QualityAssurance => "Quality Assurance",
            Department::MachineLearning => "Machine Learning",
            Department::ArtificialIntelligence => "Artificial Intelligence",
            Department::Education => "Education",
        }
    }

    pub fn parse(value: &str) -> Option<Department> {
        Self::ALL.iter().copied().find(|d| d.as_str() == value)
    }
}

/// Employment type of a posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobType {
    #[serde(rename = "Full-time")]
    FullTime,
    #[serde(rename = "Part-time")]
    PartTime,
    Internship,
}

impl JobType {
    pub const ALL: &'static [JobType] = &[JobType::FullTime, JobType::PartTime, JobType::Internship];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::FullTime => "Full-time",
            JobType::PartTime => "Part-time",
            JobType::Internship => "Internship",
        }
    }

    pub fn parse(value: &str) -> Option<JobType> {
        Self::ALL.iter().copied().find(|t| t.as_str() == value)
    }
}

/// Whether a posting is visible and accepting applications.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    #[default]
    Open,
    Closed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Open => "Open",
            JobStatus::Closed => "Closed",
        }
    }

    pub fn parse(value: &str) -> Option<JobStatus> {
        match value {
            "Open" => Some(JobStatus::Open),
            "Closed" => Some(JobStatus::Closed),
            _ => None,
        }
    }
}

/// A posted role or internship, as stored in the `jobs` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    pub department: Department,
    #[serde(rename = "type")]
    pub job_type: JobType,
    pub location: String,
    #[serde(default)]
    pub status: JobStatus,
    /// The frontend maps experience level onto this field for full-time roles.
    #[serde(default)]
    pub duration: String,
    #[serde(default = "default_company")]
    pub company_name: String,
    /// Free-form human-readable salary, e.g. "₹6–8 LPA" or "Competitive".
    #[serde(default)]
    pub salary_range: String,
    #[serde(default)]
    pub training_period: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub job_role: String,
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub benefits: Vec<String>,
    #[serde(default)]
    pub how_to_apply: String,
    /// Authoritative tag cloud; `skills` mirrors it for older clients.
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience: String,
    /// Submission counter, bumped when an application names this job.
    #[serde(default)]
    pub applications: i64,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

fn default_company() -> String {
    DEFAULT_COMPANY.to_string()
}

/// Merges `tags` and `requiredSkills` into the deduplicated cloud stored on
/// both `tags` and the legacy `skills` field.
pub fn merge_tag_cloud(tags: &[String], required_skills: &[String]) -> Vec<String> {
    sanitize::uniq(tags.iter().chain(required_skills).map(String::as_str))
}

/// Wire shape of a job: hex `id`, RFC 3339 timestamps.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobResponse {
    pub id: String,
    pub title: String,
    pub department: Department,
    #[serde(rename = "type")]
    pub job_type: JobType,
    pub location: String,
    pub status: JobStatus,
    pub duration: String,
    pub company_name: String,
    pub salary_range: String,
    pub training_period: String,
    pub overview: String,
    pub description: String,
    pub job_role: String,
    pub required_skills: Vec<String>,
    pub benefits: Vec<String>,
    pub how_to_apply: String,
    pub tags: Vec<String>,
    pub skills: Vec<String>,
    pub experience: String,
    pub applications: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Job> for JobResponse {
    fn from(job: Job) -> Self {
        JobResponse {
            id: job.id.map(|id| id.to_hex()).unwrap_or_default(),
            title: job.title,
            department: job.department,
            job_type: job.job_type,
            location: job.location,
            status: job.status,
            duration: job.duration,
            company_name: job.company_name,
            salary_range: job.salary_range,
            training_period: job.training_period,
            overview: job.overview,
            description: job.description,
            job_role: job.job_role,
            required_skills: job.required_skills,
            benefits: job.benefits,
            how_to_apply: job.how_to_apply,
            tags: job.tags,
            skills: job.skills,
            experience: job.experience,
            applications: job.applications,
            created_at: job.created_at.try_to_rfc3339_string().unwrap_or_default(),
            updated_at: job.updated_at.try_to_rfc3339_string().unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_type_serializes_with_hyphen() {
        let json = serde_json::to_string(&JobType::FullTime).unwrap();
        assert_eq!(json, r#""Full-time""#);
    }

    #[test]
    fn test_job_type_parses_wire_spelling() {
        assert_eq!(JobType::parse("Part-time"), Some(JobType::PartTime));
        assert_eq!(JobType::parse("part-time"), None);
    }

    #[test]
    fn test_department_round_trips_spaced_names() {
        let json = serde_json::to_string(&Department::MachineLearning).unwrap();
        assert_eq!(json, r#""Machine Learning""#);
        let back: Department = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Department::MachineLearning);
    }

    #[test]
    fn test_department_parse_matches_serde_names() {
        for d in Department::ALL {
            assert_eq!(Department::parse(d.as_str()), Some(*d));
        }
        assert_eq!(Department::parse("Sales"), None);
    }

    #[test]
    fn test_status_defaults_to_open() {
        assert_eq!(JobStatus::default(), JobStatus::Open);
    }

    #[test]
    fn test_merge_tag_cloud_unions_and_dedups() {
        let tags = vec!["Rust".to_string(), "Backend".to_string()];
        let skills = vec!["Backend".to_string(), "MongoDB".to_string()];
        assert_eq!(merge_tag_cloud(&tags, &skills), vec!["Rust", "Backend", "MongoDB"]);
    }

    #[test]
    fn test_merge_tag_cloud_strips_entries() {
        let tags = vec!["<b>Rust</b>".to_string()];
        let skills = vec!["  Rust  ".to_string()];
        assert_eq!(merge_tag_cloud(&tags, &skills), vec!["Rust"]);
    }

    #[test]
    fn test_job_document_field_names() {
        let now = DateTime::now();
        let job = Job {
            id: None,
            title: "Backend Engineer".to_string(),
            department: Department::Engineering,
            job_type: JobType::FullTime,
            location: "Remote".to_string(),
            status: JobStatus::Open,
            duration: String::new(),
            company_name: DEFAULT_COMPANY.to_string(),
            salary_range: String::new(),
            training_period: String::new(),
            overview: String::new(),
            description: String::new(),
            job_role: String::new(),
            required_skills: vec![],
            benefits: vec![],
            how_to_apply: String::new(),
            tags: vec![],
            skills: vec![],
            experience: String::new(),
            applications: 0,
            created_at: now,
            updated_at: now,
        };
        let doc = mongodb::bson::to_document(&job).unwrap();
        assert!(doc.contains_key("companyName"));
        assert!(doc.contains_key("requiredSkills"));
        assert!(doc.contains_key("createdAt"));
        assert_eq!(doc.get_str("type").unwrap(), "Full-time");
        assert!(!doc.contains_key("_id"));
    }
}
