//! Listing filters: enum-validated facets, `$text` search with a regex
//! fallback, and pagination.

use mongodb::bson::{doc, Bson, Document, Regex};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::job::{Department, JobStatus, JobType};
use crate::sanitize;

pub const DEFAULT_LIMIT: i64 = 20;
pub const MAX_LIMIT: i64 = 100;

/// Fields the regex fallback scans, matching the text index definition.
const SEARCH_FIELDS: &[&str] = &[
    "title",
    "overview",
    "description",
    "location",
    "department",
    "tags",
];

/// Raw query string parameters of `GET /api/jobs`.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ListJobsQuery {
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub job_type: Option<String>,
    pub department: Option<String>,
    pub q: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Facet filters resolved to enum values, plus the optional search term.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct JobFilter {
    pub status: Option<JobStatus>,
    pub job_type: Option<JobType>,
    pub department: Option<Department>,
    pub term: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: i64,
    pub limit: i64,
}

impl Page {
    /// Clamps raw parameters: page is 1-based, limit capped at `MAX_LIMIT`.
    pub fn from_params(page: Option<i64>, limit: Option<i64>) -> Page {
        Page {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
        }
    }

    pub fn skip(&self) -> u64 {
        ((self.page - 1) * self.limit) as u64
    }
}

impl ListJobsQuery {
    /// Validates the facet values and splits off pagination. Unknown enum
    /// values are a 400 rather than a silent empty result.
    pub fn into_parts(self) -> Result<(JobFilter, Page), AppError> {
        let page = Page::from_params(self.page, self.limit);

        let status = parse_facet(self.status, JobStatus::parse, "status")?;
        let job_type = parse_facet(self.job_type, JobType::parse, "type")?;
        let department = parse_facet(self.department, Department::parse, "department")?;
        let term = self
            .q
            .as_deref()
            .map(sanitize::strip)
            .filter(|t| !t.is_empty());

        Ok((
            JobFilter {
                status,
                job_type,
                department,
                term,
            },
            page,
        ))
    }
}

fn parse_facet<T>(
    value: Option<String>,
    parse: fn(&str) -> Option<T>,
    path: &str,
) -> Result<Option<T>, AppError> {
    match value.as_deref().map(sanitize::strip) {
        None => Ok(None),
        Some(raw) if raw.is_empty() => Ok(None),
        Some(raw) => parse(&raw).map(Some).ok_or_else(|| {
            AppError::Validation(format!("`{raw}` is not a valid value for `{path}`"))
        }),
    }
}

/// The facet-only filter document.
pub fn facet_document(filter: &JobFilter) -> Document {
    let mut document = Document::new();
    if let Some(status) = filter.status {
        document.insert("status", status.as_str());
    }
    if let Some(job_type) = filter.job_type {
        document.insert("type", job_type.as_str());
    }
    if let Some(department) = filter.department {
        document.insert("department", department.as_str());
    }
    document
}

/// `$text` form of the filter. Requires the text index.
pub fn text_search_document(filter: &JobFilter, term: &str) -> Document {
    let mut document = facet_document(filter);
    document.insert("$text", doc! { "$search": term });
    document
}

/// Case-insensitive regex `$or` used when the text index is unavailable.
pub fn regex_search_document(filter: &JobFilter, term: &str) -> Document {
    let regex = Bson::RegularExpression(Regex {
        pattern: escape_regex(term),
        options: "i".to_string(),
    });
    let branches: Vec<Document> = SEARCH_FIELDS
        .iter()
        .map(|field| {
            let mut branch = Document::new();
            branch.insert(field.to_string(), regex.clone());
            branch
        })
        .collect();

    let mut document = facet_document(filter);
    document.insert("$or", branches);
    document
}

pub fn recency_sort() -> Document {
    doc! { "createdAt": -1 }
}

pub fn text_score_sort() -> Document {
    doc! { "score": { "$meta": "textScore" }, "createdAt": -1 }
}

pub fn text_score_projection() -> Document {
    doc! { "score": { "$meta": "textScore" } }
}

fn escape_regex(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(
            c,
            '\\' | '.' | '+' | '*' | '?' | '(' | ')' | '|' | '[' | ']' | '{' | '}' | '^' | '$'
        ) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_parts_accepts_valid_facets() {
        let query = ListJobsQuery {
            status: Some("Open".to_string()),
            job_type: Some("Internship".to_string()),
            department: Some("Machine Learning".to_string()),
            ..ListJobsQuery::default()
        };
        let (filter, page) = query.into_parts().unwrap();
        assert_eq!(filter.status, Some(JobStatus::Open));
        assert_eq!(filter.job_type, Some(JobType::Internship));
        assert_eq!(filter.department, Some(Department::MachineLearning));
        assert_eq!(page.page, 1);
        assert_eq!(page.limit, DEFAULT_LIMIT);
    }

    #[test]
    fn test_into_parts_rejects_unknown_status() {
        let query = ListJobsQuery {
            status: Some("Paused".to_string()),
            ..ListJobsQuery::default()
        };
        assert!(matches!(
            query.into_parts(),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_into_parts_ignores_blank_facets_and_term() {
        let query = ListJobsQuery {
            status: Some("  ".to_string()),
            q: Some("".to_string()),
            ..ListJobsQuery::default()
        };
        let (filter, _) = query.into_parts().unwrap();
        assert_eq!(filter, JobFilter::default());
    }

    #[test]
    fn test_page_clamps_out_of_range_values() {
        let page = Page::from_params(Some(0), Some(1000));
        assert_eq!(page.page, 1);
        assert_eq!(page.limit, MAX_LIMIT);
        assert_eq!(page.skip(), 0);
    }

    #[test]
    fn test_page_skip_is_offset_of_previous_pages() {
        let page = Page::from_params(Some(3), Some(20));
        assert_eq!(page.skip(), 40);
    }

    #[test]
    fn test_facet_document_uses_wire_values() {
        let filter = JobFilter {
            status: Some(JobStatus::Closed),
            job_type: Some(JobType::FullTime),
            department: None,
            term: None,
        };
        let document = facet_document(&filter);
        assert_eq!(document.get_str("status").unwrap(), "Closed");
        assert_eq!(document.get_str("type").unwrap(), "Full-time");
        assert!(!document.contains_key("department"));
    }

    #[test]
    fn test_text_search_document_wraps_term() {
        let document = text_search_document(&JobFilter::default(), "rust backend");
        let text = document.get_document("$text").unwrap();
        assert_eq!(text.get_str("$search").unwrap(), "rust backend");
    }

    #[test]
    fn test_regex_search_document_covers_all_search_fields() {
        let document = regex_search_document(&JobFilter::default(), "rust");
        let branches = document.get_array("$or").unwrap();
        assert_eq!(branches.len(), SEARCH_FIELDS.len());
    }

    #[test]
    fn test_regex_search_keeps_facets() {
        let filter = JobFilter {
            status: Some(JobStatus::Open),
            ..JobFilter::default()
        };
        let document = regex_search_document(&filter, "rust");
        assert_eq!(document.get_str("status").unwrap(), "Open");
    }

    #[test]
    fn test_escape_regex_neutralizes_metacharacters() {
        assert_eq!(escape_regex("c++ (senior)"), "c\\+\\+ \\(senior\\)");
        assert_eq!(escape_regex("plain"), "plain");
    }
}
