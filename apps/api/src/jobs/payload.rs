//! Request payload shaping for job writes: sanitation, enum and length
//! validation, and the tag-cloud merge shared by create and update.

use std::collections::BTreeMap;

use mongodb::bson::{DateTime, Document};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::job::{
    merge_tag_cloud, Department, Job, JobStatus, JobType, DEFAULT_COMPANY,
};
use crate::sanitize;

const MAX_TITLE: usize = 160;
const MAX_LOCATION: usize = 160;
const MAX_DURATION: usize = 40;
const MAX_COMPANY: usize = 160;
const MAX_SALARY: usize = 120;
const MAX_TRAINING: usize = 120;
const MAX_OVERVIEW: usize = 400;
const MAX_DESCRIPTION: usize = 5000;
const MAX_JOB_ROLE: usize = 1500;
const MAX_HOW_TO_APPLY: usize = 1500;
const MAX_EXPERIENCE: usize = 80;

type FieldErrors = BTreeMap<String, String>;

/// A list field the clients send either as a JSON array or as one
/// newline-separated string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StringOrList {
    List(Vec<String>),
    Text(String),
}

impl StringOrList {
    /// Normalizes to stripped, deduplicated, non-empty entries.
    pub fn into_entries(self) -> Vec<String> {
        match self {
            StringOrList::List(items) => sanitize::uniq(items.iter().map(String::as_str)),
            StringOrList::Text(text) => sanitize::uniq(text.lines()),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobRequest {
    pub title: Option<String>,
    pub department: Option<String>,
    #[serde(rename = "type")]
    pub job_type: Option<String>,
    pub location: Option<String>,
    pub status: Option<String>,
    pub duration: Option<String>,
    pub company_name: Option<String>,
    pub salary_range: Option<String>,
    pub training_period: Option<String>,
    pub overview: Option<String>,
    pub description: Option<String>,
    pub job_role: Option<String>,
    pub required_skills: Option<StringOrList>,
    pub benefits: Option<StringOrList>,
    pub how_to_apply: Option<String>,
    pub tags: Option<StringOrList>,
    pub experience: Option<String>,
    pub applications: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateJobRequest {
    pub title: Option<String>,
    pub department: Option<String>,
    #[serde(rename = "type")]
    pub job_type: Option<String>,
    pub location: Option<String>,
    pub status: Option<String>,
    pub duration: Option<String>,
    pub company_name: Option<String>,
    pub salary_range: Option<String>,
    pub training_period: Option<String>,
    pub overview: Option<String>,
    pub description: Option<String>,
    pub job_role: Option<String>,
    pub required_skills: Option<StringOrList>,
    pub benefits: Option<StringOrList>,
    pub how_to_apply: Option<String>,
    pub tags: Option<StringOrList>,
    pub experience: Option<String>,
    pub applications: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: Option<String>,
}

/// Validates and sanitizes a create request into a ready-to-insert document.
/// All field failures are collected and reported together.
pub fn build_create(req: CreateJobRequest) -> Result<Job, AppError> {
    let mut errors = FieldErrors::new();

    let title = required_text("title", "Title", req.title, MAX_TITLE, &mut errors);
    let location = required_text("location", "Location", req.location, MAX_LOCATION, &mut errors);

    let department = required_enum(
        "department",
        "Department",
        req.department,
        Department::parse,
        &mut errors,
    );
    let job_type = required_enum("type", "Type", req.job_type, JobType::parse, &mut errors);

    let status = match req.status.as_deref().map(sanitize::strip) {
        None => JobStatus::default(),
        Some(raw) if raw.is_empty() => JobStatus::default(),
        Some(raw) => match JobStatus::parse(&raw) {
            Some(status) => status,
            None => {
                errors.insert("status".to_string(), invalid_enum_message(&raw, "status"));
                JobStatus::default()
            }
        },
    };

    let duration = optional_text("duration", req.duration, MAX_DURATION, &mut errors);
    let company_name = optional_text("companyName", req.company_name, MAX_COMPANY, &mut errors);
    let salary_range = optional_text("salaryRange", req.salary_range, MAX_SALARY, &mut errors);
    let training_period =
        optional_text("trainingPeriod", req.training_period, MAX_TRAINING, &mut errors);
    let overview = optional_text("overview", req.overview, MAX_OVERVIEW, &mut errors);
    let description =
        optional_text("description", req.description, MAX_DESCRIPTION, &mut errors);
    let job_role = optional_text("jobRole", req.job_role, MAX_JOB_ROLE, &mut errors);
    let how_to_apply =
        optional_text("howToApply", req.how_to_apply, MAX_HOW_TO_APPLY, &mut errors);
    let experience = optional_text("experience", req.experience, MAX_EXPERIENCE, &mut errors);

    let required_skills = req
        .required_skills
        .map(StringOrList::into_entries)
        .unwrap_or_default();
    let benefits = req.benefits.map(StringOrList::into_entries).unwrap_or_default();
    let tags = req.tags.map(StringOrList::into_entries).unwrap_or_default();
    let tag_cloud = merge_tag_cloud(&tags, &required_skills);

    if !errors.is_empty() {
        return Err(AppError::ValidationFields(errors));
    }
    let (Some(department), Some(job_type)) = (department, job_type) else {
        return Err(AppError::Validation(
            "Department and type are required".to_string(),
        ));
    };

    let now = DateTime::now();
    Ok(Job {
        id: None,
        title,
        department,
        job_type,
        location,
        status,
        duration,
        company_name: if company_name.is_empty() {
            DEFAULT_COMPANY.to_string()
        } else {
            company_name
        },
        salary_range,
        training_period,
        overview,
        description,
        job_role,
        required_skills,
        benefits,
        how_to_apply,
        skills: tag_cloud.clone(),
        tags: tag_cloud,
        experience,
        applications: req.applications.unwrap_or(0),
        created_at: now,
        updated_at: now,
    })
}

/// Builds the partial `$set` document for an update. Only fields present in
/// the request are written; a request with nothing recognizable is rejected.
pub fn build_update(req: UpdateJobRequest) -> Result<Document, AppError> {
    let mut errors = FieldErrors::new();
    let mut set = Document::new();

    if let Some(raw) = req.title {
        let title = sanitize::strip(&raw);
        if title.is_empty() {
            errors.insert("title".to_string(), "Title is required".to_string());
        } else if check_len("title", &title, MAX_TITLE, &mut errors) {
            set.insert("title", title);
        }
    }
    if let Some(raw) = req.department {
        let value = sanitize::strip(&raw);
        match Department::parse(&value) {
            Some(department) => {
                set.insert("department", department.as_str());
            }
            None => {
                errors.insert(
                    "department".to_string(),
                    invalid_enum_message(&value, "department"),
                );
            }
        }
    }
    if let Some(raw) = req.job_type {
        let value = sanitize::strip(&raw);
        match JobType::parse(&value) {
            Some(job_type) => {
                set.insert("type", job_type.as_str());
            }
            None => {
                errors.insert("type".to_string(), invalid_enum_message(&value, "type"));
            }
        }
    }
    if let Some(raw) = req.location {
        let location = sanitize::strip(&raw);
        if location.is_empty() {
            errors.insert("location".to_string(), "Location is required".to_string());
        } else if check_len("location", &location, MAX_LOCATION, &mut errors) {
            set.insert("location", location);
        }
    }
    if let Some(raw) = req.status {
        let value = sanitize::strip(&raw);
        match JobStatus::parse(&value) {
            Some(status) => {
                set.insert("status", status.as_str());
            }
            None => {
                errors.insert("status".to_string(), invalid_enum_message(&value, "status"));
            }
        }
    }

    update_text(&mut set, &mut errors, "duration", req.duration, MAX_DURATION);
    update_text(&mut set, &mut errors, "companyName", req.company_name, MAX_COMPANY);
    update_text(&mut set, &mut errors, "salaryRange", req.salary_range, MAX_SALARY);
    update_text(&mut set, &mut errors, "trainingPeriod", req.training_period, MAX_TRAINING);
    update_text(&mut set, &mut errors, "overview", req.overview, MAX_OVERVIEW);
    update_text(&mut set, &mut errors, "description", req.description, MAX_DESCRIPTION);
    update_text(&mut set, &mut errors, "jobRole", req.job_role, MAX_JOB_ROLE);
    update_text(&mut set, &mut errors, "howToApply", req.how_to_apply, MAX_HOW_TO_APPLY);
    update_text(&mut set, &mut errors, "experience", req.experience, MAX_EXPERIENCE);

    let required_skills = req.required_skills.map(StringOrList::into_entries);
    let benefits = req.benefits.map(StringOrList::into_entries);
    let tags = req.tags.map(StringOrList::into_entries);

    if let Some(skills) = &required_skills {
        set.insert("requiredSkills", skills.clone());
    }
    if let Some(benefits) = benefits {
        set.insert("benefits", benefits);
    }
    // Touching either side of the tag cloud recomputes the merge from the
    // request, exactly as the create path does.
    if tags.is_some() || required_skills.is_some() {
        let tag_cloud = merge_tag_cloud(
            &tags.unwrap_or_default(),
            &required_skills.unwrap_or_default(),
        );
        set.insert("tags", tag_cloud.clone());
        set.insert("skills", tag_cloud);
    }

    if let Some(applications) = req.applications {
        set.insert("applications", applications);
    }

    if !errors.is_empty() {
        return Err(AppError::ValidationFields(errors));
    }
    if set.is_empty() {
        return Err(AppError::Validation(
            "No valid fields provided to update.".to_string(),
        ));
    }

    set.insert("updatedAt", DateTime::now());
    Ok(set)
}

/// Builds the `$set` document for the status toggle endpoint.
pub fn build_status_set(req: StatusUpdateRequest) -> Result<Document, AppError> {
    let raw = sanitize::strip(&req.status.unwrap_or_default());
    if raw.is_empty() {
        return Err(AppError::Validation("Status is required".to_string()));
    }
    let status = JobStatus::parse(&raw).ok_or_else(|| {
        let mut errors = FieldErrors::new();
        errors.insert("status".to_string(), invalid_enum_message(&raw, "status"));
        AppError::ValidationFields(errors)
    })?;

    let mut set = Document::new();
    set.insert("status", status.as_str());
    set.insert("updatedAt", DateTime::now());
    Ok(set)
}

fn invalid_enum_message(value: &str, path: &str) -> String {
    format!("`{value}` is not a valid value for `{path}`")
}

/// Returns true when the value fits; records an error otherwise.
fn check_len(field: &str, value: &str, max: usize, errors: &mut FieldErrors) -> bool {
    if value.chars().count() > max {
        errors.insert(
            field.to_string(),
            format!("`{field}` must be at most {max} characters"),
        );
        false
    } else {
        true
    }
}

fn required_text(
    field: &str,
    label: &str,
    value: Option<String>,
    max: usize,
    errors: &mut FieldErrors,
) -> String {
    let value = sanitize::strip(&value.unwrap_or_default());
    if value.is_empty() {
        errors.insert(field.to_string(), format!("{label} is required"));
    } else {
        check_len(field, &value, max, errors);
    }
    value
}

fn optional_text(
    field: &str,
    value: Option<String>,
    max: usize,
    errors: &mut FieldErrors,
) -> String {
    let value = sanitize::strip(&value.unwrap_or_default());
    check_len(field, &value, max, errors);
    value
}

fn required_enum<T>(
    field: &str,
    label: &str,
    value: Option<String>,
    parse: fn(&str) -> Option<T>,
    errors: &mut FieldErrors,
) -> Option<T> {
    let value = sanitize::strip(&value.unwrap_or_default());
    if value.is_empty() {
        errors.insert(field.to_string(), format!("{label} is required"));
        return None;
    }
    match parse(&value) {
        Some(parsed) => Some(parsed),
        None => {
            errors.insert(field.to_string(), invalid_enum_message(&value, field));
            None
        }
    }
}

fn update_text(
    set: &mut Document,
    errors: &mut FieldErrors,
    field: &str,
    value: Option<String>,
    max: usize,
) {
    if let Some(raw) = value {
        let value = sanitize::strip(&raw);
        // explicit empty strings blank the field, as the portal always allowed
        if check_len(field, &value, max, errors) {
            set.insert(field, value);
        }
    }
}
