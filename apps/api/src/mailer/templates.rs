//! Subjects and HTML bodies for the two submission emails. Field values are
//! already tag-stripped by intake before they reach these builders.

use chrono::Utc;

use super::ApplicationEmail;

pub fn hr_subject(job_title: &str, job_id: &str) -> String {
    format!(
        "New Job Application – {} (ID: {})",
        non_empty(job_title, "Untitled Job"),
        non_empty(job_id, "N/A")
    )
}

pub fn applicant_subject(job_title: &str) -> String {
    format!(
        "Application Received – {} at GyanNidhi",
        non_empty(job_title, "Untitled Job")
    )
}

pub fn hr_body(email: &ApplicationEmail) -> String {
    format!(
        "<h2>New Job Application Received</h2>\
         <p><b>Job Title:</b> {title}</p>\
         <p><b>Job ID:</b> {id}</p>\
         <p><b>Submitted On:</b> {submitted}</p>\
         <hr/>\
         <p><b>Applicant Details:</b></p>\
         <ul>\
           <li><b>Name:</b> {name}</li>\
           <li><b>Email:</b> {applicant}</li>\
           <li><b>Phone:</b> {phone}</li>\
         </ul>\
         <p><b>Applicant Message:</b></p>\
         <blockquote style=\"border-left:4px solid #ccc;padding-left:10px;white-space:pre-wrap;\">{message}</blockquote>\
         <p><b>Resume:</b> Attached below.</p>\
         <br/>\
         <p>Best regards,<br/><b>GyanNidhi Careers Portal</b></p>",
        title = non_empty(&email.job_title, "Not specified"),
        id = non_empty(&email.job_id, "N/A"),
        submitted = submitted_at(),
        name = email.full_name,
        applicant = email.applicant_email,
        phone = email.phone,
        message = email.message,
    )
}

pub fn applicant_body(email: &ApplicationEmail) -> String {
    format!(
        "<h2>Thank You for Your Application!</h2>\
         <p>Hi {name},</p>\
         <p>We have successfully received your application for the <b>{title}</b>.</p>\
         <ul>\
           <li><b>Job Title:</b> {title_line}</li>\
           <li><b>Submitted On:</b> {submitted}</li>\
         </ul>\
         <p>Our HR team will review your application and contact you within 3–5 business days.</p>\
         <p>Best regards,<br/><b>GyanNidhi Careers Team</b></p>\
         <hr/>\
         <p style=\"font-size:12px;color:#999;\">This is an automated email. Please do not reply.</p>",
        name = email.full_name,
        title = non_empty(&email.job_title, "position"),
        title_line = non_empty(&email.job_title, "Not specified"),
        submitted = submitted_at(),
    )
}

fn submitted_at() -> String {
    Utc::now().format("%d %B %Y, %H:%M UTC").to_string()
}

fn non_empty<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}
