use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub mongo_uri: String,
    pub db_name: String,
    pub smtp_host: String,
    pub smtp_username: String,
    pub smtp_password: String,
    /// Recipient for the HR notification email.
    pub hr_email: String,
    /// Optional cc on the HR notification.
    pub admin_email: Option<String>,
    /// Allowed CORS origin; `*` opens the API to any origin.
    pub frontend_origin: String,
    pub port: u16,
    /// Root of the statically served upload tree.
    pub upload_dir: PathBuf,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            mongo_uri: require_env("MONGO_URI")?,
            db_name: std::env::var("DB_NAME").unwrap_or_else(|_| "careers".to_string()),
            smtp_host: std::env::var("SMTP_HOST").unwrap_or_else(|_| "smtp.gmail.com".to_string()),
            smtp_username: require_env("SMTP_USERNAME")?,
            smtp_password: require_env("SMTP_PASSWORD")?,
            hr_email: std::env::var("HR_EMAIL").unwrap_or_else(|_| "hr@gyannidhi.in".to_string()),
            admin_email: std::env::var("ADMIN_EMAIL")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            frontend_origin: std::env::var("FRONTEND_ORIGIN").unwrap_or_else(|_| "*".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            upload_dir: PathBuf::from(
                std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string()),
            ),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
