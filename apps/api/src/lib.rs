pub mod applications;
pub mod config;
pub mod db;
pub mod errors;
pub mod jobs;
pub mod mailer;
pub mod models;
pub mod routes;
pub mod sanitize;
pub mod state;
