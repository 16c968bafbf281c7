pub mod audit_logs;
pub mod auth;
pub mod categories;
