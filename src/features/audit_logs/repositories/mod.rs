pub mod audit_log_repository;
