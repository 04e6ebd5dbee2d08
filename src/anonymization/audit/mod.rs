//! Audit logging for anonymization operations

pub mod logger;

pub use logger::AuditLogger;
