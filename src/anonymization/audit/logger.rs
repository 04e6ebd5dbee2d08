//! Audit logger for anonymization operations

use crate::anonymization::models::{AnonymizedText, Detection};
use anyhow::{Context, Result};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// Audit log entry
#[derive(Debug, Serialize)]
struct AuditLogEntry {
    timestamp: String,
    /// SHA-256 hash of the input text (never log the text itself)
    input_hash: String,
    detections_count: usize,
    processing_time_ms: u64,
    detections: Vec<AuditDetection>,
}

/// Audit detection entry (with hashed PII)
#[derive(Debug, Serialize)]
struct AuditDetection {
    category: String,
    recognizer: String,
    start: usize,
    end: usize,
    confidence: f32,
    /// SHA-256 hash of the matched value (never log plaintext PII)
    value_hash: String,
}

/// Audit logger for anonymization operations
pub struct AuditLogger {
    log_path: PathBuf,
    json_format: bool,
    enabled: bool,
}

impl AuditLogger {
    /// Create a new audit logger
    pub fn new(log_path: PathBuf, json_format: bool, enabled: bool) -> Result<Self> {
        if enabled {
            if let Some(parent) = log_path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).with_context(|| {
                        format!("Failed to create audit log directory: {}", parent.display())
                    })?;
                }
            }
        }

        Ok(Self {
            log_path,
            json_format,
            enabled,
        })
    }

    /// Log one anonymization call
    pub fn log_anonymization(&self, input: &str, result: &AnonymizedText) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let entry = AuditLogEntry {
            timestamp: result.timestamp.to_rfc3339(),
            input_hash: hash_value(input),
            detections_count: result.detections.len(),
            processing_time_ms: result.processing_time_ms,
            detections: result
                .detections
                .iter()
                .map(create_audit_detection)
                .collect(),
        };

        self.write_entry(&entry)
    }

    /// Write an audit entry to the log file
    fn write_entry(&self, entry: &AuditLogEntry) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .with_context(|| format!("Failed to open audit log: {}", self.log_path.display()))?;

        if self.json_format {
            let json_line =
                serde_json::to_string(entry).context("Failed to serialize audit entry")?;
            writeln!(file, "{json_line}").context("Failed to write audit entry")?;
        } else {
            writeln!(
                file,
                "[{}] Input: {} | Detections: {} | Time: {}ms",
                entry.timestamp,
                entry.input_hash,
                entry.detections_count,
                entry.processing_time_ms
            )
            .context("Failed to write audit entry")?;
        }

        Ok(())
    }
}

/// Create an audit detection entry with hashed PII value
fn create_audit_detection(detection: &Detection) -> AuditDetection {
    AuditDetection {
        category: detection.category.to_string(),
        recognizer: detection.recognizer.clone(),
        start: detection.start,
        end: detection.end,
        confidence: detection.score,
        value_hash: hash_value(&detection.matched_text),
    }
}

/// Hash a value using SHA-256
fn hash_value(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    let result = hasher.finalize();
    format!("{result:x}")
}
