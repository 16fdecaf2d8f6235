//! Upload boundary.
//!
//! Validates a submitted artifact before classification and wraps the
//! [`DetectionReport`] with request metadata. Transport concerns (HTTP,
//! multipart parsing, status codes) are left to the caller.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    config::Config,
    core::{pipeline::DetectionPipeline, report::DetectionReport},
};

/// An uploaded artifact.
#[derive(Debug, Clone, Default)]
pub struct Submission {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
    /// Format the uploader expects. Recorded, never used for detection.
    pub expected_format: Option<String>,
}

impl Submission {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
            ..Default::default()
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_expected_format(mut self, expected_format: impl Into<String>) -> Self {
        self.expected_format = Some(expected_format.into());
        self
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum IntakeError {
    #[error("file is empty")]
    Empty,

    #[error("file size {size} exceeds the {limit} byte limit")]
    TooLarge { size: u64, limit: u64 },

    #[error("unsupported content type: {0}")]
    UnsupportedContentType(String),
}

/// Result of processing one submission.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    pub file_name: Option<String>,
    pub file_id: Uuid,
    pub file_size: u64,
    pub content_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_format: Option<String>,
    pub processed_at: DateTime<Utc>,
    #[serde(flatten)]
    pub report: DetectionReport,
}

/// Validates submissions and runs them through a [`DetectionPipeline`].
#[derive(Debug, Clone, Default)]
pub struct Intake {
    config: Config,
    pipeline: DetectionPipeline,
}

impl Intake {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            pipeline: DetectionPipeline::default(),
        }
    }

    pub fn with_pipeline(mut self, pipeline: DetectionPipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Rejects empty, oversized or (when enforced) mistyped submissions,
    /// then classifies the content.
    ///
    /// Bytes are decoded as UTF-8, replacing invalid sequences, so raw binary
    /// CBOR is not recognized; only base64-wrapped CBOR is.
    pub fn process(&self, submission: &Submission) -> Result<FileInfo, IntakeError> {
        if let Err(e) = self.validate(submission) {
            warn!(file_name = ?submission.file_name, "submission rejected: {e}");
            return Err(e);
        }

        let content = String::from_utf8_lossy(&submission.bytes);
        let report = self.pipeline.inspect(&content);
        let file_id = Uuid::new_v4();

        debug!(
            %file_id,
            format = %report.detected_format,
            status = %report.status,
            "submission processed"
        );

        Ok(FileInfo {
            file_name: submission.file_name.clone(),
            file_id,
            file_size: submission.size(),
            content_type: submission.content_type.clone(),
            expected_format: submission.expected_format.clone(),
            processed_at: Utc::now(),
            report,
        })
    }

    fn validate(&self, submission: &Submission) -> Result<(), IntakeError> {
        if submission.bytes.is_empty() {
            return Err(IntakeError::Empty);
        }

        let limit = self.config.max_file_size.bytes();
        if submission.size() > limit {
            return Err(IntakeError::TooLarge {
                size: submission.size(),
                limit,
            });
        }

        if self.config.enforce_content_type {
            if let Some(content_type) = &submission.content_type {
                if !self.config.accepts_content_type(content_type) {
                    return Err(IntakeError::UnsupportedContentType(content_type.clone()));
                }
            }
        }

        Ok(())
    }
}
