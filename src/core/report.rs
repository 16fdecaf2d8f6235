use core::fmt;

use serde::{Deserialize, Serialize};

use super::{
    credential_format::{ConfidenceLevel, CredentialFormat},
    evidence::Evidence,
    structure::FileStructure,
};

/// Overall verdict on an artifact's structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Valid,
    Invalid,
}

impl From<&FileStructure> for Status {
    fn from(structure: &FileStructure) -> Self {
        if structure.is_valid {
            Self::Valid
        } else {
            Self::Invalid
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Valid => "VALID",
            Self::Invalid => "INVALID",
        })
    }
}

/// Combined classification and structural summary of one artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionReport {
    pub detected_format: CredentialFormat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format_version: Option<String>,
    /// Winning detector's raw confidence, not clamped.
    pub format_confidence: f64,
    pub confidence_level: ConfidenceLevel,
    pub structure: FileStructure,
    pub status: Status,
    pub validation_messages: Vec<String>,
}

impl DetectionReport {
    pub fn new(evidence: Evidence, structure: FileStructure) -> Self {
        let status = Status::from(&structure);
        Self {
            detected_format: evidence.format(),
            format_version: evidence.version().map(ToOwned::to_owned),
            format_confidence: evidence.confidence(),
            confidence_level: evidence.confidence_level(),
            structure,
            status,
            validation_messages: evidence.into_messages(),
        }
    }
}
