use anyhow::{Context, Result};
use serde::Deserialize;

/// Default ceiling on artifact size, 10 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Content types accepted when content-type enforcement is enabled.
pub const DEFAULT_ACCEPTED_CONTENT_TYPES: &[&str] = &[
    "application/json",
    "text/plain",
    "application/jwt",
    "application/cbor",
];

/// Intake configuration.
///
/// Every field is optional in the serialized form and falls back to its
/// default.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub max_file_size: FileSizeLimit,
    pub accepted_content_types: Vec<String>,
    pub enforce_content_type: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_file_size: FileSizeLimit::default(),
            accepted_content_types: DEFAULT_ACCEPTED_CONTENT_TYPES
                .iter()
                .map(|t| (*t).to_owned())
                .collect(),
            enforce_content_type: false,
        }
    }
}

impl Config {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("invalid intake configuration")
    }

    /// Whether `content_type` is accepted, ignoring parameters and case.
    pub fn accepts_content_type(&self, content_type: &str) -> bool {
        let media_type = content_type.split(';').next().unwrap_or_default().trim();
        self.accepted_content_types
            .iter()
            .any(|accepted| accepted.eq_ignore_ascii_case(media_type))
    }
}

/// A size limit in bytes that is never zero.
#[derive(Deserialize, Debug, Clone, Copy, Hash, PartialEq, Eq)]
#[serde(try_from = "u64")]
pub struct FileSizeLimit(u64);

impl FileSizeLimit {
    pub fn bytes(&self) -> u64 {
        self.0
    }
}

impl Default for FileSizeLimit {
    fn default() -> Self {
        Self(DEFAULT_MAX_FILE_SIZE)
    }
}

impl TryFrom<u64> for FileSizeLimit {
    type Error = String;

    fn try_from(bytes: u64) -> Result<Self, Self::Error> {
        if bytes == 0 {
            return Err("max_file_size must be greater than zero".to_owned());
        }
        Ok(Self(bytes))
    }
}
