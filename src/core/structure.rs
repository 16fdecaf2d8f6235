use std::panic::{catch_unwind, AssertUnwindSafe};

use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use tracing::warn;

use super::credential_format::CredentialFormat;
use crate::utils::first_json_value;

/// Placeholder key reported for binary content.
pub const BINARY_DATA_KEY: &str = "binary_data";

/// Fixed key names of a compact JWT.
pub const JWT_SEGMENT_KEYS: [&str; 3] = ["header", "payload", "signature"];

/// Shape of the artifact's root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RootType {
    Jwt,
    Object,
    Array,
    Mdl,
    Cbor,
    Unknown,
    Error,
}

/// Transport encoding of the artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Encoding {
    #[serde(rename = "base64url")]
    Base64Url,
    #[serde(rename = "utf-8")]
    Utf8,
    #[serde(rename = "binary")]
    Binary,
    #[serde(rename = "unknown")]
    Unknown,
    #[serde(rename = "error")]
    Error,
}

/// Shallow structural summary of an artifact.
///
/// `is_valid` means well-formed for the reported root type, nothing more.
/// No signature or schema is checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileStructure {
    pub root_type: RootType,
    pub total_fields: usize,
    pub top_level_keys: Vec<String>,
    pub is_valid: bool,
    pub encoding: Encoding,
}

impl FileStructure {
    fn invalid(root_type: RootType, encoding: Encoding) -> Self {
        Self {
            root_type,
            total_fields: 0,
            top_level_keys: Vec::new(),
            is_valid: false,
            encoding,
        }
    }

    /// Summary reported for content of unrecognized format.
    pub fn unknown() -> Self {
        Self::invalid(RootType::Unknown, Encoding::Unknown)
    }

    /// Summary reported when the analysis itself broke down.
    pub fn error() -> Self {
        Self::invalid(RootType::Error, Encoding::Error)
    }
}

/// Summarizes the structure of `content` as the given format.
///
/// Dispatch is driven by `format` alone; the content is not re-detected.
/// Never panics: a failure inside the analysis yields
/// [`FileStructure::error`].
pub fn analyze_structure(content: &str, format: CredentialFormat) -> FileStructure {
    catch_unwind(AssertUnwindSafe(|| dispatch(content, format))).unwrap_or_else(|_| {
        warn!(%format, "structural analysis panicked");
        FileStructure::error()
    })
}

fn dispatch(content: &str, format: CredentialFormat) -> FileStructure {
    match format {
        CredentialFormat::SdJwt | CredentialFormat::Jwt => analyze_jwt(content),
        CredentialFormat::W3cVc | CredentialFormat::GenericJson => analyze_json(content),
        CredentialFormat::IsoMdl => analyze_mdl(content),
        CredentialFormat::Cbor => analyze_cbor(),
        CredentialFormat::Unknown => FileStructure::unknown(),
    }
}

fn analyze_jwt(content: &str) -> FileStructure {
    // Trailing empty segments are not counted.
    let segments = content
        .trim()
        .split('.')
        .rev()
        .skip_while(|segment| segment.is_empty())
        .count();

    FileStructure {
        root_type: RootType::Jwt,
        total_fields: segments,
        top_level_keys: JWT_SEGMENT_KEYS.iter().map(|k| (*k).to_owned()).collect(),
        is_valid: segments >= 3,
        encoding: Encoding::Base64Url,
    }
}

fn analyze_json(content: &str) -> FileStructure {
    let Some(Ok(document)) = first_json_value(content) else {
        return FileStructure::invalid(RootType::Unknown, Encoding::Unknown);
    };

    let (root_type, total_fields, top_level_keys) = match &document {
        Json::Object(map) => (RootType::Object, map.len(), map.keys().cloned().collect()),
        Json::Array(items) => (
            RootType::Array,
            items.len(),
            vec![format!("array[{}]", items.len())],
        ),
        _ => (RootType::Unknown, 0, Vec::new()),
    };

    FileStructure {
        root_type,
        total_fields,
        top_level_keys,
        is_valid: true,
        encoding: Encoding::Utf8,
    }
}

fn analyze_mdl(content: &str) -> FileStructure {
    let Some(Ok(document)) = first_json_value(content) else {
        return FileStructure::invalid(RootType::Mdl, Encoding::Unknown);
    };

    let (total_fields, top_level_keys) = match &document {
        Json::Object(map) => (map.len(), map.keys().cloned().collect()),
        Json::Array(items) => (items.len(), Vec::new()),
        _ => (0, Vec::new()),
    };

    FileStructure {
        root_type: RootType::Mdl,
        total_fields,
        top_level_keys,
        is_valid: true,
        encoding: Encoding::Utf8,
    }
}

// Binary content is not walked.
fn analyze_cbor() -> FileStructure {
    FileStructure {
        root_type: RootType::Cbor,
        total_fields: 0,
        top_level_keys: vec![BINARY_DATA_KEY.to_owned()],
        is_valid: true,
        encoding: Encoding::Binary,
    }
}
