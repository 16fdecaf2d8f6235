use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine,
};
use serde_json::Value as Json;

/// Decoding is lenient: padding is optional and unused bits in the final
/// character are ignored.
const LENIENT: GeneralPurposeConfig = GeneralPurposeConfig::new()
    .with_decode_allow_trailing_bits(true)
    .with_decode_padding_mode(DecodePaddingMode::Indifferent);

const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT);
const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT);

/// Error decoding a base64url-encoded JSON segment of a compact JWT.
#[derive(Debug, thiserror::Error)]
pub enum SegmentError {
    #[error("segment is not valid base64url: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("segment is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Decodes a base64url JWT segment into JSON.
///
/// Padding is optional, so segments padded to a multiple of four are
/// accepted as well as bare ones.
pub fn decode_json_segment(segment: &str) -> Result<Json, SegmentError> {
    let bytes = URL_SAFE_LENIENT.decode(segment)?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Decodes standard-alphabet base64, with or without padding.
pub fn decode_base64(content: &str) -> Result<Vec<u8>, base64::DecodeError> {
    STANDARD_LENIENT.decode(content)
}

/// Parses `content` as a JSON document if it looks like one.
///
/// Returns `None` when the trimmed content does not open with `{` or `[`,
/// so callers can tell "not JSON-shaped" apart from "malformed JSON".
/// Anything after the first complete value is ignored.
pub fn parse_json_document(content: &str) -> Option<Result<Json, serde_json::Error>> {
    let trimmed = content.trim();
    if !trimmed.starts_with('{') && !trimmed.starts_with('[') {
        return None;
    }
    first_json_value(trimmed)
}

/// Parses the first JSON value in `content`, ignoring whatever follows it.
///
/// `None` only for content that holds no value at all.
pub fn first_json_value(content: &str) -> Option<Result<Json, serde_json::Error>> {
    serde_json::Deserializer::from_str(content.trim())
        .into_iter::<Json>()
        .next()
}

/// Serialized JSON text of a value, used for substring sniffing.
pub fn json_text(value: &Json) -> Result<String, serde_json::Error> {
    serde_json::to_string(value)
}

/// Scalar text of a value.
///
/// Strings are returned verbatim, numbers and booleans in their JSON
/// notation, and everything else as an empty string.
pub fn scalar_text(value: &Json) -> String {
    match value {
        Json::String(s) => s.clone(),
        Json::Number(n) => n.to_string(),
        Json::Bool(b) => b.to_string(),
        Json::Null | Json::Array(_) | Json::Object(_) => String::new(),
    }
}

/// Number of members of a container value, `0` for scalars.
pub fn member_count(value: &Json) -> usize {
    match value {
        Json::Array(items) => items.len(),
        Json::Object(map) => map.len(),
        _ => 0,
    }
}
