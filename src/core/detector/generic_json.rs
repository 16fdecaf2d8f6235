use crate::{
    core::{credential_format::CredentialFormat, evidence::Evidence, evidence::Tally},
    utils::parse_json_document,
};

use super::DetectionError;

/// Fixed score for well-formed JSON, low enough that any more specific
/// detector outranks it.
const GENERIC_JSON_CONFIDENCE: f64 = 0.3;

/// Fallback for JSON objects and arrays matching no specific format.
pub fn detect(content: &str) -> Result<Evidence, DetectionError> {
    let mut tally = Tally::new(CredentialFormat::GenericJson);

    match parse_json_document(content) {
        None => Ok(tally.finish_with(0.0)),
        Some(Ok(_)) => {
            tally.note("Valid JSON structure, but no known format matched");
            tally.info("structure", "JSON");
            Ok(tally.finish_with(GENERIC_JSON_CONFIDENCE))
        }
        Some(Err(e)) => {
            tally.note(format!("Not a valid JSON: {e}"));
            Ok(tally.finish_with(0.0))
        }
    }
}
