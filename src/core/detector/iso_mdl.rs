use crate::{
    core::{credential_format::CredentialFormat, evidence::Evidence, evidence::Tally},
    utils::{json_text, parse_json_document},
};

use super::DetectionError;

const REQUIRED_FIELDS: &[&str] = &["type", "driving_privileges"];
const OPTIONAL_FIELDS: &[&str] = &[
    "document_number",
    "birth_date",
    "issuing_authority",
    "expiry_date",
    "issuing_country",
    "portrait",
];

/// Scores JSON renditions of ISO/IEC 18013 mobile driving licenses.
pub fn detect(content: &str) -> Result<Evidence, DetectionError> {
    let document = match parse_json_document(content) {
        None => return Ok(Evidence::none(CredentialFormat::IsoMdl)),
        Some(Err(e)) => {
            let mut tally = Tally::new(CredentialFormat::IsoMdl);
            tally.note(format!("Error parsing ISO-mDL content: {e}"));
            return Ok(tally.finish_with(0.0));
        }
        Some(Ok(document)) => document,
    };

    let mut tally = Tally::new(CredentialFormat::IsoMdl);

    if let Some(context) = document.get("@context") {
        let context_text = json_text(context)?;
        if context_text.contains("18013") || context_text.contains("mdoc") {
            tally.add(0.3, "Detected ISO mDL context");
            tally.detail("context", context_text);
            tally.version("ISO/IEC 18013");
        }
    }

    if let Some(types) = document.get("type") {
        let type_text = json_text(types)?;
        if type_text.contains("mDL") || type_text.contains("DrivingLicense") {
            tally.add(0.2, "Detected mDL type");
            tally.detail("type", type_text);
        }
    }

    if document.get("driving_privileges").is_some() {
        tally.add(0.3, "Contains driving_privileges field");
        tally.detail("hasDrivingPrivileges", true);
    }

    for (field, weight) in [
        ("document_number", 0.1),
        ("birth_date", 0.1),
        ("issuing_authority", 0.1),
    ] {
        if document.get(field).is_some() {
            tally.add(weight, format!("Contains {field} field"));
        }
    }

    tally.allow(OPTIONAL_FIELDS);
    tally.require(REQUIRED_FIELDS);
    tally.info("structure", "JSON or CBOR wrapped in JSON");
    tally.info("specification", "ISO/IEC 18013 mDL");

    if document.get("type").is_some() && document.get("driving_privileges").is_some() {
        tally.floor(0.75);
    }

    Ok(tally.finish())
}
