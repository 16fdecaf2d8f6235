use ciborium::Value as Cbor;

use crate::{
    core::{credential_format::CredentialFormat, evidence::Evidence, evidence::Tally},
    utils::decode_base64,
};

use super::DetectionError;

/// Scores base64-wrapped CBOR.
///
/// Content that is not valid standard base64 is not CBOR-eligible. Content
/// that decodes but does not parse as CBOR scores zero; the base64 credit is
/// not kept.
pub fn detect(content: &str) -> Result<Evidence, DetectionError> {
    let Ok(bytes) = decode_base64(content.trim()) else {
        return Ok(Evidence::none(CredentialFormat::Cbor));
    };

    let mut tally = Tally::new(CredentialFormat::Cbor);
    tally.add(0.2, "Input is valid Base64 - assumed CBOR encoding");

    match ciborium::from_reader::<Cbor, _>(bytes.as_slice()) {
        Ok(value) => {
            tally.add(0.6, "Parsed CBOR successfully");
            tally.detail("decodedBytes", bytes.len());
            tally.detail("rootItem", item_kind(&value));
            tally.info("structure", "CBOR (binary)");
            tally.info("specification", "RFC 8949");
            Ok(tally.finish())
        }
        Err(e) => {
            tally.note(format!("Failed to parse CBOR: {e}"));
            Ok(tally.finish_with(0.0))
        }
    }
}

/// Name of the major type of a decoded data item.
fn item_kind(value: &Cbor) -> &'static str {
    match value {
        Cbor::Integer(_) => "integer",
        Cbor::Bytes(_) => "bytes",
        Cbor::Float(_) => "float",
        Cbor::Text(_) => "text",
        Cbor::Bool(_) => "bool",
        Cbor::Null => "null",
        Cbor::Tag(_, _) => "tag",
        Cbor::Array(_) => "array",
        Cbor::Map(_) => "map",
        _ => "other",
    }
}
