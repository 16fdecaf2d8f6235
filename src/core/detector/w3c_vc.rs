use serde_json::Value as Json;

use crate::{
    core::{credential_format::CredentialFormat, evidence::Evidence, evidence::Tally},
    utils::{json_text, parse_json_document, scalar_text},
};

use super::DetectionError;

/// Concrete credential types that add confidence on top of `VerifiableCredential`.
const KNOWN_CREDENTIAL_TYPES: &[&str] = &["UniversityDegree", "DriverLicense", "PermanentResident"];

/// Linked data signature suites recognized in `proof.type`.
const KNOWN_PROOF_SUITES: &[&str] = &[
    "Ed25519Signature",
    "RsaSignature",
    "EcdsaSecp256k1Signature",
];

const REQUIRED_FIELDS: &[&str] = &["@context", "type", "credentialSubject", "issuer"];
const OPTIONAL_FIELDS: &[&str] = &[
    "id",
    "issuanceDate",
    "expirationDate",
    "proof",
    "credentialStatus",
    "evidence",
    "refreshService",
];

/// Scores JSON documents against the W3C Verifiable Credentials data model
/// and sniffs the data model version from `@context`.
pub fn detect(content: &str) -> Result<Evidence, DetectionError> {
    let document = match parse_json_document(content) {
        None => return Ok(Evidence::none(CredentialFormat::W3cVc)),
        Some(Err(e)) => {
            let mut tally = Tally::new(CredentialFormat::W3cVc);
            tally.note(format!("Error parsing JSON: {e}"));
            return Ok(tally.finish_with(0.0));
        }
        Some(Ok(document)) => document,
    };

    let mut tally = Tally::new(CredentialFormat::W3cVc);

    let has_context = document.get("@context").is_some();
    if let Some(context) = document.get("@context") {
        tally.add(0.3, "Contains @context field");

        let context_text = json_text(context)?;
        if context_text.contains("credentials/v2") {
            tally.add(0.2, "Detected W3C VC 2.0 context");
            tally.version("2.0");
        } else if context_text.contains("credentials/v1") {
            tally.add(0.2, "Detected W3C VC 1.1 context");
            tally.version("1.1");
        } else if context_text.contains("credentials") {
            tally.add(0.1, "Contains credentials context");
        }

        tally.detail("context", context.clone());
    }

    let mut is_verifiable_credential = false;
    if let Some(types) = document.get("type") {
        let type_text = json_text(types)?;

        if type_text.contains("VerifiableCredential") {
            is_verifiable_credential = true;
            tally.add(0.3, "Contains VerifiableCredential type");
            tally.detail("types", types.clone());
        }

        if KNOWN_CREDENTIAL_TYPES
            .iter()
            .any(|known| type_text.contains(known))
        {
            tally.add(0.1, "Contains specific credential type");
        }
    }

    if let Some(subject) = document.get("credentialSubject") {
        tally.add(0.2, "Contains credentialSubject");
        tally.detail("hasCredentialSubject", true);

        if subject.get("id").is_some() {
            tally.bump(0.05);
            tally.detail("subjectHasId", true);
        }
    }

    if let Some(issuer) = document.get("issuer") {
        tally.add(0.15, "Contains issuer field");
        weigh_issuer(&mut tally, issuer);
    }

    if let Some(date) = document.get("issuanceDate") {
        tally.add(0.1, "Contains issuanceDate");
        tally.detail("issuanceDate", scalar_text(date));
    }

    if let Some(date) = document.get("expirationDate") {
        tally.add(0.05, "Contains expirationDate");
        tally.detail("expirationDate", scalar_text(date));
    }

    if let Some(proof) = document.get("proof") {
        tally.add(0.2, "Contains cryptographic proof");
        weigh_proof(&mut tally, proof);
    }

    if document.get("credentialStatus").is_some() {
        tally.add(0.1, "Contains credentialStatus");
        tally.detail("hasRevocationInfo", true);
    }

    if document.get("evidence").is_some() {
        tally.add(0.05, "Contains evidence");
    }

    if document.get("refreshService").is_some() {
        tally.add(0.05, "Contains refreshService");
    }

    tally.info("structure", "JSON-LD");
    tally.info("specification", "W3C Verifiable Credentials");
    tally.info("dataModel", if has_context { "JSON-LD" } else { "JSON" });
    tally.require(REQUIRED_FIELDS);
    tally.allow(OPTIONAL_FIELDS);

    if has_context && is_verifiable_credential {
        tally.floor(0.8);
    }

    Ok(tally.finish())
}

/// Records the issuer, given either as a string or as an object with an `id`.
fn weigh_issuer(tally: &mut Tally, issuer: &Json) {
    match issuer {
        Json::String(id) => {
            tally.detail("issuerType", "string");
            tally.detail("issuer", id.as_str());
        }
        Json::Object(object) => {
            tally.detail("issuerType", "object");
            if let Some(id) = object.get("id") {
                tally.detail("issuer", scalar_text(id));
            }
        }
        _ => {}
    }
}

fn weigh_proof(tally: &mut Tally, proof: &Json) {
    if let Some(proof_type) = proof.get("type").map(scalar_text) {
        if KNOWN_PROOF_SUITES
            .iter()
            .any(|suite| proof_type.contains(suite))
        {
            tally.add(0.1, format!("Contains recognized proof type: {proof_type}"));
        }
        tally.detail("proofType", proof_type);
    }

    if let Some(purpose) = proof.get("proofPurpose") {
        tally.detail("proofPurpose", scalar_text(purpose));
    }
}
