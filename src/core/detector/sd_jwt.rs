use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value as Json;

use crate::{
    core::{credential_format::CredentialFormat, evidence::Evidence, evidence::Tally},
    utils::{decode_json_segment, member_count, scalar_text},
};

use super::DetectionError;

/// Separator between the issuer-signed JWT and its disclosures.
pub const DISCLOSURE_SEPARATOR: char = '~';

/// `header.payload.signature`, with anything allowed after the signature.
static COMPACT_SERIALIZATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_-]+\.[A-Za-z0-9_-]+\.[A-Za-z0-9_-]+")
        .expect("compact serialization pattern is valid")
});

const REQUIRED_FIELDS: &[&str] = &["iss", "exp", "iat", "_sd"];
const OPTIONAL_FIELDS: &[&str] = &["cnf", "_sd_alg", "vct", "sub"];

/// Scores compact JWTs, rewarding selective disclosure markers and claims.
///
/// The result is labelled [`CredentialFormat::Jwt`] when neither a
/// disclosure separator nor an `_sd`/`_sd_alg` claim was seen.
pub fn detect(content: &str) -> Result<Evidence, DetectionError> {
    let content = content.trim();

    if !COMPACT_SERIALIZATION.is_match(content) {
        return Ok(Evidence::none(CredentialFormat::SdJwt));
    }

    let has_disclosures = content.contains(DISCLOSURE_SEPARATOR);
    let mut tally = Tally::new(CredentialFormat::SdJwt);

    if has_disclosures {
        tally.add(0.4, "Contains selective disclosure markers (~)");
    }

    let mut segments = content.split('.');
    let header = segments.next().unwrap_or_default();
    let payload = segments.next().unwrap_or_default();

    let mut has_sd_claims = false;
    match decode_json_segment(payload) {
        Ok(claims) => {
            has_sd_claims = claims.get("_sd").is_some() || claims.get("_sd_alg").is_some();
            weigh_claims(&mut tally, &claims);

            tally.info("jwtStructure", "header.payload.signature");
            tally.info("algorithm", header_algorithm(header));
            tally.require(REQUIRED_FIELDS);
            tally.allow(OPTIONAL_FIELDS);
        }
        Err(e) => {
            tally.note(format!("Error parsing JWT payload: {e}"));
            tally.penalize(0.3);
        }
    }

    if has_disclosures {
        tally.floor(0.5);
    }

    if !has_disclosures && !has_sd_claims {
        tally.relabel(CredentialFormat::Jwt);
    }

    Ok(tally.finish())
}

fn weigh_claims(tally: &mut Tally, claims: &Json) {
    if let Some(sd) = claims.get("_sd") {
        tally.add(0.3, "Contains _sd claim");
        tally.detail("selectiveDisclosureClaims", member_count(sd));
    }

    if let Some(alg) = claims.get("_sd_alg") {
        tally.add(0.2, "Contains _sd_alg claim");
        tally.detail("sdAlgorithm", scalar_text(alg));
    }

    if claims.get("cnf").is_some() {
        tally.add(0.1, "Contains key binding (cnf claim)");
        tally.detail("hasKeyBinding", true);
    }

    if let Some(iss) = claims.get("iss") {
        tally.bump(0.05);
        tally.detail("issuer", scalar_text(iss));
    }

    if claims.get("exp").is_some() {
        tally.bump(0.05);
        tally.detail("hasExpiration", true);
    }

    if let Some(iat) = claims.get("iat") {
        tally.bump(0.05);
        tally.detail("issuedAt", iat.as_i64().unwrap_or_default());
    }

    if let Some(vct) = claims.get("vct") {
        tally.add(0.2, "Contains verifiable credential type (vct)");
        tally.detail("credentialType", scalar_text(vct));
        tally.version("SD-JWT-VC");
    }
}

/// The `alg` header parameter, or `unknown`.
fn header_algorithm(header: &str) -> String {
    decode_json_segment(header)
        .ok()
        .and_then(|header| header.get("alg").map(scalar_text))
        .unwrap_or_else(|| "unknown".to_owned())
}
