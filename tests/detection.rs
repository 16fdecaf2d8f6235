use base64::prelude::*;
use credential_detection::{
    core::{
        report::Status,
        structure::{Encoding, RootType},
    },
    CredentialFormat, DetectionPipeline,
};
use serde_json::{json, Value as Json};

fn token(claims: Json, tail: &str) -> String {
    format!(
        "{}.{}.{tail}",
        BASE64_URL_SAFE_NO_PAD.encode(json!({"alg": "ES256"}).to_string()),
        BASE64_URL_SAFE_NO_PAD.encode(claims.to_string()),
    )
}

#[test]
fn sd_jwt_scenario() {
    let content = "eyJhbGciOiJFUzI1NiJ9.eyJfc2QiOlsiYWJjIl0sImlzcyI6Imh0dHBzOi8vaS5leGFtcGxlIn0.sig~WyJzYWx0IiwibmFtZSIsInZhbHVlIl0";

    let report = DetectionPipeline::default().inspect(content);

    assert_eq!(report.detected_format, CredentialFormat::SdJwt);
    assert!(report
        .validation_messages
        .iter()
        .any(|m| m.contains("Contains _sd claim")));
    assert!(report
        .validation_messages
        .contains(&"Contains selective disclosure markers (~)".to_owned()));
    assert_eq!(report.structure.root_type, RootType::Jwt);
    assert_eq!(report.structure.encoding, Encoding::Base64Url);
    assert!(report.structure.is_valid);
    assert_eq!(report.status, Status::Valid);
}

#[test]
fn disclosures_always_select_sd_jwt() {
    let pipeline = DetectionPipeline::default();
    let contents = [
        token(json!({}), "sig~"),
        token(json!({"sub": "alice"}), "sig~WyJhIiwiYiJd~"),
        "abc.def.ghi~".to_owned(),
        "abc.def.ghi~jkl~mno".to_owned(),
    ];

    for content in contents {
        let evidence = pipeline.detect_format(&content);
        assert_eq!(evidence.format(), CredentialFormat::SdJwt, "{content}");
        assert!(evidence.confidence() >= 0.5, "{content}");
    }
}

#[test]
fn plain_jwt_is_reported_as_jwt() {
    let content = token(json!({"iss": "https://issuer.example", "iat": 1700000000}), "c2ln");

    let report = DetectionPipeline::default().inspect(&content);

    assert_eq!(report.detected_format, CredentialFormat::Jwt);
    assert_eq!(report.structure.root_type, RootType::Jwt);
    assert_eq!(report.structure.total_fields, 3);
}

#[test]
fn w3c_vc_1_1_scenario() {
    let content = r#"{"@context":["https://www.w3.org/2018/credentials/v1"],"type":["VerifiableCredential"],"credentialSubject":{"id":"did:example:1"},"issuer":"did:example:issuer"}"#;

    let report = DetectionPipeline::default().inspect(content);

    assert_eq!(report.detected_format, CredentialFormat::W3cVc);
    assert_eq!(report.format_version.as_deref(), Some("1.1"));
    assert!(report.format_confidence >= 0.8);
    assert_eq!(report.structure.root_type, RootType::Object);
    assert_eq!(report.structure.total_fields, 4);
    assert_eq!(
        report.structure.top_level_keys,
        ["@context", "type", "credentialSubject", "issuer"]
    );
}

#[test]
fn w3c_vc_2_0_context_selects_version_2() {
    let pipeline = DetectionPipeline::default();
    let documents = [
        json!({
            "@context": ["https://www.w3.org/ns/credentials/v2"],
            "type": ["VerifiableCredential"]
        }),
        json!({
            "@context": "https://www.w3.org/ns/credentials/v2",
            "type": "VerifiableCredential",
            "driving_privileges": []
        }),
    ];

    for document in documents {
        let evidence = pipeline.detect_format(&document.to_string());
        assert_eq!(evidence.format(), CredentialFormat::W3cVc);
        assert_eq!(evidence.version(), Some("2.0"));
        assert!(evidence.confidence() >= 0.8);
    }
}

#[test]
fn mdl_without_context_is_selected() {
    let content = json!({
        "type": "DrivingLicense",
        "family_name": "Doe",
        "driving_privileges": [{"vehicle_category_code": "A"}]
    })
    .to_string();

    let report = DetectionPipeline::default().inspect(&content);

    assert_eq!(report.detected_format, CredentialFormat::IsoMdl);
    assert!(report.format_confidence >= 0.75);
    assert_eq!(report.structure.root_type, RootType::Mdl);
    assert_eq!(report.structure.total_fields, 3);
}

#[test]
fn priority_dominates_confidence() {
    let content = json!({
        "@context": "https://example.org/18013",
        "type": ["VerifiableCredential", "mDL"],
        "driving_privileges": [],
        "document_number": "D1",
        "birth_date": "1990-01-01",
        "issuing_authority": "DMV"
    })
    .to_string();
    let pipeline = DetectionPipeline::default();

    let all = pipeline.detect_all_formats(&content);
    let formats: Vec<_> = all.iter().map(|e| e.format()).collect();
    assert_eq!(
        formats,
        [
            CredentialFormat::W3cVc,
            CredentialFormat::IsoMdl,
            CredentialFormat::GenericJson
        ]
    );
    assert!(all[1].confidence() > all[0].confidence());

    let winner = pipeline.detect_format(&content);
    assert_eq!(winner.format(), CredentialFormat::W3cVc);
    assert_eq!(winner.confidence(), 0.8);
}

#[test]
fn generic_json_is_the_fallback() {
    let report = DetectionPipeline::default().inspect(r#"[{"name": "Alice"}, {"name": "Bob"}]"#);

    assert_eq!(report.detected_format, CredentialFormat::GenericJson);
    assert_eq!(report.format_confidence, 0.3);
    assert_eq!(report.structure.root_type, RootType::Array);
    assert_eq!(report.structure.top_level_keys, ["array[2]"]);
    assert_eq!(report.structure.encoding, Encoding::Utf8);
}

#[test]
fn base64_cbor_is_selected() {
    // {"a": 1}
    let report = DetectionPipeline::default().inspect("oWFhAQ==");

    assert_eq!(report.detected_format, CredentialFormat::Cbor);
    assert!((report.format_confidence - 0.8).abs() < 1e-9);
    assert_eq!(report.structure.root_type, RootType::Cbor);
    assert_eq!(report.structure.top_level_keys, ["binary_data"]);
    assert_eq!(report.structure.encoding, Encoding::Binary);
}

#[test]
fn base64_with_unused_trailing_bits_is_decoded() {
    // A single zero byte, the CBOR integer 0, with non-zero filler bits.
    let report = DetectionPipeline::default().inspect("AB");

    assert_eq!(report.detected_format, CredentialFormat::Cbor);
    assert!((report.format_confidence - 0.8).abs() < 1e-9);

    // Both payloads decode to {"_sd":[]}; the second sets an unused bit.
    for content in [
        "eyJhbGciOiJFUzI1NiJ9.eyJfc2QiOltdfQ.sig",
        "eyJhbGciOiJFUzI1NiJ9.eyJfc2QiOltdfR.sig",
    ] {
        let evidence = DetectionPipeline::default().detect_format(content);

        assert_eq!(evidence.format(), CredentialFormat::SdJwt);
        assert!((evidence.confidence() - 0.3).abs() < 1e-9);
        assert_eq!(evidence.messages(), ["Contains _sd claim"]);
    }
}

#[test]
fn json_followed_by_trailing_text_is_generic_json() {
    let report = DetectionPipeline::default().inspect(r#"{"a":1} trailing"#);

    assert_eq!(report.detected_format, CredentialFormat::GenericJson);
    assert_eq!(report.structure.top_level_keys, ["a"]);
    assert_eq!(report.status, Status::Valid);
}

#[test]
fn unrecognized_content_is_unknown() {
    let pipeline = DetectionPipeline::default();

    for content in ["", "not json, not jwt, not base64 !!"] {
        assert!(pipeline.detect_all_formats(content).is_empty());

        let report = pipeline.inspect(content);
        assert_eq!(report.detected_format, CredentialFormat::Unknown);
        assert_eq!(report.format_confidence, 0.0);
        assert_eq!(report.status, Status::Invalid);
        assert_eq!(report.structure.root_type, RootType::Unknown);
        assert_eq!(report.validation_messages, ["No matching format detected"]);
    }
}

#[test]
fn inspection_is_deterministic() {
    let pipeline = DetectionPipeline::default();
    let contents = [
        r#"{"@context":["https://www.w3.org/2018/credentials/v1"],"type":["VerifiableCredential"],"proof":{"type":"RsaSignature2018"}}"#,
        "eyJhbGciOiJFUzI1NiJ9.eyJfc2QiOlsiYWJjIl0sImlzcyI6Imh0dHBzOi8vaS5leGFtcGxlIn0.sig~WyJzYWx0IiwibmFtZSIsInZhbHVlIl0",
        "oWFhAQ==",
        "garbage",
    ];

    for content in contents {
        let first = serde_json::to_string(&pipeline.inspect(content)).unwrap();
        let second = serde_json::to_string(&pipeline.inspect(content)).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn pipeline_is_shareable_across_threads() {
    let pipeline = std::sync::Arc::new(DetectionPipeline::default());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let pipeline = pipeline.clone();
            std::thread::spawn(move || pipeline.inspect("oWFhAQ==").detected_format)
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), CredentialFormat::Cbor);
    }
}
