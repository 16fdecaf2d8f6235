use credential_detection::{
    config::Config,
    core::report::Status,
    intake::{Intake, IntakeError, Submission},
    CredentialFormat,
};
use serde_json::json;

#[test]
fn uploaded_credential_is_classified() {
    let credential = json!({
        "@context": ["https://www.w3.org/ns/credentials/v2"],
        "type": ["VerifiableCredential", "PermanentResidentCard"],
        "issuer": {"id": "did:example:gov"},
        "credentialSubject": {"id": "did:example:alice"}
    })
    .to_string();
    let submission = Submission::new(credential.as_bytes())
        .with_file_name("resident.json")
        .with_content_type("application/json");

    let info = Intake::default().process(&submission).unwrap();

    assert_eq!(info.report.detected_format, CredentialFormat::W3cVc);
    assert_eq!(info.report.status, Status::Valid);
    assert_eq!(info.file_size, credential.len() as u64);

    let value = serde_json::to_value(&info).unwrap();
    assert_eq!(value["fileName"], "resident.json");
    assert_eq!(value["formatVersion"], "2.0");
    assert_eq!(value["structure"]["rootType"], "object");
    assert!(value["fileId"].as_str().is_some());
    assert!(value["processedAt"].as_str().is_some());
}

#[test]
fn each_submission_gets_a_fresh_identifier() {
    let intake = Intake::default();
    let submission = Submission::new(&b"[]"[..]);

    let first = intake.process(&submission).unwrap();
    let second = intake.process(&submission).unwrap();

    assert_ne!(first.file_id, second.file_id);
    assert_eq!(first.report, second.report);
}

#[test]
fn raw_binary_is_not_recognized_as_cbor() {
    // {"a": 1} as raw CBOR bytes rather than base64 text.
    let submission = Submission::new(vec![0xa1, 0x61, 0x61, 0x01])
        .with_content_type("application/cbor");

    let info = Intake::default().process(&submission).unwrap();

    assert_eq!(info.report.detected_format, CredentialFormat::Unknown);
    assert_eq!(info.report.status, Status::Invalid);
}

#[test]
fn oversized_upload_is_rejected_before_detection() {
    let config = Config::from_json_str(r#"{"max_file_size": 1024}"#).unwrap();
    let submission = Submission::new(vec![b'{'; 2048]);

    let err = Intake::new(config).process(&submission).unwrap_err();

    assert_eq!(
        err,
        IntakeError::TooLarge {
            size: 2048,
            limit: 1024
        }
    );
    assert_eq!(err.to_string(), "file size 2048 exceeds the 1024 byte limit");
}
