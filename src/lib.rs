//! This library classifies uploaded credential artifacts of unknown
//! provenance into one of a closed set of verifiable credential encodings,
//! so downstream tooling can pick the right parser before doing any
//! cryptographic checks.
//!
//! # Usage
//!
//! ```ignore
//! use credential_detection::core::pipeline::DetectionPipeline;
//! use credential_detection::core::credential_format::CredentialFormat;
//!
//! let pipeline = DetectionPipeline::default();
//!
//! let report = pipeline.inspect(r#"{
//!     "@context": ["https://www.w3.org/ns/credentials/v2"],
//!     "type": ["VerifiableCredential"],
//!     "issuer": "did:example:issuer",
//!     "credentialSubject": {"id": "did:example:subject"}
//! }"#);
//!
//! assert_eq!(report.detected_format, CredentialFormat::W3cVc);
//! assert_eq!(report.format_version.as_deref(), Some("2.0"));
//! ```
//!
//! Uploads can be validated and classified in one step with an [`Intake`]:
//!
//! ```ignore
//! use credential_detection::intake::{Intake, Submission};
//!
//! let intake = Intake::new(config);
//! let info = intake.process(
//!     &Submission::new(bytes)
//!         .with_file_name("credential.jwt")
//!         .with_content_type("application/jwt"),
//! )?;
//! ```
//!
//! [`Intake`]: crate::intake::Intake
//!
//! # Detection Overview
//!
//! 1. *Detection*: every [`Detector`] in the pipeline scores the content
//!    independently, producing an [`Evidence`] record with a confidence, the
//!    sniffed version and diagnostic messages.
//! 2. *Selection*: records without evidence are dropped, and the record of the
//!    detector with the highest priority wins. Priority ranks specificity
//!    (SD-JWT, W3C VC, ISO mDL, CBOR, generic JSON) and takes precedence over
//!    confidence.
//! 3. *Structure*: the content is summarized as the winning format (root
//!    shape, field count, top-level keys, encoding).
//!
//! Nothing in the pipeline fails: content no detector recognizes is reported
//! as `UNKNOWN` with an `INVALID` status.
//!
//! [`Detector`]: crate::core::detector::Detector
//! [`Evidence`]: crate::core::evidence::Evidence
//!
//! # Credential Formats
//!
//! - **SD-JWT** and plain **JWT**: compact serializations, with SD-JWT VC
//!   recognized through the `vct` claim
//! - **W3C VC**: data model 1.1 and 2.0, told apart by `@context`
//! - **ISO mDL**: ISO/IEC 18013 driving licenses in JSON form
//! - **CBOR**: base64-wrapped RFC 8949 data
//! - **Generic JSON**: any other JSON object or array
//!
//! Confidence scores are raw weighted sums and may exceed `1.0`.

pub mod config;
pub mod core;
pub mod intake;
pub mod utils;

pub use crate::core::{
    credential_format::CredentialFormat, evidence::Evidence, pipeline::DetectionPipeline,
    report::DetectionReport,
};
