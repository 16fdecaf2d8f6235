//! Format detectors.
//!
//! Each [`Detector`] variant scores one credential format from structural
//! heuristics. Detectors are stateless: the only data they hold are
//! compiled patterns and constants, so a single registry can be shared by
//! concurrent callers.
//!
//! A detector never fails on malformed input. Decode and parse failures
//! become a zero (or, for compact JWTs, reduced) confidence together with a
//! diagnostic message. An `Err` is reserved for faults in the detector
//! itself, which the [pipeline](crate::core::pipeline) isolates.

pub mod cbor;
pub mod generic_json;
pub mod iso_mdl;
pub mod sd_jwt;
pub mod w3c_vc;

use core::fmt;

use super::{credential_format::CredentialFormat, evidence::Evidence};

/// A detector fault.
#[derive(Debug, thiserror::Error)]
pub enum DetectionError {
    /// A JSON value could not be serialized while building evidence.
    #[error("failed to serialize JSON evidence: {0}")]
    Json(#[from] serde_json::Error),
}

/// The closed set of format detectors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Detector {
    /// Compact JWTs, with or without selective disclosures.
    SdJwt,

    /// W3C Verifiable Credentials 1.1 and 2.0.
    W3cVc,

    /// ISO/IEC 18013 mobile driving licenses.
    IsoMdl,

    /// Base64-wrapped CBOR.
    Cbor,

    /// Fallback for any JSON object or array.
    GenericJson,
}

impl Detector {
    /// All detectors, most specific first.
    pub const ALL: [Detector; 5] = [
        Self::SdJwt,
        Self::W3cVc,
        Self::IsoMdl,
        Self::Cbor,
        Self::GenericJson,
    ];

    /// Stable identifier used in logs.
    pub fn name(&self) -> &'static str {
        self.format().name()
    }

    /// Fixed specificity rank used to pick between detectors that all found
    /// evidence. Higher wins. Never used for scoring.
    pub fn priority(&self) -> u8 {
        match self {
            Self::SdJwt => 10,
            Self::W3cVc => 8,
            Self::IsoMdl => 7,
            Self::Cbor => 6,
            Self::GenericJson => 1,
        }
    }

    /// The format this detector scores.
    ///
    /// [`Detector::SdJwt`] may relabel its evidence as
    /// [`CredentialFormat::Jwt`].
    pub fn format(&self) -> CredentialFormat {
        match self {
            Self::SdJwt => CredentialFormat::SdJwt,
            Self::W3cVc => CredentialFormat::W3cVc,
            Self::IsoMdl => CredentialFormat::IsoMdl,
            Self::Cbor => CredentialFormat::Cbor,
            Self::GenericJson => CredentialFormat::GenericJson,
        }
    }

    /// Scores `content` for this detector's format.
    pub fn detect(&self, content: &str) -> Result<Evidence, DetectionError> {
        match self {
            Self::SdJwt => sd_jwt::detect(content),
            Self::W3cVc => w3c_vc::detect(content),
            Self::IsoMdl => iso_mdl::detect(content),
            Self::Cbor => cbor::detect(content),
            Self::GenericJson => generic_json::detect(content),
        }
    }
}

impl fmt::Display for Detector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
