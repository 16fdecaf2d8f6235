use core::fmt;
use std::{borrow::Cow, str::FromStr};

use serde::{Deserialize, Serialize};

const FORMAT_SD_JWT: &str = "SD-JWT";
const FORMAT_JWT: &str = "JWT";
const FORMAT_W3C_VC: &str = "W3C-VC";
const FORMAT_ISO_MDL: &str = "ISO-mDL";
const FORMAT_CBOR: &str = "CBOR";
const FORMAT_GENERIC_JSON: &str = "Generic-JSON";
const FORMAT_UNKNOWN: &str = "UNKNOWN";

/// The closed set of encodings an uploaded credential artifact can be
/// classified as.
///
/// Labels are stable strings used in reports and logs. Parsing an
/// unrecognized label yields [`CredentialFormat::Unknown`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CredentialFormat {
    /// Selective Disclosure JWT, a compact JWT optionally followed by
    /// `~`-separated disclosures.
    SdJwt,

    /// A compact JWT carrying no selective disclosure evidence.
    Jwt,

    /// W3C Verifiable Credential, data model 1.1 or 2.0.
    ///
    /// The data model version is carried separately in
    /// [`Evidence::version`](crate::core::evidence::Evidence::version).
    W3cVc,

    /// ISO/IEC 18013 mobile driving license, JSON rendition.
    IsoMdl,

    /// Base64-wrapped CBOR (RFC 8949).
    Cbor,

    /// Well-formed JSON matching no more specific format.
    GenericJson,

    /// No detector produced evidence.
    Unknown,
}

impl CredentialFormat {
    /// Every label a detector can report, excluding [`CredentialFormat::Unknown`].
    pub const CLASSIFIABLE: [CredentialFormat; 6] = [
        Self::SdJwt,
        Self::Jwt,
        Self::W3cVc,
        Self::IsoMdl,
        Self::Cbor,
        Self::GenericJson,
    ];

    pub fn from_name(name: Cow<str>) -> Self {
        match name.as_ref() {
            FORMAT_SD_JWT => Self::SdJwt,
            FORMAT_JWT => Self::Jwt,
            FORMAT_W3C_VC => Self::W3cVc,
            FORMAT_ISO_MDL => Self::IsoMdl,
            FORMAT_CBOR => Self::Cbor,
            FORMAT_GENERIC_JSON => Self::GenericJson,
            _ => Self::Unknown,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::SdJwt => FORMAT_SD_JWT,
            Self::Jwt => FORMAT_JWT,
            Self::W3cVc => FORMAT_W3C_VC,
            Self::IsoMdl => FORMAT_ISO_MDL,
            Self::Cbor => FORMAT_CBOR,
            Self::GenericJson => FORMAT_GENERIC_JSON,
            Self::Unknown => FORMAT_UNKNOWN,
        }
    }

    /// Human readable description of the format.
    pub fn description(&self) -> &'static str {
        match self {
            Self::SdJwt => "Selective Disclosure JWT",
            Self::Jwt => "JSON Web Token",
            Self::W3cVc => "W3C Verifiable Credentials",
            Self::IsoMdl => "ISO Mobile Driving License",
            Self::Cbor => "Concise Binary Object Representation",
            Self::GenericJson => "Generic JSON",
            Self::Unknown => "Unknown or unsupported format",
        }
    }

    /// Lists the classifiable formats with their descriptions.
    pub fn supported() -> impl Iterator<Item = (&'static str, &'static str)> {
        Self::CLASSIFIABLE
            .into_iter()
            .map(|format| (format.name(), format.description()))
    }

    /// Whether the format is a compact JWT serialization.
    pub fn is_jwt(&self) -> bool {
        matches!(self, Self::SdJwt | Self::Jwt)
    }
}

impl From<&str> for CredentialFormat {
    fn from(s: &str) -> Self {
        Self::from_name(Cow::Borrowed(s))
    }
}

impl From<String> for CredentialFormat {
    fn from(value: String) -> Self {
        Self::from_name(Cow::Owned(value))
    }
}

impl FromStr for CredentialFormat {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.into())
    }
}

impl From<CredentialFormat> for String {
    fn from(format: CredentialFormat) -> Self {
        format.name().to_owned()
    }
}

impl fmt::Display for CredentialFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for CredentialFormat {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.name().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CredentialFormat {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Into::into)
    }
}

/// Coarse banding of a detector confidence score.
///
/// Confidence is not clamped, so every score of 0.9 or more lands in
/// [`ConfidenceLevel::High`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfidenceLevel {
    VeryLow,
    Low,
    Medium,
    High,
}

impl ConfidenceLevel {
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence >= 0.9 {
            Self::High
        } else if confidence >= 0.7 {
            Self::Medium
        } else if confidence >= 0.5 {
            Self::Low
        } else {
            Self::VeryLow
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::VeryLow => "VERY_LOW",
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        })
    }
}
