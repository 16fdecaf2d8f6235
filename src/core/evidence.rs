use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};

use super::credential_format::{ConfidenceLevel, CredentialFormat};

/// The verdict of a single detector run.
///
/// An `Evidence` record is built once, by exactly one detector, and never
/// mutated afterwards. A confidence of `0.0` means the detector found no
/// evidence for its format.
///
/// Confidence is the raw weighted sum computed by the detector and is not
/// clamped: claim-rich inputs can score above `1.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evidence {
    format: CredentialFormat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version: Option<String>,
    confidence: f64,
    #[serde(default)]
    messages: Vec<String>,
    #[serde(default)]
    details: Map<String, Json>,
    #[serde(default)]
    required_fields: Vec<String>,
    #[serde(default)]
    optional_fields: Vec<String>,
    #[serde(default)]
    format_specific_info: BTreeMap<String, String>,
}

impl Evidence {
    /// A record stating that no evidence was found for `format`.
    pub fn none(format: CredentialFormat) -> Self {
        Tally::new(format).finish_with(0.0)
    }

    /// The sentinel returned when no detector produced positive confidence.
    pub fn unknown(content_length: usize) -> Self {
        let mut tally = Tally::new(CredentialFormat::Unknown);
        tally.note("No matching format detected");
        tally.detail("contentLength", content_length.to_string());
        tally.finish_with(0.0)
    }

    pub fn format(&self) -> CredentialFormat {
        self.format
    }

    /// Format version sniffed by the detector, e.g. `1.1`, `2.0`,
    /// `SD-JWT-VC` or `ISO/IEC 18013`.
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn confidence_level(&self) -> ConfidenceLevel {
        ConfidenceLevel::from_confidence(self.confidence)
    }

    /// Whether the detector found any evidence at all.
    pub fn is_positive(&self) -> bool {
        self.confidence > 0.0
    }

    /// Diagnostic messages, in the order they were recorded.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn details(&self) -> &Map<String, Json> {
        &self.details
    }

    pub fn detail(&self, key: &str) -> Option<&Json> {
        self.details.get(key)
    }

    /// Fields the format declares as required. Informational only.
    pub fn required_fields(&self) -> &[String] {
        &self.required_fields
    }

    /// Fields the format declares as optional. Informational only.
    pub fn optional_fields(&self) -> &[String] {
        &self.optional_fields
    }

    pub fn format_specific_info(&self) -> &BTreeMap<String, String> {
        &self.format_specific_info
    }

    pub(crate) fn into_messages(self) -> Vec<String> {
        self.messages
    }
}

/// Accumulates weighted evidence while a detector inspects its input.
///
/// Consumed by [`Tally::finish`] to produce the immutable [`Evidence`].
#[derive(Debug)]
pub(crate) struct Tally {
    format: CredentialFormat,
    version: Option<String>,
    confidence: f64,
    messages: Vec<String>,
    details: Map<String, Json>,
    required_fields: Vec<String>,
    optional_fields: Vec<String>,
    format_specific_info: BTreeMap<String, String>,
}

impl Tally {
    pub fn new(format: CredentialFormat) -> Self {
        Self {
            format,
            version: None,
            confidence: 0.0,
            messages: Vec::new(),
            details: Map::new(),
            required_fields: Vec::new(),
            optional_fields: Vec::new(),
            format_specific_info: BTreeMap::new(),
        }
    }

    /// Adds `weight` to the running confidence and records why.
    pub fn add(&mut self, weight: f64, message: impl Into<String>) {
        self.confidence += weight;
        self.messages.push(message.into());
    }

    /// Adds `weight` without a diagnostic message.
    pub fn bump(&mut self, weight: f64) {
        self.confidence += weight;
    }

    /// Subtracts `penalty` from the running confidence, never going below zero.
    pub fn penalize(&mut self, penalty: f64) {
        self.confidence = (self.confidence - penalty).max(0.0);
    }

    /// Raises the running confidence to at least `floor`.
    pub fn floor(&mut self, floor: f64) {
        self.confidence = self.confidence.max(floor);
    }

    pub fn note(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    pub fn detail(&mut self, key: &str, value: impl Into<Json>) {
        self.details.insert(key.to_owned(), value.into());
    }

    pub fn version(&mut self, version: impl Into<String>) {
        self.version = Some(version.into());
    }

    pub fn relabel(&mut self, format: CredentialFormat) {
        self.format = format;
    }

    pub fn info(&mut self, key: &str, value: impl Into<String>) {
        self.format_specific_info
            .insert(key.to_owned(), value.into());
    }

    pub fn require(&mut self, fields: &[&str]) {
        self.required_fields
            .extend(fields.iter().map(|f| (*f).to_owned()));
    }

    pub fn allow(&mut self, fields: &[&str]) {
        self.optional_fields
            .extend(fields.iter().map(|f| (*f).to_owned()));
    }

    /// Builds the record with the accumulated confidence.
    pub fn finish(self) -> Evidence {
        let confidence = self.confidence;
        self.finish_with(confidence)
    }

    /// Builds the record with an explicit confidence, discarding the
    /// accumulated one.
    pub fn finish_with(self, confidence: f64) -> Evidence {
        Evidence {
            format: self.format,
            version: self.version,
            confidence,
            messages: self.messages,
            details: self.details,
            required_fields: self.required_fields,
            optional_fields: self.optional_fields,
            format_specific_info: self.format_specific_info,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tally_preserves_message_order_and_penalty_floor() {
        let mut tally = Tally::new(CredentialFormat::SdJwt);
        tally.add(0.4, "first");
        tally.note("second");
        tally.penalize(0.9);
        tally.add(0.1, "third");

        let evidence = tally.finish();

        assert_eq!(evidence.messages(), ["first", "second", "third"]);
        assert!((evidence.confidence() - 0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn unknown_sentinel_records_content_length() {
        let evidence = Evidence::unknown(12);

        assert_eq!(evidence.format(), CredentialFormat::Unknown);
        assert_eq!(evidence.confidence(), 0.0);
        assert!(!evidence.is_positive());
        assert_eq!(evidence.messages().len(), 1);
        assert_eq!(evidence.detail("contentLength"), Some(&Json::from("12")));
    }

    #[test]
    fn evidence_serializes_camel_case() {
        let mut tally = Tally::new(CredentialFormat::IsoMdl);
        tally.require(&["type"]);
        tally.info("specification", "ISO/IEC 18013 mDL");
        let value = serde_json::to_value(tally.finish_with(0.75)).unwrap();

        assert_eq!(value["format"], "ISO-mDL");
        assert_eq!(value["requiredFields"], serde_json::json!(["type"]));
        assert_eq!(
            value["formatSpecificInfo"]["specification"],
            "ISO/IEC 18013 mDL"
        );
        assert!(value.get("version").is_none());
    }
}
