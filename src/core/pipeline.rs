use std::panic::{catch_unwind, AssertUnwindSafe};

use tracing::{debug, warn};

use super::{
    detector::{DetectionError, Detector},
    evidence::Evidence,
    report::DetectionReport,
    structure::analyze_structure,
};

/// Runs a fixed registry of detectors over an artifact and picks a winner.
///
/// Every detector sees the same content. A detector that returns an error
/// or panics is logged and skipped; the others still run. Among the
/// detectors that found evidence, the one with the highest
/// [priority](Detector::priority) wins, whatever the confidences. Equal
/// priorities resolve to the first registered detector.
///
/// The registry is read-only once built, so a pipeline can be shared
/// between threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectionPipeline {
    detectors: Vec<Detector>,
}

impl Default for DetectionPipeline {
    fn default() -> Self {
        Self::new(Detector::ALL)
    }
}

impl DetectionPipeline {
    /// Creates a pipeline running `detectors` in the given order.
    pub fn new(detectors: impl IntoIterator<Item = Detector>) -> Self {
        Self {
            detectors: detectors.into_iter().collect(),
        }
    }

    pub fn detectors(&self) -> &[Detector] {
        &self.detectors
    }

    /// Classifies `content`.
    ///
    /// Always returns a record: when no detector found evidence, the
    /// [`Evidence::unknown`] sentinel.
    pub fn detect_format(&self, content: &str) -> Evidence {
        select(self.run(content)).unwrap_or_else(|| {
            debug!("no detector matched, reporting unknown format");
            Evidence::unknown(content.chars().count())
        })
    }

    /// Every record with positive confidence, in registry order.
    ///
    /// Meant for inspection; no winner is selected.
    pub fn detect_all_formats(&self, content: &str) -> Vec<Evidence> {
        self.run(content)
            .into_iter()
            .map(|(_, evidence)| evidence)
            .collect()
    }

    /// Classifies `content` and summarizes its structure as the winning format.
    pub fn inspect(&self, content: &str) -> DetectionReport {
        let evidence = self.detect_format(content);
        let structure = analyze_structure(content, evidence.format());
        DetectionReport::new(evidence, structure)
    }

    fn run(&self, content: &str) -> Vec<(Detector, Evidence)> {
        positive(
            self.detectors
                .iter()
                .map(|detector| (*detector, run_isolated(*detector, content))),
        )
    }
}

/// Outcome of a single detector run.
enum Outcome {
    Completed(Result<Evidence, DetectionError>),
    Panicked,
}

fn run_isolated(detector: Detector, content: &str) -> Outcome {
    match catch_unwind(AssertUnwindSafe(|| detector.detect(content))) {
        Ok(result) => Outcome::Completed(result),
        Err(_) => Outcome::Panicked,
    }
}

/// Drops faulted runs and runs without evidence, logging both.
fn positive(outcomes: impl Iterator<Item = (Detector, Outcome)>) -> Vec<(Detector, Evidence)> {
    outcomes
        .filter_map(|(detector, outcome)| match outcome {
            Outcome::Completed(Ok(evidence)) => {
                debug!(
                    detector = detector.name(),
                    format = %evidence.format(),
                    confidence = evidence.confidence(),
                    "detector finished"
                );
                evidence.is_positive().then_some((detector, evidence))
            }
            Outcome::Completed(Err(e)) => {
                warn!(detector = detector.name(), "detector failed: {e}");
                None
            }
            Outcome::Panicked => {
                warn!(detector = detector.name(), "detector panicked");
                None
            }
        })
        .collect()
}

/// Picks the evidence of the highest-priority detector, first registered on ties.
fn select(candidates: Vec<(Detector, Evidence)>) -> Option<Evidence> {
    let mut best: Option<(Detector, Evidence)> = None;

    for (detector, evidence) in candidates {
        let outranks = match &best {
            Some((leader, _)) => detector.priority() > leader.priority(),
            None => true,
        };
        if outranks {
            best = Some((detector, evidence));
        }
    }

    best.map(|(detector, evidence)| {
        debug!(
            detector = detector.name(),
            format = %evidence.format(),
            confidence = evidence.confidence(),
            "selected format"
        );
        evidence
    })
}
