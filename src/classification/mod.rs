pub mod kind;
pub mod reading;
pub mod thresholds;

use std::fmt;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

pub use kind::MeasurementKind;
pub use reading::{Reading, parse_decimal};
pub use thresholds::{Rule, ThresholdRow, ThresholdTable};

static DEFAULT_TABLE: LazyLock<ThresholdTable> = LazyLock::new(ThresholdTable::default);

/// Verdict for a single test reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassificationResult {
    Pass,
    Warning,
    Fail,
    /// Nothing entered, unparsable, or missing the context needed to judge it
    Unknown,
}

impl ClassificationResult {
    pub const ALL: [ClassificationResult; 4] = [
        ClassificationResult::Pass,
        ClassificationResult::Warning,
        ClassificationResult::Fail,
        ClassificationResult::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClassificationResult::Pass => "pass",
            ClassificationResult::Warning => "warning",
            ClassificationResult::Fail => "fail",
            ClassificationResult::Unknown => "unknown",
        }
    }

    /// True for a real verdict, false for `Unknown`
    pub fn is_known(&self) -> bool {
        !matches!(self, ClassificationResult::Unknown)
    }
}

impl fmt::Display for ClassificationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Classify a reading against the built-in BS 7671 thresholds
///
/// `max_zs` is only consulted for [`MeasurementKind::Zs`].
pub fn classify(kind: MeasurementKind, raw: &str, max_zs: Option<&str>) -> ClassificationResult {
    DEFAULT_TABLE.classify(kind, raw, max_zs)
}

impl ThresholdTable {
    /// Classify a reading against this table
    ///
    /// Total over all inputs: empty, malformed or out-of-context readings
    /// come back as `Unknown`, never as an error.
    pub fn classify(
        &self,
        kind: MeasurementKind,
        raw: &str,
        max_zs: Option<&str>,
    ) -> ClassificationResult {
        let reading = Reading::parse(raw);

        let result = match kind {
            MeasurementKind::R1R2 => numeric(&reading, |v| self.r1r2.evaluate(v)),
            MeasurementKind::Zs => {
                // A reading cannot be judged without the circuit's limit
                let Some(limit) = max_zs
                    .and_then(|m| parse_decimal(m).ok())
                    .filter(|m| !m.is_zero())
                else {
                    return ClassificationResult::Unknown;
                };
                numeric(&reading, |v| self.zs.evaluate(v, limit))
            }
            MeasurementKind::InsulationResistance => match reading {
                // Pegged at the instrument maximum
                Reading::OverRange(_) => ClassificationResult::Pass,
                _ => numeric(&reading, |v| self.insulation_resistance.evaluate(v)),
            },
            MeasurementKind::Polarity => {
                if reading.is_empty() {
                    ClassificationResult::Unknown
                } else {
                    self.polarity.evaluate(raw)
                }
            }
            MeasurementKind::RcdTripTime => numeric(&reading, |v| self.rcd_trip_time.evaluate(v)),
            MeasurementKind::ProspectiveFaultCurrent => ClassificationResult::Unknown,
        };

        tracing::trace!(%kind, raw, ?max_zs, %result, "classified reading");

        result
    }
}

fn numeric(
    reading: &Reading,
    evaluate: impl FnOnce(rust_decimal::Decimal) -> ClassificationResult,
) -> ClassificationResult {
    match reading.value() {
        Some(value) => evaluate(value),
        None => ClassificationResult::Unknown,
    }
}
