pub mod max_zs;

use serde::{Deserialize, Serialize};

use crate::classification::{ClassificationResult, MeasurementKind, ThresholdTable};
use crate::presentation::Treatment;

pub use max_zs::{DeviceDesignation, TripCurve, resolve_max_zs};

/// One row of a schedule of tests
///
/// Values are kept exactly as entered. Field names follow the camelCase
/// export of the inspection forms so records load unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CircuitRecord {
    pub circuit_number: String,
    pub circuit_designation: String,
    pub circuit_description: String,

    // Protective device
    pub bs_standard: String,
    pub protective_device_type: String,
    pub protective_device_curve: String,
    pub protective_device_rating: String,
    pub max_zs: String,

    // Test results
    pub r1r2: String,
    pub zs: String,
    pub insulation_live_earth: String,
    pub polarity: String,
    pub rcd_one_x: String,
    pub pfc: String,

    pub notes: String,
}

/// Where the limit used to judge Zs came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaxZsSource {
    /// Entered on the schedule
    Recorded,
    /// Looked up from the protective device and derated
    Derived,
    Missing,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldClassification {
    pub kind: MeasurementKind,
    pub value: String,
    pub result: ClassificationResult,
    pub treatment: Treatment,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CircuitClassification {
    pub circuit_number: String,
    pub circuit_designation: String,
    pub max_zs: Option<String>,
    pub max_zs_source: MaxZsSource,
    pub fields: Vec<FieldClassification>,
    pub overall: ClassificationResult,
}

impl CircuitClassification {
    pub fn result(&self, kind: MeasurementKind) -> Option<ClassificationResult> {
        self.fields.iter().find(|f| f.kind == kind).map(|f| f.result)
    }
}

impl CircuitRecord {
    /// The recorded value for a measurement kind
    pub fn value(&self, kind: MeasurementKind) -> &str {
        match kind {
            MeasurementKind::R1R2 => &self.r1r2,
            MeasurementKind::Zs => &self.zs,
            MeasurementKind::InsulationResistance => &self.insulation_live_earth,
            MeasurementKind::Polarity => &self.polarity,
            MeasurementKind::RcdTripTime => &self.rcd_one_x,
            MeasurementKind::ProspectiveFaultCurrent => &self.pfc,
        }
    }

    /// Max Zs to judge this circuit against: the recorded value, or one
    /// derived from the protective device when the column is blank
    pub fn effective_max_zs(&self) -> (Option<String>, MaxZsSource) {
        let recorded = self.max_zs.trim();
        if !recorded.is_empty() {
            return (Some(recorded.to_string()), MaxZsSource::Recorded);
        }

        match resolve_max_zs(
            &self.bs_standard,
            &self.protective_device_curve,
            &self.protective_device_rating,
        ) {
            Some(derived) => (Some(derived.to_string()), MaxZsSource::Derived),
            None => (None, MaxZsSource::Missing),
        }
    }

    /// Fill a blank max Zs column from the protective device details
    ///
    /// Returns true if the record changed.
    pub fn resolve_max_zs(&mut self) -> bool {
        match self.effective_max_zs() {
            (Some(derived), MaxZsSource::Derived) => {
                tracing::debug!(
                    "Circuit {}: derived max Zs {} from device",
                    self.circuit_number,
                    derived
                );
                self.max_zs = derived;
                true
            }
            _ => false,
        }
    }

    /// Classify every measured field on this circuit
    pub fn classify(&self, table: &ThresholdTable) -> CircuitClassification {
        let (max_zs, max_zs_source) = self.effective_max_zs();

        let fields: Vec<FieldClassification> = MeasurementKind::ALL
            .iter()
            .map(|&kind| {
                let value = self.value(kind);
                let result = table.classify(kind, value, max_zs.as_deref());
                FieldClassification {
                    kind,
                    value: value.to_string(),
                    result,
                    treatment: Treatment::for_result(result),
                }
            })
            .collect();

        let overall = overall(fields.iter().map(|f| f.result));

        CircuitClassification {
            circuit_number: self.circuit_number.clone(),
            circuit_designation: self.circuit_designation.clone(),
            max_zs,
            max_zs_source,
            fields,
            overall,
        }
    }
}

/// Worst verdict across a set of results
///
/// Fail beats Warning beats Pass. `Unknown` results are ignored, and a set
/// with no known result at all is `Unknown`, never `Pass`.
pub fn overall(results: impl IntoIterator<Item = ClassificationResult>) -> ClassificationResult {
    let mut verdict = ClassificationResult::Unknown;

    for result in results {
        verdict = match (verdict, result) {
            (_, ClassificationResult::Fail) | (ClassificationResult::Fail, _) => {
                ClassificationResult::Fail
            }
            (_, ClassificationResult::Warning) | (ClassificationResult::Warning, _) => {
                ClassificationResult::Warning
            }
            (_, ClassificationResult::Pass) | (ClassificationResult::Pass, _) => {
                ClassificationResult::Pass
            }
            _ => ClassificationResult::Unknown,
        };
    }

    verdict
}
