use std::fmt;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::circuit::{self, CircuitClassification, CircuitRecord};
use crate::classification::{ClassificationResult, ThresholdTable};
use crate::error::ClassifierError;

/// A schedule of tests: every circuit on a board
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    #[serde(default)]
    pub circuits: Vec<CircuitRecord>,
}

/// Count of results per verdict
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResultCounts {
    pub pass: usize,
    pub warning: usize,
    pub fail: usize,
    pub unknown: usize,
}

impl ResultCounts {
    pub fn add(&mut self, result: ClassificationResult) {
        match result {
            ClassificationResult::Pass => self.pass += 1,
            ClassificationResult::Warning => self.warning += 1,
            ClassificationResult::Fail => self.fail += 1,
            ClassificationResult::Unknown => self.unknown += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.pass + self.warning + self.fail + self.unknown
    }

    /// Results that carry a real verdict
    pub fn known(&self) -> usize {
        self.pass + self.warning + self.fail
    }
}

/// Classification of a whole schedule
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleReport {
    pub generated_at: DateTime<Utc>,
    pub circuits: Vec<CircuitClassification>,
    /// Per-circuit overall verdicts
    pub circuit_totals: ResultCounts,
    /// Every classified field across all circuits
    pub field_totals: ResultCounts,
    pub overall: ClassificationResult,
}

impl ScheduleReport {
    /// Share of judged fields that passed, or None if nothing was judged
    pub fn pass_rate(&self) -> Option<f64> {
        let known = self.field_totals.known();
        if known == 0 {
            return None;
        }
        Some(self.field_totals.pass as f64 / known as f64)
    }
}

impl fmt::Display for ScheduleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Schedule of tests ({})", self.generated_at.to_rfc3339())?;

        for circuit in &self.circuits {
            write!(
                f,
                "  {:<4} {:<8} {:<8}",
                circuit.circuit_number, circuit.circuit_designation, circuit.overall
            )?;
            for field in &circuit.fields {
                if field.result.is_known() {
                    write!(f, " {}={}", field.kind, field.result)?;
                }
            }
            writeln!(f)?;
        }

        write!(
            f,
            "Circuits: {} pass, {} warning, {} fail, {} unknown. Overall: {}",
            self.circuit_totals.pass,
            self.circuit_totals.warning,
            self.circuit_totals.fail,
            self.circuit_totals.unknown,
            self.overall
        )
    }
}

impl Schedule {
    pub fn new(circuits: Vec<CircuitRecord>) -> Self {
        Self { circuits }
    }

    /// Parse JSON: either `{ "circuits": [...] }` or a bare array of records
    pub fn from_json_str(input: &str) -> Result<Self, ClassifierError> {
        let value: serde_json::Value = serde_json::from_str(input)?;

        if value.is_array() {
            let circuits: Vec<CircuitRecord> = serde_json::from_value(value)?;
            return Ok(Self { circuits });
        }

        Ok(serde_json::from_value(value)?)
    }

    /// Parse TOML with one `[[circuits]]` table per circuit
    pub fn from_toml_str(input: &str) -> Result<Self, ClassifierError> {
        Ok(toml::from_str(input)?)
    }

    /// Load a schedule, choosing the format from the file extension
    pub fn load(path: &Path) -> Result<Self, ClassifierError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        let contents = std::fs::read_to_string(path)?;

        let schedule = match extension.as_str() {
            "json" => Self::from_json_str(&contents)?,
            "toml" => Self::from_toml_str(&contents)?,
            _ => return Err(ClassifierError::UnsupportedFormat(path.display().to_string())),
        };

        tracing::info!(
            "Loaded {} circuits from {}",
            schedule.circuits.len(),
            path.display()
        );

        Ok(schedule)
    }

    /// Fill blank max Zs columns from each circuit's protective device
    ///
    /// Returns the number of circuits that changed.
    pub fn resolve_max_zs(&mut self) -> usize {
        let filled = self
            .circuits
            .iter_mut()
            .map(CircuitRecord::resolve_max_zs)
            .filter(|&changed| changed)
            .count();

        if filled > 0 {
            tracing::info!("Filled max Zs on {} circuits", filled);
        }

        filled
    }

    /// Classify every circuit against a threshold table
    pub fn classify(&self, table: &ThresholdTable) -> ScheduleReport {
        let mut circuit_totals = ResultCounts::default();
        let mut field_totals = ResultCounts::default();

        let circuits: Vec<CircuitClassification> = self
            .circuits
            .iter()
            .map(|record| {
                let classification = record.classify(table);
                circuit_totals.add(classification.overall);
                for field in &classification.fields {
                    field_totals.add(field.result);
                }
                classification
            })
            .collect();

        let overall = circuit::overall(circuits.iter().map(|c| c.overall));

        if circuit_totals.fail > 0 {
            tracing::warn!(
                "{} of {} circuits failed",
                circuit_totals.fail,
                circuits.len()
            );
        }

        tracing::info!(
            "Classified {} circuits: {} pass, {} warning, {} fail, {} unknown",
            circuits.len(),
            circuit_totals.pass,
            circuit_totals.warning,
            circuit_totals.fail,
            circuit_totals.unknown
        );

        ScheduleReport {
            generated_at: Utc::now(),
            circuits,
            circuit_totals,
            field_totals,
            overall,
        }
    }
}
