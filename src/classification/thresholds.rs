use std::path::Path;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::ClassificationResult;
use super::kind::MeasurementKind;
use crate::error::ClassifierError;

/// Symbols accepted as a correct polarity check, compared case-insensitively
pub const DEFAULT_POLARITY_ACCEPTED: [&str; 4] = ["correct", "ok", "c", "✓"];

/// Lower readings are better: resistance and disconnection time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CeilingRule {
    pub pass_max: Decimal,
    pub warning_max: Decimal,
}

impl CeilingRule {
    pub fn evaluate(&self, value: Decimal) -> ClassificationResult {
        if value <= self.pass_max {
            ClassificationResult::Pass
        } else if value <= self.warning_max {
            ClassificationResult::Warning
        } else {
            ClassificationResult::Fail
        }
    }
}

/// Ceiling expressed against a per-circuit limit (Zs against max Zs)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelativeCeilingRule {
    /// Fraction of the limit a reading may reach and still pass
    pub pass_ratio: Decimal,
}

impl RelativeCeilingRule {
    pub fn evaluate(&self, value: Decimal, limit: Decimal) -> ClassificationResult {
        let Some(pass_max) = limit.checked_mul(self.pass_ratio) else {
            return ClassificationResult::Unknown;
        };

        if value <= pass_max {
            ClassificationResult::Pass
        } else if value <= limit {
            ClassificationResult::Warning
        } else {
            ClassificationResult::Fail
        }
    }
}

/// Higher readings are better: insulation resistance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorRule {
    pub pass_min: Decimal,
    pub warning_min: Decimal,
}

impl FloorRule {
    pub fn evaluate(&self, value: Decimal) -> ClassificationResult {
        if value >= self.pass_min {
            ClassificationResult::Pass
        } else if value >= self.warning_min {
            ClassificationResult::Warning
        } else {
            ClassificationResult::Fail
        }
    }
}

/// Reading must be one of a fixed set of symbols
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MembershipRule {
    pub accepted: Vec<String>,
}

impl MembershipRule {
    /// Matches case-insensitively. There is no warning band.
    pub fn evaluate(&self, value: &str) -> ClassificationResult {
        let value = value.trim().to_lowercase();

        if self
            .accepted
            .iter()
            .any(|accepted| accepted.trim().to_lowercase() == value)
        {
            ClassificationResult::Pass
        } else {
            ClassificationResult::Fail
        }
    }
}

/// The rule applied to one measurement kind
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Rule {
    Ceiling(CeilingRule),
    RelativeCeiling(RelativeCeilingRule),
    Floor(FloorRule),
    Membership(MembershipRule),
    /// Recorded for display; never classified
    DisplayOnly,
}

/// One row of the table, with the display label and unit for its kind
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThresholdRow {
    pub kind: MeasurementKind,
    pub label: &'static str,
    pub unit: Option<&'static str>,
    pub rule: Rule,
}

/// Pass/warning/fail thresholds for every measurement kind
///
/// Defaults follow BS 7671 guidance. A TOML file can override any section;
/// sections left out keep their defaults:
///
/// ```toml
/// [r1r2]
/// pass_max = 1.0
/// warning_max = 1.5
///
/// [zs]
/// pass_ratio = 0.8
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThresholdTable {
    pub r1r2: CeilingRule,
    pub zs: RelativeCeilingRule,
    pub insulation_resistance: FloorRule,
    pub polarity: MembershipRule,
    pub rcd_trip_time: CeilingRule,
}

impl Default for ThresholdTable {
    fn default() -> Self {
        Self {
            r1r2: CeilingRule {
                pass_max: dec!(1.0),
                warning_max: dec!(1.5),
            },
            zs: RelativeCeilingRule {
                pass_ratio: dec!(0.8),
            },
            insulation_resistance: FloorRule {
                pass_min: dec!(2),
                warning_min: dec!(1),
            },
            polarity: MembershipRule {
                accepted: DEFAULT_POLARITY_ACCEPTED
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            },
            rcd_trip_time: CeilingRule {
                pass_max: dec!(200),
                warning_max: dec!(300),
            },
        }
    }
}

impl ThresholdTable {
    /// Parse and validate a table from TOML
    pub fn from_toml_str(input: &str) -> Result<Self, ClassifierError> {
        let table: ThresholdTable = toml::from_str(input)?;
        table.validate()?;
        Ok(table)
    }

    /// Load and validate a table from a TOML file
    pub fn load(path: &Path) -> Result<Self, ClassifierError> {
        let contents = std::fs::read_to_string(path)?;
        let table = Self::from_toml_str(&contents)?;

        tracing::info!("Loaded thresholds from {}", path.display());

        Ok(table)
    }

    /// Check that every band is ordered the right way round
    pub fn validate(&self) -> Result<(), ClassifierError> {
        check_ceiling("r1r2", &self.r1r2)?;
        check_ceiling("rcd_trip_time", &self.rcd_trip_time)?;

        if self.zs.pass_ratio <= Decimal::ZERO || self.zs.pass_ratio > Decimal::ONE {
            return Err(ClassifierError::Config(format!(
                "zs.pass_ratio ({}) must be greater than 0 and at most 1",
                self.zs.pass_ratio
            )));
        }

        let ir = &self.insulation_resistance;
        if ir.warning_min > ir.pass_min {
            return Err(ClassifierError::Config(format!(
                "insulation_resistance.warning_min ({}) must not exceed pass_min ({})",
                ir.warning_min, ir.pass_min
            )));
        }
        if ir.warning_min < Decimal::ZERO {
            return Err(ClassifierError::Config(
                "insulation_resistance.warning_min must not be negative".to_string(),
            ));
        }

        if self.polarity.accepted.iter().all(|s| s.trim().is_empty()) {
            return Err(ClassifierError::Config(
                "polarity.accepted must list at least one symbol".to_string(),
            ));
        }

        Ok(())
    }

    /// The rule that applies to a measurement kind
    pub fn rule(&self, kind: MeasurementKind) -> Rule {
        match kind {
            MeasurementKind::R1R2 => Rule::Ceiling(self.r1r2.clone()),
            MeasurementKind::Zs => Rule::RelativeCeiling(self.zs.clone()),
            MeasurementKind::InsulationResistance => {
                Rule::Floor(self.insulation_resistance.clone())
            }
            MeasurementKind::Polarity => Rule::Membership(self.polarity.clone()),
            MeasurementKind::RcdTripTime => Rule::Ceiling(self.rcd_trip_time.clone()),
            MeasurementKind::ProspectiveFaultCurrent => Rule::DisplayOnly,
        }
    }

    /// The whole table, one row per kind
    pub fn rows(&self) -> Vec<ThresholdRow> {
        MeasurementKind::ALL
            .iter()
            .map(|&kind| ThresholdRow {
                kind,
                label: kind.label(),
                unit: kind.unit(),
                rule: self.rule(kind),
            })
            .collect()
    }
}

fn check_ceiling(name: &str, rule: &CeilingRule) -> Result<(), ClassifierError> {
    if rule.warning_max < rule.pass_max {
        return Err(ClassifierError::Config(format!(
            "{}.warning_max ({}) must not be below pass_max ({})",
            name, rule.warning_max, rule.pass_max
        )));
    }

    if rule.pass_max < Decimal::ZERO {
        return Err(ClassifierError::Config(format!(
            "{}.pass_max must not be negative",
            name
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_default_table_is_valid() {
        assert!(ThresholdTable::default().validate().is_ok());
    }

    #[test]
    fn test_ceiling_rule_boundaries() {
        let rule = CeilingRule {
            pass_max: dec!(1.0),
            warning_max: dec!(1.5),
        };

        assert_eq!(rule.evaluate(dec!(1.0)), ClassificationResult::Pass);
        assert_eq!(rule.evaluate(dec!(1.01)), ClassificationResult::Warning);
        assert_eq!(rule.evaluate(dec!(1.5)), ClassificationResult::Warning);
        assert_eq!(rule.evaluate(dec!(1.51)), ClassificationResult::Fail);
    }

    #[test]
    fn test_relative_ceiling_rule_boundaries() {
        let rule = RelativeCeilingRule {
            pass_ratio: dec!(0.8),
        };

        assert_eq!(rule.evaluate(dec!(1.096), dec!(1.37)), ClassificationResult::Pass);
        assert_eq!(
            rule.evaluate(dec!(1.097), dec!(1.37)),
            ClassificationResult::Warning
        );
        assert_eq!(rule.evaluate(dec!(1.37), dec!(1.37)), ClassificationResult::Warning);
        assert_eq!(rule.evaluate(dec!(1.38), dec!(1.37)), ClassificationResult::Fail);
    }

    #[test]
    fn test_floor_rule_boundaries() {
        let rule = FloorRule {
            pass_min: dec!(2),
            warning_min: dec!(1),
        };

        assert_eq!(rule.evaluate(dec!(2)), ClassificationResult::Pass);
        assert_eq!(rule.evaluate(dec!(1.99)), ClassificationResult::Warning);
        assert_eq!(rule.evaluate(dec!(1)), ClassificationResult::Warning);
        assert_eq!(rule.evaluate(dec!(0.99)), ClassificationResult::Fail);
    }

    #[test]
    fn test_membership_rule_is_case_insensitive() {
        let rule = ThresholdTable::default().polarity;

        assert_eq!(rule.evaluate("Correct"), ClassificationResult::Pass);
        assert_eq!(rule.evaluate("OK"), ClassificationResult::Pass);
        assert_eq!(rule.evaluate(" c "), ClassificationResult::Pass);
        assert_eq!(rule.evaluate("✓"), ClassificationResult::Pass);
        assert_eq!(rule.evaluate("reversed"), ClassificationResult::Fail);
    }

    #[test]
    fn test_from_toml_overrides_one_section() {
        let table = ThresholdTable::from_toml_str(
            r#"
            [rcd_trip_time]
            pass_max = 40
            warning_max = 40
            "#,
        )
        .unwrap();

        assert_eq!(table.rcd_trip_time.pass_max, dec!(40));
        assert_eq!(table.rcd_trip_time.warning_max, dec!(40));
        // Untouched sections keep their defaults
        assert_eq!(table.r1r2, ThresholdTable::default().r1r2);
        assert_eq!(table.zs.pass_ratio, dec!(0.8));
    }

    #[test]
    fn test_from_toml_float_values() {
        let table = ThresholdTable::from_toml_str(
            r#"
            [r1r2]
            pass_max = 0.5
            warning_max = 0.75
            "#,
        )
        .unwrap();

        assert_eq!(table.r1r2.pass_max, dec!(0.5));
        assert_eq!(table.r1r2.warning_max, dec!(0.75));
    }

    #[test]
    fn test_from_toml_rejects_inverted_band() {
        let err = ThresholdTable::from_toml_str(
            r#"
            [r1r2]
            pass_max = 2.0
            warning_max = 1.0
            "#,
        )
        .unwrap_err();

        assert!(matches!(err, ClassifierError::Config(msg) if msg.contains("r1r2")));
    }

    #[test]
    fn test_from_toml_rejects_bad_ratio() {
        let err = ThresholdTable::from_toml_str("[zs]\npass_ratio = 1.2\n").unwrap_err();
        assert!(matches!(err, ClassifierError::Config(_)));

        let err = ThresholdTable::from_toml_str("[zs]\npass_ratio = 0\n").unwrap_err();
        assert!(matches!(err, ClassifierError::Config(_)));
    }

    #[test]
    fn test_from_toml_rejects_empty_polarity() {
        let err = ThresholdTable::from_toml_str("[polarity]\naccepted = []\n").unwrap_err();
        assert!(matches!(err, ClassifierError::Config(_)));
    }

    #[test]
    fn test_from_toml_rejects_unknown_section() {
        let err = ThresholdTable::from_toml_str("[voltage]\nmax = 1\n").unwrap_err();
        assert!(matches!(err, ClassifierError::Toml(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[insulation_resistance]").unwrap();
        writeln!(file, "pass_min = 1").unwrap();
        writeln!(file, "warning_min = 0.5").unwrap();

        let table = ThresholdTable::load(file.path()).unwrap();

        assert_eq!(table.insulation_resistance.pass_min, dec!(1));
        assert_eq!(table.insulation_resistance.warning_min, dec!(0.5));
    }

    #[test]
    fn test_load_missing_file() {
        let err = ThresholdTable::load(Path::new("/nonexistent/thresholds.toml")).unwrap_err();
        assert!(matches!(err, ClassifierError::Io(_)));
    }

    #[test]
    fn test_rows_cover_every_kind() {
        let rows = ThresholdTable::default().rows();

        assert_eq!(rows.len(), MeasurementKind::ALL.len());
        assert_eq!(rows[0].kind, MeasurementKind::R1R2);
        assert_eq!(rows[0].unit, Some("Ω"));
        assert_eq!(rows[5].rule, Rule::DisplayOnly);
    }

    #[test]
    fn test_rule_serializes_with_type_tag() {
        let json = serde_json::to_value(ThresholdTable::default().rule(MeasurementKind::Zs))
            .unwrap();

        assert_eq!(json["type"], "relative_ceiling");
        assert_eq!(json["pass_ratio"], "0.8");
    }
}
