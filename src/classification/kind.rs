use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ClassifierError;

/// Test measurements recorded against a circuit on a schedule of tests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementKind {
    /// Continuity of line plus protective conductor
    #[serde(rename = "r1r2")]
    R1R2,
    /// Earth fault loop impedance
    Zs,
    /// Insulation resistance, line to earth
    InsulationResistance,
    Polarity,
    /// RCD disconnection time at 1x rated residual current
    RcdTripTime,
    /// Prospective fault current, recorded for display only
    #[serde(rename = "pfc")]
    ProspectiveFaultCurrent,
}

impl MeasurementKind {
    pub const ALL: [MeasurementKind; 6] = [
        MeasurementKind::R1R2,
        MeasurementKind::Zs,
        MeasurementKind::InsulationResistance,
        MeasurementKind::Polarity,
        MeasurementKind::RcdTripTime,
        MeasurementKind::ProspectiveFaultCurrent,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MeasurementKind::R1R2 => "R1+R2",
            MeasurementKind::Zs => "Zs",
            MeasurementKind::InsulationResistance => "Insulation resistance L-E",
            MeasurementKind::Polarity => "Polarity",
            MeasurementKind::RcdTripTime => "RCD trip time (1x)",
            MeasurementKind::ProspectiveFaultCurrent => "Prospective fault current",
        }
    }

    pub fn unit(&self) -> Option<&'static str> {
        match self {
            MeasurementKind::R1R2 | MeasurementKind::Zs => Some("Ω"),
            MeasurementKind::InsulationResistance => Some("MΩ"),
            MeasurementKind::Polarity => None,
            MeasurementKind::RcdTripTime => Some("ms"),
            MeasurementKind::ProspectiveFaultCurrent => Some("kA"),
        }
    }

    /// Stable identifier used on the wire and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            MeasurementKind::R1R2 => "r1r2",
            MeasurementKind::Zs => "zs",
            MeasurementKind::InsulationResistance => "insulation_resistance",
            MeasurementKind::Polarity => "polarity",
            MeasurementKind::RcdTripTime => "rcd_trip_time",
            MeasurementKind::ProspectiveFaultCurrent => "pfc",
        }
    }
}

impl fmt::Display for MeasurementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for MeasurementKind {
    type Err = ClassifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "r1r2" | "r1+r2" => Ok(MeasurementKind::R1R2),
            "zs" => Ok(MeasurementKind::Zs),
            "insulation_resistance" | "insulation" | "ir" => {
                Ok(MeasurementKind::InsulationResistance)
            }
            "polarity" => Ok(MeasurementKind::Polarity),
            "rcd_trip_time" | "rcd" | "rcd_one_x" => Ok(MeasurementKind::RcdTripTime),
            "pfc" | "prospective_fault_current" => Ok(MeasurementKind::ProspectiveFaultCurrent),
            _ => Err(ClassifierError::UnknownKind(s.to_string())),
        }
    }
}
