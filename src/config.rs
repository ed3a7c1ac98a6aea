use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::classification::{MeasurementKind, ThresholdTable};
use crate::error::ClassifierError;

#[derive(Parser, Debug)]
#[command(name = "circuit-test-service")]
#[command(about = "BS 7671 circuit test value classifier")]
#[command(version)]
pub struct Cli {
    /// TOML file overriding the built-in thresholds
    #[arg(long, global = true, env = "CIRCUIT_TEST_THRESHOLDS")]
    pub thresholds: Option<PathBuf>,

    #[command(subcommand)]
    pub mode: Option<Mode>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Mode {
    /// Run the HTTP classification service
    Serve(ServeArgs),

    /// Classify a single reading and exit
    Check(CheckArgs),

    /// Classify every circuit in a schedule of tests file
    Schedule(ScheduleArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// HTTP server port
    #[arg(short, long, default_value = "8110", env = "CIRCUIT_TEST_LISTEN")]
    pub listen: u16,

    /// HTTP server host
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,
}

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Measurement kind
    #[arg(short, long, value_enum)]
    pub kind: KindArg,

    /// Reading as entered, e.g. 0.42 or >200
    #[arg(short, long, allow_hyphen_values = true)]
    pub value: String,

    /// Circuit maximum Zs (only used for zs)
    #[arg(long)]
    pub max_zs: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct ScheduleArgs {
    /// Schedule file (.json or .toml)
    #[arg(short, long)]
    pub file: PathBuf,

    /// Print the report as JSON instead of text
    #[arg(long, default_value = "false")]
    pub json: bool,

    /// Also write the schedule as JSON with blank max Zs columns filled in
    #[arg(long, value_name = "OUT")]
    pub fill_max_zs: Option<PathBuf>,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum KindArg {
    /// R1+R2 continuity (ohms)
    #[value(name = "r1r2")]
    R1R2,
    /// Earth fault loop impedance (ohms)
    Zs,
    /// Insulation resistance L-E (megohms)
    InsulationResistance,
    Polarity,
    /// RCD trip time at 1x (ms)
    RcdTripTime,
    /// Prospective fault current (kA), display only
    #[value(name = "pfc")]
    Pfc,
}

impl From<KindArg> for MeasurementKind {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::R1R2 => MeasurementKind::R1R2,
            KindArg::Zs => MeasurementKind::Zs,
            KindArg::InsulationResistance => MeasurementKind::InsulationResistance,
            KindArg::Polarity => MeasurementKind::Polarity,
            KindArg::RcdTripTime => MeasurementKind::RcdTripTime,
            KindArg::Pfc => MeasurementKind::ProspectiveFaultCurrent,
        }
    }
}

impl Cli {
    /// Thresholds from `--thresholds`, or the built-in table
    pub fn load_thresholds(&self) -> Result<ThresholdTable, ClassifierError> {
        match &self.thresholds {
            Some(path) => ThresholdTable::load(path),
            None => Ok(ThresholdTable::default()),
        }
    }
}
