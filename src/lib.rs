//! Classifies electrical installation test readings (R1+R2, Zs, insulation
//! resistance, polarity, RCD trip time) as pass, warning, fail or unknown
//! against BS 7671 thresholds, and serves the classifier over HTTP.

pub mod api;
pub mod circuit;
pub mod classification;
pub mod config;
pub mod error;
pub mod presentation;
pub mod schedule;
pub mod service;

pub use classification::{ClassificationResult, MeasurementKind, ThresholdTable, classify};
pub use error::ClassifierError;
