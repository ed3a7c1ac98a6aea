pub mod circuit;
pub mod classify;
pub mod health;
pub mod thresholds;
