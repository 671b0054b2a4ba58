pub mod display;
pub mod metrics;
