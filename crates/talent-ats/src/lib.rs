//! Applicant-tracking pipeline: candidate stage transitions and per-position candidate
//! listings served over HTTP.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
