//! Core of the loan advisor dashboard: applicant form state, declarative option
//! trees for categorical fields, and the request lifecycle against the external
//! scoring service.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod telemetry;
