//! Loan decision dashboard: applicant form, categorical option trees, the
//! prediction request lifecycle, and result presentation.

pub mod catalog;
pub mod controller;
pub mod options;
pub mod outcome;
pub mod page;
pub mod presentation;
pub mod profile;
pub mod router;
pub mod scoring;
pub mod session;

pub use catalog::{field_label, option_tree, FORM_ORDER};
pub use controller::{
    ControllerSnapshot, PredictionController, RequestPhase, SettledSubmission, SubmissionTicket,
};
pub use options::{
    ensure_unique_values, resolve_options, OptionSpec, OptionTreeError, OptionTreeNode,
    SelectControl,
};
pub use outcome::{
    Attribution, Decision, Prediction, PredictionOutcome, GENERIC_FAILURE_MESSAGE,
    INCOMPLETE_RESULT_MESSAGE,
};
pub use page::{render_dashboard, DashboardView};
pub use presentation::{
    AttributionBar, Impact, ResultPresentation, ADVISORY_NOTICE, NOT_AVAILABLE,
};
pub use profile::{ApplicantProfile, FieldKind, FieldName, FieldValue, FormError};
pub use router::dashboard_router;
pub use scoring::{
    ExplanationEntry, HttpScoringClient, PredictResponse, ScoringClient, ScoringError,
};
pub use session::{DashboardSession, SessionSnapshot};
