//! Vigil - interaction-telemetry capture and risk scoring for hover-reveal assessments
//!
//! Vigil presents a single question whose words are revealed on hover,
//! accumulates interaction telemetry while the user answers, scores the
//! session with a deterministic additive heuristic, and persists the
//! submission behind a small typed REST surface.
//!
//! ## Modules
//!
//! - **Tracker + Scorer**: per-session signal accumulation and the pure
//!   risk heuristic (`telemetry`, `scoring`)
//! - **Submission Service**: validation, persistence, and the REST pair
//!   (`submission`, `store`, `service`, `http`)
//! - **Session Driver**: the assessment lifecycle and API client
//!   (`session`, `client`)

pub mod client;
pub mod error;
pub mod http;
pub mod question;
pub mod scoring;
pub mod service;
pub mod session;
pub mod store;
pub mod submission;
pub mod telemetry;

pub use client::ApiClient;
pub use error::VigilError;
pub use question::{Question, QUESTION_TEXT};
pub use scoring::{assess, score, RiskAssessment, RiskFlag, RiskThresholds};
pub use service::SubmissionService;
pub use session::{AssessmentSession, SubmitState};
pub use store::SubmissionStore;
pub use submission::{NewSubmission, Submission};
pub use telemetry::SessionTelemetry;

/// Vigil version embedded in CLI output
pub const VIGIL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for CLI output
pub const PRODUCER_NAME: &str = "vigil";
