//! Submission payload and record types
//!
//! Wire names are camelCase to match the documented REST surface. Validation
//! walks the raw JSON value field by field in declaration order so the first
//! failing field can be named in the 400 response.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::VigilError;

/// A persisted submission. Immutable once created; `id` and `created_at`
/// are server-assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: i64,
    pub answer: String,
    pub time_spent_seconds: i64,
    pub mouse_moves: i64,
    pub hover_count: i64,
    pub risk_score: f64,
    pub created_at: DateTime<Utc>,
}

/// The client-supplied payload: a [`Submission`] minus the server-assigned
/// fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSubmission {
    pub answer: String,
    pub time_spent_seconds: i64,
    pub mouse_moves: i64,
    pub hover_count: i64,
    pub risk_score: f64,
}

impl NewSubmission {
    /// Parse and validate a raw JSON body. Field presence, type, and range
    /// are all checked in declaration order; the error names the first
    /// offending field.
    pub fn from_json(body: &[u8]) -> Result<Self, VigilError> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| VigilError::validation("body", format!("malformed JSON: {}", e)))?;
        Self::from_value(&value)
    }

    /// Validate a parsed JSON value against the payload shape.
    pub fn from_value(value: &Value) -> Result<Self, VigilError> {
        let object = value
            .as_object()
            .ok_or_else(|| VigilError::validation("body", "expected a JSON object"))?;

        let answer = require_string(object, "answer")?;
        let time_spent_seconds = require_count(object, "timeSpentSeconds")?;
        let mouse_moves = require_count(object, "mouseMoves")?;
        let hover_count = require_count(object, "hoverCount")?;
        let risk_score = require_score(object, "riskScore")?;

        let submission = Self {
            answer,
            time_spent_seconds,
            mouse_moves,
            hover_count,
            risk_score,
        };
        submission.validate()?;
        Ok(submission)
    }

    /// Range checks on an already well-typed payload, again in field order.
    pub fn validate(&self) -> Result<(), VigilError> {
        if self.answer.trim().is_empty() {
            return Err(VigilError::validation("answer", "must not be empty"));
        }
        if self.time_spent_seconds < 0 {
            return Err(VigilError::validation(
                "timeSpentSeconds",
                "must be non-negative",
            ));
        }
        if self.mouse_moves < 0 {
            return Err(VigilError::validation("mouseMoves", "must be non-negative"));
        }
        if self.hover_count < 0 {
            return Err(VigilError::validation("hoverCount", "must be non-negative"));
        }
        if !self.risk_score.is_finite() || !(0.0..=1.0).contains(&self.risk_score) {
            return Err(VigilError::validation(
                "riskScore",
                "must be a number between 0.0 and 1.0",
            ));
        }
        Ok(())
    }
}

fn require_string(
    object: &serde_json::Map<String, Value>,
    field: &str,
) -> Result<String, VigilError> {
    match object.get(field) {
        None | Some(Value::Null) => Err(VigilError::validation(field, "is required")),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(VigilError::validation(field, "must be a string")),
    }
}

fn require_count(
    object: &serde_json::Map<String, Value>,
    field: &str,
) -> Result<i64, VigilError> {
    match object.get(field) {
        None | Some(Value::Null) => Err(VigilError::validation(field, "is required")),
        Some(Value::Number(n)) => n
            .as_i64()
            .ok_or_else(|| VigilError::validation(field, "must be an integer")),
        Some(_) => Err(VigilError::validation(field, "must be an integer")),
    }
}

fn require_score(
    object: &serde_json::Map<String, Value>,
    field: &str,
) -> Result<f64, VigilError> {
    match object.get(field) {
        None | Some(Value::Null) => Err(VigilError::validation(field, "is required")),
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| VigilError::validation(field, "must be a number")),
        Some(_) => Err(VigilError::validation(field, "must be a number")),
    }
}
