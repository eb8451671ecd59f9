//! API Models
//!
//! Request and response payloads for the mission conversation endpoints,
//! annotated with `utoipa` schemas for the OpenAPI documentation.

use lingua_core::runtime::{EvaluationReport, ObjectiveProgress};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One turn of dialogue from the learner.
#[derive(Deserialize, ToSchema)]
pub struct ConversePayload {
    /// The learner's message for this turn.
    #[schema(example = "Hola, ¿cuánto cuesta un café?")]
    pub message: String,
    /// Omit on the first turn; echo the returned id on every later turn.
    pub session_id: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct ConverseResponse {
    pub session_id: String,
    pub reply: String,
}

/// Requests the terminal evaluation of a conversation.
#[derive(Deserialize, ToSchema)]
pub struct EvaluatePayload {
    pub session_id: String,
}

#[derive(Serialize, ToSchema)]
pub struct ObjectiveProgressDto {
    pub objective: String,
    pub completed: bool,
}

impl From<ObjectiveProgress> for ObjectiveProgressDto {
    fn from(progress: ObjectiveProgress) -> Self {
        Self {
            objective: progress.objective,
            completed: progress.completed,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct EvaluationResponse {
    /// Overall score, 0-100.
    #[schema(example = 82)]
    pub score: u8,
    /// Grammar-specific score, 0-100, when reported.
    pub grammar_score: Option<u8>,
    pub feedback: String,
    pub objective_progress: Option<Vec<ObjectiveProgressDto>>,
}

impl From<EvaluationReport> for EvaluationResponse {
    fn from(report: EvaluationReport) -> Self {
        Self {
            score: report.score,
            grammar_score: report.grammar_score,
            feedback: report.feedback,
            objective_progress: report
                .objective_progress
                .map(|entries| entries.into_iter().map(Into::into).collect()),
        }
    }
}

/// Operational view of the in-memory session cache.
#[derive(Serialize, ToSchema)]
pub struct SessionDiagnostics {
    pub live_sessions: usize,
    pub capacity: usize,
}

#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_converse_payload_deserialization() {
        let json = r#"{"message": "Bonjour!"}"#;
        let payload: ConversePayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.message, "Bonjour!");
        assert!(payload.session_id.is_none());

        let json = r#"{"message": "Merci", "session_id": "m-u-1"}"#;
        let payload: ConversePayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.session_id.as_deref(), Some("m-u-1"));
    }

    #[test]
    fn test_converse_payload_missing_message() {
        let result: Result<ConversePayload, _> = serde_json::from_str(r#"{}"#);
        assert!(result.is_err()); // Should fail because message is required
    }

    #[test]
    fn test_converse_response_serialization() {
        let response = ConverseResponse {
            session_id: "m-u-1".to_string(),
            reply: "¡Claro!".to_string(),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, r#"{"session_id":"m-u-1","reply":"¡Claro!"}"#);
    }

    #[test]
    fn test_evaluate_payload_deserialization() {
        let payload: EvaluatePayload =
            serde_json::from_str(r#"{"session_id": "m-u-1"}"#).unwrap();
        assert_eq!(payload.session_id, "m-u-1");
    }

    #[test]
    fn test_evaluation_response_from_report() {
        let report = EvaluationReport {
            score: 90,
            grammar_score: Some(85),
            feedback: "Great work".to_string(),
            objective_progress: Some(vec![ObjectiveProgress {
                objective: "Order food".to_string(),
                completed: true,
            }]),
        };

        let response = EvaluationResponse::from(report);
        assert_eq!(response.score, 90);
        assert_eq!(response.grammar_score, Some(85));
        let progress = response.objective_progress.unwrap();
        assert_eq!(progress.len(), 1);
        assert!(progress[0].completed);
    }

    #[test]
    fn test_evaluation_response_serialization_without_optionals() {
        let response = EvaluationResponse::from(EvaluationReport {
            score: 40,
            grammar_score: None,
            feedback: "Keep practicing".to_string(),
            objective_progress: None,
        });

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"score\":40"));
        assert!(json.contains("\"grammar_score\":null"));
    }

    #[test]
    fn test_session_diagnostics_serialization() {
        let diagnostics = SessionDiagnostics {
            live_sessions: 3,
            capacity: 100,
        };
        let json = serde_json::to_string(&diagnostics).unwrap();
        assert_eq!(json, r#"{"live_sessions":3,"capacity":100}"#);
    }

    #[test]
    fn test_error_response_serialization() {
        let error = ErrorResponse {
            message: "Session not found".to_string(),
        };
        let json = serde_json::to_string(&error).unwrap();
        assert_eq!(json, r#"{"message":"Session not found"}"#);
    }
}
