//! Conversation Runtime
//!
//! Orchestrates the two operations of a roleplay mission: exchanging one
//! turn of dialogue, and the terminal evaluation of a finished conversation.
//! Both operate against the shared [`SessionStore`] and a generation
//! backend; neither performs mission or profile lookups itself.

use crate::directory::{LearnerProfile, Mission};
use crate::llm_client::{LLMClient, TokenUsage};
use crate::prompt;
use crate::session::{MessageRole, Session};
use crate::store::SessionStore;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Failures surfaced by the conversation runtime.
///
/// None of these are retried internally. Every failure path leaves the
/// session store unchanged, so a caller-driven retry is always safe.
#[derive(Debug, thiserror::Error)]
pub enum ConversationError {
    /// The session id has no live entry: never created, evicted, or lost to
    /// a process restart. Callers recover by starting a fresh conversation.
    #[error("session '{0}' not found")]
    SessionNotFound(String),
    /// The session exists but belongs to a different user or mission.
    #[error("session does not belong to the requesting user and mission")]
    Unauthorized,
    /// The evaluation backend returned no structurally valid report.
    #[error("evaluation produced no usable report: {0}")]
    EvaluationFailed(String),
    /// The outbound generation call itself failed.
    #[error("generation call failed")]
    Generation(#[source] anyhow::Error),
}

/// The result of one conversation turn.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// Echoed back so subsequent turns can resume the same session.
    pub session_id: String,
    pub assistant_message: String,
    pub usage: TokenUsage,
}

/// Per-objective completion as judged by the evaluation backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ObjectiveProgress {
    pub objective: String,
    pub completed: bool,
}

/// The structured result of evaluating a finished conversation.
///
/// Produced by the generation backend under a schema constraint; this crate
/// only checks structure and ranges, never recomputes scores locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EvaluationReport {
    /// Overall score, 0-100.
    pub score: u8,
    /// Grammar-specific score, 0-100, when the model reports one.
    #[serde(default)]
    pub grammar_score: Option<u8>,
    pub feedback: String,
    /// One entry per mission objective, in objective order, when reported.
    #[serde(default)]
    pub objective_progress: Option<Vec<ObjectiveProgress>>,
}

impl EvaluationReport {
    /// Rejects out-of-range scores. Values are never clamped.
    fn validate(&self) -> Result<(), String> {
        if self.score > 100 {
            return Err(format!("score {} out of range 0-100", self.score));
        }
        if let Some(grammar) = self.grammar_score {
            if grammar > 100 {
                return Err(format!("grammar_score {grammar} out of range 0-100"));
            }
        }
        Ok(())
    }
}

fn evaluation_schema() -> serde_json::Value {
    schemars::schema_for!(EvaluationReport).to_value()
}

/// Drives roleplay conversations against the session store and an LLM.
///
/// Turns within one session must be serialized by the caller; the runtime
/// takes no per-session lock, so concurrent turns against the same id can
/// lose one assistant reply (last save wins). Distinct sessions are fully
/// independent.
pub struct ConversationRuntime {
    store: Arc<SessionStore>,
    llm: Arc<dyn LLMClient>,
}

impl ConversationRuntime {
    pub fn new(store: Arc<SessionStore>, llm: Arc<dyn LLMClient>) -> Self {
        Self { store, llm }
    }

    fn new_session_id(mission_id: &str, user_id: &str) -> String {
        format!(
            "{mission_id}-{user_id}-{}",
            chrono::Utc::now().timestamp_millis()
        )
    }

    /// Exchanges one turn of dialogue.
    ///
    /// With no `session_id`, a fresh session bound to the mission and user
    /// is created. With one, the session is resumed; a stale id fails with
    /// [`ConversationError::SessionNotFound`] rather than silently starting
    /// over under the old id. The updated transcript is saved only after
    /// the generation call succeeds, so a failed turn leaves the stored
    /// session exactly as it was and can be retried with the same id.
    pub async fn take_turn(
        &self,
        mission: &Mission,
        learner: &LearnerProfile,
        user_id: &str,
        user_message: &str,
        session_id: Option<&str>,
    ) -> Result<TurnOutcome, ConversationError> {
        let mut session = match session_id {
            Some(id) => self
                .store
                .get(id)
                .ok_or_else(|| ConversationError::SessionNotFound(id.to_string()))?,
            None => {
                let id = Self::new_session_id(&mission.id, user_id);
                info!(session_id = %id, mission_id = %mission.id, "starting new mission conversation");
                Session::new(id, mission.id.clone(), user_id.to_string())
            }
        };

        let rendered = prompt::build_turn_prompt(mission, learner, &session.messages, user_message);
        session.push(MessageRole::User, user_message);

        let generation = self
            .llm
            .generate_text(rendered)
            .await
            .map_err(ConversationError::Generation)?;
        session.push(MessageRole::Assistant, generation.text.clone());

        debug!(
            session_id = %session.session_id,
            turns = session.messages.len() / 2,
            "turn completed"
        );
        let outcome = TurnOutcome {
            session_id: session.session_id.clone(),
            assistant_message: generation.text,
            usage: generation.usage,
        };
        self.store.save(session);
        Ok(outcome)
    }

    /// Evaluates a finished conversation against the mission's objectives.
    ///
    /// The session must exist and be bound to both the requesting user and
    /// the requested mission; the ownership check runs before any generation
    /// call so a guessed id neither exposes a transcript nor spends tokens.
    /// The store is not mutated: the session stays cached and the evaluation
    /// can be repeated.
    pub async fn evaluate(
        &self,
        mission: &Mission,
        learner: &LearnerProfile,
        user_id: &str,
        session_id: &str,
    ) -> Result<EvaluationReport, ConversationError> {
        let session = self
            .store
            .get(session_id)
            .ok_or_else(|| ConversationError::SessionNotFound(session_id.to_string()))?;

        if session.user_id() != user_id || session.mission_id() != mission.id {
            return Err(ConversationError::Unauthorized);
        }

        let rendered = prompt::build_evaluation_prompt(mission, learner, &session.messages);
        let result = self
            .llm
            .generate_structured(rendered, "mission_evaluation".to_string(), evaluation_schema())
            .await
            .map_err(ConversationError::Generation)?;

        let output = result.output.ok_or_else(|| {
            ConversationError::EvaluationFailed("model returned no parseable output".to_string())
        })?;
        let report: EvaluationReport = serde_json::from_value(output)
            .map_err(|e| ConversationError::EvaluationFailed(e.to_string()))?;
        report.validate().map_err(ConversationError::EvaluationFailed)?;

        info!(session_id = %session_id, score = report.score, "mission evaluated");
        Ok(report)
    }
}
