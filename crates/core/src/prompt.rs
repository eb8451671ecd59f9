//! Prompt Assembly
//!
//! Pure rendering of mission context and a transcript into the text prompts
//! sent to the generation backend. The full transcript is replayed on every
//! call, in original order, with no windowing or summarization; every
//! mission field and objective always appears.

use crate::directory::{LearnerProfile, Mission};
use crate::session::{ChatMessage, MessageRole};
use std::fmt::Write;

fn transcript_label(role: MessageRole) -> &'static str {
    match role {
        MessageRole::User => "Student",
        MessageRole::Assistant => "Assistant",
    }
}

fn render_transcript(out: &mut String, transcript: &[ChatMessage]) {
    for message in transcript {
        let _ = writeln!(out, "{}: {}", transcript_label(message.role), message.content);
    }
}

fn render_mission_context(out: &mut String, mission: &Mission, learner: &LearnerProfile) {
    let _ = writeln!(out, "Mission: {}", mission.title);
    let _ = writeln!(out, "Scenario: {}", mission.scenario);
    let _ = writeln!(out, "Objectives:");
    for objective in &mission.objectives {
        let _ = writeln!(out, "- {objective}");
    }
    let _ = writeln!(out, "Difficulty: {}", mission.difficulty);
    let _ = writeln!(
        out,
        "Learner: {} level, learning {} (native language: {})",
        learner.proficiency_level, learner.target_language, learner.base_language
    );
}

/// Renders the prompt for one conversation turn.
///
/// `transcript` is the history *before* this turn; the new user message is
/// appended separately at the end so the model sees it as the line to answer.
pub fn build_turn_prompt(
    mission: &Mission,
    learner: &LearnerProfile,
    transcript: &[ChatMessage],
    new_user_message: &str,
) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "You are roleplaying a scenario with a language learner. Respond only in {}. \
         Stay in character for the scenario at all times and steer the conversation \
         toward the mission objectives. Keep each reply to 2-3 sentences, matched to \
         the learner's level. If the student makes a language mistake, correct it \
         gently in passing, then continue the scene.",
        learner.target_language
    );
    let _ = writeln!(out);
    render_mission_context(&mut out, mission, learner);
    let _ = writeln!(out);
    let _ = writeln!(out, "Conversation so far:");
    render_transcript(&mut out, transcript);
    let _ = writeln!(out);
    let _ = writeln!(out, "Student: {new_user_message}");
    out
}

/// Renders the prompt for the terminal evaluation of a session.
pub fn build_evaluation_prompt(
    mission: &Mission,
    learner: &LearnerProfile,
    transcript: &[ChatMessage],
) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "You are grading a completed language-learning roleplay conversation. \
         Check each mission objective individually and decide whether the student \
         accomplished it during the conversation. Weigh the overall score as: \
         objective completion 60%, grammar accuracy 30%, engagement 10%. If only a \
         minority of the objectives were met, the overall score must be capped low; \
         do not merely average the components. Score 0-100 for both the overall and \
         grammar scores, and give the student short, encouraging feedback."
    );
    let _ = writeln!(out);
    render_mission_context(&mut out, mission, learner);
    let _ = writeln!(out);
    let _ = writeln!(out, "Full conversation:");
    render_transcript(&mut out, transcript);
    let _ = writeln!(out);
    let _ = writeln!(out, "Objectives to check, in order:");
    for objective in &mission.objectives {
        let _ = writeln!(out, "- {objective}");
    }
    out
}
