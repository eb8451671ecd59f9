//! Lingua Mission Runtime
//!
//! This crate implements the conversation runtime behind Lingua's roleplay
//! missions: an in-memory session cache, prompt assembly for the tutor
//! persona, and the turn/evaluation orchestration that drives a multi-turn
//! dialogue against a generative-language backend. Persistence of missions
//! and learner profiles lives outside this crate and is reached through the
//! traits in [`directory`].

pub mod directory;
pub mod llm_client;
pub mod prompt;
pub mod runtime;
pub mod session;
pub mod store;
