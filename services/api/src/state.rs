//! Shared Application State
//!
//! This module defines the `AppState` struct, which holds all shared,
//! clonable resources. The session store is constructed exactly once here
//! at startup and reached only through this state; there is no ambient
//! global, which keeps its lifecycle explicit and testable.

use crate::config::Config;
use lingua_core::{
    directory::{LearnerDirectory, MissionDirectory},
    runtime::ConversationRuntime,
    store::SessionStore,
};
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionStore>,
    pub runtime: Arc<ConversationRuntime>,
    pub missions: Arc<dyn MissionDirectory>,
    pub learners: Arc<dyn LearnerDirectory>,
    pub config: Arc<Config>,
}
