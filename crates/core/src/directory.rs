//! Mission and Learner Collaborators
//!
//! Missions and learner profiles are owned by the surrounding application,
//! not by this crate. These traits are the seam through which the runtime's
//! callers fetch them; the `Static*` implementations back development and
//! tests without a database.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A roleplay scenario definition. Read-only to the conversation runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mission {
    pub id: String,
    pub title: String,
    /// Free-text description of the scene the tutor persona plays out.
    pub scenario: String,
    /// Objectives the learner should accomplish during the conversation.
    pub objectives: Vec<String>,
    pub difficulty: String,
    pub owner_user_id: String,
}

/// The language-learning profile of one learner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearnerProfile {
    /// The language being learned; the conversation happens in it.
    pub target_language: String,
    /// The learner's native language, used for gentle corrections.
    pub base_language: String,
    pub proficiency_level: String,
}

/// Looks up mission definitions by id.
#[async_trait]
pub trait MissionDirectory: Send + Sync {
    async fn get_mission(&self, mission_id: &str) -> Result<Option<Mission>>;
}

/// Looks up learner profiles by user id.
#[async_trait]
pub trait LearnerDirectory: Send + Sync {
    async fn get_profile(&self, user_id: &str) -> Result<Option<LearnerProfile>>;
}

/// A canned, in-memory `MissionDirectory` for development and testing.
#[derive(Default)]
pub struct StaticMissionDirectory {
    missions: HashMap<String, Mission>,
}

impl StaticMissionDirectory {
    pub fn new(missions: Vec<Mission>) -> Self {
        Self {
            missions: missions.into_iter().map(|m| (m.id.clone(), m)).collect(),
        }
    }
}

#[async_trait]
impl MissionDirectory for StaticMissionDirectory {
    async fn get_mission(&self, mission_id: &str) -> Result<Option<Mission>> {
        Ok(self.missions.get(mission_id).cloned())
    }
}

/// A canned, in-memory `LearnerDirectory` for development and testing.
#[derive(Default)]
pub struct StaticLearnerDirectory {
    profiles: HashMap<String, LearnerProfile>,
}

impl StaticLearnerDirectory {
    pub fn new(profiles: Vec<(String, LearnerProfile)>) -> Self {
        Self {
            profiles: profiles.into_iter().collect(),
        }
    }
}

#[async_trait]
impl LearnerDirectory for StaticLearnerDirectory {
    async fn get_profile(&self, user_id: &str) -> Result<Option<LearnerProfile>> {
        Ok(self.profiles.get(user_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cafe_mission() -> Mission {
        Mission {
            id: "cafe-order".to_string(),
            title: "Ordering at a café".to_string(),
            scenario: "You are a barista in a busy Madrid café.".to_string(),
            objectives: vec![
                "Greet the barista".to_string(),
                "Order a drink".to_string(),
            ],
            difficulty: "beginner".to_string(),
            owner_user_id: "author-1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_static_mission_directory_lookup() {
        let directory = StaticMissionDirectory::new(vec![cafe_mission()]);

        let found = directory.get_mission("cafe-order").await.unwrap();
        assert_eq!(found.unwrap().title, "Ordering at a café");

        let missing = directory.get_mission("no-such-mission").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_static_learner_directory_lookup() {
        let directory = StaticLearnerDirectory::new(vec![(
            "u1".to_string(),
            LearnerProfile {
                target_language: "Spanish".to_string(),
                base_language: "English".to_string(),
                proficiency_level: "A2".to_string(),
            },
        )]);

        let profile = directory.get_profile("u1").await.unwrap().unwrap();
        assert_eq!(profile.target_language, "Spanish");
        assert!(directory.get_profile("u2").await.unwrap().is_none());
    }
}
