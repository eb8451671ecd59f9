//! Data Access Layer
//!
//! Missions and learner profiles are the externally-owned collaborators of
//! the conversation runtime; this module reads them from PostgreSQL with
//! `sqlx` and exposes them through the core's directory traits. Conversation
//! sessions never touch the database.

use anyhow::Result;
use async_trait::async_trait;
use lingua_core::directory::{LearnerDirectory, LearnerProfile, Mission, MissionDirectory};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

#[derive(FromRow)]
struct MissionRow {
    id: Uuid,
    title: String,
    scenario: String,
    objectives: Vec<String>,
    difficulty: String,
    owner_user_id: String,
}

impl From<MissionRow> for Mission {
    fn from(row: MissionRow) -> Self {
        Mission {
            id: row.id.to_string(),
            title: row.title,
            scenario: row.scenario,
            objectives: row.objectives,
            difficulty: row.difficulty,
            owner_user_id: row.owner_user_id,
        }
    }
}

#[derive(FromRow)]
struct LearnerProfileRow {
    target_language: String,
    base_language: String,
    proficiency_level: String,
}

impl From<LearnerProfileRow> for LearnerProfile {
    fn from(row: LearnerProfileRow) -> Self {
        LearnerProfile {
            target_language: row.target_language,
            base_language: row.base_language,
            proficiency_level: row.proficiency_level,
        }
    }
}

/// A wrapper around the `PgPool` to provide a clear data access interface.
#[derive(Clone)]
pub struct Db {
    pool: PgPool,
}

impl Db {
    /// Creates a new `Db` instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Runs all pending `sqlx` migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Retrieves a single mission by its ID.
    pub async fn get_mission(&self, id: Uuid) -> Result<Option<Mission>> {
        let row = sqlx::query_as::<_, MissionRow>(
            r#"
            SELECT id, title, scenario, objectives, difficulty, owner_user_id
            FROM missions
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Mission::from))
    }

    /// Retrieves a learner's language profile by user ID.
    pub async fn get_learner_profile(&self, user_id: &str) -> Result<Option<LearnerProfile>> {
        let row = sqlx::query_as::<_, LearnerProfileRow>(
            r#"
            SELECT target_language, base_language, proficiency_level
            FROM learner_profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(LearnerProfile::from))
    }
}

#[async_trait]
impl MissionDirectory for Db {
    async fn get_mission(&self, mission_id: &str) -> Result<Option<Mission>> {
        // A malformed id cannot match any stored mission.
        match mission_id.parse::<Uuid>() {
            Ok(id) => Db::get_mission(self, id).await,
            Err(_) => Ok(None),
        }
    }
}

#[async_trait]
impl LearnerDirectory for Db {
    async fn get_profile(&self, user_id: &str) -> Result<Option<LearnerProfile>> {
        self.get_learner_profile(user_id).await
    }
}
