//! # Settings Repository
//!
//! Per-user preferences stored as one JSON document per user.
//!
//! Loading never fails for a missing user: the dashboard defaults apply
//! until the first save. Stored documents are normalized on the way out so
//! zeroed or blank fields fall back to their defaults.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use vedaa_core::{SettingsPatch, UserSettings};

use crate::error::DbResult;

/// Repository for `user_settings`.
#[derive(Debug, Clone)]
pub struct SettingsRepository {
    pool: SqlitePool,
}

impl SettingsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SettingsRepository { pool }
    }

    /// Settings for `user_id`, or the defaults when none are stored.
    pub async fn load(&self, user_id: &str) -> DbResult<UserSettings> {
        let stored: Option<String> = sqlx::query_scalar("SELECT settings FROM user_settings WHERE user_id = ?1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        match stored {
            Some(json) => {
                let settings: UserSettings = serde_json::from_str(&json)?;
                Ok(settings.normalized())
            }
            None => {
                debug!(user_id = %user_id, "No stored settings, using defaults");
                Ok(UserSettings::default())
            }
        }
    }

    /// Validates and stores the full settings document.
    pub async fn save(&self, user_id: &str, settings: &UserSettings) -> DbResult<()> {
        settings.validate()?;
        let json = serde_json::to_string(settings)?;

        sqlx::query(
            r#"
            INSERT INTO user_settings (user_id, settings, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(user_id) DO UPDATE SET
                settings = excluded.settings,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(user_id)
        .bind(json)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        info!(user_id = %user_id, "Settings saved");
        Ok(())
    }

    /// Merges `patch` into the stored settings and saves the result.
    pub async fn update(&self, user_id: &str, patch: &SettingsPatch) -> DbResult<UserSettings> {
        let current = self.load(user_id).await?;
        if patch.is_empty() {
            return Ok(current);
        }

        let next = current.merge(patch);
        self.save(user_id, &next).await?;
        Ok(next)
    }

    /// Drops the stored document; the next load returns the defaults.
    pub async fn reset(&self, user_id: &str) -> DbResult<UserSettings> {
        sqlx::query("DELETE FROM user_settings WHERE user_id = ?1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        info!(user_id = %user_id, "Settings reset to defaults");
        Ok(UserSettings::default())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
