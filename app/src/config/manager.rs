//! SettingsManager: DB-backed settings with defaults and env migration.

use std::collections::BTreeMap;

use artwork_db::Database;

use super::SettingInfo;
use super::defaults::DEFAULT_SETTINGS;
use super::validation::validate_setting;

/// Wraps [`Database`] to provide high-level settings operations.
pub struct SettingsManager {
    db: Database,
}

impl SettingsManager {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Get a setting value. Falls back to default if not in DB.
    pub fn get_setting(&self, key: &str) -> Result<String, anyhow::Error> {
        if let Some(val) = self.db.get_setting(key)? {
            return Ok(val);
        }
        if let Some(def) = DEFAULT_SETTINGS.get(key) {
            return Ok(def.default.to_string());
        }
        anyhow::bail!("setting not found: {key}");
    }

    /// Set a setting value with validation.
    pub fn set_setting(&self, key: &str, value: &str) -> Result<(), anyhow::Error> {
        if !DEFAULT_SETTINGS.contains_key(key) {
            anyhow::bail!("unknown setting key: {key}");
        }
        validate_setting(key, value)
            .map_err(|e| anyhow::anyhow!("validation error for {key}: {e}"))?;
        self.db.set_setting(key, value)?;
        Ok(())
    }

    /// All known settings, with defaults filled in for keys not in the DB.
    pub fn get_all_settings(&self) -> Result<BTreeMap<String, SettingInfo>, anyhow::Error> {
        let stored = self.db.get_all_settings()?;
        let result = DEFAULT_SETTINGS
            .values()
            .map(|def| {
                let value = stored
                    .get(def.key)
                    .cloned()
                    .unwrap_or_else(|| def.default.to_string());
                (
                    def.key.to_string(),
                    SettingInfo {
                        key: def.key.to_string(),
                        has_value: !value.is_empty(),
                        value,
                        description: def.description.to_string(),
                        is_default: !stored.contains_key(def.key),
                    },
                )
            })
            .collect();
        Ok(result)
    }

    /// Write defaults for keys missing from the DB.
    pub fn initialize_defaults(&self) -> Result<(), anyhow::Error> {
        for def in DEFAULT_SETTINGS.values() {
            if self.db.set_setting_default(def.key, def.default)? {
                tracing::debug!(key = def.key, "Initialized default setting");
            }
        }
        Ok(())
    }

    /// Copy known settings present in the environment into the DB, skipping
    /// values that fail validation.
    pub fn migrate_from_env(&self) -> Result<usize, anyhow::Error> {
        let mut migrated = 0;
        for key in DEFAULT_SETTINGS.keys() {
            let Ok(value) = std::env::var(key) else {
                continue;
            };
            if let Err(e) = validate_setting(key, &value) {
                tracing::warn!(key, "Ignoring invalid environment setting: {e}");
                continue;
            }
            self.db.set_setting(key, &value)?;
            migrated += 1;
        }
        if migrated > 0 {
            tracing::info!(migrated, "Migrated settings from environment");
        }
        Ok(migrated)
    }
}
