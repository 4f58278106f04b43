//! QR token storage.
//!
//! An artwork has at most one enabled token. [`Database::save_qr_code`]
//! disables the previous token and inserts the new one in a single
//! transaction, and the partial unique index `idx_qr_codes_active_artwork`
//! rejects any write that would leave two enabled rows behind.

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::artworks::ArtworkId;
use crate::{Database, DbError, is_primary_key_violation};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrCode {
    pub token: Uuid,
    pub artwork_id: ArtworkId,
    pub is_enabled: bool,
    pub created_at: DateTime<Utc>,
}

impl QrCode {
    /// A newly issued, enabled token stamped with the current time.
    pub fn new(token: Uuid, artwork_id: ArtworkId) -> Self {
        Self {
            token,
            artwork_id,
            is_enabled: true,
            created_at: Utc::now(),
        }
    }
}

const QR_COLUMNS: &str = "token, artwork_id, is_enabled, created_at";

fn row_to_qr_code(row: &Row<'_>) -> rusqlite::Result<QrCode> {
    let raw: String = row.get(0)?;
    let token = Uuid::parse_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))?;
    Ok(QrCode {
        token,
        artwork_id: row.get(1)?,
        is_enabled: row.get(2)?,
        created_at: row.get(3)?,
    })
}

impl Database {
    /// Persist a token row.
    ///
    /// When the row is enabled, every other enabled token of the same artwork
    /// is disabled in the same transaction. A token that already exists is
    /// reported as [`DbError::Conflict`] and nothing is changed.
    pub fn save_qr_code(&self, qr: &QrCode) -> Result<QrCode, DbError> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            if qr.is_enabled {
                tx.execute(
                    "UPDATE qr_codes SET is_enabled = 0 WHERE artwork_id = ?1 AND is_enabled = 1",
                    [qr.artwork_id],
                )?;
            }
            let inserted = tx.execute(
                "INSERT INTO qr_codes (token, artwork_id, is_enabled, created_at) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![qr.token.to_string(), qr.artwork_id, qr.is_enabled, qr.created_at],
            );
            match inserted {
                Ok(_) => {}
                Err(e) if is_primary_key_violation(&e) => {
                    return Err(DbError::Conflict(format!("token {} already issued", qr.token)));
                }
                Err(e) => return Err(e.into()),
            }
            tx.commit()?;
            Ok(qr.clone())
        })
    }

    pub fn find_qr_code_by_token(&self, token: &Uuid) -> Result<Option<QrCode>, DbError> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {QR_COLUMNS} FROM qr_codes WHERE token = ?1"))?;
            let qr = stmt
                .query_row([token.to_string()], row_to_qr_code)
                .optional()?;
            Ok(qr)
        })
    }

    pub fn find_active_qr_code(&self, artwork_id: ArtworkId) -> Result<Option<QrCode>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {QR_COLUMNS} FROM qr_codes WHERE artwork_id = ?1 AND is_enabled = 1"
            ))?;
            let qr = stmt.query_row([artwork_id], row_to_qr_code).optional()?;
            Ok(qr)
        })
    }

    /// All tokens ever issued for an artwork, newest first.
    pub fn list_qr_codes_for_artwork(&self, artwork_id: ArtworkId) -> Result<Vec<QrCode>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {QR_COLUMNS} FROM qr_codes WHERE artwork_id = ?1
                 ORDER BY created_at DESC, rowid DESC"
            ))?;
            let rows = stmt.query_map([artwork_id], row_to_qr_code)?;
            rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
        })
    }

    /// Disable the active token of an artwork, if any. Returns the number of
    /// rows changed; zero is not an error.
    pub fn disable_qr_codes_for_artwork(&self, artwork_id: ArtworkId) -> Result<usize, DbError> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE qr_codes SET is_enabled = 0 WHERE artwork_id = ?1 AND is_enabled = 1",
                [artwork_id],
            )?;
            Ok(changed)
        })
    }

    /// Disable a single token. Returns `false` if it was unknown or already
    /// disabled.
    pub fn disable_qr_code(&self, token: &Uuid) -> Result<bool, DbError> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE qr_codes SET is_enabled = 0 WHERE token = ?1 AND is_enabled = 1",
                [token.to_string()],
            )?;
            Ok(changed > 0)
        })
    }
}
