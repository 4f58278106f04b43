//! Artwork records consulted by QR issuance and scanning.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::{Database, DbError};

pub type ArtworkId = i64;
pub type UserId = i64;

/// Artwork-level access policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "PUBLIC",
            Self::Private => "PRIVATE",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Visibility {
    type Err = DbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PUBLIC" => Ok(Self::Public),
            "PRIVATE" => Ok(Self::Private),
            other => Err(DbError::InvalidData(format!("unknown visibility: {other}"))),
        }
    }
}

impl ToSql for Visibility {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Visibility {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e: DbError| FromSqlError::Other(Box::new(e)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artwork {
    pub id: ArtworkId,
    pub owner_id: UserId,
    pub title: String,
    pub description: Option<String>,
    pub visibility: Visibility,
    pub media_refs: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied when creating an artwork.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewArtwork {
    pub owner_id: UserId,
    pub title: String,
    pub description: Option<String>,
    pub visibility: Visibility,
    pub media_refs: Vec<String>,
}

const ARTWORK_COLUMNS: &str =
    "id, owner_id, title, description, visibility, media_refs, created_at, updated_at";

fn row_to_artwork(row: &Row<'_>) -> rusqlite::Result<Artwork> {
    let media_json: String = row.get(5)?;
    Ok(Artwork {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        visibility: row.get(4)?,
        media_refs: serde_json::from_str(&media_json).unwrap_or_default(),
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

impl Database {
    pub fn create_artwork(&self, new: &NewArtwork) -> Result<Artwork, DbError> {
        if new.title.trim().is_empty() {
            return Err(DbError::InvalidData("artwork title must not be empty".into()));
        }
        let now = Utc::now();
        let media_json = serde_json::to_string(&new.media_refs).unwrap_or_else(|_| "[]".into());
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO artworks (owner_id, title, description, visibility, media_refs, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
                rusqlite::params![
                    new.owner_id,
                    new.title,
                    new.description,
                    new.visibility,
                    media_json,
                    now,
                ],
            )?;
            Ok(Artwork {
                id: conn.last_insert_rowid(),
                owner_id: new.owner_id,
                title: new.title.clone(),
                description: new.description.clone(),
                visibility: new.visibility,
                media_refs: new.media_refs.clone(),
                created_at: now,
                updated_at: now,
            })
        })
    }

    pub fn get_artwork(&self, id: ArtworkId) -> Result<Option<Artwork>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {ARTWORK_COLUMNS} FROM artworks WHERE id = ?1"
            ))?;
            let artwork = stmt.query_row([id], row_to_artwork).optional()?;
            Ok(artwork)
        })
    }

    pub fn artwork_exists(&self, id: ArtworkId) -> Result<bool, DbError> {
        self.with_conn(|conn| {
            let exists: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM artworks WHERE id = ?1)",
                [id],
                |row| row.get(0),
            )?;
            Ok(exists)
        })
    }

    pub fn get_artworks_by_owner(&self, owner_id: UserId) -> Result<Vec<Artwork>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {ARTWORK_COLUMNS} FROM artworks WHERE owner_id = ?1 ORDER BY id"
            ))?;
            let rows = stmt.query_map([owner_id], row_to_artwork)?;
            rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
        })
    }

    pub fn update_artwork_visibility(
        &self,
        id: ArtworkId,
        visibility: Visibility,
    ) -> Result<(), DbError> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE artworks SET visibility = ?1, updated_at = ?2 WHERE id = ?3",
                rusqlite::params![visibility, Utc::now(), id],
            )?;
            if changed == 0 {
                return Err(DbError::NotFound(format!("artwork {id}")));
            }
            Ok(())
        })
    }

    /// Delete an artwork. Its QR tokens are disabled first and then removed
    /// by the `ON DELETE CASCADE` foreign key, all in one transaction.
    ///
    /// Returns `false` when no artwork had that id.
    pub fn delete_artwork(&self, id: ArtworkId) -> Result<bool, DbError> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let disabled = tx.execute(
                "UPDATE qr_codes SET is_enabled = 0 WHERE artwork_id = ?1 AND is_enabled = 1",
                [id],
            )?;
            let deleted = tx.execute("DELETE FROM artworks WHERE id = ?1", [id])?;
            tx.commit()?;
            if deleted > 0 {
                tracing::info!(artwork_id = id, disabled, "Deleted artwork");
            }
            Ok(deleted > 0)
        })
    }
}
