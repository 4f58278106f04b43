//! Database schema definitions and migrations.

use rusqlite::Connection;

use crate::DbError;

pub fn run_migrations(conn: &Connection) -> Result<(), DbError> {
    conn.execute_batch(SCHEMA)?;
    migrate_qr_codes_indexes(conn)?;
    Ok(())
}

/// Databases created before the single-active index existed may hold several
/// enabled rows per artwork. Keep only the newest one enabled, then build the
/// index.
fn migrate_qr_codes_indexes(conn: &Connection) -> Result<(), DbError> {
    if index_exists(conn, "idx_qr_codes_active_artwork")? {
        return Ok(());
    }
    tracing::info!("Creating single-active index on qr_codes");
    let demoted = conn.execute(
        "UPDATE qr_codes SET is_enabled = 0
         WHERE is_enabled = 1
           AND rowid NOT IN (
               SELECT MAX(rowid) FROM qr_codes WHERE is_enabled = 1 GROUP BY artwork_id
           )",
        [],
    )?;
    if demoted > 0 {
        tracing::warn!(demoted, "Disabled duplicate active QR tokens");
    }
    conn.execute_batch(
        "CREATE UNIQUE INDEX idx_qr_codes_active_artwork
             ON qr_codes(artwork_id) WHERE is_enabled = 1;",
    )?;
    Ok(())
}

fn index_exists(conn: &Connection, name: &str) -> Result<bool, DbError> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'index' AND name = ?1)",
        [name],
        |row| row.get(0),
    )?;
    Ok(exists)
}

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS settings (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS artworks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    owner_id INTEGER NOT NULL,
    title TEXT NOT NULL,
    description TEXT,
    visibility TEXT NOT NULL DEFAULT 'PUBLIC' CHECK (visibility IN ('PUBLIC', 'PRIVATE')),
    media_refs TEXT NOT NULL DEFAULT '[]',
    created_at TIMESTAMP NOT NULL,
    updated_at TIMESTAMP NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_artworks_owner ON artworks(owner_id);

CREATE TABLE IF NOT EXISTS qr_codes (
    token TEXT PRIMARY KEY,
    artwork_id INTEGER NOT NULL,
    is_enabled BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMP NOT NULL,
    FOREIGN KEY (artwork_id) REFERENCES artworks(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_qr_codes_artwork ON qr_codes(artwork_id);
"#;
