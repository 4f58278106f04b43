//! QR scan resolution.
//!
//! Every rejection that could reveal whether a token exists (never issued,
//! disabled, private artwork) is reported as [`QrError::QrNotFound`]. The
//! actual reason is only logged.

use artwork_db::{Database, Visibility};
use tracing::debug;
use uuid::Uuid;

use crate::lookup::{ArtworkLookup, ArtworkProjection};
use crate::{Caller, QrError, Result};

pub struct QrScanService<L> {
    db: Database,
    artworks: L,
}

impl<L: ArtworkLookup> QrScanService<L> {
    pub fn new(db: Database, artworks: L) -> Self {
        Self { db, artworks }
    }

    /// Resolve a token to the artwork it points at.
    pub fn validate_and_resolve(&self, token: Uuid, caller: &Caller) -> Result<ArtworkProjection> {
        let Some(qr) = self.db.find_qr_code_by_token(&token)? else {
            debug!(%token, "Scan rejected: unknown token");
            return Err(QrError::QrNotFound);
        };
        if !qr.is_enabled {
            debug!(%token, artwork_id = qr.artwork_id, "Scan rejected: token disabled");
            return Err(QrError::QrNotFound);
        }

        let artwork = self
            .artworks
            .find_projection(qr.artwork_id)?
            .ok_or(QrError::ArtworkNotFound(qr.artwork_id))?;

        if artwork.visibility == Visibility::Private && !caller.is(artwork.owner_id) {
            debug!(
                %token,
                artwork_id = artwork.artwork_id,
                caller = ?caller.user_id,
                "Scan rejected: private artwork"
            );
            return Err(QrError::QrNotFound);
        }

        Ok(artwork)
    }

    /// Same as [`Self::validate_and_resolve`] for a raw scanned string.
    /// Anything that is not a UUID is treated as an unknown token.
    pub fn validate_and_resolve_str(&self, raw: &str, caller: &Caller) -> Result<ArtworkProjection> {
        match Uuid::parse_str(raw.trim()) {
            Ok(token) => self.validate_and_resolve(token, caller),
            Err(_) => {
                debug!(len = raw.len(), "Scan rejected: malformed token");
                Err(QrError::QrNotFound)
            }
        }
    }
}
