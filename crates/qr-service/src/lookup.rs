//! Artwork lookups needed by issuance and scanning.

use artwork_db::{Artwork, ArtworkId, Database, UserId, Visibility};
use serde::{Deserialize, Serialize};

use crate::QrError;

/// Read-only view of an artwork handed to whoever scanned its code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtworkProjection {
    pub artwork_id: ArtworkId,
    pub title: String,
    pub visibility: Visibility,
    pub owner_id: UserId,
    pub media_refs: Vec<String>,
}

impl From<Artwork> for ArtworkProjection {
    fn from(a: Artwork) -> Self {
        Self {
            artwork_id: a.id,
            title: a.title,
            visibility: a.visibility,
            owner_id: a.owner_id,
            media_refs: a.media_refs,
        }
    }
}

/// Artwork collaborator. The projection carries visibility and owner, so a
/// single lookup serves the scan policy.
pub trait ArtworkLookup: Send + Sync {
    fn exists_by_id(&self, id: ArtworkId) -> Result<bool, QrError>;

    fn find_projection(&self, id: ArtworkId) -> Result<Option<ArtworkProjection>, QrError>;
}

impl ArtworkLookup for Database {
    fn exists_by_id(&self, id: ArtworkId) -> Result<bool, QrError> {
        Ok(self.artwork_exists(id)?)
    }

    fn find_projection(&self, id: ArtworkId) -> Result<Option<ArtworkProjection>, QrError> {
        Ok(self.get_artwork(id)?.map(ArtworkProjection::from))
    }
}
