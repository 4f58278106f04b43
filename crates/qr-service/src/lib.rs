//! QR issuance and scan services for artworks.
//!
//! [`QrIssuanceService`] hands out a fresh token and image for an artwork,
//! keeping at most one token enabled per artwork. [`QrScanService`] resolves
//! a presented token back to a displayable artwork projection. Collaborators
//! (artwork lookup, image storage, token generation) are passed in at
//! construction.

pub mod config;
pub mod issuance;
pub mod lookup;
pub mod scan;
pub mod storage;
pub mod token;

#[cfg(test)]
mod tests;

use artwork_db::{ArtworkId, DbError, UserId};
use qr_render::EncodeError;

pub use config::QrConfig;
pub use issuance::{IssuedQr, QrIssuanceService};
pub use lookup::{ArtworkLookup, ArtworkProjection};
pub use scan::QrScanService;
pub use storage::{ImageStorage, LocalImageStorage};
pub use token::{RandomTokenGenerator, TokenGenerator};

/// Identity of whoever is presenting a token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Caller {
    pub user_id: Option<UserId>,
}

impl Caller {
    pub fn anonymous() -> Self {
        Self { user_id: None }
    }

    pub fn user(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
        }
    }

    pub fn is(&self, user_id: UserId) -> bool {
        self.user_id == Some(user_id)
    }
}

/// Errors surfaced by QR issuance and scanning.
///
/// Unknown, disabled and hidden tokens all map to [`QrError::QrNotFound`].
#[derive(Debug, thiserror::Error)]
pub enum QrError {
    #[error("Artwork not found: {0}")]
    ArtworkNotFound(ArtworkId),

    #[error("QR code not found")]
    QrNotFound,

    #[error("Token generation failed after {attempts} attempts")]
    GenerationExhausted { attempts: u32 },

    #[error("Encoding error: {0}")]
    Encoding(#[from] EncodeError),

    #[error("Storage error: {0}")]
    Storage(#[from] DbError),

    #[error("Image storage error: {0}")]
    ImageStorage(String),
}

/// Result type alias for QR service operations.
pub type Result<T> = std::result::Result<T, QrError>;
