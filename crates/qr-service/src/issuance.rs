//! QR issuance: one enabled token per artwork, reissue disables the old one.

use artwork_db::{ArtworkId, Database, DbError, QrCode};
use qr_render::QrEncoder;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::QrConfig;
use crate::lookup::ArtworkLookup;
use crate::storage::ImageStorage;
use crate::token::{RandomTokenGenerator, TokenGenerator};
use crate::{QrError, Result};

/// Outcome of a successful issuance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedQr {
    pub token: String,
    pub image_url: String,
}

pub struct QrIssuanceService<L, S, G = RandomTokenGenerator> {
    db: Database,
    artworks: L,
    images: S,
    generator: G,
    encoder: QrEncoder,
    config: QrConfig,
}

impl<L, S> QrIssuanceService<L, S, RandomTokenGenerator>
where
    L: ArtworkLookup,
    S: ImageStorage,
{
    /// Service using OS randomness for tokens.
    pub fn with_random_tokens(db: Database, artworks: L, images: S, config: QrConfig) -> Self {
        Self::new(db, artworks, images, RandomTokenGenerator, config)
    }
}

impl<L, S, G> QrIssuanceService<L, S, G>
where
    L: ArtworkLookup,
    S: ImageStorage,
    G: TokenGenerator,
{
    pub fn new(db: Database, artworks: L, images: S, generator: G, config: QrConfig) -> Self {
        Self {
            db,
            artworks,
            images,
            generator,
            encoder: QrEncoder::new(config.ec_level),
            config,
        }
    }

    pub fn config(&self) -> &QrConfig {
        &self.config
    }

    /// Issue a new token and QR image for `artwork_id`.
    ///
    /// Any previously active token for the artwork is disabled. If a later
    /// step fails the new token is disabled too, leaving the artwork with no
    /// active token until the next successful call.
    pub fn issue(&self, artwork_id: ArtworkId) -> Result<IssuedQr> {
        if !self.artworks.exists_by_id(artwork_id)? {
            return Err(QrError::ArtworkNotFound(artwork_id));
        }

        // Every token renders to the same payload length.
        let probe = self.config.payload_for(&Uuid::nil());
        self.encoder.check_capacity(&probe, self.config.image_size)?;

        let disabled = self.db.disable_qr_codes_for_artwork(artwork_id)?;
        let qr = self.persist_new_token(artwork_id)?;

        // A token the caller never receives must not stay resolvable.
        let image_url = match self.render_and_store(&qr) {
            Ok(url) => url,
            Err(e) => {
                warn!(artwork_id, token = %qr.token, error = %e, "QR issuance failed, disabling new token");
                if let Err(undo) = self.db.disable_qr_code(&qr.token) {
                    warn!(artwork_id, token = %qr.token, error = %undo, "Failed to disable orphaned QR token");
                }
                return Err(e);
            }
        };

        info!(
            artwork_id,
            token = %qr.token,
            disabled,
            image_url = %image_url,
            "Issued QR token"
        );

        Ok(IssuedQr {
            token: qr.token.to_string(),
            image_url,
        })
    }

    /// Disable the active token for `artwork_id`. Returns how many tokens
    /// were disabled (0 or 1).
    pub fn revoke(&self, artwork_id: ArtworkId) -> Result<usize> {
        if !self.artworks.exists_by_id(artwork_id)? {
            return Err(QrError::ArtworkNotFound(artwork_id));
        }
        let disabled = self.db.disable_qr_codes_for_artwork(artwork_id)?;
        info!(artwork_id, disabled, "Revoked QR token");
        Ok(disabled)
    }

    /// The currently enabled token for `artwork_id`, if any.
    pub fn active_token(&self, artwork_id: ArtworkId) -> Result<Option<QrCode>> {
        Ok(self.db.find_active_qr_code(artwork_id)?)
    }

    fn render_and_store(&self, qr: &QrCode) -> Result<String> {
        let payload = self.config.payload_for(&qr.token);
        let bytes = self.encoder.encode(
            &payload,
            self.config.image_size,
            self.config.image_format,
        )?;
        let file_name = format!("qr-{}.{}", qr.token, self.config.image_format.extension());
        self.images.store(&bytes, &file_name)
    }

    fn persist_new_token(&self, artwork_id: ArtworkId) -> Result<QrCode> {
        let attempts = self.config.max_generation_attempts.max(1);
        for attempt in 1..=attempts {
            let qr = QrCode::new(self.generator.generate(), artwork_id);
            match self.db.save_qr_code(&qr) {
                Ok(saved) => return Ok(saved),
                Err(DbError::Conflict(reason)) => {
                    warn!(artwork_id, attempt, %reason, "QR token collision, regenerating");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(QrError::GenerationExhausted { attempts })
    }
}
