//! Collaborator doubles for service tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use artwork_db::{ArtworkId, Database};
use uuid::Uuid;

use crate::lookup::{ArtworkLookup, ArtworkProjection};
use crate::storage::ImageStorage;
use crate::token::{RandomTokenGenerator, TokenGenerator};
use crate::QrError;

/// Keeps stored images in memory.
#[derive(Clone, Default)]
pub struct MemoryImageStorage {
    pub files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    pub should_fail: bool,
}

impl MemoryImageStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    pub fn get(&self, file_name: &str) -> Option<Vec<u8>> {
        self.files.lock().unwrap().get(file_name).cloned()
    }

    pub fn len(&self) -> usize {
        self.files.lock().unwrap().len()
    }
}

impl ImageStorage for MemoryImageStorage {
    fn store(&self, bytes: &[u8], file_name: &str) -> Result<String, QrError> {
        if self.should_fail {
            return Err(QrError::ImageStorage("bucket unavailable".into()));
        }
        self.files
            .lock()
            .unwrap()
            .insert(file_name.to_string(), bytes.to_vec());
        Ok(format!("https://cdn.example/qr/{file_name}"))
    }
}

/// Hands out scripted tokens first, then random ones.
#[derive(Clone, Default)]
pub struct ScriptedTokens {
    pub queue: Arc<Mutex<VecDeque<Uuid>>>,
}

impl ScriptedTokens {
    pub fn new(tokens: impl IntoIterator<Item = Uuid>) -> Self {
        Self {
            queue: Arc::new(Mutex::new(tokens.into_iter().collect())),
        }
    }
}

impl TokenGenerator for ScriptedTokens {
    fn generate(&self) -> Uuid {
        self.queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| RandomTokenGenerator.generate())
    }
}

/// Always returns the same token.
pub struct StuckTokens(pub Uuid);

impl TokenGenerator for StuckTokens {
    fn generate(&self) -> Uuid {
        self.0
    }
}

/// Reports artworks as existing but fails to resolve them, as if the
/// artwork row vanished without its QR rows.
pub struct VanishedArtworks(pub Database);

impl ArtworkLookup for VanishedArtworks {
    fn exists_by_id(&self, id: ArtworkId) -> Result<bool, QrError> {
        self.0.exists_by_id(id)
    }

    fn find_projection(&self, _id: ArtworkId) -> Result<Option<ArtworkProjection>, QrError> {
        Ok(None)
    }
}
