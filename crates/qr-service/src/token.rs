//! Token generation.

use rand::RngCore;
use rand::rngs::OsRng;
use uuid::Uuid;

/// Source of new QR tokens.
pub trait TokenGenerator: Send + Sync {
    fn generate(&self) -> Uuid;
}

/// 128 bits from the operating system RNG, stamped as a version 4 UUID.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomTokenGenerator;

impl TokenGenerator for RandomTokenGenerator {
    fn generate(&self) -> Uuid {
        let mut bytes = [0u8; 16];
        OsRng.fill_bytes(&mut bytes);
        uuid::Builder::from_random_bytes(bytes).into_uuid()
    }
}
