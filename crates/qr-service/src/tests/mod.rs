use artwork_db::{Artwork, Database, NewArtwork, Visibility};

use crate::QrConfig;

mod mocks;

fn test_db() -> Database {
    Database::open_in_memory().expect("Failed to create test DB")
}

fn seed_artwork(db: &Database, owner_id: i64, visibility: Visibility) -> Artwork {
    db.create_artwork(&NewArtwork {
        owner_id,
        title: format!("Sculpture #{owner_id}"),
        description: Some("AR piece".into()),
        visibility,
        media_refs: vec!["scenes/main.glb".into(), "thumbs/main.png".into()],
    })
    .expect("Failed to seed artwork")
}

fn test_config() -> QrConfig {
    QrConfig::new()
        .with_deep_link_base("https://art.example/scan?token=")
        .with_image_size(128)
}

/// Insert an artwork with a fixed id, for scenarios that name one.
fn seed_artwork_with_id(db: &Database, id: i64, owner_id: i64, visibility: Visibility) {
    db.with_conn(|conn| {
        conn.execute_batch(&format!(
            "INSERT INTO artworks (id, owner_id, title, visibility, media_refs, created_at, updated_at)
             VALUES ({id}, {owner_id}, 'Artwork {id}', '{}', '[\"scenes/{id}.glb\"]',
                     '2026-01-01 00:00:00+00:00', '2026-01-01 00:00:00+00:00')",
            visibility.as_str()
        ))?;
        Ok(())
    })
    .expect("Failed to seed artwork with id");
}
