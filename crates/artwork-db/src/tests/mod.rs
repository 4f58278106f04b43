use crate::{Artwork, Database, NewArtwork, Visibility};

fn test_db() -> Database {
    Database::open_in_memory().expect("Failed to create test DB")
}

fn seed_artwork(db: &Database, owner_id: i64, visibility: Visibility) -> Artwork {
    db.create_artwork(&NewArtwork {
        owner_id,
        title: format!("artwork by {owner_id}"),
        description: None,
        visibility,
        media_refs: vec!["models/scene.glb".into()],
    })
    .expect("Failed to seed artwork")
}

mod qr_codes;
