use uuid::Uuid;

use super::{seed_artwork, test_db};
use crate::{DbError, QrCode, Visibility};

#[test]
fn test_save_and_find_qr_code() {
    let db = test_db();
    let art = seed_artwork(&db, 1, Visibility::Public);
    let qr = QrCode::new(Uuid::new_v4(), art.id);
    db.save_qr_code(&qr).unwrap();

    let got = db.find_qr_code_by_token(&qr.token).unwrap().unwrap();
    assert_eq!(got.token, qr.token);
    assert_eq!(got.artwork_id, art.id);
    assert!(got.is_enabled);

    assert!(db.find_qr_code_by_token(&Uuid::new_v4()).unwrap().is_none());
}

#[test]
fn test_save_disables_previous_token() {
    let db = test_db();
    let art = seed_artwork(&db, 1, Visibility::Public);
    let first = db.save_qr_code(&QrCode::new(Uuid::new_v4(), art.id)).unwrap();
    let second = db.save_qr_code(&QrCode::new(Uuid::new_v4(), art.id)).unwrap();

    let first = db.find_qr_code_by_token(&first.token).unwrap().unwrap();
    assert!(!first.is_enabled);
    let active = db.find_active_qr_code(art.id).unwrap().unwrap();
    assert_eq!(active.token, second.token);

    let all = db.list_qr_codes_for_artwork(art.id).unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].token, second.token);
    assert_eq!(all.iter().filter(|q| q.is_enabled).count(), 1);
}

#[test]
fn test_duplicate_token_is_conflict_and_rolls_back() {
    let db = test_db();
    let a = seed_artwork(&db, 1, Visibility::Public);
    let b = seed_artwork(&db, 2, Visibility::Public);
    let token = Uuid::new_v4();
    db.save_qr_code(&QrCode::new(token, a.id)).unwrap();
    let b_active = db.save_qr_code(&QrCode::new(Uuid::new_v4(), b.id)).unwrap();

    let err = db.save_qr_code(&QrCode::new(token, b.id)).unwrap_err();
    assert!(matches!(err, DbError::Conflict(_)));

    // The token still belongs to artwork A and B keeps its active token.
    let owner = db.find_qr_code_by_token(&token).unwrap().unwrap();
    assert_eq!(owner.artwork_id, a.id);
    let still_active = db.find_active_qr_code(b.id).unwrap().unwrap();
    assert_eq!(still_active.token, b_active.token);
}

#[test]
fn test_partial_index_rejects_second_enabled_row() {
    let db = test_db();
    let art = seed_artwork(&db, 1, Visibility::Public);
    db.save_qr_code(&QrCode::new(Uuid::new_v4(), art.id)).unwrap();

    let result = db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO qr_codes (token, artwork_id, is_enabled, created_at) VALUES (?1, ?2, 1, ?3)",
            rusqlite::params![Uuid::new_v4().to_string(), art.id, chrono::Utc::now()],
        )?;
        Ok(())
    });
    assert!(result.is_err());
}

#[test]
fn test_disable_is_idempotent() {
    let db = test_db();
    let art = seed_artwork(&db, 1, Visibility::Public);
    assert_eq!(db.disable_qr_codes_for_artwork(art.id).unwrap(), 0);

    let qr = db.save_qr_code(&QrCode::new(Uuid::new_v4(), art.id)).unwrap();
    assert_eq!(db.disable_qr_codes_for_artwork(art.id).unwrap(), 1);
    assert_eq!(db.disable_qr_codes_for_artwork(art.id).unwrap(), 0);
    assert!(db.find_active_qr_code(art.id).unwrap().is_none());
    assert!(!db.disable_qr_code(&qr.token).unwrap());
}

#[test]
fn test_disable_single_token() {
    let db = test_db();
    let art = seed_artwork(&db, 1, Visibility::Public);
    let qr = db.save_qr_code(&QrCode::new(Uuid::new_v4(), art.id)).unwrap();
    assert!(db.disable_qr_code(&qr.token).unwrap());
    assert!(!db.find_qr_code_by_token(&qr.token).unwrap().unwrap().is_enabled);
    assert!(!db.disable_qr_code(&Uuid::new_v4()).unwrap());
}

#[test]
fn test_save_for_missing_artwork_fails() {
    let db = test_db();
    let err = db.save_qr_code(&QrCode::new(Uuid::new_v4(), 404)).unwrap_err();
    assert!(matches!(err, DbError::Sqlite(_)));
}
