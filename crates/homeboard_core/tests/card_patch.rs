use homeboard_core::db::open_db_in_memory;
use homeboard_core::{
    BadgeDto, CardDto, CardService, PatchOp, PatchOperation, ServiceError, SqliteCardRepository,
};
use rusqlite::Connection;
use serde_json::{json, Value};

fn experience_dto() -> CardDto {
    CardDto {
        title: "Experience Summary".to_string(),
        image: Some("work.jpg".to_string()),
        country: Some("South Africa".to_string()),
        description: Some("Graduate software developer".to_string()),
        badges: vec![BadgeDto {
            id: 0,
            emoji: "🎓".to_string(),
            label: "Graduate".to_string(),
        }],
        ..CardDto::default()
    }
}

fn replace(path: &str, value: Value) -> PatchOperation {
    PatchOperation {
        op: PatchOp::Replace,
        path: path.to_string(),
        value: Some(value),
    }
}

fn seed_card(conn: &mut Connection) -> CardDto {
    let mut service = CardService::new(SqliteCardRepository::new(conn));
    service.create_card(&experience_dto()).unwrap()
}

#[test]
fn patch_replaces_one_field_and_keeps_identity() {
    let mut conn = open_db_in_memory().unwrap();
    let created = seed_card(&mut conn);

    let patched = {
        let mut service = CardService::new(SqliteCardRepository::new(&mut conn));
        service
            .patch_card(created.id, &[replace("/image", json!("new.jpg"))])
            .unwrap()
            .unwrap()
    };

    assert_eq!(patched.id, created.id);
    assert_eq!(patched.image.as_deref(), Some("new.jpg"));
    assert_eq!(patched.title, created.title);
    assert_eq!(patched.country, created.country);
    assert_eq!(patched.badges.len(), 1);

    // The merged state is what got persisted.
    let service = CardService::new(SqliteCardRepository::new(&mut conn));
    let reloaded = service.get_card(created.id).unwrap().unwrap();
    assert_eq!(reloaded, patched);
}

#[test]
fn patch_missing_card_returns_none() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = CardService::new(SqliteCardRepository::new(&mut conn));

    let result = service
        .patch_card(41, &[replace("/image", json!("x.jpg"))])
        .unwrap();
    assert!(result.is_none());
}

#[test]
fn ordered_patch_ops_build_on_each_other() {
    let mut conn = open_db_in_memory().unwrap();
    let created = seed_card(&mut conn);

    let ops = [
        PatchOperation {
            op: PatchOp::Add,
            path: "/badges/-".to_string(),
            value: Some(json!({"id": 0, "emoji": "🛒", "label": "Sales"})),
        },
        replace("/badges/1/label", json!("Retail Sales")),
        PatchOperation {
            op: PatchOp::Remove,
            path: "/badges/0".to_string(),
            value: None,
        },
    ];

    let mut service = CardService::new(SqliteCardRepository::new(&mut conn));
    let patched = service.patch_card(created.id, &ops).unwrap().unwrap();
    assert_eq!(patched.badges.len(), 1);
    assert!(patched.badges[0].id > 0);
    assert_eq!(patched.badges[0].emoji, "🛒");
    assert_eq!(patched.badges[0].label, "Retail Sales");
}

#[test]
fn patch_with_one_invalid_op_persists_no_changes() {
    let mut conn = open_db_in_memory().unwrap();
    let created = seed_card(&mut conn);

    {
        let mut service = CardService::new(SqliteCardRepository::new(&mut conn));
        let ops = [
            replace("/image", json!("should-not-stick.jpg")),
            replace("/no/such/field", json!(1)),
        ];
        let err = service.patch_card(created.id, &ops).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidPatch(_)));
    }

    let service = CardService::new(SqliteCardRepository::new(&mut conn));
    let reloaded = service.get_card(created.id).unwrap().unwrap();
    assert_eq!(reloaded, created);
}

#[test]
fn patch_may_not_change_identity() {
    let mut conn = open_db_in_memory().unwrap();
    let created = seed_card(&mut conn);

    {
        let mut service = CardService::new(SqliteCardRepository::new(&mut conn));
        let err = service
            .patch_card(created.id, &[replace("/id", json!(created.id + 10))])
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::IdentityMismatch { route_id, payload_id }
                if route_id == created.id && payload_id == created.id + 10
        ));

        // Writing the same id back is a no-op, not a violation.
        let patched = service
            .patch_card(created.id, &[replace("/id", json!(created.id))])
            .unwrap()
            .unwrap();
        assert_eq!(patched.id, created.id);
    }

    let service = CardService::new(SqliteCardRepository::new(&mut conn));
    let reloaded = service.get_card(created.id).unwrap().unwrap();
    assert_eq!(reloaded.id, created.id);
}

#[test]
fn patch_add_of_unknown_field_is_rejected_and_persists_nothing() {
    let mut conn = open_db_in_memory().unwrap();
    let created = seed_card(&mut conn);

    {
        let mut service = CardService::new(SqliteCardRepository::new(&mut conn));
        // Neither a top-level nor a nested stray key maps to a DTO field;
        // both must fail loudly instead of being dropped on deserialization.
        for path in ["/nickname", "/badges/0/nickname"] {
            let ops = [PatchOperation {
                op: PatchOp::Add,
                path: path.to_string(),
                value: Some(json!("ghost")),
            }];
            let err = service.patch_card(created.id, &ops).unwrap_err();
            assert!(
                matches!(err, ServiceError::InvalidPatch(_)),
                "path `{path}` produced {err:?}"
            );
        }
    }

    let service = CardService::new(SqliteCardRepository::new(&mut conn));
    let reloaded = service.get_card(created.id).unwrap().unwrap();
    assert_eq!(reloaded, created);
}

#[test]
fn patch_value_of_wrong_shape_is_an_invalid_patch() {
    let mut conn = open_db_in_memory().unwrap();
    let created = seed_card(&mut conn);

    let mut service = CardService::new(SqliteCardRepository::new(&mut conn));
    // `badges` must stay an array of badge objects.
    let err = service
        .patch_card(created.id, &[replace("/badges", json!("nope"))])
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidPatch(_)));
}
