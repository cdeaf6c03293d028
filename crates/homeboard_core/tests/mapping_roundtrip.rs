use homeboard_core::{
    card_from_dto, card_to_dto, carousel_to_dto, merge_card_dto, Badge, Card, Carousel,
    CarouselImage,
};

fn two_badge_card() -> Card {
    let mut card = Card::new("Experience Summary");
    card.id = 5;
    card.image = Some("work.jpg".to_string());
    card.country = Some("South Africa".to_string());
    card.badges = vec![
        Badge {
            id: 21,
            emoji: "🎓".to_string(),
            label: "Graduate".to_string(),
            card_id: 5,
        },
        Badge {
            id: 22,
            emoji: "💻".to_string(),
            label: "Intern".to_string(),
            card_id: 5,
        },
    ];
    card
}

#[test]
fn card_survives_entity_dto_entity_roundtrip() {
    let original = two_badge_card();
    let dto = card_to_dto(&original);

    // Reverse direction through the merge path, onto a same-identity shell.
    let mut rebuilt = Card::new("placeholder");
    rebuilt.id = original.id;
    merge_card_dto(&dto, &mut rebuilt);

    assert_eq!(rebuilt, original);
    assert_eq!(rebuilt.badges.len(), 2);
}

#[test]
fn create_direction_drops_identity_but_keeps_field_values() {
    let dto = card_to_dto(&two_badge_card());
    let entity = card_from_dto(&dto);

    assert_eq!(entity.id, 0);
    assert_eq!(entity.title, "Experience Summary");
    assert_eq!(entity.country.as_deref(), Some("South Africa"));
    assert_eq!(entity.badges.len(), 2);
    assert_eq!(entity.badges[0].id, 21);
    assert!(entity.badges.iter().all(|badge| badge.card_id == 0));
}

#[test]
fn carousel_dto_serializes_with_camel_case_url_list() {
    let mut carousel = Carousel::new("HomeImages");
    carousel.id = 2;
    carousel.images = vec![CarouselImage {
        id: 9,
        image_urls: vec!["a.jpg".to_string(), "b.jpg".to_string()],
        carousel_id: 2,
    }];

    let json = serde_json::to_value(carousel_to_dto(&carousel)).unwrap();
    assert_eq!(json["id"], 2);
    assert_eq!(json["images"][0]["imageUrls"][1], "b.jpg");
}
