//! Transfer shapes and the entity<->DTO field correspondence.
//!
//! # Responsibility
//! - Define the wire-visible Card/Carousel DTOs (camelCase JSON).
//! - Provide the declarative bidirectional mapping used by services.
//!
//! # Invariants
//! - The DTO `id` is echoed on reads and ignored on create mapping; identity
//!   is never accepted from a create payload.
//! - Child surrogate keys survive the reverse direction when present.
//! - Child foreign keys are owned by the parent being mapped; a DTO can
//!   never reattach a child to a different parent.

use crate::model::content::{Badge, Card, Carousel, CarouselImage, ContentId};
use serde::{Deserialize, Serialize};

/// Wire shape for a card and its badges.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CardDto {
    pub id: ContentId,
    pub title: String,
    pub image: Option<String>,
    pub country: Option<String>,
    pub description: Option<String>,
    pub badges: Vec<BadgeDto>,
}

/// Wire shape for one badge. The owning card id is implied by nesting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BadgeDto {
    pub id: i64,
    pub emoji: String,
    pub label: String,
}

/// Wire shape for a carousel and its image rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CarouselDto {
    pub id: ContentId,
    pub title: String,
    pub images: Vec<CarouselImageDto>,
}

/// Wire shape for one carousel image row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CarouselImageDto {
    pub id: i64,
    pub image_urls: Vec<String>,
}

/// Projects a card entity to its transfer shape.
pub fn card_to_dto(card: &Card) -> CardDto {
    CardDto {
        id: card.id,
        title: card.title.clone(),
        image: card.image.clone(),
        country: card.country.clone(),
        description: card.description.clone(),
        badges: card.badges.iter().map(badge_to_dto).collect(),
    }
}

/// Projects one badge entity to its transfer shape.
pub fn badge_to_dto(badge: &Badge) -> BadgeDto {
    BadgeDto {
        id: badge.id,
        emoji: badge.emoji.clone(),
        label: badge.label.clone(),
    }
}

/// Builds a fresh entity from a create payload.
///
/// The DTO `id` is deliberately not copied: identity is assigned by storage
/// on insert. Child ids are kept when positive so re-submitted children keep
/// their surrogate keys; foreign keys stay `0` until the repository binds
/// them to the persisted parent.
pub fn card_from_dto(dto: &CardDto) -> Card {
    Card {
        id: 0,
        title: dto.title.clone(),
        image: dto.image.clone(),
        country: dto.country.clone(),
        description: dto.description.clone(),
        badges: dto.badges.iter().map(|badge| badge_from_dto(badge, 0)).collect(),
    }
}

/// Overwrites an existing card entity with the DTO state, field by field.
///
/// The entity keeps its own `id` regardless of the DTO value; children are
/// rebuilt from the DTO with their foreign keys re-pointed at this parent.
pub fn merge_card_dto(dto: &CardDto, card: &mut Card) {
    card.title = dto.title.clone();
    card.image = dto.image.clone();
    card.country = dto.country.clone();
    card.description = dto.description.clone();
    card.badges = dto
        .badges
        .iter()
        .map(|badge| badge_from_dto(badge, card.id))
        .collect();
}

fn badge_from_dto(dto: &BadgeDto, card_id: ContentId) -> Badge {
    Badge {
        id: dto.id.max(0),
        emoji: dto.emoji.clone(),
        label: dto.label.clone(),
        card_id,
    }
}

/// Projects a carousel entity to its transfer shape.
pub fn carousel_to_dto(carousel: &Carousel) -> CarouselDto {
    CarouselDto {
        id: carousel.id,
        title: carousel.title.clone(),
        images: carousel
            .images
            .iter()
            .map(|image| CarouselImageDto {
                id: image.id,
                image_urls: image.image_urls.clone(),
            })
            .collect(),
    }
}

/// Builds a fresh carousel entity from a create payload.
pub fn carousel_from_dto(dto: &CarouselDto) -> Carousel {
    Carousel {
        id: 0,
        title: dto.title.clone(),
        images: dto
            .images
            .iter()
            .map(|image| carousel_image_from_dto(image, 0))
            .collect(),
    }
}

/// Overwrites an existing carousel entity with the DTO state.
pub fn merge_carousel_dto(dto: &CarouselDto, carousel: &mut Carousel) {
    carousel.title = dto.title.clone();
    carousel.images = dto
        .images
        .iter()
        .map(|image| carousel_image_from_dto(image, carousel.id))
        .collect();
}

fn carousel_image_from_dto(dto: &CarouselImageDto, carousel_id: ContentId) -> CarouselImage {
    CarouselImage {
        id: dto.id.max(0),
        image_urls: dto.image_urls.clone(),
        carousel_id,
    }
}

#[cfg(test)]
mod tests {
    use super::{card_from_dto, card_to_dto, merge_card_dto, CardDto};
    use crate::model::content::{Badge, Card};

    fn sample_card() -> Card {
        Card {
            id: 3,
            title: "Experience Summary".to_string(),
            image: Some("work.jpg".to_string()),
            country: Some("South Africa".to_string()),
            description: None,
            badges: vec![
                Badge {
                    id: 10,
                    emoji: "🎓".to_string(),
                    label: "Graduate".to_string(),
                    card_id: 3,
                },
                Badge {
                    id: 11,
                    emoji: "💻".to_string(),
                    label: "Intern".to_string(),
                    card_id: 3,
                },
            ],
        }
    }

    #[test]
    fn entity_to_dto_echoes_ids_and_children() {
        let dto = card_to_dto(&sample_card());
        assert_eq!(dto.id, 3);
        assert_eq!(dto.badges.len(), 2);
        assert_eq!(dto.badges[0].id, 10);
        assert_eq!(dto.badges[1].emoji, "💻");
    }

    #[test]
    fn create_mapping_ignores_dto_id() {
        let mut dto = card_to_dto(&sample_card());
        dto.id = 99;
        let entity = card_from_dto(&dto);
        assert_eq!(entity.id, 0);
        // Child surrogate keys survive, foreign keys wait for the repository.
        assert_eq!(entity.badges[0].id, 10);
        assert_eq!(entity.badges[0].card_id, 0);
    }

    #[test]
    fn merge_preserves_entity_identity_and_repoints_children() {
        let mut card = sample_card();
        let dto = CardDto {
            id: 42,
            title: "Replaced".to_string(),
            badges: vec![super::BadgeDto {
                id: 0,
                emoji: "🛒".to_string(),
                label: "Sales".to_string(),
            }],
            ..CardDto::default()
        };

        merge_card_dto(&dto, &mut card);
        assert_eq!(card.id, 3);
        assert_eq!(card.title, "Replaced");
        assert_eq!(card.badges.len(), 1);
        assert_eq!(card.badges[0].card_id, 3);
        assert!(card.image.is_none());
    }
}
