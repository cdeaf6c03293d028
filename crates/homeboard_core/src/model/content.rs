//! Card/Carousel content entities.
//!
//! # Responsibility
//! - Define the two concrete content kinds sharing the base id+title shape.
//! - Provide write-path validation for parent/child consistency.
//!
//! # Invariants
//! - `id == 0` means "not yet persisted"; storage assigns the real id on
//!   insert and it never changes afterwards.
//! - A child's foreign key is either `0` (unassigned) or the id of the
//!   parent it is carried by. Repositories re-point it at commit time.
//! - The discriminator (`ContentKind`) is set once at creation.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Surrogate integer key shared by all rows in `content_items`.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type ContentId = i64;

/// Persisted discriminator for the single content table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    /// Titled card with optional image/country/description and badges.
    Card,
    /// Titled image carousel.
    Carousel,
}

/// Validation failures raised before any storage access on write paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentValidationError {
    /// `title` must be non-empty for both content kinds.
    EmptyTitle,
    /// Badge `emoji` must be non-empty.
    EmptyBadgeEmoji,
    /// Badge `label` must be non-empty.
    EmptyBadgeLabel,
    /// A child row claims a foreign key pointing at a different parent.
    ForeignParent {
        child: &'static str,
        parent_id: ContentId,
        child_fk: ContentId,
    },
}

impl Display for ContentValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::EmptyBadgeEmoji => write!(f, "badge emoji must not be empty"),
            Self::EmptyBadgeLabel => write!(f, "badge label must not be empty"),
            Self::ForeignParent {
                child,
                parent_id,
                child_fk,
            } => write!(
                f,
                "{child} belongs to parent {child_fk}, cannot be written under parent {parent_id}"
            ),
        }
    }
}

impl Error for ContentValidationError {}

/// Card entity: base id+title plus card-only optional columns and badges.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Stable surrogate key. `0` until persisted.
    pub id: ContentId,
    pub title: String,
    pub image: Option<String>,
    pub country: Option<String>,
    pub description: Option<String>,
    /// Owned children; created/replaced/removed atomically with the card.
    pub badges: Vec<Badge>,
}

/// Badge child row, owned by exactly one card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    /// Stable surrogate key. `0` until persisted.
    pub id: i64,
    pub emoji: String,
    pub label: String,
    /// Foreign key to the owning card. `0` until the parent id is known.
    pub card_id: ContentId,
}

/// Carousel entity: base id+title plus owned image rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Carousel {
    /// Stable surrogate key. `0` until persisted.
    pub id: ContentId,
    pub title: String,
    /// Owned children; created/replaced/removed atomically with the carousel.
    pub images: Vec<CarouselImage>,
}

/// Carousel image child row, owned by exactly one carousel.
///
/// `image_urls` is list-valued: the row historically stores one serialized
/// blob of urls, persisted here as a JSON array column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarouselImage {
    /// Stable surrogate key. `0` until persisted.
    pub id: i64,
    pub image_urls: Vec<String>,
    /// Foreign key to the owning carousel. `0` until the parent id is known.
    pub carousel_id: ContentId,
}

impl Card {
    /// Creates an unpersisted card with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Checks write-path invariants before any SQL mutation.
    ///
    /// # Errors
    /// - Empty title or empty badge emoji/label.
    /// - A badge whose `card_id` points at a different persisted card.
    pub fn validate(&self) -> Result<(), ContentValidationError> {
        if self.title.trim().is_empty() {
            return Err(ContentValidationError::EmptyTitle);
        }
        for badge in &self.badges {
            if badge.emoji.trim().is_empty() {
                return Err(ContentValidationError::EmptyBadgeEmoji);
            }
            if badge.label.trim().is_empty() {
                return Err(ContentValidationError::EmptyBadgeLabel);
            }
            if badge.card_id != 0 && self.id != 0 && badge.card_id != self.id {
                return Err(ContentValidationError::ForeignParent {
                    child: "badge",
                    parent_id: self.id,
                    child_fk: badge.card_id,
                });
            }
        }
        Ok(())
    }
}

impl Carousel {
    /// Creates an unpersisted carousel with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Checks write-path invariants before any SQL mutation.
    pub fn validate(&self) -> Result<(), ContentValidationError> {
        if self.title.trim().is_empty() {
            return Err(ContentValidationError::EmptyTitle);
        }
        for image in &self.images {
            if image.carousel_id != 0 && self.id != 0 && image.carousel_id != self.id {
                return Err(ContentValidationError::ForeignParent {
                    child: "carousel image",
                    parent_id: self.id,
                    child_fk: image.carousel_id,
                });
            }
        }
        Ok(())
    }
}

/// Maps a content kind to its persisted discriminator value.
pub fn content_kind_to_db(kind: ContentKind) -> &'static str {
    match kind {
        ContentKind::Card => "card",
        ContentKind::Carousel => "carousel",
    }
}

#[cfg(test)]
mod tests {
    use super::{Badge, Card, Carousel, CarouselImage, ContentValidationError};

    #[test]
    fn card_validate_rejects_empty_title() {
        let card = Card::new("   ");
        assert_eq!(card.validate(), Err(ContentValidationError::EmptyTitle));
    }

    #[test]
    fn card_validate_rejects_blank_badge_fields() {
        let mut card = Card::new("ok");
        card.badges.push(Badge {
            emoji: String::new(),
            label: "label".to_string(),
            ..Badge::default()
        });
        assert_eq!(
            card.validate(),
            Err(ContentValidationError::EmptyBadgeEmoji)
        );

        card.badges[0].emoji = "🎓".to_string();
        card.badges[0].label = " ".to_string();
        assert_eq!(
            card.validate(),
            Err(ContentValidationError::EmptyBadgeLabel)
        );
    }

    #[test]
    fn card_validate_rejects_badge_owned_by_other_card() {
        let mut card = Card::new("ok");
        card.id = 7;
        card.badges.push(Badge {
            emoji: "🎓".to_string(),
            label: "Graduate".to_string(),
            card_id: 8,
            ..Badge::default()
        });
        assert!(matches!(
            card.validate(),
            Err(ContentValidationError::ForeignParent { child_fk: 8, .. })
        ));
    }

    #[test]
    fn carousel_validate_accepts_unassigned_children() {
        let mut carousel = Carousel::new("HomeImages");
        carousel.images.push(CarouselImage {
            image_urls: vec!["a.jpg".to_string()],
            ..CarouselImage::default()
        });
        assert!(carousel.validate().is_ok());
    }
}
