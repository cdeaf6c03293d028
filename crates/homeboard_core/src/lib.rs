//! Persistence core for polymorphic home-page content.
//!
//! Cards and carousels share one discriminated storage table; repositories
//! guarantee transactional writes of parents with their owned children, and
//! services expose DTO-based create/read/update/patch/delete use-cases.

pub mod db;
pub mod dto;
pub mod logging;
pub mod model;
pub mod patch;
pub mod repo;
pub mod service;

pub use dto::{
    card_from_dto, card_to_dto, carousel_from_dto, carousel_to_dto, merge_card_dto,
    merge_carousel_dto, BadgeDto, CardDto, CarouselDto, CarouselImageDto,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::content::{
    Badge, Card, Carousel, CarouselImage, ContentId, ContentKind, ContentValidationError,
};
pub use patch::{apply_patch, PatchError, PatchOp, PatchOperation};
pub use repo::card_repo::{CardRepository, SqliteCardRepository};
pub use repo::carousel_repo::{CarouselRepository, SqliteCarouselRepository};
pub use repo::{RepoError, RepoResult};
pub use service::card_service::CardService;
pub use service::carousel_service::CarouselService;
pub use service::ServiceError;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
