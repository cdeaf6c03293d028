//! Carousel use-case service.
//!
//! # Responsibility
//! - Orchestrate repository and mapping for carousels.
//!
//! # Invariants
//! - Create never accepts an id from the payload; storage assigns it.
//! - Update payloads must not contradict the route id.

use crate::dto::{carousel_from_dto, carousel_to_dto, merge_carousel_dto, CarouselDto};
use crate::model::content::ContentId;
use crate::repo::carousel_repo::CarouselRepository;
use crate::repo::RepoError;
use crate::service::ServiceError;

/// Carousel service facade over a repository implementation.
pub struct CarouselService<R: CarouselRepository> {
    repo: R,
}

impl<R: CarouselRepository> CarouselService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists all carousels as DTOs. Best-effort, like the underlying read.
    pub fn list_carousels(&self) -> Vec<CarouselDto> {
        self.repo
            .list_carousels()
            .iter()
            .map(carousel_to_dto)
            .collect()
    }

    /// Gets one carousel by id; `None` when absent.
    pub fn get_carousel(&self, id: ContentId) -> Result<Option<CarouselDto>, ServiceError> {
        Ok(self
            .repo
            .get_carousel(id)?
            .map(|carousel| carousel_to_dto(&carousel)))
    }

    /// Creates a carousel (and its image rows) from the payload.
    ///
    /// The payload id is ignored; the returned DTO echoes the assigned ids.
    pub fn create_carousel(&mut self, dto: &CarouselDto) -> Result<CarouselDto, ServiceError> {
        let carousel = carousel_from_dto(dto);
        let created = self.repo.create_carousel(&carousel)?;
        Ok(carousel_to_dto(&created))
    }

    /// Replaces the full carousel state; `None` when the id is absent.
    pub fn update_carousel(
        &mut self,
        id: ContentId,
        dto: &CarouselDto,
    ) -> Result<Option<CarouselDto>, ServiceError> {
        let Some(mut carousel) = self.repo.get_carousel(id)? else {
            return Ok(None);
        };
        if dto.id > 0 && dto.id != id {
            return Err(ServiceError::IdentityMismatch {
                route_id: id,
                payload_id: dto.id,
            });
        }

        merge_carousel_dto(dto, &mut carousel);
        match self.repo.update_carousel(&carousel) {
            Ok(saved) => Ok(Some(carousel_to_dto(&saved))),
            // Deleted concurrently between the read and the write.
            Err(RepoError::NotFound(_)) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Deletes a carousel and its images; `false` when the id was absent.
    pub fn delete_carousel(&mut self, id: ContentId) -> Result<bool, ServiceError> {
        if self.repo.get_carousel(id)?.is_none() {
            return Ok(false);
        }
        Ok(self.repo.delete_carousel(id)?)
    }
}
