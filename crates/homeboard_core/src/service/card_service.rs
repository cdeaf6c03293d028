//! Card use-case service.
//!
//! # Responsibility
//! - Orchestrate repository, mapping and patch reconciliation for cards.
//! - Own the identity source-of-truth rule for update/patch payloads.
//!
//! # Invariants
//! - Create never accepts an id from the payload; storage assigns it.
//! - Patch batches are applied to a working DTO copy; a failing batch
//!   persists nothing.
//! - The entity id after patching always equals the route id.

use crate::dto::{card_from_dto, card_to_dto, merge_card_dto, CardDto};
use crate::model::content::ContentId;
use crate::patch::{apply_patch, PatchError, PatchOperation};
use crate::repo::card_repo::CardRepository;
use crate::repo::RepoError;
use crate::service::ServiceError;

/// Card service facade over a repository implementation.
pub struct CardService<R: CardRepository> {
    repo: R,
}

impl<R: CardRepository> CardService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists all cards as DTOs. Best-effort, like the underlying read.
    pub fn list_cards(&self) -> Vec<CardDto> {
        self.repo.list_cards().iter().map(card_to_dto).collect()
    }

    /// Gets one card by id; `None` when absent.
    pub fn get_card(&self, id: ContentId) -> Result<Option<CardDto>, ServiceError> {
        Ok(self.repo.get_card(id)?.map(|card| card_to_dto(&card)))
    }

    /// Creates a card (and its badges) from the payload.
    ///
    /// The payload id is ignored; the returned DTO echoes the assigned ids.
    pub fn create_card(&mut self, dto: &CardDto) -> Result<CardDto, ServiceError> {
        let card = card_from_dto(dto);
        let created = self.repo.create_card(&card)?;
        Ok(card_to_dto(&created))
    }

    /// Replaces the full card state; `None` when the id is absent.
    ///
    /// A payload carrying a different positive id than the route id is
    /// rejected rather than silently preferring either one.
    pub fn update_card(
        &mut self,
        id: ContentId,
        dto: &CardDto,
    ) -> Result<Option<CardDto>, ServiceError> {
        let Some(mut card) = self.repo.get_card(id)? else {
            return Ok(None);
        };
        if dto.id > 0 && dto.id != id {
            return Err(ServiceError::IdentityMismatch {
                route_id: id,
                payload_id: dto.id,
            });
        }

        merge_card_dto(dto, &mut card);
        match self.repo.update_card(&card) {
            Ok(saved) => Ok(Some(card_to_dto(&saved))),
            // Deleted concurrently between the read and the write.
            Err(RepoError::NotFound(_)) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Applies an ordered batch of field-level edits; `None` when absent.
    ///
    /// Reconciliation: entity -> DTO -> JSON working copy -> ordered edits ->
    /// DTO -> identity re-assertion -> merge onto the original entity ->
    /// transactional persist. Any failing edit persists nothing.
    pub fn patch_card(
        &mut self,
        id: ContentId,
        ops: &[PatchOperation],
    ) -> Result<Option<CardDto>, ServiceError> {
        let Some(mut card) = self.repo.get_card(id)? else {
            return Ok(None);
        };

        let dto = card_to_dto(&card);
        let mut doc = serde_json::to_value(&dto).map_err(|_| {
            ServiceError::InconsistentState("card DTO projection is not representable as JSON")
        })?;
        apply_patch(&mut doc, ops)?;

        let patched: CardDto = serde_json::from_value(doc)
            .map_err(|err| PatchError::Unreadable(err.to_string()))?;
        if patched.id != id {
            return Err(ServiceError::IdentityMismatch {
                route_id: id,
                payload_id: patched.id,
            });
        }

        merge_card_dto(&patched, &mut card);
        match self.repo.patch_card(&card) {
            Ok(saved) => Ok(Some(card_to_dto(&saved))),
            Err(RepoError::NotFound(_)) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Deletes a card and its badges; `false` when the id was absent.
    pub fn delete_card(&mut self, id: ContentId) -> Result<bool, ServiceError> {
        if self.repo.get_card(id)?.is_none() {
            return Ok(false);
        }
        Ok(self.repo.delete_card(id)?)
    }
}
