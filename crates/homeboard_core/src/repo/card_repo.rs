//! Card repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD + patch persistence for cards and their badges.
//! - Keep SQL, transaction and cascade details inside this boundary.
//!
//! # Invariants
//! - Write paths call `Card::validate()` before SQL mutations.
//! - Parent and badge writes commit together or not at all.
//! - A reader never observes a card without its then-current badges.

use crate::model::content::{content_kind_to_db, Badge, Card, ContentId, ContentKind};
use crate::repo::{ensure_valid_id, RepoError, RepoResult};
use log::{error, info};
use rusqlite::{params, Connection, Row, TransactionBehavior};
use std::collections::BTreeMap;

const CARD_SELECT_SQL: &str = "SELECT id, title, image, country, description
FROM content_items
WHERE kind = 'card'";

/// Repository interface for the card entity family.
pub trait CardRepository {
    /// Returns all cards with badges eagerly loaded, ordered by id.
    ///
    /// Best-effort read: a storage failure is logged and yields an empty
    /// list instead of failing the caller.
    fn list_cards(&self) -> Vec<Card>;
    /// Gets one card and its badges; `Ok(None)` when absent.
    fn get_card(&self, id: ContentId) -> RepoResult<Option<Card>>;
    /// Inserts a card and all its badges in one transaction; returns the
    /// persisted entity with assigned surrogate keys.
    fn create_card(&mut self, card: &Card) -> RepoResult<Card>;
    /// Replaces the full card state (parent row + badge set) in one
    /// transaction; returns the persisted entity with assigned child keys.
    fn update_card(&mut self, card: &Card) -> RepoResult<Card>;
    /// Persists an already-merged card produced by the patch reconciler.
    fn patch_card(&mut self, card: &Card) -> RepoResult<Card>;
    /// Removes a card and cascades its badges. Idempotent: a missing id is
    /// `Ok(false)`, not an error.
    fn delete_card(&mut self, id: ContentId) -> RepoResult<bool>;
}

/// SQLite-backed card repository over one migrated connection.
pub struct SqliteCardRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteCardRepository<'conn> {
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }

    fn try_list_cards(&self) -> RepoResult<Vec<Card>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CARD_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut cards = Vec::new();
        while let Some(row) = rows.next()? {
            cards.push(parse_card_row(row)?);
        }

        let mut by_card = load_all_badges(self.conn)?;
        for card in &mut cards {
            card.badges = by_card.remove(&card.id).unwrap_or_default();
        }
        Ok(cards)
    }

    /// Shared full-state write path for `update_card`/`patch_card`.
    fn write_full(&mut self, card: &Card, event: &'static str) -> RepoResult<Card> {
        card.validate()?;
        ensure_valid_id(card.id)?;
        info!("event={event} module=card_repo status=start id={}", card.id);

        let result = (|| -> RepoResult<Card> {
            let tx = self
                .conn
                .transaction_with_behavior(TransactionBehavior::Immediate)?;

            let changed = tx.execute(
                "UPDATE content_items
                 SET title = ?2, image = ?3, country = ?4, description = ?5
                 WHERE id = ?1 AND kind = 'card';",
                params![
                    card.id,
                    card.title.as_str(),
                    card.image.as_deref(),
                    card.country.as_deref(),
                    card.description.as_deref(),
                ],
            )?;
            if changed == 0 {
                return Err(RepoError::NotFound(card.id));
            }

            tx.execute("DELETE FROM badges WHERE card_id = ?1;", [card.id])?;
            let mut persisted = card.clone();
            for badge in &mut persisted.badges {
                badge.id = insert_badge(&tx, badge, card.id)?;
                badge.card_id = card.id;
            }

            tx.commit()?;
            Ok(persisted)
        })();

        match &result {
            Ok(_) => info!("event={event} module=card_repo status=ok id={}", card.id),
            Err(err) => error!(
                "event={event} module=card_repo status=error id={} error={err}",
                card.id
            ),
        }
        result
    }
}

impl CardRepository for SqliteCardRepository<'_> {
    fn list_cards(&self) -> Vec<Card> {
        match self.try_list_cards() {
            Ok(cards) => cards,
            Err(err) => {
                error!("event=card_list module=card_repo status=error error={err}");
                Vec::new()
            }
        }
    }

    fn get_card(&self, id: ContentId) -> RepoResult<Option<Card>> {
        ensure_valid_id(id)?;

        let mut stmt = self
            .conn
            .prepare(&format!("{CARD_SELECT_SQL} AND id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        let Some(row) = rows.next()? else {
            return Ok(None);
        };

        let mut card = parse_card_row(row)?;
        card.badges = load_badges_for_card(self.conn, id)?;
        Ok(Some(card))
    }

    fn create_card(&mut self, card: &Card) -> RepoResult<Card> {
        card.validate()?;
        info!("event=card_create module=card_repo status=start");

        let result = (|| -> RepoResult<Card> {
            let tx = self
                .conn
                .transaction_with_behavior(TransactionBehavior::Immediate)?;

            tx.execute(
                "INSERT INTO content_items (kind, title, image, country, description)
                 VALUES (?1, ?2, ?3, ?4, ?5);",
                params![
                    content_kind_to_db(ContentKind::Card),
                    card.title.as_str(),
                    card.image.as_deref(),
                    card.country.as_deref(),
                    card.description.as_deref(),
                ],
            )?;
            let card_id = tx.last_insert_rowid();

            let mut persisted = card.clone();
            persisted.id = card_id;
            for badge in &mut persisted.badges {
                badge.id = insert_badge(&tx, badge, card_id)?;
                badge.card_id = card_id;
            }

            tx.commit()?;
            Ok(persisted)
        })();

        match &result {
            Ok(created) => info!(
                "event=card_create module=card_repo status=ok id={} badges={}",
                created.id,
                created.badges.len()
            ),
            Err(err) => {
                error!("event=card_create module=card_repo status=error error={err}");
            }
        }
        result
    }

    fn update_card(&mut self, card: &Card) -> RepoResult<Card> {
        self.write_full(card, "card_update")
    }

    fn patch_card(&mut self, card: &Card) -> RepoResult<Card> {
        self.write_full(card, "card_patch")
    }

    fn delete_card(&mut self, id: ContentId) -> RepoResult<bool> {
        ensure_valid_id(id)?;
        info!("event=card_delete module=card_repo status=start id={id}");

        let result = (|| -> RepoResult<bool> {
            let tx = self
                .conn
                .transaction_with_behavior(TransactionBehavior::Immediate)?;
            // FK cascade removes the badge rows together with the parent.
            let changed = tx.execute(
                "DELETE FROM content_items WHERE id = ?1 AND kind = 'card';",
                [id],
            )?;
            tx.commit()?;
            Ok(changed > 0)
        })();

        match &result {
            Ok(removed) => {
                info!("event=card_delete module=card_repo status=ok id={id} removed={removed}");
            }
            Err(err) => {
                error!("event=card_delete module=card_repo status=error id={id} error={err}");
            }
        }
        result
    }
}

fn parse_card_row(row: &Row<'_>) -> RepoResult<Card> {
    Ok(Card {
        id: row.get("id")?,
        title: row.get("title")?,
        image: row.get("image")?,
        country: row.get("country")?,
        description: row.get("description")?,
        badges: Vec::new(),
    })
}

/// Inserts one badge under `card_id`, keeping an already-assigned surrogate
/// key when the badge carries one. Returns the persisted badge id.
fn insert_badge(conn: &Connection, badge: &Badge, card_id: ContentId) -> RepoResult<i64> {
    if badge.id > 0 {
        conn.execute(
            "INSERT INTO badges (id, emoji, label, card_id) VALUES (?1, ?2, ?3, ?4);",
            params![badge.id, badge.emoji.as_str(), badge.label.as_str(), card_id],
        )?;
        Ok(badge.id)
    } else {
        conn.execute(
            "INSERT INTO badges (emoji, label, card_id) VALUES (?1, ?2, ?3);",
            params![badge.emoji.as_str(), badge.label.as_str(), card_id],
        )?;
        Ok(conn.last_insert_rowid())
    }
}

fn load_badges_for_card(conn: &Connection, card_id: ContentId) -> RepoResult<Vec<Badge>> {
    let mut stmt = conn.prepare(
        "SELECT id, emoji, label, card_id
         FROM badges
         WHERE card_id = ?1
         ORDER BY id ASC;",
    )?;
    let mut rows = stmt.query([card_id])?;
    let mut badges = Vec::new();
    while let Some(row) = rows.next()? {
        badges.push(parse_badge_row(row)?);
    }
    Ok(badges)
}

fn load_all_badges(conn: &Connection) -> RepoResult<BTreeMap<ContentId, Vec<Badge>>> {
    let mut stmt = conn.prepare(
        "SELECT id, emoji, label, card_id
         FROM badges
         ORDER BY card_id ASC, id ASC;",
    )?;
    let mut rows = stmt.query([])?;
    let mut by_card: BTreeMap<ContentId, Vec<Badge>> = BTreeMap::new();
    while let Some(row) = rows.next()? {
        let badge = parse_badge_row(row)?;
        by_card.entry(badge.card_id).or_default().push(badge);
    }
    Ok(by_card)
}

fn parse_badge_row(row: &Row<'_>) -> RepoResult<Badge> {
    Ok(Badge {
        id: row.get("id")?,
        emoji: row.get("emoji")?,
        label: row.get("label")?,
        card_id: row.get("card_id")?,
    })
}
