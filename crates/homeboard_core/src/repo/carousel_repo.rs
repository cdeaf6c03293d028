//! Carousel repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD persistence for carousels and their image rows.
//! - Own the JSON encoding of the list-valued `image_urls` column.
//!
//! # Invariants
//! - Write paths call `Carousel::validate()` before SQL mutations.
//! - Parent and image writes commit together or not at all.
//! - Undecodable persisted `image_urls` surfaces as `InvalidData` instead of
//!   being silently dropped.

use crate::model::content::{content_kind_to_db, Carousel, CarouselImage, ContentId, ContentKind};
use crate::repo::{ensure_valid_id, RepoError, RepoResult};
use log::{error, info};
use rusqlite::{params, Connection, Row, TransactionBehavior};
use std::collections::BTreeMap;

const CAROUSEL_SELECT_SQL: &str = "SELECT id, title
FROM content_items
WHERE kind = 'carousel'";

/// Repository interface for the carousel entity family.
pub trait CarouselRepository {
    /// Returns all carousels with image rows eagerly loaded, ordered by id.
    ///
    /// Best-effort read: a storage failure is logged and yields an empty
    /// list instead of failing the caller.
    fn list_carousels(&self) -> Vec<Carousel>;
    /// Gets one carousel and its images; `Ok(None)` when absent.
    fn get_carousel(&self, id: ContentId) -> RepoResult<Option<Carousel>>;
    /// Inserts a carousel and all its images in one transaction; returns
    /// the persisted entity with assigned surrogate keys.
    fn create_carousel(&mut self, carousel: &Carousel) -> RepoResult<Carousel>;
    /// Replaces the full carousel state (parent row + image set) in one
    /// transaction; returns the persisted entity with assigned child keys.
    fn update_carousel(&mut self, carousel: &Carousel) -> RepoResult<Carousel>;
    /// Removes a carousel and cascades its images. Idempotent: a missing id
    /// is `Ok(false)`, not an error.
    fn delete_carousel(&mut self, id: ContentId) -> RepoResult<bool>;
}

/// SQLite-backed carousel repository over one migrated connection.
pub struct SqliteCarouselRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteCarouselRepository<'conn> {
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }

    fn try_list_carousels(&self) -> RepoResult<Vec<Carousel>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CAROUSEL_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut carousels = Vec::new();
        while let Some(row) = rows.next()? {
            carousels.push(parse_carousel_row(row)?);
        }

        let mut by_carousel = load_all_images(self.conn)?;
        for carousel in &mut carousels {
            carousel.images = by_carousel.remove(&carousel.id).unwrap_or_default();
        }
        Ok(carousels)
    }
}

impl CarouselRepository for SqliteCarouselRepository<'_> {
    fn list_carousels(&self) -> Vec<Carousel> {
        match self.try_list_carousels() {
            Ok(carousels) => carousels,
            Err(err) => {
                error!("event=carousel_list module=carousel_repo status=error error={err}");
                Vec::new()
            }
        }
    }

    fn get_carousel(&self, id: ContentId) -> RepoResult<Option<Carousel>> {
        ensure_valid_id(id)?;

        let mut stmt = self
            .conn
            .prepare(&format!("{CAROUSEL_SELECT_SQL} AND id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        let Some(row) = rows.next()? else {
            return Ok(None);
        };

        let mut carousel = parse_carousel_row(row)?;
        carousel.images = load_images_for_carousel(self.conn, id)?;
        Ok(Some(carousel))
    }

    fn create_carousel(&mut self, carousel: &Carousel) -> RepoResult<Carousel> {
        carousel.validate()?;
        info!("event=carousel_create module=carousel_repo status=start");

        let result = (|| -> RepoResult<Carousel> {
            let tx = self
                .conn
                .transaction_with_behavior(TransactionBehavior::Immediate)?;

            tx.execute(
                "INSERT INTO content_items (kind, title) VALUES (?1, ?2);",
                params![
                    content_kind_to_db(ContentKind::Carousel),
                    carousel.title.as_str()
                ],
            )?;
            let carousel_id = tx.last_insert_rowid();

            let mut persisted = carousel.clone();
            persisted.id = carousel_id;
            for image in &mut persisted.images {
                image.id = insert_image(&tx, image, carousel_id)?;
                image.carousel_id = carousel_id;
            }

            tx.commit()?;
            Ok(persisted)
        })();

        match &result {
            Ok(created) => info!(
                "event=carousel_create module=carousel_repo status=ok id={} images={}",
                created.id,
                created.images.len()
            ),
            Err(err) => {
                error!("event=carousel_create module=carousel_repo status=error error={err}");
            }
        }
        result
    }

    fn update_carousel(&mut self, carousel: &Carousel) -> RepoResult<Carousel> {
        carousel.validate()?;
        ensure_valid_id(carousel.id)?;
        info!(
            "event=carousel_update module=carousel_repo status=start id={}",
            carousel.id
        );

        let result = (|| -> RepoResult<Carousel> {
            let tx = self
                .conn
                .transaction_with_behavior(TransactionBehavior::Immediate)?;

            let changed = tx.execute(
                "UPDATE content_items SET title = ?2 WHERE id = ?1 AND kind = 'carousel';",
                params![carousel.id, carousel.title.as_str()],
            )?;
            if changed == 0 {
                return Err(RepoError::NotFound(carousel.id));
            }

            tx.execute(
                "DELETE FROM carousel_images WHERE carousel_id = ?1;",
                [carousel.id],
            )?;
            let mut persisted = carousel.clone();
            for image in &mut persisted.images {
                image.id = insert_image(&tx, image, carousel.id)?;
                image.carousel_id = carousel.id;
            }

            tx.commit()?;
            Ok(persisted)
        })();

        match &result {
            Ok(_) => info!(
                "event=carousel_update module=carousel_repo status=ok id={}",
                carousel.id
            ),
            Err(err) => error!(
                "event=carousel_update module=carousel_repo status=error id={} error={err}",
                carousel.id
            ),
        }
        result
    }

    fn delete_carousel(&mut self, id: ContentId) -> RepoResult<bool> {
        ensure_valid_id(id)?;
        info!("event=carousel_delete module=carousel_repo status=start id={id}");

        let result = (|| -> RepoResult<bool> {
            let tx = self
                .conn
                .transaction_with_behavior(TransactionBehavior::Immediate)?;
            // FK cascade removes the image rows together with the parent.
            let changed = tx.execute(
                "DELETE FROM content_items WHERE id = ?1 AND kind = 'carousel';",
                [id],
            )?;
            tx.commit()?;
            Ok(changed > 0)
        })();

        match &result {
            Ok(removed) => info!(
                "event=carousel_delete module=carousel_repo status=ok id={id} removed={removed}"
            ),
            Err(err) => error!(
                "event=carousel_delete module=carousel_repo status=error id={id} error={err}"
            ),
        }
        result
    }
}

fn parse_carousel_row(row: &Row<'_>) -> RepoResult<Carousel> {
    Ok(Carousel {
        id: row.get("id")?,
        title: row.get("title")?,
        images: Vec::new(),
    })
}

/// Inserts one image row under `carousel_id`, keeping an already-assigned
/// surrogate key when present. Returns the persisted image id.
fn insert_image(conn: &Connection, image: &CarouselImage, carousel_id: ContentId) -> RepoResult<i64> {
    let urls = serde_json::json!(image.image_urls).to_string();
    if image.id > 0 {
        conn.execute(
            "INSERT INTO carousel_images (id, image_urls, carousel_id) VALUES (?1, ?2, ?3);",
            params![image.id, urls, carousel_id],
        )?;
        Ok(image.id)
    } else {
        conn.execute(
            "INSERT INTO carousel_images (image_urls, carousel_id) VALUES (?1, ?2);",
            params![urls, carousel_id],
        )?;
        Ok(conn.last_insert_rowid())
    }
}

fn load_images_for_carousel(conn: &Connection, carousel_id: ContentId) -> RepoResult<Vec<CarouselImage>> {
    let mut stmt = conn.prepare(
        "SELECT id, image_urls, carousel_id
         FROM carousel_images
         WHERE carousel_id = ?1
         ORDER BY id ASC;",
    )?;
    let mut rows = stmt.query([carousel_id])?;
    let mut images = Vec::new();
    while let Some(row) = rows.next()? {
        images.push(parse_image_row(row)?);
    }
    Ok(images)
}

fn load_all_images(conn: &Connection) -> RepoResult<BTreeMap<ContentId, Vec<CarouselImage>>> {
    let mut stmt = conn.prepare(
        "SELECT id, image_urls, carousel_id
         FROM carousel_images
         ORDER BY carousel_id ASC, id ASC;",
    )?;
    let mut rows = stmt.query([])?;
    let mut by_carousel: BTreeMap<ContentId, Vec<CarouselImage>> = BTreeMap::new();
    while let Some(row) = rows.next()? {
        let image = parse_image_row(row)?;
        by_carousel.entry(image.carousel_id).or_default().push(image);
    }
    Ok(by_carousel)
}

fn parse_image_row(row: &Row<'_>) -> RepoResult<CarouselImage> {
    let raw_urls: String = row.get("image_urls")?;
    let image_urls: Vec<String> = serde_json::from_str(&raw_urls).map_err(|err| {
        RepoError::InvalidData(format!(
            "invalid image_urls JSON in carousel_images: {err}"
        ))
    })?;
    Ok(CarouselImage {
        id: row.get("id")?,
        image_urls,
        carousel_id: row.get("carousel_id")?,
    })
}
