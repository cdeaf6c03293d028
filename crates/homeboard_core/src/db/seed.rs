//! First-run demo content seeding.
//!
//! # Responsibility
//! - Insert the demo card/carousel rows into an empty store.
//!
//! # Invariants
//! - Seeding is a no-op when any content row already exists.
//! - All seed rows are written in one transaction.

use super::DbResult;
use log::info;
use rusqlite::{params, Connection, TransactionBehavior};

const SEED_BADGES: &[(&str, &str)] = &[
    ("🛒", "Part-time Sales Assistant: Studio 88"),
    ("🛒", "Part-time Sales Assistant: Outdoor Warehouse"),
    ("💻", "Software Developer Internship: 1Nebula"),
    ("🎓", "CPUT Graduate in Computer Engineering"),
];

const SEED_CAROUSEL_URLS: &[&str] = &[
    "src/assets/CapeTown.jpg",
    "src/assets/Robotics.jpg",
    "src/assets/Graduation.jpg",
];

/// Seeds the demo card and carousel when the store is empty.
///
/// Returns `true` when rows were inserted, `false` when the store already
/// held content.
pub fn seed_demo_data(conn: &mut Connection) -> DbResult<bool> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let existing: i64 =
        tx.query_row("SELECT COUNT(*) FROM content_items;", [], |row| row.get(0))?;
    if existing > 0 {
        info!("event=db_seed module=db status=skipped rows={existing}");
        return Ok(false);
    }

    tx.execute(
        "INSERT INTO content_items (kind, title, image, country, description)
         VALUES ('card', ?1, ?2, ?3, ?4);",
        params![
            "Experience Summary",
            "src/assets/WorkStock.jpg",
            "South Africa",
            "Graduated CPUT with a Bachelors in Computer Engineering. \
             Part-time sales Assistant at Studio 88 and Outdoor Warehouse. \
             Software Developer Internship at 1Nebula.",
        ],
    )?;
    let card_id = tx.last_insert_rowid();

    for (emoji, label) in SEED_BADGES {
        tx.execute(
            "INSERT INTO badges (emoji, label, card_id) VALUES (?1, ?2, ?3);",
            params![emoji, label, card_id],
        )?;
    }

    tx.execute(
        "INSERT INTO content_items (kind, title) VALUES ('carousel', 'HomeImages');",
        [],
    )?;
    let carousel_id = tx.last_insert_rowid();

    let urls = serde_json::json!(SEED_CAROUSEL_URLS).to_string();
    tx.execute(
        "INSERT INTO carousel_images (image_urls, carousel_id) VALUES (?1, ?2);",
        params![urls, carousel_id],
    )?;

    tx.commit()?;
    info!("event=db_seed module=db status=ok card_id={card_id} carousel_id={carousel_id}");
    Ok(true)
}
