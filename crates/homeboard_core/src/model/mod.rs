//! Domain model for home-page content.
//!
//! # Responsibility
//! - Define the canonical Card/Carousel entities and their owned children.
//! - Keep one discriminated shape for everything stored in `content_items`.
//!
//! # Invariants
//! - Every entity is identified by a stable integer `ContentId`.
//! - Card and Carousel rows share one id space; ids never collide.
//! - Children never outlive their parent row.

pub mod content;
