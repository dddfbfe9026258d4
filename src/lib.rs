//! vidshelf library
//!
//! Cleans a loosely typed video catalog into a deduplicated, render-safe
//! list and counts its tags.

pub mod core;
pub mod error;
pub mod session;
pub mod storage;
pub mod types;
pub mod utils;

pub use crate::core::catalog::{Catalog, CatalogSource, load_catalog, parse_catalog};
pub use crate::core::categories::{aggregate_records, aggregate_videos, filter_by_category, search};
pub use crate::core::dedupe::dedupe;
pub use crate::core::links::{LinkResolver, has_link};
pub use crate::core::pipeline::{CatalogStats, Pipeline, filter_valid};
pub use crate::core::thumbnail::validate_thumbnail;
pub use crate::error::{Result, VidshelfError};
pub use crate::session::{Session, View};
