//! Core modules: catalog, thumbnails, links, dedupe, categories, pipeline

pub mod catalog;
pub mod categories;
pub mod dedupe;
pub mod links;
pub mod pipeline;
pub mod thumbnail;
